// Greedy parser: one forward pass, take every usable match immediately.
//
// Fast to run and nearly memoryless, at the cost of a few dozen bytes
// versus the optimal parser. At each position the longest match is
// either emitted (together with any pending literals) or the position
// joins the pending literal run; a run that hits the 255 limit is
// flushed with the no-match token.

use crate::format::{ChunkWriter, MAX_LITERALS};
use crate::matching;

/// Compress `input` with greedy parsing, returning the LZ4FH stream.
pub fn compress(input: &[u8]) -> Vec<u8> {
    let mut writer = ChunkWriter::new();
    let mut pos = 0;
    let mut lit_start = 0;

    while pos < input.len() {
        let m = matching::find_longest_match(input, pos);
        if m.is_usable() {
            writer.match_chunk(&input[lit_start..pos], m);
            pos += m.length;
            lit_start = pos;
        } else {
            if pos - lit_start == MAX_LITERALS {
                writer.literal_chunk(&input[lit_start..pos]);
                lit_start = pos;
            }
            pos += 1;
        }
    }

    writer.finish(&input[lit_start..])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder;
    use crate::format::{EOD_TOKEN, LZ4FH_MAGIC};

    #[test]
    fn empty_input_is_bare_terminator() {
        assert_eq!(compress(&[]), vec![LZ4FH_MAGIC, 0x0f, EOD_TOKEN]);
    }

    #[test]
    fn all_literals_when_nothing_repeats() {
        let input = [10, 20, 30, 40, 50];
        let out = compress(&input);
        assert_eq!(out, vec![LZ4FH_MAGIC, 0x5f, 10, 20, 30, 40, 50, EOD_TOKEN]);
    }

    #[test]
    fn run_collapses_to_one_match() {
        let input = vec![0u8; 200];
        let out = compress(&input);
        // one literal zero, then a single overlapping match of 199
        let decoded = decoder::decode(&out).unwrap();
        assert_eq!(decoded, input);
        assert!(out.len() < 12, "run should compress tightly, got {}", out.len());
    }

    #[test]
    fn sixteen_literals_then_match_of_nineteen() {
        // 16 distinct bytes, then the first 19 bytes repeated: produces
        // exactly one chunk with both extension bytes and offset 0.
        let mut input: Vec<u8> = (1..=16).collect();
        let repeat: Vec<u8> = input.iter().copied().cycle().take(19).collect();
        input.extend_from_slice(&repeat);

        let out = compress(&input);
        let mut expect = vec![LZ4FH_MAGIC, 0xff, 0x01];
        expect.extend(1..=16u8);
        expect.extend_from_slice(&[0x00, 0x00, 0x00]); // match ext 0, offset 0
        expect.extend_from_slice(&[0x0f, EOD_TOKEN]);
        assert_eq!(out, expect);

        assert_eq!(decoder::decode(&out).unwrap(), input);
    }

    #[test]
    fn literal_run_overflow_emits_no_match_chunk() {
        // 300 bytes with no 4-byte repeats force a 255-literal flush
        let input: Vec<u8> = (0..300u32)
            .flat_map(|i| [(i >> 8) as u8, i as u8])
            .take(300)
            .collect();
        let out = compress(&input);
        let decoded = decoder::decode(&out).unwrap();
        assert_eq!(decoded, input);
        // 255-run chunk (3 bytes overhead) + 45-run terminator (3 bytes) + magic
        assert_eq!(out.len(), 300 + 3 + 3 + 1);
    }

    #[test]
    fn roundtrip_patterned_page() {
        let input: Vec<u8> = (0..4096).map(|i| ((i / 7) % 256) as u8).collect();
        let out = compress(&input);
        assert!(out.len() < input.len());
        assert_eq!(decoder::decode(&out).unwrap(), input);
    }
}
