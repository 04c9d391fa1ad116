// Screen-hole preprocessing.
//
// A hi-res page interleaves three 40-byte rows into each 128-byte block,
// leaving 8 invisible bytes at offset 120 of every block. Their contents
// never render, so rewriting them to blend with the surrounding data
// turns every hole into part of a match instead of a literal-run break.
//
// Two strategies, tried independently by the engine:
//   - zero_holes: holes match previous holes (and any run of zeroes)
//   - fill_holes: project the neighboring period-2 pixel pattern into
//     the hole so it joins an existing run
//
// Both are deterministic and idempotent; callers that want to compare
// variants must run them on separate copies.

/// Offset of the first hole within the page.
const HOLE_START: usize = 120;
/// Distance between holes.
const HOLE_STRIDE: usize = 128;
/// Bytes per hole.
const HOLE_LEN: usize = 8;

/// Iterate over the start offsets of every hole that fits in `len` bytes.
fn hole_offsets(len: usize) -> impl Iterator<Item = usize> {
    (HOLE_START..len)
        .step_by(HOLE_STRIDE)
        .take_while(move |&p| p + HOLE_LEN <= len)
}

/// Overwrite every screen hole with zeroes.
pub fn zero_holes(buf: &mut [u8]) {
    for p in hole_offsets(buf.len()) {
        buf[p..p + HOLE_LEN].fill(0);
    }
}

/// Fill every screen hole with the period-2 pattern of its neighbors.
///
/// If the two bytes after the hole repeat two bytes later (a color
/// pattern like `2a 55 2a 55`), extend that pattern backward into the
/// hole; otherwise extend the pattern preceding the hole forward. Either
/// way the copy overlaps by 2 bytes, replicating a 16-bit pattern.
pub fn fill_holes(buf: &mut [u8]) {
    for p in hole_offsets(buf.len()) {
        let after = p + HOLE_LEN;
        let use_after =
            after + 4 <= buf.len() && buf[after] == buf[after + 2] && buf[after + 1] == buf[after + 3];

        if use_after {
            for i in (0..HOLE_LEN).rev() {
                buf[p + i] = buf[p + i + 2];
            }
        } else {
            for i in 0..HOLE_LEN {
                buf[p + i] = buf[p + i - 2];
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{MAX_SIZE, MIN_SIZE};

    fn counting_page(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn zero_holes_clears_every_hole() {
        let mut buf = vec![0xAA; MAX_SIZE];
        zero_holes(&mut buf);
        for p in (HOLE_START..MAX_SIZE).step_by(HOLE_STRIDE) {
            assert!(buf[p..p + HOLE_LEN].iter().all(|&b| b == 0), "hole at {p}");
        }
        // visible bytes untouched
        assert_eq!(buf[0], 0xAA);
        assert_eq!(buf[119], 0xAA);
        assert_eq!(buf[128], 0xAA);
    }

    #[test]
    fn zero_holes_is_idempotent() {
        let mut once = counting_page(MAX_SIZE);
        zero_holes(&mut once);
        let mut twice = once.clone();
        zero_holes(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn fill_holes_extends_preceding_pattern() {
        let mut buf = vec![0u8; 256];
        // period-2 pattern right before the hole, nothing repeating after
        buf[118] = 0x2A;
        buf[119] = 0x55;
        for (i, b) in (128..132).zip([1, 2, 3, 4]) {
            buf[i] = b; // not a period-2 repeat
        }
        fill_holes(&mut buf);
        assert_eq!(&buf[120..128], &[0x2A, 0x55, 0x2A, 0x55, 0x2A, 0x55, 0x2A, 0x55]);
    }

    #[test]
    fn fill_holes_prefers_following_pattern_when_it_repeats() {
        let mut buf = vec![0u8; 256];
        buf[118] = 0x11;
        buf[119] = 0x22;
        // bytes after the hole form a period-2 repeat
        buf[128] = 0xD5;
        buf[129] = 0xAA;
        buf[130] = 0xD5;
        buf[131] = 0xAA;
        fill_holes(&mut buf);
        assert_eq!(&buf[120..128], &[0xD5, 0xAA, 0xD5, 0xAA, 0xD5, 0xAA, 0xD5, 0xAA]);
    }

    #[test]
    fn fill_holes_is_idempotent() {
        let mut once = counting_page(MIN_SIZE);
        fill_holes(&mut once);
        let mut twice = once.clone();
        fill_holes(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn trimmed_page_fills_final_hole_before_cutoff() {
        // on an 8184-byte page the last hole starts at 8056
        let mut buf = counting_page(MIN_SIZE);
        let before = buf.clone();
        fill_holes(&mut buf);
        assert_ne!(&buf[8056..8064], &before[8056..8064]);
        // everything past the last hole is untouched
        assert_eq!(&buf[8064..], &before[8064..]);
    }

    #[test]
    fn hole_offsets_respect_buffer_end() {
        assert_eq!(hole_offsets(128).collect::<Vec<_>>(), vec![120]);
        assert_eq!(hole_offsets(127).count(), 0);
        assert_eq!(hole_offsets(MAX_SIZE).count(), 64);
        assert_eq!(hole_offsets(MIN_SIZE).count(), 63);
    }
}
