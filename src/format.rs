// LZ4FH wire format: constants and chunk serialization.
//
// A stream is a magic byte followed by chunks. Each chunk packs the
// literal-run length and the match length into the two nibbles of one
// framing byte; a nibble of 15 pulls in an extension byte. The match
// nibble's extension space doubles as signalling: 253 means "no match
// here" (two adjacent literal runs), 254 means end-of-data.
//
//  chunk:
//   1 byte : literal len (hi nibble) | match len - 4 (lo nibble)
//   1 byte : (iff hi nibble = 15) literal len - 15, 0-240
//   N bytes: literals
//   1 byte : (iff lo nibble = 15) match len - 19, 0-236 -or- 253/254
//   2 bytes: (if a real match) little-endian absolute output offset
//
// Offsets are absolute into the output buffer rather than relative to
// the write position, so the 6502 decoder can OR in the hi-res page's
// high byte instead of doing 16-bit subtraction.

/// Format magic, first byte of every stream ('f' for fadden).
pub const LZ4FH_MAGIC: u8 = 0x66;

/// Hi-res page size; fixed output buffer capacity.
pub const MAX_SIZE: usize = 8192;
/// Page size without the final screen hole.
pub const MIN_SIZE: usize = MAX_SIZE - 8;
/// Worst-case growth over the input: ((MAX_SIZE / 255) + 1) * 3 + 1.
pub const MAX_EXPANSION: usize = 100;

/// Shortest match worth encoding.
pub const MIN_MATCH: usize = 4;
/// Longest encodable match.
pub const MAX_MATCH: usize = 255;
/// Longest encodable literal run.
pub const MAX_LITERALS: usize = 255;
/// Nibble value that signals a length-extension byte.
pub const NIBBLE_LIMIT: usize = 15;

/// Match-extension value for "no match, literals follow literals".
pub const EMPTY_MATCH_TOKEN: u8 = 253;
/// Match-extension value terminating the stream.
pub const EOD_TOKEN: u8 = 254;

// ---------------------------------------------------------------------------
// Match descriptor
// ---------------------------------------------------------------------------

/// A back-reference into already-produced output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Absolute offset into the output buffer. Always strictly less than
    /// the write position at emission time; the copy may overlap its own
    /// destination (that is how short patterns become long runs).
    pub offset: usize,
    /// Number of bytes to copy.
    pub length: usize,
}

impl Match {
    /// A zero-length non-match.
    pub const NONE: Match = Match {
        offset: 0,
        length: 0,
    };

    /// Whether this match is long enough to encode.
    pub fn is_usable(&self) -> bool {
        self.length >= MIN_MATCH
    }
}

// ---------------------------------------------------------------------------
// ChunkWriter
// ---------------------------------------------------------------------------

/// Serializes parser decisions into an LZ4FH byte stream.
///
/// Both parsers funnel their output through this writer, so the framing
/// rules live in exactly one place. The writer owns the output buffer;
/// `finish` emits the terminal chunk and hands the buffer back.
pub struct ChunkWriter {
    out: Vec<u8>,
}

impl ChunkWriter {
    pub fn new() -> Self {
        let mut out = Vec::with_capacity(MAX_SIZE + MAX_EXPANSION);
        out.push(LZ4FH_MAGIC);
        Self { out }
    }

    /// Emit a chunk carrying `literals` (possibly empty) followed by a match.
    pub fn match_chunk(&mut self, literals: &[u8], m: Match) {
        debug_assert!((MIN_MATCH..=MAX_MATCH).contains(&m.length));
        debug_assert!(m.offset < MAX_SIZE);

        let adjusted = m.length - MIN_MATCH;
        self.push_header(literals, adjusted.min(NIBBLE_LIMIT) as u8);
        if adjusted >= NIBBLE_LIMIT {
            self.out.push((adjusted - NIBBLE_LIMIT) as u8);
        }
        self.out.extend_from_slice(&(m.offset as u16).to_le_bytes());
    }

    /// Emit a chunk carrying only literals, marked with the no-match token.
    /// Needed when two literal runs are adjacent (run length overflow, or
    /// the optimal parser's backward-built runs).
    pub fn literal_chunk(&mut self, literals: &[u8]) {
        self.push_header(literals, NIBBLE_LIMIT as u8);
        self.out.push(EMPTY_MATCH_TOKEN);
    }

    /// Emit the final literals and the end-of-data chunk, returning the
    /// completed stream.
    pub fn finish(mut self, literals: &[u8]) -> Vec<u8> {
        self.push_header(literals, NIBBLE_LIMIT as u8);
        self.out.push(EOD_TOKEN);
        self.out
    }

    /// Framing byte, optional literal-length extension, literal payload.
    fn push_header(&mut self, literals: &[u8], match_nibble: u8) {
        let n = literals.len();
        debug_assert!(n <= MAX_LITERALS);

        let lit_nibble = n.min(NIBBLE_LIMIT) as u8;
        self.out.push((lit_nibble << 4) | match_nibble);
        if n >= NIBBLE_LIMIT {
            self.out.push((n - NIBBLE_LIMIT) as u8);
        }
        self.out.extend_from_slice(literals);
    }
}

impl Default for ChunkWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stream_is_magic_plus_terminator() {
        let out = ChunkWriter::new().finish(&[]);
        assert_eq!(out, vec![LZ4FH_MAGIC, 0x0f, EOD_TOKEN]);
    }

    #[test]
    fn short_literals_fit_in_nibble() {
        let out = ChunkWriter::new().finish(&[1, 2, 3]);
        assert_eq!(out, vec![LZ4FH_MAGIC, 0x3f, 1, 2, 3, EOD_TOKEN]);
    }

    #[test]
    fn fifteen_literals_need_extension() {
        let lits: Vec<u8> = (0..15).collect();
        let out = ChunkWriter::new().finish(&lits);
        assert_eq!(out[1], 0xff);
        assert_eq!(out[2], 0); // 15 - 15
        assert_eq!(&out[3..18], &lits[..]);
        assert_eq!(out[18], EOD_TOKEN);
    }

    #[test]
    fn short_match_fits_in_nibble() {
        let mut w = ChunkWriter::new();
        w.match_chunk(
            &[],
            Match {
                offset: 0x1234,
                length: 7,
            },
        );
        let out = w.finish(&[]);
        // nibble = 7 - 4 = 3, then LE offset, then terminator chunk
        assert_eq!(out, vec![LZ4FH_MAGIC, 0x03, 0x34, 0x12, 0x0f, EOD_TOKEN]);
    }

    #[test]
    fn match_length_nineteen_needs_extension_zero() {
        let mut w = ChunkWriter::new();
        w.match_chunk(
            &[],
            Match {
                offset: 0,
                length: 19,
            },
        );
        let out = w.finish(&[]);
        assert_eq!(out[1], 0x0f); // adjusted 15 -> nibble 15
        assert_eq!(out[2], 0); // extension 19 - 4 - 15
        assert_eq!(&out[3..5], &[0, 0]); // offset
    }

    #[test]
    fn literal_chunk_carries_empty_match_token() {
        let mut w = ChunkWriter::new();
        w.literal_chunk(&[9, 9]);
        let out = w.finish(&[]);
        assert_eq!(
            out,
            vec![LZ4FH_MAGIC, 0x2f, 9, 9, EMPTY_MATCH_TOKEN, 0x0f, EOD_TOKEN]
        );
    }

    #[test]
    fn max_match_uses_extension_236() {
        let mut w = ChunkWriter::new();
        w.match_chunk(
            &[],
            Match {
                offset: 1,
                length: MAX_MATCH,
            },
        );
        let out = w.finish(&[]);
        assert_eq!(out[2], 236); // 255 - 4 - 15, below the 253/254 sentinels
    }
}
