// LZ4FH decoder.
//
// Single forward pass with two explicit cursors: one into the compressed
// input, one into the fixed-capacity output. Every copy is bounds-checked
// against both the declared input length and the output capacity before
// it happens; any violation aborts the whole decode, so a corrupt or
// truncated stream never yields partial output.
//
// Match copies must proceed byte-by-byte in forward order. The source
// range may overlap the destination (offset < write position but
// offset + length reaching past it), which is how the encoder turns a
// short seed pattern into a long run. A block-copy primitive with
// unspecified overlap semantics would break those streams.

use thiserror::Error;

use crate::format::{
    EMPTY_MATCH_TOKEN, EOD_TOKEN, LZ4FH_MAGIC, MAX_SIZE, MIN_MATCH, NIBBLE_LIMIT,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The stream does not start with the LZ4FH magic byte.
    #[error("missing LZ4FH magic: expected {LZ4FH_MAGIC:#04x}, found {found:#04x}")]
    BadMagic { found: u8 },

    /// A read or write would cross a buffer boundary; the stream is
    /// corrupt or truncated.
    #[error("stream overrun while reading {context} (input {in_pos}/{in_len}, output {out_pos})")]
    Overrun {
        context: &'static str,
        in_pos: usize,
        in_len: usize,
        out_pos: usize,
    },
}

// ---------------------------------------------------------------------------
// Input cursor
// ---------------------------------------------------------------------------

struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    out_len: usize, // mirrored into errors for diagnostics
}

impl<'a> Cursor<'a> {
    fn overrun(&self, context: &'static str) -> DecodeError {
        DecodeError::Overrun {
            context,
            in_pos: self.pos,
            in_len: self.buf.len(),
            out_pos: self.out_len,
        }
    }

    fn read_u8(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        let b = *self.buf.get(self.pos).ok_or_else(|| self.overrun(context))?;
        self.pos += 1;
        Ok(b)
    }

    fn take(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], DecodeError> {
        if self.pos + n > self.buf.len() {
            return Err(self.overrun(context));
        }
        let s = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }

    fn read_u16_le(&mut self, context: &'static str) -> Result<u16, DecodeError> {
        let b = self.take(2, context)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Decode an LZ4FH stream into the original buffer.
///
/// Returns the decoded bytes (at most `MAX_SIZE`) or the first error
/// encountered. Trailing bytes after the end-of-data chunk are ignored,
/// matching the reference decoder.
pub fn decode(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut input = Cursor {
        buf: input,
        pos: 0,
        out_len: 0,
    };
    let mut out: Vec<u8> = Vec::with_capacity(MAX_SIZE);

    let magic = input.read_u8("magic byte")?;
    if magic != LZ4FH_MAGIC {
        return Err(DecodeError::BadMagic { found: magic });
    }

    loop {
        input.out_len = out.len();
        let mixed = input.read_u8("chunk header")?;

        // literal run
        let mut literal_len = (mixed >> 4) as usize;
        if literal_len == NIBBLE_LIMIT {
            literal_len += input.read_u8("literal length extension")? as usize;
        }
        if literal_len > 0 {
            if out.len() + literal_len > MAX_SIZE {
                return Err(input.overrun("literal copy"));
            }
            out.extend_from_slice(input.take(literal_len, "literal bytes")?);
            input.out_len = out.len();
        }

        // match, no-match, or end-of-data
        let nibble = (mixed & 0x0f) as usize;
        let match_len = if nibble == NIBBLE_LIMIT {
            match input.read_u8("match length extension")? {
                EMPTY_MATCH_TOKEN => continue,
                EOD_TOKEN => break,
                ext => NIBBLE_LIMIT + ext as usize + MIN_MATCH,
            }
        } else {
            nibble + MIN_MATCH
        };

        let offset = input.read_u16_le("match offset")? as usize;
        if offset >= out.len()
            || offset + match_len > MAX_SIZE
            || out.len() + match_len > MAX_SIZE
        {
            return Err(input.overrun("match copy"));
        }

        // forward byte-wise copy; source and destination may overlap
        for i in 0..match_len {
            let b = out[offset + i];
            out.push(b);
        }
    }

    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
