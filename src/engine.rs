// Compression engine: hole-variant fan-out and self-verification.
//
// Orchestrates one full compression:
//   - validate the input size (one hi-res page, 8184-8192 bytes)
//   - either keep the screen holes intact, or try both hole rewrites
//     (zeroed and pattern-filled) on private copies of the input
//   - run the selected parser over each candidate buffer
//   - decode every produced stream and byte-compare against its own
//     input; a mismatch is an internal defect and yields no output
//   - return the smallest verified stream
//
// Every attempt owns its buffers; attempts share no state.

use log::debug;
use thiserror::Error;

use crate::decoder::{self, DecodeError};
use crate::format::{MAX_SIZE, MIN_SIZE};
use crate::{greedy, holes, optimal};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Parsing strategy. Greedy is the fast path; optimal runs the backward
/// cost table and never produces a larger stream than greedy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    Greedy,
    #[default]
    Optimal,
}

/// Configuration for one compression run.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    pub strategy: Strategy,
    /// Keep the screen holes byte-for-byte (and the original length)
    /// instead of rewriting them for better compression.
    pub preserve_holes: bool,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum EncodeError {
    /// Input is not one hi-res page.
    #[error("input is {len} bytes, must be {MIN_SIZE} to {MAX_SIZE}")]
    BadInputSize { len: usize },

    /// Self-check could not decode the stream we just produced.
    #[error("self-verification failed to decode own output: {0}")]
    VerifyDecode(#[from] DecodeError),

    /// Self-check decoded to different bytes than were encoded.
    #[error(
        "self-verification mismatch at byte {index}: encoded {expected:#04x}, decoded {actual:#04x}"
    )]
    VerifyMismatch {
        index: usize,
        expected: u8,
        actual: u8,
    },

    /// Self-check decoded to the wrong length.
    #[error("self-verification expanded to {actual} bytes, expected {expected}")]
    VerifyLength { expected: usize, actual: usize },
}

// ---------------------------------------------------------------------------
// Compress / decompress
// ---------------------------------------------------------------------------

/// Compress one hi-res page.
///
/// Unless holes are preserved, the final 8 hole bytes are dropped and the
/// page is compressed twice, once with zeroed holes and once with
/// pattern-filled holes; the smaller verified stream wins. Ties go to the
/// zeroed variant.
pub fn compress(input: &[u8], opts: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    if !(MIN_SIZE..=MAX_SIZE).contains(&input.len()) {
        return Err(EncodeError::BadInputSize { len: input.len() });
    }

    if opts.preserve_holes {
        // original length retained, contents untouched
        return encode_verified(input, opts.strategy);
    }

    let mut zeroed = input[..MIN_SIZE].to_vec();
    holes::zero_holes(&mut zeroed);
    let zeroed_out = encode_verified(&zeroed, opts.strategy)?;

    let mut filled = input[..MIN_SIZE].to_vec();
    holes::fill_holes(&mut filled);
    let filled_out = encode_verified(&filled, opts.strategy)?;

    if zeroed_out.len() <= filled_out.len() {
        debug!(
            "using zeroed holes ({} vs {} bytes)",
            zeroed_out.len(),
            filled_out.len()
        );
        Ok(zeroed_out)
    } else {
        debug!(
            "using pattern-filled holes ({} vs {} bytes)",
            filled_out.len(),
            zeroed_out.len()
        );
        Ok(filled_out)
    }
}

/// Decompress an LZ4FH stream back into a page.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    decoder::decode(input)
}

/// Run one parser over one buffer and verify the result by decoding it.
fn encode_verified(buf: &[u8], strategy: Strategy) -> Result<Vec<u8>, EncodeError> {
    let out = match strategy {
        Strategy::Greedy => greedy::compress(buf),
        Strategy::Optimal => optimal::compress(buf),
    };

    let decoded = decoder::decode(&out)?;
    if decoded.len() != buf.len() {
        return Err(EncodeError::VerifyLength {
            expected: buf.len(),
            actual: decoded.len(),
        });
    }
    for (index, (&expected, &actual)) in buf.iter().zip(&decoded).enumerate() {
        if expected != actual {
            return Err(EncodeError::VerifyMismatch {
                index,
                expected,
                actual,
            });
        }
    }

    debug!("{strategy:?}: {} -> {} bytes, verified", buf.len(), out.len());
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
