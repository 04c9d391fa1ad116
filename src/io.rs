// File-level helpers for packing and unpacking hi-res images.
//
// Wraps the engine with whole-file reads and writes and returns stats
// structs for callers (the CLI) to report. Optionally computes SHA-256
// digests of the payloads (feature-gated behind `file-io`).

use std::io;
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::decoder::DecodeError;
use crate::engine::{self, EncodeError, EncodeOptions};
use crate::format::{MAX_EXPANSION, MAX_SIZE};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `compress_file()` and `check_file()`.
#[derive(Debug, Clone)]
pub struct CompressStats {
    /// Input image size in bytes.
    pub input_size: u64,
    /// Compressed output size in bytes.
    pub output_size: u64,
    /// SHA-256 of the input image (if `file-io` is enabled).
    pub input_sha256: Option<[u8; 32]>,
    /// SHA-256 of the compressed stream (if `file-io` is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

/// Statistics returned by `expand_file()`.
#[derive(Debug, Clone)]
pub struct ExpandStats {
    /// Compressed input size in bytes.
    pub input_size: u64,
    /// Reconstructed image size in bytes.
    pub output_size: u64,
    /// SHA-256 of the reconstructed image (if `file-io` is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file operations.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A compressed input that cannot possibly be a valid stream.
    #[error("compressed input is {len} bytes, must be {min} to {max}")]
    BadCompressedSize { len: usize, min: usize, max: usize },
}

/// Smallest viable stream: magic, chunk header, end-of-data extension.
const MIN_COMPRESSED: usize = 3;

// ---------------------------------------------------------------------------
// Digest helper
// ---------------------------------------------------------------------------

#[cfg(feature = "file-io")]
fn sha256(data: &[u8]) -> Option<[u8; 32]> {
    use sha2::Digest;
    let mut h = sha2::Sha256::new();
    h.update(data);
    Some(h.finalize().into())
}

#[cfg(not(feature = "file-io"))]
fn sha256(_data: &[u8]) -> Option<[u8; 32]> {
    None
}

// ---------------------------------------------------------------------------
// compress_file / check_file
// ---------------------------------------------------------------------------

/// Compress a hi-res image file, writing the LZ4FH stream to `output_path`.
pub fn compress_file(
    input_path: &Path,
    output_path: &Path,
    opts: &EncodeOptions,
) -> Result<CompressStats, IoError> {
    let (packed, stats) = compress_in_memory(input_path, opts)?;
    std::fs::write(output_path, &packed)?;
    Ok(stats)
}

/// Compress a hi-res image file in memory only, reporting what would be
/// written. This is the CLI's `test` mode.
pub fn check_file(input_path: &Path, opts: &EncodeOptions) -> Result<CompressStats, IoError> {
    let (_, stats) = compress_in_memory(input_path, opts)?;
    Ok(stats)
}

fn compress_in_memory(
    input_path: &Path,
    opts: &EncodeOptions,
) -> Result<(Vec<u8>, CompressStats), IoError> {
    let input = std::fs::read(input_path)?;
    let packed = engine::compress(&input, opts)?;
    debug!(
        "{}: {} -> {} bytes",
        input_path.display(),
        input.len(),
        packed.len()
    );
    let stats = CompressStats {
        input_size: input.len() as u64,
        output_size: packed.len() as u64,
        input_sha256: sha256(&input),
        output_sha256: sha256(&packed),
    };
    Ok((packed, stats))
}

// ---------------------------------------------------------------------------
// expand_file
// ---------------------------------------------------------------------------

/// Expand an LZ4FH file back into a hi-res image at `output_path`.
pub fn expand_file(input_path: &Path, output_path: &Path) -> Result<ExpandStats, IoError> {
    let input = std::fs::read(input_path)?;
    if input.len() < MIN_COMPRESSED || input.len() > MAX_SIZE + MAX_EXPANSION {
        return Err(IoError::BadCompressedSize {
            len: input.len(),
            min: MIN_COMPRESSED,
            max: MAX_SIZE + MAX_EXPANSION,
        });
    }

    let output = engine::decompress(&input)?;
    std::fs::write(output_path, &output)?;
    Ok(ExpandStats {
        input_size: input.len() as u64,
        output_size: output.len() as u64,
        output_sha256: sha256(&output),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
