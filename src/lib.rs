//! Fhpack: LZ4FH compression for Apple II hi-res images in Rust.
//!
//! LZ4FH is a byte-oriented LZ-family format tuned for an extremely fast
//! 6502 decoder: literal and match lengths share a single framing byte,
//! matches use absolute output offsets, and a terminal marker replaces
//! length bookkeeping. Input is always one in-memory hi-res page of
//! 8184-8192 bytes.
//!
//! The crate provides:
//! - The wire format and chunk serializer (`format`)
//! - Screen-hole preprocessing (`holes`)
//! - Brute-force match finding (`matching`)
//! - Greedy and optimal parsers (`greedy`, `optimal`)
//! - The decoder (`decoder`)
//! - A high-level self-verifying engine (`engine`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```no_run
//! use fhpack::engine::{self, EncodeOptions};
//!
//! let page = vec![0u8; 8192];
//! let packed = engine::compress(&page, &EncodeOptions::default()).unwrap();
//! let unpacked = engine::decompress(&packed).unwrap();
//! assert_eq!(unpacked.len(), 8184);
//! ```

pub mod decoder;
pub mod engine;
pub mod format;
pub mod greedy;
pub mod holes;
pub mod io;
pub mod matching;
pub mod optimal;

#[cfg(feature = "cli")]
pub mod cli;
