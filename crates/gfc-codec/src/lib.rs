//! gfc-codec: the transforms wrapped around the cipher step
//!
//! # Overview
//! - `zstd`: whole-buffer zstd compression, applied before encryption
//! - `encoding`: base64 / hex text encoding, applied after encryption
//!
//! Neither transform ever sees key material.

pub mod encoding;
pub mod zstd;

pub use encoding::{decode, encode};
pub use zstd::{compress, decompress, DEFAULT_LEVEL};
