//! zstd compression
//!
//! Compression must run before encryption: ciphertext is high-entropy and
//! does not compress. The whole message is buffered, so a single zstd frame
//! is written.

use gfc_core::{GfcError, GfcResult};

/// Default compression level (zstd's own default)
pub const DEFAULT_LEVEL: i32 = 3;

/// Compress `data` into one zstd frame.
pub fn compress(data: &[u8], level: i32) -> GfcResult<Vec<u8>> {
    let compressed =
        zstd::encode_all(data, level).map_err(|e| GfcError::Compression(e.to_string()))?;
    tracing::debug!(
        input_bytes = data.len(),
        output_bytes = compressed.len(),
        level,
        "zstd compressed"
    );
    Ok(compressed)
}

/// Decompress zstd frame(s) back to the original data.
pub fn decompress(data: &[u8]) -> GfcResult<Vec<u8>> {
    let plain = zstd::decode_all(data).map_err(|e| GfcError::Decompression(e.to_string()))?;
    tracing::debug!(
        input_bytes = data.len(),
        output_bytes = plain.len(),
        "zstd decompressed"
    );
    Ok(plain)
}
