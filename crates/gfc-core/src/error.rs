use thiserror::Error;

use crate::types::AlgoMode;

pub type GfcResult<T> = Result<T, GfcError>;

#[derive(Debug, Error)]
pub enum GfcError {
    #[error("invalid key length: {actual} bytes (expected {expected})")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("malformed envelope: {len} bytes (minimum {min})")]
    MalformedEnvelope { len: usize, min: usize },

    /// AEAD tag mismatch, or OAEP padding failure for RSA.
    #[error("{mode}: authentication failed (wrong key or corrupted data)")]
    AuthenticationFailed { mode: AlgoMode },

    #[error("key parse error: {0}")]
    KeyParse(String),

    #[error("plaintext too large: {len} bytes (maximum {max} for this key)")]
    PlaintextTooLarge { len: usize, max: usize },

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("compression error: {0}")]
    Compression(String),

    #[error("decompression error: {0}")]
    Decompression(String),

    #[error("unsupported mode: {0}")]
    UnsupportedMode(String),

    #[error("{mode} requires key material")]
    MissingKey { mode: AlgoMode },

    #[error("passphrase error: {0}")]
    Passphrase(String),

    #[error("{mode}: cipher error: {reason}")]
    Cipher { mode: AlgoMode, reason: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GfcError {
    /// True for failures that mean "this ciphertext cannot be opened with this key".
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, GfcError::AuthenticationFailed { .. })
    }
}
