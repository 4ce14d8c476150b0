//! gfc-crypto: key derivation, envelope framing, and cipher suites for gfc
//!
//! Symmetric output format (every mode except RSA-OAEP):
//! ```text
//! [N bytes: ciphertext (+ 16-byte tag for AEAD modes)][12|16|24 bytes: nonce/IV][32 bytes: PBKDF2 salt]
//! ```
//!
//! Key derivation:
//! ```text
//! 32-byte keyfile ──────────────────────────────► key (used as-is, salt still generated)
//! passphrase ── PBKDF2-HMAC-SHA256 (2^20, salt) ─► key
//! ```
//!
//! RSA-OAEP (SHA-512, empty label) writes the raw OAEP ciphertext with no trailer.

pub mod aead;
pub mod chacha;
pub mod ctr;
pub mod dispatch;
pub mod envelope;
pub mod gcm;
pub mod kdf;
pub mod keys;
pub mod rsa;

pub use chacha::ChaChaVariant;
pub use dispatch::{Dispatched, Selected, Validated};
pub use envelope::Envelope;
pub use kdf::{derive_key, KdfParams, KeyMaterial, Salt};
pub use keys::{generate_key, NoPassphrase, PassphraseSource, StaticPassphrase, SymmetricKey};

/// Size of a symmetric key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of the PBKDF2 salt appended to every symmetric envelope
pub const SALT_SIZE: usize = 32;

/// Size of a GCM / Poly1305 authentication tag
pub const TAG_SIZE: usize = 16;
