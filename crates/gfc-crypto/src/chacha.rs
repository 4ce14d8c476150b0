//! ChaCha20-Poly1305 (12-byte nonce) and XChaCha20-Poly1305 (24-byte nonce)
//!
//! Both variants go through the same generic AEAD routine; `ChaChaVariant`
//! only picks the cipher constructor. XChaCha20's 192-bit nonce makes random
//! nonces safe for any practical number of messages, so it is the default.

use chacha20poly1305::{ChaCha20Poly1305, XChaCha20Poly1305};
use gfc_core::{AlgoMode, GfcResult};

use crate::aead;
use crate::kdf::KeyMaterial;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChaChaVariant {
    /// IETF ChaCha20-Poly1305, 96-bit nonce
    Standard,
    /// XChaCha20-Poly1305, 192-bit nonce
    #[default]
    Extended,
}

impl ChaChaVariant {
    pub fn mode(self) -> AlgoMode {
        match self {
            ChaChaVariant::Standard => AlgoMode::ChaCha20Poly1305,
            ChaChaVariant::Extended => AlgoMode::XChaCha20Poly1305,
        }
    }

    pub fn nonce_size(self) -> usize {
        match self {
            ChaChaVariant::Standard => aead::nonce_size::<ChaCha20Poly1305>(),
            ChaChaVariant::Extended => aead::nonce_size::<XChaCha20Poly1305>(),
        }
    }
}

pub fn encrypt(
    variant: ChaChaVariant,
    plaintext: &[u8],
    material: &KeyMaterial<'_>,
) -> GfcResult<Vec<u8>> {
    match variant {
        ChaChaVariant::Standard => aead::seal::<ChaCha20Poly1305>(variant.mode(), plaintext, material),
        ChaChaVariant::Extended => aead::seal::<XChaCha20Poly1305>(variant.mode(), plaintext, material),
    }
}

pub fn decrypt(
    variant: ChaChaVariant,
    sealed: &[u8],
    material: &KeyMaterial<'_>,
) -> GfcResult<Vec<u8>> {
    match variant {
        ChaChaVariant::Standard => aead::open::<ChaCha20Poly1305>(variant.mode(), sealed, material),
        ChaChaVariant::Extended => aead::open::<XChaCha20Poly1305>(variant.mode(), sealed, material),
    }
}
