//! AES-256-GCM (12-byte nonce, tag appended to the ciphertext)
//!
//! This is the default mode of `gfc aes`.

use aes_gcm::Aes256Gcm;
use gfc_core::{AlgoMode, GfcResult};

use crate::aead;
use crate::kdf::KeyMaterial;

pub const NONCE_SIZE: usize = 12;

/// Returns `[ciphertext + 16-byte tag][12-byte nonce][32-byte salt]`
pub fn encrypt(plaintext: &[u8], material: &KeyMaterial<'_>) -> GfcResult<Vec<u8>> {
    aead::seal::<Aes256Gcm>(AlgoMode::AesGcm, plaintext, material)
}

pub fn decrypt(sealed: &[u8], material: &KeyMaterial<'_>) -> GfcResult<Vec<u8>> {
    aead::open::<Aes256Gcm>(AlgoMode::AesGcm, sealed, material)
}
