//! AES-256-CTR
//!
//! CTR turns AES into a stream cipher by encrypting an incrementing 128-bit
//! big-endian counter (starting at a random IV) and XORing the keystream into
//! the data. The envelope stores the 16-byte IV in the nonce slot.
//!
//! This mode does NOT authenticate: a modified ciphertext decrypts to modified
//! plaintext without any error. It is kept for compatibility with existing
//! AES-CTR files; prefer AES-256-GCM for new data.

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use gfc_core::{AlgoMode, GfcError, GfcResult};
use rand::RngCore;

use crate::envelope::{self, Envelope};
use crate::kdf::{derive_key, KeyMaterial};
use crate::keys::SymmetricKey;

type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// IV length (the AES block size)
pub const IV_SIZE: usize = 16;

/// Keystream is applied in chunks of this many bytes
pub const CHUNK_SIZE: usize = 1024;

/// Returns `[ciphertext (same length as plaintext)][16-byte IV][32-byte salt]`
pub fn encrypt(plaintext: &[u8], material: &KeyMaterial<'_>) -> GfcResult<Vec<u8>> {
    let (key, salt) = derive_key(material, None)?;

    let mut iv = [0u8; IV_SIZE];
    rand::thread_rng().fill_bytes(&mut iv);

    let mut ciphertext = plaintext.to_vec();
    apply_keystream(&key, &iv, &mut ciphertext)?;

    Ok(envelope::pack(&ciphertext, &iv, &salt))
}

/// Decrypts exactly `sealed.len() - 16 - 32` bytes. Never fails on corrupted
/// ciphertext (only on a malformed envelope or bad key material).
pub fn decrypt(sealed: &[u8], material: &KeyMaterial<'_>) -> GfcResult<Vec<u8>> {
    let env = Envelope::unpack(sealed, IV_SIZE)?;
    let (key, _) = derive_key(material, Some(env.salt))?;

    let mut plaintext = env.ciphertext.to_vec();
    apply_keystream(&key, env.nonce, &mut plaintext)?;
    Ok(plaintext)
}

fn apply_keystream(key: &SymmetricKey, iv: &[u8], data: &mut [u8]) -> GfcResult<()> {
    let cipher_error = |reason: String| GfcError::Cipher {
        mode: AlgoMode::AesCtr,
        reason,
    };

    let mut cipher = Aes256Ctr::new_from_slices(key.as_bytes(), iv)
        .map_err(|e| cipher_error(e.to_string()))?;

    for chunk in data.chunks_mut(CHUNK_SIZE) {
        cipher
            .try_apply_keystream(chunk)
            .map_err(|e| cipher_error(e.to_string()))?;
    }
    Ok(())
}
