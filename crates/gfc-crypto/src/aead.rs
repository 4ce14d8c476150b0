//! Shared AEAD seal/open over the envelope
//!
//! AES-256-GCM, ChaCha20-Poly1305, and XChaCha20-Poly1305 differ only in the
//! cipher type and its nonce size, so one generic routine serves all three.
//! The nonce size is read from the cipher type itself.

use chacha20poly1305::aead::{
    generic_array::typenum::Unsigned, Aead, AeadCore, KeyInit, Nonce,
};
use gfc_core::{AlgoMode, GfcError, GfcResult};
use rand::RngCore;

use crate::envelope::{self, Envelope};
use crate::kdf::{derive_key, KeyMaterial};
use crate::keys::SymmetricKey;
use crate::KEY_SIZE;

/// Nonce length of cipher `C` in bytes.
pub fn nonce_size<C: AeadCore>() -> usize {
    <C as AeadCore>::NonceSize::USIZE
}

fn new_cipher<C: KeyInit>(key: &SymmetricKey) -> GfcResult<C> {
    C::new_from_slice(key.as_bytes()).map_err(|_| GfcError::InvalidKeyLength {
        expected: KEY_SIZE,
        actual: key.as_bytes().len(),
    })
}

/// Derive a key (fresh salt), seal `plaintext` under a random nonce with no
/// associated data, and pack the envelope.
pub fn seal<C>(mode: AlgoMode, plaintext: &[u8], material: &KeyMaterial<'_>) -> GfcResult<Vec<u8>>
where
    C: Aead + KeyInit,
{
    let (key, salt) = derive_key(material, None)?;
    let cipher = new_cipher::<C>(&key)?;

    let mut nonce = Nonce::<C>::default();
    rand::thread_rng().fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| GfcError::Cipher {
            mode,
            reason: e.to_string(),
        })?;

    Ok(envelope::pack(&ciphertext, &nonce, &salt))
}

/// Unpack the envelope, re-derive the key from its salt, and open it.
///
/// Any tag mismatch is reported as `AuthenticationFailed`; no plaintext is
/// returned in that case.
pub fn open<C>(mode: AlgoMode, sealed: &[u8], material: &KeyMaterial<'_>) -> GfcResult<Vec<u8>>
where
    C: Aead + KeyInit,
{
    let env = Envelope::unpack(sealed, nonce_size::<C>())?;
    let (key, _) = derive_key(material, Some(env.salt))?;
    let cipher = new_cipher::<C>(&key)?;

    cipher
        .decrypt(Nonce::<C>::from_slice(env.nonce), env.ciphertext)
        .map_err(|_| GfcError::AuthenticationFailed { mode })
}
