//! Symmetric key type, random key generation, and the passphrase collaborator

use gfc_core::{GfcError, GfcResult};
use rand::RngCore;
use secrecy::SecretString;
use zeroize::{Zeroize, Zeroizing};

use crate::KEY_SIZE;

/// A 256-bit symmetric key. Zeroized on drop.
#[derive(Clone)]
pub struct SymmetricKey {
    bytes: [u8; KEY_SIZE],
}

impl SymmetricKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Accept a caller-supplied key. Anything but exactly 32 bytes is rejected,
    /// never truncated or padded.
    pub fn from_slice(bytes: &[u8]) -> GfcResult<Self> {
        let array: [u8; KEY_SIZE] =
            bytes
                .try_into()
                .map_err(|_| GfcError::InvalidKeyLength {
                    expected: KEY_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self::from_bytes(array))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for SymmetricKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Generate a random 256-bit key (suitable as a keyfile).
pub fn generate_key() -> SymmetricKey {
    let mut bytes = [0u8; KEY_SIZE];
    rand::thread_rng().fill_bytes(&mut bytes);
    SymmetricKey::from_bytes(bytes)
}

/// Supplies a passphrase when no key was given.
///
/// The library never reads a terminal itself; the command boundary implements
/// this (e.g. with a masked prompt). A failed read must return an error rather
/// than an empty passphrase.
pub trait PassphraseSource {
    fn passphrase(&self) -> GfcResult<SecretString>;
}

/// A passphrase known up front.
pub struct StaticPassphrase(Zeroizing<String>);

impl StaticPassphrase {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self(Zeroizing::new(passphrase.into()))
    }
}

impl PassphraseSource for StaticPassphrase {
    fn passphrase(&self) -> GfcResult<SecretString> {
        Ok(SecretString::from(self.0.as_str().to_owned()))
    }
}

/// Refuses to produce a passphrase. Used where a prompt is not possible.
pub struct NoPassphrase;

impl PassphraseSource for NoPassphrase {
    fn passphrase(&self) -> GfcResult<SecretString> {
        Err(GfcError::Passphrase(
            "no passphrase source available (supply a 32-byte key)".into(),
        ))
    }
}
