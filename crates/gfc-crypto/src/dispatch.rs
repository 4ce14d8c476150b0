//! Algorithm dispatch: `Selected → Validated → Dispatched`
//!
//! Each state consumes the previous one, so a request cannot change mode or
//! run twice. Everything that can be checked without the input (mode name,
//! key length, RSA key parsing) is checked in `validate`, before any input is
//! read or a passphrase is requested.

use gfc_core::{AlgoMode, Direction, GfcError, GfcResult};
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::{debug, warn};

use crate::chacha::{self, ChaChaVariant};
use crate::kdf::{KdfParams, KeyMaterial};
use crate::keys::{PassphraseSource, SymmetricKey};
use crate::{ctr, gcm, rsa as rsa_oaep};

/// A mode has been chosen; nothing else is known yet.
#[derive(Debug, Clone, Copy)]
pub struct Selected {
    mode: AlgoMode,
}

impl Selected {
    pub fn new(mode: AlgoMode) -> Self {
        Self { mode }
    }

    /// Parse a user-facing mode name. Unknown names are `UnsupportedMode`.
    pub fn parse(name: &str) -> GfcResult<Self> {
        Ok(Self::new(name.parse()?))
    }

    pub fn mode(&self) -> AlgoMode {
        self.mode
    }

    /// Check that `key_material` fits the mode and bind it.
    ///
    /// - symmetric modes: `Some(key)` must be exactly 32 bytes, `None` means
    ///   "ask `passphrase` and run PBKDF2 with `kdf`"
    /// - RSA-OAEP: `key_material` is required PEM text, a public key for
    ///   encryption and a private key for decryption
    pub fn validate<'a>(
        self,
        direction: Direction,
        key_material: Option<&'a [u8]>,
        passphrase: &'a dyn PassphraseSource,
        kdf: KdfParams,
    ) -> GfcResult<Validated<'a>> {
        let symmetric = |cipher: SymmetricCipher| -> GfcResult<Suite<'a>> {
            let material = match key_material {
                Some(key) => {
                    SymmetricKey::from_slice(key)?;
                    KeyMaterial::Key(key)
                }
                None => KeyMaterial::Passphrase {
                    source: passphrase,
                    params: kdf,
                },
            };
            Ok(Suite::Symmetric { cipher, material })
        };

        let suite = match self.mode {
            AlgoMode::AesGcm => symmetric(SymmetricCipher::AesGcm)?,
            AlgoMode::AesCtr => symmetric(SymmetricCipher::AesCtr)?,
            AlgoMode::ChaCha20Poly1305 => symmetric(SymmetricCipher::ChaCha(ChaChaVariant::Standard))?,
            AlgoMode::XChaCha20Poly1305 => symmetric(SymmetricCipher::ChaCha(ChaChaVariant::Extended))?,
            AlgoMode::RsaOaep => {
                let pem = key_material.ok_or(GfcError::MissingKey { mode: self.mode })?;
                match direction {
                    Direction::Encrypt => Suite::RsaEncrypt(rsa_oaep::parse_public_key(pem)?),
                    Direction::Decrypt => Suite::RsaDecrypt(rsa_oaep::parse_private_key(pem)?),
                }
            }
        };

        if !self.mode.is_authenticated() {
            warn!(mode = %self.mode, "mode does not authenticate ciphertext; corruption will not be detected");
        }
        debug!(mode = %self.mode, ?direction, "request validated");

        Ok(Validated {
            mode: self.mode,
            direction,
            suite,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum SymmetricCipher {
    AesGcm,
    AesCtr,
    ChaCha(ChaChaVariant),
}

enum Suite<'a> {
    Symmetric {
        cipher: SymmetricCipher,
        material: KeyMaterial<'a>,
    },
    RsaEncrypt(RsaPublicKey),
    RsaDecrypt(RsaPrivateKey),
}

/// Mode and key material are consistent; ready to run exactly once.
pub struct Validated<'a> {
    mode: AlgoMode,
    direction: Direction,
    suite: Suite<'a>,
}

impl std::fmt::Debug for Validated<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validated")
            .field("mode", &self.mode)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

impl Validated<'_> {
    pub fn mode(&self) -> AlgoMode {
        self.mode
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Run the cipher over `input`. One attempt, no retries.
    pub fn dispatch(self, input: &[u8]) -> GfcResult<Dispatched> {
        let output = match (&self.suite, self.direction) {
            (Suite::Symmetric { cipher, material }, Direction::Encrypt) => match cipher {
                SymmetricCipher::AesGcm => gcm::encrypt(input, material)?,
                SymmetricCipher::AesCtr => ctr::encrypt(input, material)?,
                SymmetricCipher::ChaCha(variant) => chacha::encrypt(*variant, input, material)?,
            },
            (Suite::Symmetric { cipher, material }, Direction::Decrypt) => match cipher {
                SymmetricCipher::AesGcm => gcm::decrypt(input, material)?,
                SymmetricCipher::AesCtr => ctr::decrypt(input, material)?,
                SymmetricCipher::ChaCha(variant) => chacha::decrypt(*variant, input, material)?,
            },
            (Suite::RsaEncrypt(key), _) => rsa_oaep::encrypt_with(key, input)?,
            (Suite::RsaDecrypt(key), _) => rsa_oaep::decrypt_with(key, input)?,
        };

        debug!(
            mode = %self.mode,
            direction = ?self.direction,
            input_bytes = input.len(),
            output_bytes = output.len(),
            "cipher step complete"
        );

        Ok(Dispatched {
            mode: self.mode,
            direction: self.direction,
            output,
        })
    }
}

/// The result of a finished cipher step.
#[derive(Debug)]
pub struct Dispatched {
    mode: AlgoMode,
    direction: Direction,
    output: Vec<u8>,
}

impl Dispatched {
    pub fn mode(&self) -> AlgoMode {
        self.mode
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn into_output(self) -> Vec<u8> {
        self.output
    }
}
