//! RSA-OAEP (SHA-512 for both the OAEP hash and MGF1, empty label)
//!
//! RSA here wraps short secrets only: the output is the raw OAEP ciphertext
//! (one modulus-length block) with no nonce or salt trailer, and the plaintext
//! can be at most `k - 2*64 - 2` bytes for a `k`-byte modulus.
//!
//! Accepted PEM forms:
//! - public:  `PUBLIC KEY` (SubjectPublicKeyInfo) or `RSA PUBLIC KEY` (PKCS#1)
//! - private: `RSA PRIVATE KEY` (PKCS#1) or `PRIVATE KEY` (PKCS#8)

use gfc_core::{AlgoMode, GfcError, GfcResult};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha512;
use zeroize::Zeroizing;

/// SHA-512 output length
const HASH_SIZE: usize = 64;

fn oaep() -> Oaep {
    Oaep::new::<Sha512>()
}

fn pem_str<'a>(pem: &'a [u8], what: &str) -> GfcResult<&'a str> {
    std::str::from_utf8(pem)
        .map(str::trim)
        .map_err(|_| GfcError::KeyParse(format!("{what} is not UTF-8 PEM text")))
}

/// Parse a public key from SubjectPublicKeyInfo or PKCS#1 PEM.
pub fn parse_public_key(pem: &[u8]) -> GfcResult<RsaPublicKey> {
    let pem = pem_str(pem, "RSA public key")?;
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| GfcError::KeyParse(format!("RSA public key: {e}")))
}

/// Parse a private key from PKCS#1 or PKCS#8 PEM.
pub fn parse_private_key(pem: &[u8]) -> GfcResult<RsaPrivateKey> {
    let pem = pem_str(pem, "RSA private key")?;
    RsaPrivateKey::from_pkcs1_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
        .map_err(|e| GfcError::KeyParse(format!("RSA private key: {e}")))
}

/// Largest plaintext OAEP-SHA512 can seal under `key`.
pub fn max_plaintext_len(key: &RsaPublicKey) -> usize {
    key.size().saturating_sub(2 * HASH_SIZE + 2)
}

pub fn encrypt_with(key: &RsaPublicKey, plaintext: &[u8]) -> GfcResult<Vec<u8>> {
    let max = max_plaintext_len(key);
    if plaintext.len() > max {
        return Err(GfcError::PlaintextTooLarge {
            len: plaintext.len(),
            max,
        });
    }

    let mut rng = rand::thread_rng();
    key.encrypt(&mut rng, oaep(), plaintext)
        .map_err(|e| GfcError::Cipher {
            mode: AlgoMode::RsaOaep,
            reason: e.to_string(),
        })
}

pub fn decrypt_with(key: &RsaPrivateKey, ciphertext: &[u8]) -> GfcResult<Vec<u8>> {
    key.decrypt(oaep(), ciphertext)
        .map_err(|_| GfcError::AuthenticationFailed {
            mode: AlgoMode::RsaOaep,
        })
}

pub fn encrypt(plaintext: &[u8], public_key_pem: &[u8]) -> GfcResult<Vec<u8>> {
    encrypt_with(&parse_public_key(public_key_pem)?, plaintext)
}

pub fn decrypt(ciphertext: &[u8], private_key_pem: &[u8]) -> GfcResult<Vec<u8>> {
    decrypt_with(&parse_private_key(private_key_pem)?, ciphertext)
}

/// A freshly generated keypair, PEM encoded.
pub struct KeypairPem {
    /// PKCS#1 `RSA PRIVATE KEY`
    pub private: Zeroizing<String>,
    /// SubjectPublicKeyInfo `PUBLIC KEY`
    pub public: String,
}

pub fn generate_keypair(bits: usize) -> GfcResult<KeypairPem> {
    let mut rng = rand::thread_rng();
    let private = RsaPrivateKey::new(&mut rng, bits).map_err(|e| GfcError::Cipher {
        mode: AlgoMode::RsaOaep,
        reason: format!("key generation failed: {e}"),
    })?;

    let private_pem = private
        .to_pkcs1_pem(LineEnding::LF)
        .map_err(|e| GfcError::KeyParse(format!("encoding private key: {e}")))?;
    let public_pem = private
        .to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| GfcError::KeyParse(format!("encoding public key: {e}")))?;

    Ok(KeypairPem {
        private: private_pem,
        public: public_pem,
    })
}
