//! Key derivation: supplied keyfile or PBKDF2-HMAC-SHA256 passphrase → 256-bit key

use gfc_core::config::DEFAULT_PBKDF2_ROUNDS;
use gfc_core::{GfcError, GfcResult};
use rand::RngCore;
use secrecy::ExposeSecret;
use sha2::Sha256;

use crate::keys::{PassphraseSource, SymmetricKey};
use crate::{KEY_SIZE, SALT_SIZE};

pub type Salt = [u8; SALT_SIZE];

/// PBKDF2 parameters for passphrase-derived keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Iteration count (default: 2^20). Must match between encrypt and decrypt.
    pub rounds: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_PBKDF2_ROUNDS,
        }
    }
}

/// Where the symmetric key comes from.
pub enum KeyMaterial<'a> {
    /// Caller-supplied key; must be exactly 32 bytes. Used as-is.
    Key(&'a [u8]),
    /// Ask `source` for a passphrase and stretch it with PBKDF2.
    Passphrase {
        source: &'a dyn PassphraseSource,
        params: KdfParams,
    },
}

impl std::fmt::Debug for KeyMaterial<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyMaterial::Key(_) => f.write_str("KeyMaterial::Key([REDACTED])"),
            KeyMaterial::Passphrase { params, .. } => f
                .debug_struct("KeyMaterial::Passphrase")
                .field("params", params)
                .finish(),
        }
    }
}

/// Generate a fresh random PBKDF2 salt.
pub fn generate_salt() -> Salt {
    let mut salt = [0u8; SALT_SIZE];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// Resolve `material` into a 256-bit key and the salt to store with it.
///
/// - `salt == None` (encryption): a fresh salt is generated.
/// - `salt == Some(s)` (decryption): `s` came out of the envelope and is
///   returned unchanged.
///
/// Supplied keys skip PBKDF2 but still get a salt so every envelope has the
/// same shape.
pub fn derive_key(
    material: &KeyMaterial<'_>,
    salt: Option<&Salt>,
) -> GfcResult<(SymmetricKey, Salt)> {
    match material {
        KeyMaterial::Key(bytes) => {
            let key = SymmetricKey::from_slice(bytes)?;
            let salt = salt.copied().unwrap_or_else(generate_salt);
            Ok((key, salt))
        }
        KeyMaterial::Passphrase { source, params } => {
            let passphrase = source.passphrase()?;
            let salt = salt.copied().unwrap_or_else(generate_salt);
            let key = pbkdf2_key(passphrase.expose_secret().as_bytes(), &salt, params)?;
            Ok((key, salt))
        }
    }
}

/// PBKDF2-HMAC-SHA256 with a 32-byte output.
pub fn pbkdf2_key(passphrase: &[u8], salt: &Salt, params: &KdfParams) -> GfcResult<SymmetricKey> {
    if params.rounds == 0 {
        return Err(GfcError::Config("PBKDF2 rounds must be > 0".into()));
    }

    tracing::debug!(rounds = params.rounds, "deriving key from passphrase");

    let mut key = [0u8; KEY_SIZE];
    pbkdf2::pbkdf2_hmac::<Sha256>(passphrase, salt, params.rounds, &mut key);
    Ok(SymmetricKey::from_bytes(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::StaticPassphrase;

    // Use fast params for testing
    const FAST: KdfParams = KdfParams { rounds: 1024 };

    struct FailingSource;

    impl PassphraseSource for FailingSource {
        fn passphrase(&self) -> GfcResult<secrecy::SecretString> {
            Err(GfcError::Passphrase("terminal closed".into()))
        }
    }

    #[test]
    fn test_kdf_deterministic() {
        let source = StaticPassphrase::new("test-passphrase-123");
        let material = KeyMaterial::Passphrase {
            source: &source,
            params: FAST,
        };
        let salt = [1u8; SALT_SIZE];

        let (key1, salt1) = derive_key(&material, Some(&salt)).unwrap();
        let (key2, salt2) = derive_key(&material, Some(&salt)).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes(), "KDF must be deterministic");
        assert_eq!(salt1, salt);
        assert_eq!(salt2, salt);
    }

    #[test]
    fn test_kdf_different_passphrases() {
        let salt = [1u8; SALT_SIZE];
        let key1 = pbkdf2_key(b"passphrase-a", &salt, &FAST).unwrap();
        let key2 = pbkdf2_key(b"passphrase-b", &salt, &FAST).unwrap();

        assert_ne!(
            key1.as_bytes(),
            key2.as_bytes(),
            "different passphrases must produce different keys"
        );
    }

    #[test]
    fn test_kdf_different_salts() {
        let key1 = pbkdf2_key(b"same-passphrase", &[1u8; SALT_SIZE], &FAST).unwrap();
        let key2 = pbkdf2_key(b"same-passphrase", &[2u8; SALT_SIZE], &FAST).unwrap();

        assert_ne!(
            key1.as_bytes(),
            key2.as_bytes(),
            "different salts must produce different keys"
        );
    }

    #[test]
    fn test_fresh_salt_per_encryption() {
        let raw = [5u8; KEY_SIZE];
        let (_, salt1) = derive_key(&KeyMaterial::Key(&raw), None).unwrap();
        let (_, salt2) = derive_key(&KeyMaterial::Key(&raw), None).unwrap();
        assert_ne!(salt1, salt2);
    }

    #[test]
    fn test_supplied_key_used_unchanged() {
        let raw = [5u8; KEY_SIZE];
        let salt = [3u8; SALT_SIZE];
        let (key, returned_salt) = derive_key(&KeyMaterial::Key(&raw), Some(&salt)).unwrap();
        assert_eq!(key.as_bytes(), &raw, "supplied keys skip PBKDF2");
        assert_eq!(returned_salt, salt);
    }

    #[test]
    fn test_supplied_key_wrong_length() {
        for len in [16usize, 33] {
            let raw = vec![0u8; len];
            let err = derive_key(&KeyMaterial::Key(&raw), None).unwrap_err();
            assert!(matches!(err, GfcError::InvalidKeyLength { actual, .. } if actual == len));
        }
    }

    #[test]
    fn test_passphrase_failure_propagates() {
        let material = KeyMaterial::Passphrase {
            source: &FailingSource,
            params: FAST,
        };
        let err = derive_key(&material, None).unwrap_err();
        assert!(matches!(err, GfcError::Passphrase(_)));
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let err = pbkdf2_key(b"pw", &[0u8; SALT_SIZE], &KdfParams { rounds: 0 }).unwrap_err();
        assert!(matches!(err, GfcError::Config(_)));
    }
}
