use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::GfcError;

/// The closed set of algorithms gfc can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgoMode {
    #[serde(rename = "aes-gcm")]
    AesGcm,
    /// Unauthenticated: corruption of the ciphertext is not detected.
    #[serde(rename = "aes-ctr")]
    AesCtr,
    #[serde(rename = "rsa-oaep")]
    RsaOaep,
    #[serde(rename = "chacha20-poly1305")]
    ChaCha20Poly1305,
    #[serde(rename = "xchacha20-poly1305")]
    XChaCha20Poly1305,
}

impl AlgoMode {
    pub const ALL: [AlgoMode; 5] = [
        AlgoMode::AesGcm,
        AlgoMode::AesCtr,
        AlgoMode::RsaOaep,
        AlgoMode::ChaCha20Poly1305,
        AlgoMode::XChaCha20Poly1305,
    ];

    /// Whether decryption detects tampering.
    pub fn is_authenticated(self) -> bool {
        !matches!(self, AlgoMode::AesCtr)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlgoMode::AesGcm => "AES-256-GCM",
            AlgoMode::AesCtr => "AES-256-CTR",
            AlgoMode::RsaOaep => "RSA-OAEP",
            AlgoMode::ChaCha20Poly1305 => "ChaCha20-Poly1305",
            AlgoMode::XChaCha20Poly1305 => "XChaCha20-Poly1305",
        }
    }
}

impl fmt::Display for AlgoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgoMode {
    type Err = GfcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "aes-gcm" | "aes-256-gcm" | "aes256-gcm" | "gcm" => Ok(AlgoMode::AesGcm),
            "aes-ctr" | "aes-256-ctr" | "aes256-ctr" | "ctr" => Ok(AlgoMode::AesCtr),
            "rsa-oaep" | "rsa" | "oaep" => Ok(AlgoMode::RsaOaep),
            "chacha20-poly1305" | "chacha20" | "cc20" => Ok(AlgoMode::ChaCha20Poly1305),
            "xchacha20-poly1305" | "xchacha20" | "xcc20" => Ok(AlgoMode::XChaCha20Poly1305),
            _ => Err(GfcError::UnsupportedMode(s.to_string())),
        }
    }
}

/// Text transform applied to the outermost bytes of a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    None,
    /// Standard alphabet, padded
    Base64,
    /// Lowercase
    Hex,
}

impl FromStr for Encoding {
    type Err = GfcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Encoding::None),
            "base64" | "b64" => Ok(Encoding::Base64),
            "hex" | "h" => Ok(Encoding::Hex),
            other => Err(GfcError::Encoding(format!("unknown encoding: {other}"))),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::None => "none",
            Encoding::Base64 => "base64",
            Encoding::Hex => "hex",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    pub fn from_decrypt_flag(decrypt: bool) -> Self {
        if decrypt {
            Direction::Decrypt
        } else {
            Direction::Encrypt
        }
    }
}

/// One encrypt or decrypt job, as handed over by the command boundary.
///
/// `key_material` is a raw 32-byte key for symmetric modes (`None` means
/// "derive from a passphrase") or PEM text for RSA-OAEP. It is zeroized on drop.
#[derive(Clone)]
pub struct Request {
    pub mode: AlgoMode,
    pub decrypt: bool,
    pub key_material: Option<Vec<u8>>,
    pub compress: bool,
    pub encoding: Encoding,
}

impl Request {
    pub fn new(mode: AlgoMode) -> Self {
        Self {
            mode,
            decrypt: false,
            key_material: None,
            compress: false,
            encoding: Encoding::None,
        }
    }

    pub fn direction(&self) -> Direction {
        Direction::from_decrypt_flag(self.decrypt)
    }
}

impl Drop for Request {
    fn drop(&mut self) {
        if let Some(key) = self.key_material.as_mut() {
            key.zeroize();
        }
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("mode", &self.mode)
            .field("decrypt", &self.decrypt)
            .field(
                "key_material",
                &self.key_material.as_ref().map(|_| "[REDACTED]"),
            )
            .field("compress", &self.compress)
            .field("encoding", &self.encoding)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_aliases() {
        assert_eq!("GCM".parse::<AlgoMode>().unwrap(), AlgoMode::AesGcm);
        assert_eq!("aes_ctr".parse::<AlgoMode>().unwrap(), AlgoMode::AesCtr);
        assert_eq!("rsa".parse::<AlgoMode>().unwrap(), AlgoMode::RsaOaep);
        assert_eq!("cc20".parse::<AlgoMode>().unwrap(), AlgoMode::ChaCha20Poly1305);
        assert_eq!(
            "XChaCha20-Poly1305".parse::<AlgoMode>().unwrap(),
            AlgoMode::XChaCha20Poly1305
        );
    }

    #[test]
    fn test_parse_unknown_mode() {
        let err = "aes-ecb".parse::<AlgoMode>().unwrap_err();
        assert!(matches!(err, GfcError::UnsupportedMode(m) if m == "aes-ecb"));
    }

    #[test]
    fn test_only_ctr_is_unauthenticated() {
        let unauthenticated: Vec<_> = AlgoMode::ALL
            .iter()
            .filter(|m| !m.is_authenticated())
            .collect();
        assert_eq!(unauthenticated, vec![&AlgoMode::AesCtr]);
    }

    #[test]
    fn test_parse_encoding() {
        assert_eq!("B64".parse::<Encoding>().unwrap(), Encoding::Base64);
        assert_eq!("hex".parse::<Encoding>().unwrap(), Encoding::Hex);
        assert_eq!("".parse::<Encoding>().unwrap(), Encoding::None);
        assert!("base32".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_request_debug_redacts_key() {
        let mut req = Request::new(AlgoMode::AesGcm);
        req.key_material = Some(vec![0x41; 32]);
        let printed = format!("{req:?}");
        assert!(printed.contains("[REDACTED]"));
        assert!(!printed.contains("65"));
    }
}
