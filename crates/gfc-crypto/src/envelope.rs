//! Symmetric envelope framing
//!
//! ```text
//! [ciphertext: variable][nonce: nonce_size bytes][salt: 32 bytes]
//! ```
//!
//! No length prefixes: the nonce size is fixed by the cipher and the salt is
//! always 32 bytes, so the buffer is split from the tail.

use gfc_core::{GfcError, GfcResult};

use crate::kdf::Salt;
use crate::SALT_SIZE;

/// A borrowed view of an unpacked envelope.
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'a> {
    pub ciphertext: &'a [u8],
    pub nonce: &'a [u8],
    pub salt: &'a Salt,
}

impl<'a> Envelope<'a> {
    /// Split `buf` into ciphertext, nonce, and salt.
    ///
    /// Fails with `MalformedEnvelope` when `buf` cannot hold a nonce and a salt.
    pub fn unpack(buf: &'a [u8], nonce_size: usize) -> GfcResult<Self> {
        let min = nonce_size + SALT_SIZE;
        let malformed = || GfcError::MalformedEnvelope {
            len: buf.len(),
            min,
        };
        if buf.len() < min {
            return Err(malformed());
        }

        let (rest, salt) = buf.split_at(buf.len() - SALT_SIZE);
        let (ciphertext, nonce) = rest.split_at(rest.len() - nonce_size);
        let salt: &Salt = salt.try_into().map_err(|_| malformed())?;

        Ok(Self {
            ciphertext,
            nonce,
            salt,
        })
    }
}

/// Concatenate `ciphertext || nonce || salt`.
pub fn pack(ciphertext: &[u8], nonce: &[u8], salt: &Salt) -> Vec<u8> {
    let mut out = Vec::with_capacity(ciphertext.len() + nonce.len() + SALT_SIZE);
    out.extend_from_slice(ciphertext);
    out.extend_from_slice(nonce);
    out.extend_from_slice(salt);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        let salt = [0xEEu8; SALT_SIZE];
        let packed = pack(b"cipher", &[0xAA; 12], &salt);

        assert_eq!(packed.len(), 6 + 12 + SALT_SIZE);
        assert_eq!(&packed[..6], b"cipher");
        assert_eq!(&packed[6..18], &[0xAA; 12]);
        assert_eq!(&packed[18..], &salt);
    }

    #[test]
    fn test_unpack_splits_from_tail() {
        let salt = [0x11u8; SALT_SIZE];
        let nonce = [0x22u8; 24];
        let packed = pack(b"hello world", &nonce, &salt);

        let env = Envelope::unpack(&packed, 24).unwrap();
        assert_eq!(env.ciphertext, b"hello world");
        assert_eq!(env.nonce, &nonce);
        assert_eq!(env.salt, &salt);
    }

    #[test]
    fn test_unpack_exact_minimum_has_empty_ciphertext() {
        let buf = vec![0u8; 16 + SALT_SIZE];
        let env = Envelope::unpack(&buf, 16).unwrap();
        assert!(env.ciphertext.is_empty());
        assert_eq!(env.nonce.len(), 16);
    }

    #[test]
    fn test_unpack_too_short() {
        for nonce_size in [12usize, 16, 24] {
            for len in [0, 1, nonce_size, nonce_size + SALT_SIZE - 1] {
                let buf = vec![0u8; len];
                let err = Envelope::unpack(&buf, nonce_size).unwrap_err();
                assert!(
                    matches!(err, GfcError::MalformedEnvelope { len: l, min } if l == len && min == nonce_size + SALT_SIZE),
                    "len {len} with nonce {nonce_size} must be malformed"
                );
            }
        }
    }
}
