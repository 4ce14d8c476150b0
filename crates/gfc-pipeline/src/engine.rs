//! Pipeline engine
//!
//! `Pipeline` holds what stays fixed across requests (passphrase source,
//! PBKDF2 rounds, zstd level). Each `run`/`process` call takes a `Request`
//! and the whole input.

use std::io::{Read, Write};

use gfc_core::config::GfcConfig;
use gfc_core::{Direction, GfcResult, Request};
use gfc_crypto::{KdfParams, PassphraseSource, Selected, Validated};
use tracing::{debug, info};

pub struct Pipeline<'a> {
    passphrase: &'a dyn PassphraseSource,
    kdf: KdfParams,
    zstd_level: i32,
}

impl<'a> Pipeline<'a> {
    pub fn new(passphrase: &'a dyn PassphraseSource) -> Self {
        Self {
            passphrase,
            kdf: KdfParams::default(),
            zstd_level: gfc_codec::DEFAULT_LEVEL,
        }
    }

    pub fn from_config(config: &GfcConfig, passphrase: &'a dyn PassphraseSource) -> Self {
        Self::new(passphrase)
            .with_kdf_params(KdfParams {
                rounds: config.crypto.pbkdf2_rounds,
            })
            .with_compression_level(config.compression.level)
    }

    pub fn with_kdf_params(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    pub fn with_compression_level(mut self, level: i32) -> Self {
        self.zstd_level = level;
        self
    }

    /// Check the request without touching any input or prompting. The
    /// returned `Prepared` runs it exactly once.
    pub fn prepare<'r>(&'r self, request: &'r Request) -> GfcResult<Prepared<'r>> {
        let validated = Selected::new(request.mode).validate(
            request.direction(),
            request.key_material.as_deref(),
            self.passphrase,
            self.kdf,
        )?;
        Ok(Prepared {
            request,
            validated,
            zstd_level: self.zstd_level,
        })
    }

    /// Run `request` over `input` held in memory.
    pub fn run(&self, request: &Request, input: &[u8]) -> GfcResult<Vec<u8>> {
        self.prepare(request)?.run(input)
    }

    /// Validate, then read all of `reader`, run, and write the result to
    /// `writer`. Nothing is written when any stage fails.
    pub fn process<R: Read, W: Write>(
        &self,
        request: &Request,
        mut reader: R,
        mut writer: W,
    ) -> GfcResult<usize> {
        let prepared = self.prepare(request)?;

        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;

        let output = prepared.run(&input)?;
        writer.write_all(&output)?;
        writer.flush()?;
        Ok(output.len())
    }
}

/// A validated request waiting for its input.
#[derive(Debug)]
pub struct Prepared<'r> {
    request: &'r Request,
    validated: Validated<'r>,
    zstd_level: i32,
}

impl Prepared<'_> {
    pub fn run(self, input: &[u8]) -> GfcResult<Vec<u8>> {
        let request = self.request;
        let mode = self.validated.mode();
        let direction = self.validated.direction();

        let output = match direction {
            Direction::Encrypt => {
                let plaintext = if request.compress {
                    gfc_codec::compress(input, self.zstd_level)?
                } else {
                    input.to_vec()
                };
                let sealed = self.validated.dispatch(&plaintext)?;
                debug!(bytes = sealed.output().len(), "encrypted");
                gfc_codec::encode(request.encoding, sealed.output()).into_owned()
            }
            Direction::Decrypt => {
                let raw = gfc_codec::decode(request.encoding, input)?;
                debug!(encoding = %request.encoding, bytes = raw.len(), "decoded");
                let opened = self.validated.dispatch(&raw)?.into_output();
                if request.compress {
                    gfc_codec::decompress(&opened)?
                } else {
                    opened
                }
            }
        };

        info!(
            %mode,
            ?direction,
            input_bytes = input.len(),
            output_bytes = output.len(),
            "request complete"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfc_core::{AlgoMode, Encoding, GfcError};
    use gfc_crypto::{NoPassphrase, StaticPassphrase};

    const KEY: [u8; 32] = [0x42; 32];

    fn request(mode: AlgoMode, decrypt: bool) -> Request {
        let mut req = Request::new(mode);
        req.decrypt = decrypt;
        req.key_material = Some(KEY.to_vec());
        req
    }

    #[test]
    fn test_plain_roundtrip() {
        let pipeline = Pipeline::new(&NoPassphrase);
        let sealed = pipeline.run(&request(AlgoMode::AesGcm, false), b"hello").unwrap();
        assert_eq!(sealed.len(), 5 + 16 + 12 + 32);
        let opened = pipeline.run(&request(AlgoMode::AesGcm, true), &sealed).unwrap();
        assert_eq!(opened, b"hello");
    }

    #[test]
    fn test_compress_and_encode_order() {
        let pipeline = Pipeline::new(&NoPassphrase);
        let plaintext = b"abcabcabc".repeat(1000);

        let mut enc = request(AlgoMode::XChaCha20Poly1305, false);
        enc.compress = true;
        enc.encoding = Encoding::Base64;
        let sealed = pipeline.run(&enc, &plaintext).unwrap();
        assert!(sealed.is_ascii());
        // compressed before encryption, so much smaller than the input
        assert!(sealed.len() < plaintext.len() / 4);

        let mut dec = request(AlgoMode::XChaCha20Poly1305, true);
        dec.compress = true;
        dec.encoding = Encoding::Base64;
        assert_eq!(pipeline.run(&dec, &sealed).unwrap(), plaintext);
    }

    #[test]
    fn test_missing_compress_flag_on_decrypt_yields_compressed_bytes() {
        let pipeline = Pipeline::new(&NoPassphrase);
        let mut enc = request(AlgoMode::AesGcm, false);
        enc.compress = true;
        let sealed = pipeline.run(&enc, b"payload").unwrap();

        let opened = pipeline.run(&request(AlgoMode::AesGcm, true), &sealed).unwrap();
        assert_eq!(gfc_codec::decompress(&opened).unwrap(), b"payload");
    }

    #[test]
    fn test_validation_precedes_reading() {
        struct PanicReader;
        impl Read for PanicReader {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                panic!("input must not be read for an invalid request");
            }
        }

        let pipeline = Pipeline::new(&NoPassphrase);
        let mut req = request(AlgoMode::AesCtr, false);
        req.key_material = Some(vec![0u8; 16]);
        let mut out = Vec::new();
        let err = pipeline.process(&req, PanicReader, &mut out).unwrap_err();
        assert!(matches!(err, GfcError::InvalidKeyLength { expected: 32, actual: 16 }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_prepared_request_validates_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;
        use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

        struct WarnCounter(Arc<AtomicUsize>);
        impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
            fn on_event(&self, event: &tracing::Event<'_>, _: Context<'_, S>) {
                if *event.metadata().level() == tracing::Level::WARN {
                    self.0.fetch_add(1, Ordering::SeqCst);
                }
            }
        }

        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));
        tracing::subscriber::with_default(subscriber, || {
            let pipeline = Pipeline::new(&NoPassphrase);
            let req = request(AlgoMode::AesCtr, false);
            let prepared = pipeline.prepare(&req).unwrap();
            assert_eq!(warnings.load(Ordering::SeqCst), 1);

            let sealed = prepared.run(b"unauthenticated").unwrap();
            assert_eq!(sealed.len(), 15 + 16 + 32);
            // running a prepared request does not validate again
            assert_eq!(warnings.load(Ordering::SeqCst), 1);

            pipeline.process(&req, &b"again"[..], Vec::new()).unwrap();
            assert_eq!(warnings.load(Ordering::SeqCst), 2);
        });
    }

    #[test]
    fn test_failed_decrypt_writes_nothing() {
        let pipeline = Pipeline::new(&NoPassphrase);
        let mut out = Vec::new();
        let err = pipeline
            .process(&request(AlgoMode::AesGcm, true), &[0u8; 10][..], &mut out)
            .unwrap_err();
        assert!(matches!(err, GfcError::MalformedEnvelope { len: 10, .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_from_config_uses_rounds() {
        let mut config = GfcConfig::default();
        config.crypto.pbkdf2_rounds = 2;
        let source = StaticPassphrase::new("pw");
        let fast = Pipeline::from_config(&config, &source);

        let mut enc = Request::new(AlgoMode::ChaCha20Poly1305);
        enc.encoding = Encoding::Hex;
        let sealed = fast.run(&enc, b"derived").unwrap();

        let mut dec = Request::new(AlgoMode::ChaCha20Poly1305);
        dec.decrypt = true;
        dec.encoding = Encoding::Hex;
        assert_eq!(fast.run(&dec, &sealed).unwrap(), b"derived");

        // same passphrase, different rounds: different key
        let slower = Pipeline::new(&source).with_kdf_params(KdfParams { rounds: 3 });
        assert!(slower.run(&dec, &sealed).unwrap_err().is_authentication_failure());
    }
}
