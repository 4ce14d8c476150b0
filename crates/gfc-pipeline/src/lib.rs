//! gfc-pipeline: one request, one buffer, one result
//!
//! Encryption runs `compress? → encrypt → encode?`; decryption runs the exact
//! reverse, `decode? → decrypt → decompress?`. The request is validated
//! (mode, key length, RSA key parsing) before any input is read.

pub mod engine;

pub use engine::{Pipeline, Prepared};
