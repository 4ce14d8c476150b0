//! Text encoding of the outermost bytes
//!
//! Encoding is the last step of encryption and decoding the first step of
//! decryption, so the cipher always sees genuine envelope bytes.

use std::borrow::Cow;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use gfc_core::{Encoding, GfcError, GfcResult};

/// Encode `data`. Base64 uses the standard padded alphabet, hex is lowercase.
/// No trailing newline is added.
pub fn encode(encoding: Encoding, data: &[u8]) -> Cow<'_, [u8]> {
    match encoding {
        Encoding::None => Cow::Borrowed(data),
        Encoding::Base64 => Cow::Owned(STANDARD.encode(data).into_bytes()),
        Encoding::Hex => Cow::Owned(hex::encode(data).into_bytes()),
    }
}

/// Decode `data`, ignoring leading and trailing ASCII whitespace (such as
/// the newline an editor or `echo` appends). Base64 may also be wrapped:
/// line breaks anywhere in the text are skipped.
///
/// Empty or malformed input is an `Encoding` error.
pub fn decode(encoding: Encoding, data: &[u8]) -> GfcResult<Cow<'_, [u8]>> {
    let decoded = match encoding {
        Encoding::None => return Ok(Cow::Borrowed(data)),
        Encoding::Base64 => STANDARD
            .decode(unwrap_lines(non_empty(encoding, data)?))
            .map_err(|e| GfcError::Encoding(format!("invalid base64: {e}")))?,
        Encoding::Hex => hex::decode(non_empty(encoding, data)?)
            .map_err(|e| GfcError::Encoding(format!("invalid hex: {e}")))?,
    };
    Ok(Cow::Owned(decoded))
}

fn non_empty(encoding: Encoding, data: &[u8]) -> GfcResult<&[u8]> {
    let text = data.trim_ascii();
    if text.is_empty() {
        return Err(GfcError::Encoding(format!("empty {encoding} input")));
    }
    Ok(text)
}

/// Drop `\r` and `\n` from wrapped base64 text. Other bytes are left for the
/// decoder to reject.
fn unwrap_lines(text: &[u8]) -> Cow<'_, [u8]> {
    if !text.iter().any(|b| matches!(b, b'\r' | b'\n')) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.iter()
            .copied()
            .filter(|b| !matches!(b, b'\r' | b'\n'))
            .collect(),
    )
}
