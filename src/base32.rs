//! Base32 display keys.
//!
//! Secrets are shown to users (and embedded in `otpauth://` URIs) as unpadded
//! [RFC 4648][4648] Base32 over the alphabet `A-Z2-7`. Authenticator apps decode this text back
//! to the key bytes themselves, so the bit packing here must match theirs exactly.
//!
//! [4648]: https://datatracker.ietf.org/doc/html/rfc4648#section-6

use data_encoding::BASE32_NOPAD;

use crate::error::Result;

/// Encodes raw key bytes, without `=` padding.
pub fn encode(bytes: &[u8]) -> String {
    BASE32_NOPAD.encode(bytes)
}

/// Decodes an unpadded Base32 string.
///
/// Decoding is strict: lowercase letters, `=` padding, whitespace, lengths that cannot result from
/// [`encode`] and non-zero trailing bits are all rejected, so that `encode(decode(s)) == s` for
/// every accepted `s`.
///
/// # Errors
///
/// Fails with [`Error::Format`](crate::Error::Format) on any of the above.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    Ok(BASE32_NOPAD.decode(text.as_bytes())?)
}

/// Encodes a string through its UTF-16 code units, low byte first.
///
/// Older enrollments stored the display key of a *string* secret by copying its in-memory UTF-16
/// representation into a byte buffer. Use this only to reproduce such keys; new secrets should go
/// through [`encode`] on the raw key bytes.
pub fn encode_utf16_le(text: &str) -> String {
    let bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
    encode(&bytes)
}
