use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::CryptoFailure;

/// Lower-case hex encoding. Case-preserving round trip: decoding the output
/// of this function always yields back the original bytes, and decoding is
/// tolerant of either case on input.
pub fn hex_encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

pub fn hex_decode(s: &str) -> Result<Vec<u8>, CryptoFailure> {
    hex::decode(s).map_err(|_| CryptoFailure::bad_length())
}

/// URL-safe, unpadded base64 — the encoding used by the channel export
/// string.
pub fn base64url_encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn base64url_decode(s: &str) -> Result<Vec<u8>, CryptoFailure> {
    URL_SAFE_NO_PAD
        .decode(s)
        .map_err(|_| CryptoFailure::bad_length())
}
