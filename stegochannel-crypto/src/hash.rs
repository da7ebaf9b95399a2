use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::error::CryptoFailure;

/// SHA-256 digest of `msg`.
pub fn sha256(msg: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(msg);
    hasher.finalize().into()
}

/// HMAC-SHA256 over `msg` under `key`, truncated to the leftmost 64 bits.
///
/// Used for the frame authentication tag and nowhere else; kept separate
/// from a full-width HMAC helper so callers can't accidentally use a
/// truncated tag where a full tag was intended.
pub fn hmac_sha256_trunc64(key: &[u8], msg: &[u8]) -> Result<[u8; 8], CryptoFailure> {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(key).map_err(|_| CryptoFailure::bad_length())?;
    mac.update(msg);
    let full = mac.finalize().into_bytes();
    let mut out = [0u8; 8];
    out.copy_from_slice(&full[..8]);
    Ok(out)
}

/// Verifies a truncated HMAC tag in constant time.
pub fn hmac_sha256_trunc64_verify(
    key: &[u8],
    msg: &[u8],
    tag: &[u8; 8],
) -> Result<(), CryptoFailure> {
    let expected = hmac_sha256_trunc64(key, msg)?;
    if constant_time_eq(&expected, tag) {
        Ok(())
    } else {
        Err(CryptoFailure::auth_fail())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_is_32_bytes_and_deterministic() {
        let a = sha256(b"hello");
        let b = sha256(b"hello");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn hmac_trunc64_roundtrips() {
        let key = [0x11u8; 32];
        let tag = hmac_sha256_trunc64(&key, b"frame bytes").unwrap();
        assert!(hmac_sha256_trunc64_verify(&key, b"frame bytes", &tag).is_ok());
    }

    #[test]
    fn hmac_trunc64_rejects_tamper() {
        let key = [0x11u8; 32];
        let tag = hmac_sha256_trunc64(&key, b"frame bytes").unwrap();
        assert!(hmac_sha256_trunc64_verify(&key, b"frame BYTES", &tag).is_err());
    }
}
