use hkdf::Hkdf;
use sha2::Sha256;

use crate::error::CryptoFailure;

/// HKDF-SHA256 expand-only derivation producing exactly `len` bytes.
///
/// `salt` is empty by default; `info` is ASCII and is the sole source of
/// domain separation between subkeys derived from the same `ikm`.
pub fn hkdf_sha256(ikm: &[u8], salt: &[u8], info: &[u8], len: usize) -> Result<Vec<u8>, CryptoFailure> {
    let hk = Hkdf::<Sha256>::new(Some(salt), ikm);
    let mut out = vec![0u8; len];
    hk.expand(info, &mut out)
        .map_err(|_| CryptoFailure::bad_length())?;
    Ok(out)
}

/// `hkdf_sha256` specialized to a fixed 32-byte output, the size used for
/// every subkey in the protocol's key schedule.
pub fn hkdf_sha256_32(ikm: &[u8], salt: &[u8], info: &[u8]) -> Result<[u8; 32], CryptoFailure> {
    let v = hkdf_sha256(ikm, salt, info, 32)?;
    let mut out = [0u8; 32];
    out.copy_from_slice(&v);
    Ok(out)
}
