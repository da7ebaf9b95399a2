use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};

use crate::error::CryptoFailure;

/// Length of the XChaCha20-Poly1305 nonce carried in its own frame field.
pub const NONCE_LEN: usize = 24;

/// Seals `msg` under `key`/`nonce` with associated data `aad`.
///
/// The returned ciphertext includes the 16-byte Poly1305 tag appended; a
/// frame's `payload_len` counts the ciphertext length including the tag.
pub fn xchacha20poly1305_seal(
    key: &[u8; 32],
    nonce: &[u8; NONCE_LEN],
    aad: &[u8],
    msg: &[u8],
) -> Result<Vec<u8>, CryptoFailure> {
    let cipher = XChaCha20Poly1305::new(key.into());
    let nonce = XNonce::from_slice(nonce);
    cipher
        .encrypt(nonce, Payload { msg, aad })
        .map_err(|_| CryptoFailure::auth_fail())
}

/// Opens a ciphertext produced by [`xchacha20poly1305_seal`].
///
/// Returns `CryptoFailure::auth_fail` on any tamper, truncation, or wrong-key
/// condition; the AEAD contract never distinguishes those cases, and neither
/// does this wrapper.
pub fn xchacha20poly1305_open(
    key: &[u8; 32],
    nonce: &[u8; NONCE_LEN],
    aad: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoFailure> {
    let cipher = XChaCha20Poly1305::new(key.into());
    let nonce = XNonce::from_slice(nonce);
    cipher
        .decrypt(nonce, Payload { msg: ciphertext, aad })
        .map_err(|_| CryptoFailure::auth_fail())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rand::rand_bytes;

    #[test]
    fn seal_open_roundtrip() {
        let key = [0x22u8; 32];
        let nonce: [u8; NONCE_LEN] = rand_bytes(NONCE_LEN).unwrap().try_into().unwrap();
        let ct = xchacha20poly1305_seal(&key, &nonce, b"aad", b"hello world").unwrap();
        let pt = xchacha20poly1305_open(&key, &nonce, b"aad", &ct).unwrap();
        assert_eq!(pt, b"hello world");
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = [0x22u8; 32];
        let nonce = [0u8; NONCE_LEN];
        let mut ct = xchacha20poly1305_seal(&key, &nonce, b"", b"secret").unwrap();
        let last = ct.len() - 1;
        ct[last] ^= 1;
        assert!(xchacha20poly1305_open(&key, &nonce, b"", &ct).is_err());
    }
}
