//! Cryptographic primitives for StegoChannel.
//!
//! Thin wrappers over standard algorithms. Every fallible function in this
//! crate returns [`CryptoFailure`], tagged with one of three kinds
//! (`bad_length`, `auth_fail`, `rand_fail`). Callers treat a `CryptoFailure`
//! as always fatal to the current operation.

mod aead;
mod codec;
mod error;
mod hash;
mod kdf;
mod rand;
mod secret;

pub use aead::{xchacha20poly1305_open, xchacha20poly1305_seal, NONCE_LEN};
pub use codec::{base64url_decode, base64url_encode, hex_decode, hex_encode};
pub use error::{CryptoErrorKind, CryptoFailure};
pub use hash::{hmac_sha256_trunc64, hmac_sha256_trunc64_verify, sha256};
pub use kdf::{hkdf_sha256, hkdf_sha256_32};
pub use rand::rand_bytes;
pub use secret::Secret;
