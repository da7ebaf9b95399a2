//! Reed-Solomon forward error correction over GF(2^8).
//!
//! Systematic encode/decode with a fixed 8-byte parity budget, correcting
//! up to 4 symbol errors per block. Used to recover frame bytes that a
//! selector or transport hiccup corrupted between sender and receiver.

mod error;
mod gf;
mod poly;
mod rs;

pub use error::RsFailure;
pub use rs::{correct, encode, EC_BYTES};
