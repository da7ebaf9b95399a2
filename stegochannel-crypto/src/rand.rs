use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::CryptoFailure;

/// Fills and returns `n` cryptographically random bytes.
pub fn rand_bytes(n: usize) -> Result<Vec<u8>, CryptoFailure> {
    let mut buf = vec![0u8; n];
    OsRng.try_fill_bytes(&mut buf).map_err(|_| CryptoFailure::rand_fail())?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_requested_length() {
        let b = rand_bytes(24).unwrap();
        assert_eq!(b.len(), 24);
    }

    #[test]
    fn two_calls_differ() {
        let a = rand_bytes(32).unwrap();
        let b = rand_bytes(32).unwrap();
        assert_ne!(a, b);
    }
}
