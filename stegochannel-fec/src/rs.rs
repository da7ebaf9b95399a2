//! Systematic Reed-Solomon encode/decode over GF(2^8).
//!
//! The generator polynomial's roots are `alpha^0 .. alpha^(nsym-1)` (the
//! first consecutive root is alpha^0, i.e. generator base 0), matching
//! the canonical parameterization this codec was built for: 8 parity
//! bytes, correcting up to 4 symbol errors per block.

use crate::error::RsFailure;
use crate::gf;
use crate::poly;

/// Number of parity bytes appended per block. Fixed for this protocol.
pub const EC_BYTES: usize = 8;

fn generator_poly(nsym: usize) -> Vec<u8> {
    let mut g = vec![1u8];
    for i in 0..nsym {
        g = poly::mul_desc(&g, &[1, gf::pow(2, i)]);
    }
    g
}

/// Appends `nsym` parity bytes to `data`, returning the full codeword.
///
/// Returns [`RsFailure::bad_input`] if `data` is empty.
pub fn encode(data: &[u8], nsym: usize) -> Result<Vec<u8>, RsFailure> {
    if data.is_empty() {
        return Err(RsFailure::bad_input());
    }
    let gen = generator_poly(nsym);
    let mut buf = data.to_vec();
    buf.resize(data.len() + nsym, 0);
    for i in 0..data.len() {
        let coef = buf[i];
        if coef != 0 {
            for (j, &g) in gen.iter().enumerate() {
                buf[i + j] ^= gf::mul(g, coef);
            }
        }
    }
    let mut out = data.to_vec();
    out.extend_from_slice(&buf[data.len()..]);
    Ok(out)
}

fn calc_syndromes(codeword: &[u8], nsym: usize) -> Vec<u8> {
    (0..nsym).map(|j| poly::eval_desc(codeword, gf::pow(2, j))).collect()
}

/// Finds the error locator polynomial via Berlekamp-Massey.
///
/// Returns the polynomial in ascending order (`c[0] == 1`, the constant
/// term); its degree is the number of errors found.
fn berlekamp_massey(synd: &[u8]) -> Result<Vec<u8>, RsFailure> {
    let n = synd.len();
    let mut c = vec![0u8; n + 1];
    let mut b = vec![0u8; n + 1];
    c[0] = 1;
    b[0] = 1;
    let mut l = 0usize;
    let mut m = 1usize;
    let mut last_discrepancy = 1u8;

    for i in 0..n {
        let mut delta = synd[i];
        for j in 1..=l {
            delta ^= gf::mul(c[j], synd[i - j]);
        }
        if delta == 0 {
            m += 1;
        } else if 2 * l <= i {
            let t = c.clone();
            let coef = gf::mul(delta, gf::inverse(last_discrepancy)?);
            for k in 0..c.len() {
                if k >= m {
                    c[k] ^= gf::mul(coef, b[k - m]);
                }
            }
            l = i + 1 - l;
            b = t;
            last_discrepancy = delta;
            m = 1;
        } else {
            let coef = gf::mul(delta, gf::inverse(last_discrepancy)?);
            for k in 0..c.len() {
                if k >= m {
                    c[k] ^= gf::mul(coef, b[k - m]);
                }
            }
            m += 1;
        }
    }

    if 2 * l > n {
        return Err(RsFailure::uncorrectable());
    }
    c.truncate(l + 1);
    Ok(c)
}

/// Finds the roots of the error locator polynomial over all `n` codeword
/// positions via brute-force (Chien) search. Returns array indices into
/// the codeword (descending convention: index 0 is the highest-degree
/// coefficient).
fn chien_search(lambda: &[u8], n: usize) -> Result<Vec<usize>, RsFailure> {
    let errs = lambda.len() - 1;
    let mut positions = Vec::with_capacity(errs);
    for p in 0..n {
        let x_inv = gf::pow_neg(2, p);
        if poly::eval_asc(lambda, x_inv) == 0 {
            positions.push(n - 1 - p);
        }
    }
    if positions.len() != errs {
        return Err(RsFailure::uncorrectable());
    }
    Ok(positions)
}

fn formal_derivative(lambda: &[u8]) -> Vec<u8> {
    let deg = lambda.len() - 1;
    let mut d = vec![0u8; deg.max(1)];
    for i in 1..=deg {
        if i % 2 == 1 {
            d[i - 1] = lambda[i];
        }
    }
    d
}

/// Corrects up to `floor(nsym/2)` symbol errors in `codeword` in place.
///
/// Returns the number of symbols corrected (0 if the codeword already
/// satisfied all syndromes). Returns [`RsFailure::uncorrectable`] when the
/// error pattern exceeds the code's correction bound, and
/// [`RsFailure::bad_input`] on an empty codeword.
pub fn correct(codeword: &mut [u8], nsym: usize) -> Result<usize, RsFailure> {
    if codeword.is_empty() {
        return Err(RsFailure::bad_input());
    }
    let synd = calc_syndromes(codeword, nsym);
    if synd.iter().all(|&s| s == 0) {
        return Ok(0);
    }

    let lambda = berlekamp_massey(&synd)?;
    let positions = chien_search(&lambda, codeword.len())?;

    let mut omega = poly::mul_asc(&synd, &lambda);
    omega.truncate(nsym);
    while omega.len() < nsym {
        omega.push(0);
    }
    let lambda_prime = formal_derivative(&lambda);

    let n = codeword.len();
    for &idx in &positions {
        let p = n - 1 - idx;
        let x = gf::pow(2, p);
        let x_inv = gf::pow_neg(2, p);
        let num = poly::eval_asc(&omega, x_inv);
        let den = poly::eval_asc(&lambda_prime, x_inv);
        if den == 0 {
            return Err(RsFailure::uncorrectable());
        }
        let magnitude = gf::mul(x, gf::div(num, den)?);
        codeword[idx] ^= magnitude;
    }

    let verify = calc_syndromes(codeword, nsym);
    if !verify.iter().all(|&s| s == 0) {
        return Err(RsFailure::uncorrectable());
    }
    Ok(positions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn encode_is_systematic() {
        let data = b"hello steganography";
        let codeword = encode(data, EC_BYTES).unwrap();
        assert_eq!(&codeword[..data.len()], data);
        assert_eq!(codeword.len(), data.len() + EC_BYTES);
    }

    #[test]
    fn clean_codeword_has_zero_corrections() {
        let data = b"no errors here";
        let mut codeword = encode(data, EC_BYTES).unwrap();
        let corrections = correct(&mut codeword, EC_BYTES).unwrap();
        assert_eq!(corrections, 0);
        assert_eq!(&codeword[..data.len()], data);
    }

    #[test]
    fn corrects_up_to_four_symbol_errors() {
        let data = b"the quick brown fox jumps";
        let mut rng = StdRng::seed_from_u64(42);
        for flips in 0..=4 {
            let mut codeword = encode(data, EC_BYTES).unwrap();
            let mut positions: Vec<usize> = (0..codeword.len()).collect();
            for i in (1..positions.len()).rev() {
                let j = rng.gen_range(0..=i);
                positions.swap(i, j);
            }
            for &p in positions.iter().take(flips) {
                codeword[p] ^= 0xFF;
            }
            let corrections = correct(&mut codeword, EC_BYTES).unwrap();
            assert_eq!(corrections, flips);
            assert_eq!(&codeword[..data.len()], data);
        }
    }

    #[test]
    fn five_symbol_errors_are_detected_as_uncorrectable() {
        let data = b"more data than parity can fix";
        let mut codeword = encode(data, EC_BYTES).unwrap();
        for p in 0..5 {
            codeword[p] ^= 0xFF;
        }
        let result = correct(&mut codeword, EC_BYTES);
        assert!(result.is_err());
        assert!(result.unwrap_err().is_uncorrectable());
    }

    #[test]
    fn empty_data_is_bad_input() {
        assert!(encode(b"", EC_BYTES).is_err());
        let mut empty: Vec<u8> = Vec::new();
        assert!(correct(&mut empty, EC_BYTES).is_err());
    }

    #[test]
    fn single_byte_flip_corrects() {
        let data = b"x";
        let mut codeword = encode(data, EC_BYTES).unwrap();
        codeword[0] ^= 0x01;
        let corrections = correct(&mut codeword, EC_BYTES).unwrap();
        assert_eq!(corrections, 1);
        assert_eq!(&codeword[..1], data);
    }
}
