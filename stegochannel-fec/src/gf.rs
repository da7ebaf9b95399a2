//! GF(2^8) arithmetic over the primitive polynomial `x^8 + x^4 + x^3 + x^2 + 1`
//! (0x11D), with 2 as the field's multiplicative generator.

use crate::error::RsFailure;

const PRIM_POLY: u16 = 0x11D;

pub struct Tables {
    exp: [u8; 512],
    log: [u8; 256],
}

impl Tables {
    fn build() -> Tables {
        let mut exp = [0u8; 512];
        let mut log = [0u8; 256];
        let mut x: u16 = 1;
        for i in 0..255usize {
            exp[i] = x as u8;
            log[x as usize] = i as u8;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= PRIM_POLY;
            }
        }
        for i in 255..512 {
            exp[i] = exp[i - 255];
        }
        Tables { exp, log }
    }
}

fn tables() -> &'static Tables {
    use std::sync::OnceLock;
    static TABLES: OnceLock<Tables> = OnceLock::new();
    TABLES.get_or_init(Tables::build)
}

pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let t = tables();
    let sum = t.log[a as usize] as usize + t.log[b as usize] as usize;
    t.exp[sum]
}

pub fn div(a: u8, b: u8) -> Result<u8, RsFailure> {
    if b == 0 {
        return Err(RsFailure::bad_input());
    }
    if a == 0 {
        return Ok(0);
    }
    let t = tables();
    let diff = 255 + t.log[a as usize] as isize - t.log[b as usize] as isize;
    Ok(t.exp[(diff as usize) % 255])
}

/// `a` raised to an ordinary (non-negative) integer power.
pub fn pow(a: u8, power: usize) -> u8 {
    if a == 0 {
        return if power == 0 { 1 } else { 0 };
    }
    let t = tables();
    let e = (t.log[a as usize] as usize * power) % 255;
    t.exp[e]
}

/// Multiplicative inverse of a nonzero element.
pub fn inverse(a: u8) -> Result<u8, RsFailure> {
    if a == 0 {
        return Err(RsFailure::bad_input());
    }
    let t = tables();
    Ok(t.exp[255 - t.log[a as usize] as usize])
}

/// `alpha^(-power)`, i.e. `inverse(pow(alpha, power))`.
pub fn pow_neg(alpha: u8, power: usize) -> u8 {
    let t = tables();
    let log_a = t.log[alpha as usize] as usize;
    let e = (255 * 255 - log_a * (power % 255)) % 255;
    t.exp[e]
}
