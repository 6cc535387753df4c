use num_bigint::BigUint;
use num_traits::One;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use crate::rsa::errors::Result;
use crate::rsa::math::fast_modular_exponent;
use crate::rsa::random::fill_bytes;

pub const DEFAULT_WITNESSES: u32 = 10;

/// Miller-Rabin over the operating system's random source.
pub fn is_probably_prime(value: &BigUint, witnesses: u32) -> Result<bool> {
    is_probably_prime_with(value, witnesses, &mut OsRng)
}

/// Miller-Rabin with `witnesses` random bases (`0` selects [`DEFAULT_WITNESSES`]).
///
/// A composite survives all rounds with probability at most `4^-witnesses`.
pub fn is_probably_prime_with<R: RngCore + CryptoRng + ?Sized>(value: &BigUint, witnesses: u32, rng: &mut R) -> Result<bool> {
    if value < &BigUint::from(2u32) { return Ok(false); }
    // 2 and 3; among generated candidates only the 1-byte `q` pool of a 32-bit key reaches this
    if value < &BigUint::from(4u32) { return Ok(true); }
    if !value.bit(0) { return Ok(false); }
    let witnesses = if witnesses == 0 { DEFAULT_WITNESSES } else { witnesses };

    let minus_one = value - 1u32;
    let s = minus_one.trailing_zeros().unwrap_or(0);
    let d = &minus_one >> s;

    for _ in 0..witnesses {
        let a = draw_witness(value, rng)?;
        let mut x = fast_modular_exponent(&a, &d, value);
        if x.is_one() || x == minus_one { continue; }
        let mut pass = false;
        for _ in 1..s {
            x = (&x * &x) % value;
            if x.is_one() { return Ok(false); }
            if x == minus_one {
                pass = true;
                break;
            }
        }
        if !pass { return Ok(false); }
    }
    Ok(true)
}

/// Uniform witness in `[2, value - 2]`, drawn from byte strings as long as `value`.
fn draw_witness<R: RngCore + CryptoRng + ?Sized>(value: &BigUint, rng: &mut R) -> Result<BigUint> {
    let bits = value.bits();
    let mut buf = vec![0u8; ((bits + 7) / 8) as usize];
    // bits above the top bit of `value` only ever cause a redraw
    let spare = (buf.len() as u64 * 8 - bits) as u32;
    let upper = value - 2u32;
    loop {
        fill_bytes(rng, &mut buf)?;
        if let Some(top) = buf.last_mut() {
            *top &= 0xffu8 >> spare;
        }
        let a = BigUint::from_bytes_le(&buf);
        if a >= BigUint::from(2u32) && a <= upper {
            return Ok(a);
        }
    }
}
