use num::Integer;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Signed, Zero};
use crate::rsa::errors::{Result, RsaError};

/// Square-and-multiply `a^q mod n`.
pub fn fast_modular_exponent(a: &BigUint, q: &BigUint, n: &BigUint) -> BigUint {
    let mut a = a % n;
    let mut q = q.clone();
    let mut r: BigUint = BigUint::one() % n;
    while !q.is_zero() {
        if q.bit(0) { r = (r * &a) % n; }
        q >>= 1;
        a = (&a * &a) % n;
    }
    r
}

/// `(p - 1)(q - 1)`
pub fn euler(p: &BigUint, q: &BigUint) -> BigUint {
    (p - 1u32) * (q - 1u32)
}

/// Inverse of `a` modulo `n` by the iterative extended Euclid.
///
/// Fails with [`RsaError::NotInvertible`] when `gcd(a, n) != 1`, rather than returning
/// a value that does not satisfy `a * x ≡ 1 (mod n)`.
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Result<BigUint> {
    if n.is_zero() || !a.gcd(n).is_one() {
        return Err(RsaError::NotInvertible);
    }
    let n = BigInt::from_biguint(Sign::Plus, n.clone());
    let mut a = BigInt::from_biguint(Sign::Plus, a.clone());
    let (mut i, mut v, mut d) = (n.clone(), BigInt::zero(), BigInt::one());
    while a.is_positive() {
        let t = &i / &a;
        let x = a;
        a = &i % &x;
        i = x;
        let x = d;
        d = &v - &t * &x;
        v = x;
    }
    v %= &n;
    if v.is_negative() { v = (v + &n) % &n; }
    Ok(v.magnitude().clone())
}
