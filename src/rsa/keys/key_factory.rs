use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use crate::rsa::errors::Result;
use crate::rsa::keys::{Key, KeyData, KeyPair};
use crate::rsa::math::{euler, mod_inverse};
use crate::rsa::primality::DEFAULT_WITNESSES;
use crate::rsa::prime_gen::{generate_primes_with, CancelToken, PrimeTriple};

/// `n = p * q`, `d = e^-1 mod (p - 1)(q - 1)` and the public exponent `e`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyMaterial {
    pub n: BigUint,
    pub d: BigUint,
    pub e: BigUint,
}

impl KeyMaterial {
    pub fn from_primes(primes: &PrimeTriple) -> Result<Self> {
        let n = &primes.p * &primes.q;
        let r = euler(&primes.p, &primes.q);
        let d = mod_inverse(&primes.e, &r)?;
        crate::rsa_log!("(d * e) % r = {} % {} = {}", &d * &primes.e, r, (&d * &primes.e) % &r);
        Ok(Self { n, d, e: primes.e.clone() })
    }

    pub fn into_key_pair(self, bits: u32) -> KeyPair {
        KeyPair {
            public: KeyData::new_public(Key::new(self.e, self.n.clone()), bits),
            private: KeyData::new_private(Key::new(self.d, self.n), bits),
        }
    }
}

pub fn derive_key_material(bits: u32) -> Result<KeyMaterial> {
    derive_key_material_with(bits, DEFAULT_WITNESSES, &mut OsRng, &CancelToken::new())
}

/// Fails with `NotInvertible` when the drawn `e` shares a factor with `(p - 1)(q - 1)`;
/// drawing again is left to the caller.
pub fn derive_key_material_with<R: RngCore + CryptoRng + ?Sized>(bits: u32, rounds: u32, rng: &mut R, cancel: &CancelToken) -> Result<KeyMaterial> {
    let primes = generate_primes_with(bits, rounds, rng, cancel)?;
    KeyMaterial::from_primes(&primes)
}

pub fn generate_key_pair(bits: u32) -> Result<KeyPair> {
    Ok(derive_key_material(bits)?.into_key_pair(bits))
}

pub fn generate_key_pair_with<R: RngCore + CryptoRng + ?Sized>(bits: u32, rounds: u32, rng: &mut R, cancel: &CancelToken) -> Result<KeyPair> {
    Ok(derive_key_material_with(bits, rounds, rng, cancel)?.into_key_pair(bits))
}
