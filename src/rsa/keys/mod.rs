pub mod codec;
pub mod key_data;
pub mod key_factory;
pub mod key_pair;
pub mod key_reader;
pub mod key_writer;

pub use codec::*;
pub use key_data::*;
pub use key_factory::*;
pub use key_pair::*;
pub use key_reader::*;
pub use key_writer::*;

use num_bigint::BigUint;
use num_traits::Zero;

/// Exponent (`e` or `d`) together with the modulus `n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub value: BigUint,
    pub modulus: BigUint,
}

impl Default for Key {
    fn default() -> Self {
        Self { value: BigUint::zero(), modulus: BigUint::zero() }
    }
}

impl Key {
    pub fn new(value: BigUint, modulus: BigUint) -> Self {
        Self { value, modulus }
    }

    /// Neither part may be zero for the key to drive the cipher.
    pub fn is_usable(&self) -> bool {
        !self.value.is_zero() && !self.modulus.is_zero()
    }
}

const BASE64_SPLIT: usize = 70;
