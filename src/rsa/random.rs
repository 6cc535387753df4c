use rand::{CryptoRng, RngCore};
use crate::rsa::errors::{Result, RsaError};

/// A failing source surfaces as [`RsaError::EntropyExhausted`].
pub fn fill_bytes<R: RngCore + CryptoRng + ?Sized>(rng: &mut R, buf: &mut [u8]) -> Result<()> {
    rng.try_fill_bytes(buf).map_err(|e| RsaError::EntropyExhausted(e.to_string()))
}

/// Fills `buf` with random bytes, none of which is zero.
pub fn fill_non_zero_bytes<R: RngCore + CryptoRng + ?Sized>(rng: &mut R, buf: &mut [u8]) -> Result<()> {
    fill_bytes(rng, buf)?;
    let mut one = [0u8; 1];
    for b in buf.iter_mut() {
        while *b == 0 {
            fill_bytes(rng, &mut one)?;
            *b = one[0];
        }
    }
    Ok(())
}

/// Source whose every fallible draw fails.
#[cfg(test)]
pub(crate) struct BrokenRng;

#[cfg(test)]
impl RngCore for BrokenRng {
    fn next_u32(&mut self) -> u32 { 0 }
    fn next_u64(&mut self) -> u64 { 0 }
    fn fill_bytes(&mut self, dest: &mut [u8]) { dest.fill(0) }
    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        Err(rand::Error::new("device gone"))
    }
}

#[cfg(test)]
impl CryptoRng for BrokenRng {}
