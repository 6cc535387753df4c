use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use chrono::Local;
use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use crate::rsa::errors::{Result, RsaError};
use crate::rsa::primality::{is_probably_prime_with, DEFAULT_WITNESSES};
use crate::rsa::random::fill_non_zero_bytes;

/// Byte pool for the public exponent candidate, whatever the key size.
pub const E_BYTES: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct PrimeTriple {
    pub p: BigUint,
    pub q: BigUint,
    pub e: BigUint,
}

/// Stops a running prime search, either on request or once `time_max` ms have passed.
#[derive(Debug, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    start: Instant,
    time_max: Option<i64>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        Self { cancelled: Arc::new(AtomicBool::new(false)), start: Instant::now(), time_max: None }
    }

    /// `time_max <= 0` means no deadline.
    pub fn with_timeout(time_max: i64) -> Self {
        Self { time_max: if time_max > 0 { Some(time_max) } else { None }, ..Self::new() }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Milliseconds on the monotonic clock since the token was made.
    pub fn elapsed(&self) -> i64 {
        self.start.elapsed().as_millis() as i64
    }

    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() { return Err(RsaError::Cancelled); }
        match self.time_max {
            Some(time_max) => {
                let time = self.elapsed();
                if time > time_max { Err(RsaError::Timeout(time)) } else { Ok(()) }
            }
            None => Ok(())
        }
    }
}

/// Bytes for `p`: half the key plus 20% of that half, the 20% rounded up to whole bytes of 8.
pub fn p_byte_len(bits: u32) -> usize {
    let half = (bits / 2) as usize;
    let mut twenty = (half as f64 * 0.2).floor() as usize;
    while twenty % 8 != 0 { twenty += 1; }
    (half + twenty) / 8
}

/// `(p, q, e)` byte budgets for a `bits` sized key; `q` takes what `p` leaves.
pub fn byte_budgets(bits: u32) -> (usize, usize, usize) {
    let p_len = p_byte_len(bits);
    let total = (bits / 8) as usize;
    (p_len, total.saturating_sub(p_len), E_BYTES)
}

pub fn generate_primes(bits: u32) -> Result<PrimeTriple> {
    generate_primes_with(bits, DEFAULT_WITNESSES, &mut OsRng, &CancelToken::new())
}

/// Draws non-zero byte strings for `p`, `q` and `e` until each slot holds a probable prime.
///
/// `bits` must be a multiple of 8 and at least 32; that is up to the caller. There is no
/// bound on the number of draws, only `cancel`.
pub fn generate_primes_with<R: RngCore + CryptoRng + ?Sized>(bits: u32, rounds: u32, rng: &mut R, cancel: &CancelToken) -> Result<PrimeTriple> {
    let (p_len, q_len, e_len) = byte_budgets(bits);
    let mut buffers = [vec![0u8; p_len], vec![0u8; q_len], vec![0u8; e_len]];
    let mut slots: [Option<BigUint>; 3] = [None, None, None];
    let mut try_times: u64 = 0;
    while slots.iter().any(|s| s.is_none()) {
        cancel.check()?;
        try_times += 1;
        for (slot, buf) in slots.iter_mut().zip(buffers.iter_mut()) {
            if slot.is_some() { continue; }
            fill_non_zero_bytes(rng, buf)?;
            let candidate = BigUint::from_bytes_le(buf);
            if is_probably_prime_with(&candidate, rounds, rng)? {
                *slot = Some(candidate);
            }
        }
    }
    crate::rsa_log!("[{}] Done generation in {} tries after {} ms",
        Local::now().format("%H:%M:%S%.3f"), try_times, cancel.elapsed());
    match slots {
        [Some(p), Some(q), Some(e)] => Ok(PrimeTriple { p, q, e }),
        _ => Err(RsaError::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::thread;
    use std::time::Duration;
    use num_bigint::BigUint;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::rsa::errors::RsaError;
    use crate::rsa::primality::is_probably_prime;
    use crate::rsa::prime_gen::{byte_budgets, generate_primes, generate_primes_with, p_byte_len, CancelToken};
    use crate::rsa::random::BrokenRng;

    #[test]
    fn test_byte_budgets() {
        assert_eq!(p_byte_len(32), 3);
        assert_eq!(p_byte_len(64), 5);
        assert_eq!(p_byte_len(1024), 77);
        assert_eq!(byte_budgets(32), (3, 1, 4));
        assert_eq!(byte_budgets(64), (5, 3, 4));
        assert_eq!(byte_budgets(1024), (77, 51, 4));
        assert_eq!(byte_budgets(2048), (154, 102, 4));
    }

    #[test]
    fn gen_prime() -> Result<(), Box<dyn Error>> {
        let mut rng = StdRng::seed_from_u64(64);
        let primes = generate_primes_with(64, 10, &mut rng, &CancelToken::new())?;
        println!("got primes: {:?}", primes);
        assert!(primes.p.bits() <= 40 && primes.p > BigUint::from(1u64 << 32));
        assert!(primes.q.bits() <= 24 && primes.q > BigUint::from(1u64 << 16));
        assert!(primes.e.bits() <= 32 && primes.e > BigUint::from(1u64 << 24));
        assert_ne!(primes.p, primes.q);
        for x in [&primes.p, &primes.q, &primes.e] {
            assert!(is_probably_prime(x, 20)?);
        }
        Ok(())
    }

    #[test]
    fn gen_prime_os_rng() -> Result<(), Box<dyn Error>> {
        let primes = generate_primes(256)?;
        assert!(primes.p.bits() <= 8 * 20);
        assert!(primes.q.bits() <= 8 * 12);
        Ok(())
    }

    #[test]
    fn test_broken_source() {
        assert!(matches!(generate_primes_with(64, 10, &mut BrokenRng, &CancelToken::new()), Err(RsaError::EntropyExhausted(_))));
    }

    #[test]
    fn test_cancel() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(generate_primes_with(1024, 10, &mut rng, &cancel), Err(RsaError::Cancelled));
    }

    #[test]
    fn test_cancel_from_other_thread() {
        let cancel = CancelToken::new();
        let remote = cancel.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.cancel();
        });
        thread::sleep(Duration::from_millis(50));
        assert!(cancel.is_cancelled());
        assert_eq!(cancel.check(), Err(RsaError::Cancelled));
        handle.join().unwrap();
    }

    #[test]
    fn test_timeout() {
        let cancel = CancelToken::with_timeout(1);
        thread::sleep(Duration::from_millis(10));
        match cancel.check() {
            Err(RsaError::Timeout(time)) => assert!(time >= 1),
            other => panic!("unexpected {:?}", other),
        }
        assert!(CancelToken::with_timeout(0).check().is_ok());
    }
}
