use std::fs::File;
use std::{io, thread};
use std::io::{Read, Write};
use clap::Parser;
use crossbeam_channel::{bounded, Receiver, Sender};
use indicatif::{ProgressBar, ProgressStyle};
use num_bigint::RandBigInt;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

pub mod cipher;
pub mod config;
pub mod errors;
pub mod keys;
pub mod math;
pub mod primality;
pub mod prime_gen;
pub mod random;

use cipher::*;
use errors::*;
use keys::*;
use prime_gen::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Generate,
    Encrypt,
    Decrypt,
    Test,
}

#[macro_export]
macro_rules! rsa_t {
    ($CONFIG: expr, $NAME: ident) => {
#[derive(Debug, Clone, Parser)]
pub struct $NAME {
    #[clap(short, long, value_parser, default_value = $CONFIG.mode.as_str(), help = "Run mode: generate, encrypt, decrypt, test")]
    pub mode: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.key.as_str(), help = "Key path, generate/detect `path' and `path.pub'")]
    pub key: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.input.as_str(), help = "Input filename")]
    pub input: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.output.as_str(), help = "Output filename")]
    pub output: String,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.bits, help = "Key size in bits, a multiple of 8 and at least 32")]
    pub bits: u32,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.rounds, help = "Miller Rabin witnesses per candidate")]
    pub rounds: u32,
    #[clap(long, value_parser, default_value_t = $CONFIG.time_max, help = "Max time in mill seconds for one key generation attempt, 0 for no limit")]
    pub time_max: i64,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.silent, help = "Disable log output")]
    pub silent: bool,
    #[clap(long, value_parser, default_value_t = $CONFIG.retry, help = "Retry when a key generation attempt times out or draws a non-invertible exponent")]
    pub retry: bool,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.threads, help = "Run the self test in <THREADS> threads")]
    pub threads: usize,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.count, help = "Messages to round trip in test mode")]
    pub count: usize,
}
    };
}

rsa_t!(CONFIG_DEF, RSA);

pub use config::{CONFIG_DEF, SILENT};

/// Rejects key sizes the prime generator does not accept.
pub fn check_bits(bits: u32) -> Result<u32> {
    if bits % 8 == 0 && bits >= 32 { Ok(bits) } else { Err(RsaError::InvalidBitLength(bits)) }
}

impl RSA {
    pub fn reader(&self) -> Result<Box<dyn Read>> {
        Ok(match self.input.as_str() {
            "stdin" => Box::new(io::stdin()),
            f => Box::new(File::open(f)?)
        })
    }

    pub fn writer(&mut self) -> Result<Box<dyn Write>> {
        Ok(match self.output.as_str() {
            "stdout" => {
                self.silent = true;
                Box::new(io::stdout())
            }
            f => Box::new(File::create(f)?)
        })
    }

    pub fn run_mode(&self) -> Result<RunMode> {
        match self.mode.as_str() {
            "generate" => Ok(RunMode::Generate),
            "encrypt" => Ok(RunMode::Encrypt),
            "decrypt" => Ok(RunMode::Decrypt),
            "test" => Ok(RunMode::Test),
            m => Err(RsaError::UnknownMode(m.to_string()))
        }
    }

    pub fn generate_key(&self) -> Result<KeyPair> {
        let time_max = self.time_max;
        self.generate_key_with(&mut OsRng, || CancelToken::with_timeout(time_max))
    }

    /// Key generation with the retry policy of `--retry`: timed out attempts and
    /// exponents without an inverse start over, everything else is returned.
    /// Each attempt runs under a fresh token from `next_token`.
    pub fn generate_key_with<R, F>(&self, rng: &mut R, mut next_token: F) -> Result<KeyPair>
        where R: RngCore + CryptoRng + ?Sized, F: FnMut() -> CancelToken {
        let bits = check_bits(self.bits)?;
        loop {
            let cancel = next_token();
            match generate_key_pair_with(bits, self.rounds, &mut *rng, &cancel) {
                Err(e @ (RsaError::Timeout(_) | RsaError::NotInvertible)) if self.retry => {
                    crate::rsa_log!("{}, retrying", e);
                }
                res => return res,
            }
        }
    }

    /// Round trips `count` random messages below `n` through the text API on `threads` workers.
    pub fn self_test(key_pair: &KeyPair, count: usize, threads: usize, silent: bool) -> Result<()> {
        if key_pair.public.key.modulus != key_pair.private.key.modulus {
            return Err(RsaError::MalformedKey("public and private modulus differ".to_string()));
        }
        let threads = threads.max(1);
        let mut rng = OsRng;
        let n = &key_pair.public.key.modulus;
        let messages = (0..count).map(|_| {
            let mut m = rng.gen_biguint_below(n).to_bytes_le();
            while m.last() == Some(&0) { m.pop(); }
            m
        }).collect::<Vec<_>>();
        let (map_tx, map_rx): (Sender<(usize, Vec<u8>)>, Receiver<(usize, Vec<u8>)>) = bounded(threads);
        let (reduce_tx, reduce_rx) = bounded::<(usize, bool)>(threads);
        let pb = match silent {
            true => None,
            false => Some(ProgressBar::new(count as u64)),
        };
        if let Some(pb) = &pb {
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})") {
                pb.set_style(style.progress_chars("#>-"));
            }
        }
        let handles = (0..threads).map(|_i| {
            let r = map_rx.clone();
            let s = reduce_tx.clone();
            let (public, private) = (key_pair.public.text(), key_pair.private.text());
            thread::spawn(move || {
                while let Ok((index, message)) = r.recv() {
                    let ok = encrypt(&message, &public)
                        .and_then(|c| decrypt(&c, &private))
                        .map_or(false, |m| m == message);
                    if s.send((index, ok)).is_err() { break; }
                }
            })
        }).collect::<Vec<_>>();
        drop(map_rx);
        drop(reduce_tx);
        let collector = thread::spawn(move || {
            let mut failed = Vec::new();
            for (index, ok) in reduce_rx.iter() {
                if !ok { failed.push(index); }
                if let Some(pb) = &pb { pb.inc(1); }
            }
            if let Some(pb) = &pb { pb.finish_with_message("Done"); }
            failed
        });
        for (index, message) in messages.into_iter().enumerate() {
            if map_tx.send((index, message)).is_err() { break; }
        }
        drop(map_tx);
        for handle in handles {
            if handle.join().is_err() { return Err(RsaError::SelfTestFailed(count)); }
        }
        let failed = collector.join().map_err(|_| RsaError::SelfTestFailed(count))?;
        if failed.is_empty() {
            crate::rsa_log!("Test pass: {} messages", count);
            Ok(())
        } else {
            crate::rsa_log!("failed messages: {:?}", failed);
            Err(RsaError::SelfTestFailed(failed.len()))
        }
    }

    pub fn run(&mut self) -> Result<()> {
        match self.run_mode()? {
            RunMode::Generate => {
                let key_pair = self.generate_key()?;
                key_pair.public.info();
                key_pair.private.info();
                key_pair.save(&self.key)?;
                crate::rsa_log!("Generated key files: {}, {}", self.key, public_path(&self.key));
            }
            RunMode::Encrypt => {
                let key = KeyData::load(&public_path(&self.key))?;
                let mut plaintext = Vec::new();
                self.reader()?.read_to_end(&mut plaintext)?;
                let ciphertext = encrypt_with(&plaintext, &key.key)?;
                let mut writer = self.writer()?;
                writer.write_all(ciphertext.as_bytes())?;
                writer.write_all(b"\n")?;
                writer.flush()?;
            }
            RunMode::Decrypt => {
                let key = KeyData::load(&self.key)?;
                let mut ciphertext = String::new();
                self.reader()?.read_to_string(&mut ciphertext)?;
                let plaintext = decrypt_with(&ciphertext, &key.key)?;
                let mut writer = self.writer()?;
                writer.write_all(&plaintext)?;
                writer.flush()?;
            }
            RunMode::Test => {
                let key_pair = KeyPair::load(&self.key)?;
                key_pair.public.info();
                key_pair.private.info();
                RSA::self_test(&key_pair, self.count, self.threads, self.silent)?;
            }
        }
        Ok(())
    }
}
