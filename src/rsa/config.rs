use lazy_static::lazy_static;
use mut_static::MutStatic;
use num_cpus;
use crate::RSA;

lazy_static! {
    pub static ref CONFIG_DEF: RSA = RSA {
        mode: String::from("generate"),
        key: String::from("key"),
        input: String::from("stdin"),
        output: String::from("stdout"),
        bits: 1024,
        rounds: 10,
        time_max: 0,
        silent: false,
        threads: num_cpus::get(),
        retry: true,
        count: 64,
    };
    pub static ref SILENT: MutStatic<bool> =
        MutStatic::new();
}

/// Unset means verbose.
pub fn silent() -> bool {
    SILENT.read().map(|s| *s).unwrap_or(false)
}

#[macro_export]
macro_rules! rsa_log {
    ($($arg: tt)*) => {
        if !$crate::rsa::config::silent() { println!($($arg)*); }
    };
}
