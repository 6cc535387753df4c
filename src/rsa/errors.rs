use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io;

pub enum RsaError {
    MalformedKey(String),
    MalformedCiphertext(String),
    MessageTooLong,
    NotInvertible,
    EntropyExhausted(String),
    Timeout(i64),
    Cancelled,
    InvalidBitLength(u32),
    UnknownMode(String),
    SelfTestFailed(usize),
    Io(io::Error),
}

pub type Result<T> = std::result::Result<T, RsaError>;

impl RsaError {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RsaError::MalformedKey(reason) => write!(f, "Malformed key: {}", reason),
            RsaError::MalformedCiphertext(reason) => write!(f, "Malformed ciphertext: {}", reason),
            RsaError::MessageTooLong => write!(f, "Message too long for this key size"),
            RsaError::NotInvertible => write!(f, "Public exponent is not invertible modulo (p-1)(q-1)"),
            RsaError::EntropyExhausted(reason) => write!(f, "Random source failed: {}", reason),
            RsaError::Timeout(time) => write!(f, "Generation timeout after {} ms", time),
            RsaError::Cancelled => write!(f, "Generation cancelled"),
            RsaError::InvalidBitLength(bits) =>
                write!(f, "Invalid key size {}: must be a multiple of 8 and at least 32", bits),
            RsaError::UnknownMode(mode) =>
                write!(f, "Unknown run mode `{}'! available: generate(default), encrypt, decrypt, test", mode),
            RsaError::SelfTestFailed(count) => write!(f, "Self test failed for {} messages", count),
            RsaError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Display for RsaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Debug for RsaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Error for RsaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RsaError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for RsaError {
    fn from(err: io::Error) -> Self {
        RsaError::Io(err)
    }
}

impl PartialEq for RsaError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RsaError::MalformedKey(a), RsaError::MalformedKey(b)) => a == b,
            (RsaError::MalformedCiphertext(a), RsaError::MalformedCiphertext(b)) => a == b,
            (RsaError::MessageTooLong, RsaError::MessageTooLong) => true,
            (RsaError::NotInvertible, RsaError::NotInvertible) => true,
            (RsaError::EntropyExhausted(a), RsaError::EntropyExhausted(b)) => a == b,
            (RsaError::Timeout(a), RsaError::Timeout(b)) => a == b,
            (RsaError::Cancelled, RsaError::Cancelled) => true,
            (RsaError::InvalidBitLength(a), RsaError::InvalidBitLength(b)) => a == b,
            (RsaError::UnknownMode(a), RsaError::UnknownMode(b)) => a == b,
            (RsaError::SelfTestFailed(a), RsaError::SelfTestFailed(b)) => a == b,
            (RsaError::Io(a), RsaError::Io(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}
