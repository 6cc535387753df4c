use std::fmt::{Display, Formatter};
use crate::rsa::keys::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    Public,
    Private,
}

impl Display for KeyMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyMode::Public => write!(f, "PUBLIC"),
            KeyMode::Private => write!(f, "PRIVATE"),
        }
    }
}

/// One half of a key pair as it is stored: the key, which half it is, and the key size.
#[derive(Debug, Clone)]
pub struct KeyData {
    pub mode: KeyMode,
    pub key: Key,
    pub bits: u32,
}

impl PartialEq for KeyData {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode && self.key == other.key
    }
}

impl KeyData {
    pub fn new_public(key: Key, bits: u32) -> Self {
        Self { mode: KeyMode::Public, key, bits }
    }

    pub fn new_private(key: Key, bits: u32) -> Self {
        Self { mode: KeyMode::Private, key, bits }
    }

    /// Key text, ready to persist or send.
    pub fn text(&self) -> String {
        self.key.encode()
    }

    pub fn header(&self) -> String {
        format!("-----BEGIN RSA-{} {} KEY-----", self.bits, self.mode)
    }

    pub fn footer(&self) -> String {
        format!("-----END RSA-{} {} KEY-----", self.bits, self.mode)
    }

    pub fn info(&self) {
        crate::rsa_log!("{} key, {} bits, modulus {} bits", self.mode, self.bits, self.key.modulus.bits());
    }
}
