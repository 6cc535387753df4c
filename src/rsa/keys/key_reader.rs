use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use crate::rsa::errors::{Result, RsaError};
use crate::rsa::keys::key_data::{KeyData, KeyMode};
use crate::rsa::keys::Key;

/// Collects key text from armored files, or from bare one-line key text.
pub struct KeyReader {
    pub header: String,
    pub footer: String,
    text: String,
}

impl KeyReader {
    pub fn new(reader: Box<dyn Read>) -> Result<Self> {
        let mut s = Self { header: "".to_string(), footer: "".to_string(), text: "".to_string() };
        for line in BufReader::new(reader).lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() { continue; }
            if line.starts_with('-') {
                if line.contains("END") {
                    s.footer = line.to_string();
                } else {
                    s.header = line.to_string();
                }
            } else {
                s.text.push_str(line);
            }
        }
        if s.text.is_empty() {
            return Err(RsaError::MalformedKey("no key text found".to_string()));
        }
        Ok(s)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// `(mode, bits)` from a `-----BEGIN RSA-<bits> <MODE> KEY-----` header, if any.
    pub fn header_info(&self) -> Option<(KeyMode, u32)> {
        let inner = self.header.trim_matches('-').strip_prefix("BEGIN RSA-")?;
        let mut parts = inner.split_whitespace();
        let bits = parts.next()?.parse::<u32>().ok()?;
        let mode = match parts.next()? {
            "PUBLIC" => KeyMode::Public,
            "PRIVATE" => KeyMode::Private,
            _ => return None,
        };
        Some((mode, bits))
    }

    pub fn into_key_data(self, fallback_mode: KeyMode) -> Result<KeyData> {
        let key = Key::from_text(&self.text)?;
        let (mode, bits) = self.header_info().unwrap_or_else(|| {
            let bits = ((key.modulus.bits() + 7) / 8 * 8) as u32;
            (fallback_mode, bits)
        });
        Ok(KeyData { mode, key, bits })
    }
}

impl KeyData {
    /// Headerless files ending in `.pub` are taken as public keys.
    pub fn load(path: &str) -> Result<Self> {
        let fallback = if path.ends_with(".pub") { KeyMode::Public } else { KeyMode::Private };
        KeyReader::new(Box::new(File::open(path)?))?.into_key_data(fallback)
    }
}
