use std::fs::File;
use std::io::{self, Write};
use crate::rsa::errors::Result;
use crate::rsa::keys::key_data::KeyData;
use crate::rsa::keys::BASE64_SPLIT;

/// Buffers key text and writes it armored: header, lines of [`BASE64_SPLIT`] characters, footer.
pub struct KeyWriter {
    writer: Box<dyn Write>,
    buffer: Vec<u8>,
    pub header: String,
    pub footer: String,
}

impl KeyWriter {
    pub fn new(f: Box<dyn Write>) -> Self {
        KeyWriter {
            writer: f,
            buffer: vec![],
            header: "".to_string(),
            footer: "".to_string(),
        }
    }
}

impl Write for KeyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.header.is_empty() {
            self.writer.write_all(self.header.as_bytes())?;
            self.writer.write_all(b"\n")?;
        }
        for line in self.buffer.chunks(BASE64_SPLIT) {
            self.writer.write_all(line)?;
            self.writer.write_all(b"\n")?;
        }
        if !self.footer.is_empty() {
            self.writer.write_all(self.footer.as_bytes())?;
            self.writer.write_all(b"\n")?;
        }
        self.buffer.clear();
        self.writer.flush()
    }
}

impl KeyData {
    pub fn write_to(&self, writer: Box<dyn Write>) -> Result<()> {
        let mut key_writer = KeyWriter::new(writer);
        key_writer.header = self.header();
        key_writer.footer = self.footer();
        key_writer.write_all(self.text().as_bytes())?;
        key_writer.flush()?;
        Ok(())
    }

    pub fn save(&self, path: &str) -> Result<()> {
        self.write_to(Box::new(File::create(path)?))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use num_bigint::BigUint;
    use num_traits::One;
    use crate::rsa::keys::{Key, KeyData, KeyWriter};

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
    }

    #[test]
    fn test_split_lines() -> Result<(), Box<dyn Error>> {
        let out = Shared::default();
        let mut writer = KeyWriter::new(Box::new(out.clone()));
        writer.header = "-----BEGIN-----".to_string();
        writer.footer = "-----END-----".to_string();
        writer.write_all(&[b'A'; 150])?;
        writer.flush()?;
        let text = String::from_utf8(out.0.lock().unwrap().clone())?;
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1].len(), 70);
        assert_eq!(lines[2].len(), 70);
        assert_eq!(lines[3].len(), 10);
        assert_eq!(lines[4], "-----END-----");
        Ok(())
    }

    #[test]
    fn test_write_key() -> Result<(), Box<dyn Error>> {
        let out = Shared::default();
        let key = Key::new(BigUint::from(65537u32), (BigUint::one() << 1023u32) + 1u32);
        KeyData::new_public(key.clone(), 1024).write_to(Box::new(out.clone()))?;
        let text = String::from_utf8(out.0.lock().unwrap().clone())?;
        assert!(text.starts_with("-----BEGIN RSA-1024 PUBLIC KEY-----\n"));
        assert!(text.ends_with("-----END RSA-1024 PUBLIC KEY-----\n"));
        let body = text.lines().filter(|l| !l.starts_with('-')).collect::<String>();
        assert_eq!(body, key.encode());
        Ok(())
    }
}
