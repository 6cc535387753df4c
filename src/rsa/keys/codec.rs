//! Key text: `[u32 BE len(value)] [value] [u32 BE len(modulus)] [modulus]`, base64.

use std::io::{Cursor, Read};
use num_bigint::BigUint;
use crate::rsa::errors::{Result, RsaError};
use crate::rsa::keys::Key;

const LEN_BYTES: usize = 4;

/// Minimal signed little-endian bytes of a non-negative integer; zero is `[0x00]`.
pub fn integer_bytes(x: &BigUint) -> Vec<u8> {
    let mut bytes = x.to_bytes_le();
    if bytes.last().map_or(false, |b| b & 0x80 != 0) {
        bytes.push(0);
    }
    bytes
}

/// Reads bytes from [`integer_bytes`] (or any unsigned little-endian string) back.
pub fn integer_from_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_le(bytes)
}

pub fn encode_bytes(value: &BigUint, modulus: &BigUint) -> Vec<u8> {
    let (value, modulus) = (integer_bytes(value), integer_bytes(modulus));
    let mut buf = Vec::with_capacity(2 * LEN_BYTES + value.len() + modulus.len());
    buf.extend_from_slice(&(value.len() as u32).to_be_bytes());
    buf.extend_from_slice(&value);
    buf.extend_from_slice(&(modulus.len() as u32).to_be_bytes());
    buf.extend_from_slice(&modulus);
    buf
}

pub fn encode(value: &BigUint, modulus: &BigUint) -> String {
    base64::encode(encode_bytes(value, modulus))
}

pub fn decode_bytes(buf: &[u8]) -> Result<(BigUint, BigUint)> {
    let mut cur = Cursor::new(buf);
    let value = read_field(&mut cur, "value")?;
    let modulus = read_field(&mut cur, "modulus")?;
    if cur.position() as usize != buf.len() {
        return Err(RsaError::MalformedKey(format!(
            "{} trailing bytes after modulus", buf.len() - cur.position() as usize)));
    }
    Ok((value, modulus))
}

pub fn decode(text: &str) -> Result<(BigUint, BigUint)> {
    let buf = base64::decode(text).map_err(|e| RsaError::MalformedKey(format!("invalid base64: {}", e)))?;
    decode_bytes(&buf)
}

fn read_field(cur: &mut Cursor<&[u8]>, name: &str) -> Result<BigUint> {
    let mut len = [0u8; LEN_BYTES];
    cur.read_exact(&mut len)
        .map_err(|_| RsaError::MalformedKey(format!("missing length of {}", name)))?;
    let len = u32::from_be_bytes(len) as usize;
    let remaining = cur.get_ref().len() - cur.position() as usize;
    if len > remaining {
        return Err(RsaError::MalformedKey(format!(
            "{} declares {} bytes, only {} left", name, len, remaining)));
    }
    let mut data = vec![0u8; len];
    cur.read_exact(&mut data)
        .map_err(|_| RsaError::MalformedKey(format!("truncated {}", name)))?;
    Ok(integer_from_bytes(&data))
}

impl Key {
    /// Key text for storage or transmission.
    pub fn encode(&self) -> String {
        encode(&self.value, &self.modulus)
    }

    pub fn decode(text: &str) -> Result<Key> {
        let (value, modulus) = decode(text)?;
        Ok(Key { value, modulus })
    }

    /// Like [`Key::decode`], additionally rejecting keys with a zero exponent or modulus.
    pub fn from_text(text: &str) -> Result<Key> {
        let key = Key::decode(text.trim())?;
        if !key.is_usable() {
            return Err(RsaError::MalformedKey("zero exponent or modulus".to_string()));
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use num_bigint::BigUint;
    use num_traits::One;
    use crate::rsa::errors::RsaError;
    use crate::rsa::keys::codec::{decode, decode_bytes, encode, encode_bytes, integer_bytes};
    use crate::rsa::keys::Key;

    #[test]
    fn test_integer_bytes() {
        assert_eq!(integer_bytes(&BigUint::from(0u32)), vec![0x00]);
        assert_eq!(integer_bytes(&BigUint::from(127u32)), vec![0x7f]);
        assert_eq!(integer_bytes(&BigUint::from(128u32)), vec![0x80, 0x00]);
        assert_eq!(integer_bytes(&BigUint::from(255u32)), vec![0xff, 0x00]);
        assert_eq!(integer_bytes(&BigUint::from(256u32)), vec![0x00, 0x01]);
        assert_eq!(integer_bytes(&BigUint::from(65537u32)), vec![0x01, 0x00, 0x01]);
    }

    #[test]
    fn test_layout() {
        let (value, modulus) = (BigUint::from(255u32), BigUint::from(256u32));
        assert_eq!(encode_bytes(&value, &modulus),
                   vec![0, 0, 0, 2, 0xff, 0x00, 0, 0, 0, 2, 0x00, 0x01]);
        assert_eq!(encode(&value, &modulus), "AAAAAv8AAAAAAgAB");
        assert_eq!(encode(&BigUint::from(0u32), &BigUint::from(0u32)), "AAAAAQAAAAABAA==");
        assert_eq!(Key::new(BigUint::from(17u32), BigUint::from(3233u32)).encode(), "AAAAAREAAAACoQw=");
        assert_eq!(Key::new(BigUint::from(2753u32), BigUint::from(3233u32)).encode(), "AAAAAsEKAAAAAqEM");
    }

    #[test]
    fn test_round_trip() -> Result<(), Box<dyn Error>> {
        let big = (BigUint::one() << 1023u32) + 12345u32;
        let values = [
            BigUint::from(0u32), BigUint::from(1u32), BigUint::from(127u32), BigUint::from(128u32),
            BigUint::from(255u32), BigUint::from(256u32), BigUint::from(65535u32), BigUint::from(65536u32),
            BigUint::from(u64::MAX), big.clone(), big - 1u32,
        ];
        for value in &values {
            for modulus in &values {
                let text = encode(value, modulus);
                assert_eq!(decode(&text)?, (value.clone(), modulus.clone()));
            }
        }
        Ok(())
    }

    #[test]
    fn test_decode_foreign_layout() -> Result<(), Box<dyn Error>> {
        // 65537 and 2^64 + 13, as written by the message client
        let key = Key::decode("AAAAAwEAAQAAAAkNAAAAAAAAAAE=")?;
        assert_eq!(key.value, BigUint::from(65537u32));
        assert_eq!(key.modulus, (BigUint::one() << 64u32) + 13u32);
        // an unsigned encoder without the sign byte still reads as non-negative
        assert_eq!(decode_bytes(&[0, 0, 0, 1, 0xff, 0, 0, 0, 1, 0x80])?,
                   (BigUint::from(255u32), BigUint::from(128u32)));
        Ok(())
    }

    fn malformed<T: std::fmt::Debug>(res: Result<T, RsaError>) -> bool {
        matches!(res, Err(RsaError::MalformedKey(_)))
    }

    #[test]
    fn test_malformed() {
        assert!(malformed(decode("not base64!")));
        assert!(malformed(decode("")));
        assert!(malformed(decode_bytes(&[0, 0])));
        // value claims 9 bytes, only 4 follow
        assert!(malformed(decode_bytes(&[0, 0, 0, 9, 1, 2, 3, 4])));
        // modulus length prefix missing
        assert!(malformed(decode_bytes(&[0, 0, 0, 1, 7])));
        // modulus claims more than is left
        assert!(malformed(decode_bytes(&[0, 0, 0, 1, 7, 0, 0, 0, 3, 1, 2])));
        // one byte too many
        assert!(malformed(decode_bytes(&[0, 0, 0, 1, 7, 0, 0, 0, 1, 9, 0])));
        // a huge declared length must not allocate
        assert!(malformed(decode_bytes(&[0xff, 0xff, 0xff, 0xff, 1])));
    }

    #[test]
    fn test_from_text() {
        assert!(Key::from_text("AAAAAREAAAACoQw=\n").is_ok());
        match Key::from_text("AAAAAQAAAAABAA==") {
            Err(RsaError::MalformedKey(reason)) => assert!(reason.contains("zero")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
