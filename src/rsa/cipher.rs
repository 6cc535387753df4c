//! Textbook RSA over whole messages: no padding, no chunking.

use num_bigint::BigUint;
use crate::rsa::errors::{Result, RsaError};
use crate::rsa::keys::codec::{integer_bytes, integer_from_bytes};
use crate::rsa::keys::Key;
use crate::rsa::math::fast_modular_exponent;

/// Encrypts `plaintext` with the public key text `(e, n)`.
pub fn encrypt(plaintext: &[u8], public_key: &str) -> Result<String> {
    encrypt_with(plaintext, &Key::from_text(public_key)?)
}

/// Decrypts ciphertext text with the private key text `(d, n)`.
pub fn decrypt(ciphertext: &str, private_key: &str) -> Result<Vec<u8>> {
    decrypt_with(ciphertext, &Key::from_text(private_key)?)
}

/// [`decrypt`], zero-filled back up to the original plaintext length `len`.
/// Zero bytes at the end of a plaintext are its most significant and do not survive [`decrypt`].
pub fn decrypt_exact(ciphertext: &str, private_key: &str, len: usize) -> Result<Vec<u8>> {
    let mut plaintext = decrypt(ciphertext, private_key)?;
    if plaintext.len() > len {
        return Err(RsaError::MalformedCiphertext(format!(
            "recovered {} bytes, expected at most {}", plaintext.len(), len)));
    }
    plaintext.resize(len, 0);
    Ok(plaintext)
}

pub fn encrypt_with(plaintext: &[u8], key: &Key) -> Result<String> {
    let m = integer_from_bytes(plaintext);
    let c = encrypt_integer(&m, key)?;
    Ok(base64::encode(integer_bytes(&c)))
}

pub fn decrypt_with(ciphertext: &str, key: &Key) -> Result<Vec<u8>> {
    let bytes = base64::decode(ciphertext.trim())
        .map_err(|e| RsaError::MalformedCiphertext(format!("invalid base64: {}", e)))?;
    let c = integer_from_bytes(&bytes);
    let m = decrypt_integer(&c, key)?;
    Ok(message_bytes(&m))
}

/// `m^e mod n`, refusing `m >= n` since such a message cannot come back.
pub fn encrypt_integer(m: &BigUint, key: &Key) -> Result<BigUint> {
    check_key(key)?;
    if m >= &key.modulus {
        return Err(RsaError::MessageTooLong);
    }
    Ok(fast_modular_exponent(m, &key.value, &key.modulus))
}

/// `c^d mod n`
pub fn decrypt_integer(c: &BigUint, key: &Key) -> Result<BigUint> {
    check_key(key)?;
    if c >= &key.modulus {
        return Err(RsaError::MalformedCiphertext("ciphertext is not below the modulus".to_string()));
    }
    Ok(fast_modular_exponent(c, &key.value, &key.modulus))
}

/// Largest plaintext length, in bytes, that always fits below the modulus of `key`.
pub fn max_message_len(key: &Key) -> usize {
    (key.modulus.bits().saturating_sub(1) / 8) as usize
}

fn check_key(key: &Key) -> Result<()> {
    if key.is_usable() { Ok(()) } else { Err(RsaError::MalformedKey("zero exponent or modulus".to_string())) }
}

/// Minimal unsigned little-endian bytes; the zero message is empty.
fn message_bytes(m: &BigUint) -> Vec<u8> {
    let mut bytes = m.to_bytes_le();
    while bytes.last() == Some(&0) {
        bytes.pop();
    }
    bytes
}
