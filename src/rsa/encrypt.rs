// RSA Encryption Implementation
// Textbook RSA: each plaintext integer m becomes m^e mod n

use super::bigint::{mod_pow, RsaBigInt};
use super::error::{Result, RsaError};
use super::keygen::RsaPublicKey;

/// Encrypt a sequence of integers, preserving order and length.
///
/// Every element must lie in [0, n); a larger value could not be recovered
/// and fails with `MessageOutOfRange`.
pub fn encrypt(message: &[RsaBigInt], e: &RsaBigInt, n: &RsaBigInt) -> Result<Vec<RsaBigInt>> {
    if let Some(index) = message.iter().position(|m| m >= n) {
        return Err(RsaError::MessageOutOfRange { index });
    }
    Ok(message.iter().map(|m| mod_pow(m, e, n)).collect())
}

/// Map text to one integer per character (its Unicode scalar value).
pub fn encode_text(text: &str) -> Vec<RsaBigInt> {
    text.chars().map(|c| RsaBigInt::from(u32::from(c))).collect()
}

/// Encrypt a string character by character using RSA public key
pub fn encrypt_str(plaintext: &str, public_key: &RsaPublicKey) -> Result<Vec<RsaBigInt>> {
    encrypt(&encode_text(plaintext), &public_key.e, &public_key.n)
}
