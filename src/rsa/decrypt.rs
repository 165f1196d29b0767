// RSA Decryption Implementation
// Textbook RSA: each ciphertext integer c becomes c^d mod n

use num_traits::ToPrimitive;

use super::bigint::{mod_pow, RsaBigInt};
use super::error::{Result, RsaError};
use super::keygen::RsaPrivateKey;

/// Decrypt a sequence of integers, returning the transformed values in order.
pub fn decrypt(ciphertext: &[RsaBigInt], d: &RsaBigInt, n: &RsaBigInt) -> Result<Vec<RsaBigInt>> {
    if let Some(index) = ciphertext.iter().position(|c| c >= n) {
        return Err(RsaError::MessageOutOfRange { index });
    }
    Ok(ciphertext.iter().map(|c| mod_pow(c, d, n)).collect())
}

/// Map integers back to text, one character each.
pub fn decode_text(values: &[RsaBigInt]) -> Result<String> {
    values
        .iter()
        .map(|v| {
            v.to_u32()
                .and_then(char::from_u32)
                .ok_or_else(|| RsaError::InvalidText(format!("{} is not a character", v)))
        })
        .collect()
}

/// Decrypt ciphertext to a string
pub fn decrypt_to_string(ciphertext: &[RsaBigInt], private_key: &RsaPrivateKey) -> Result<String> {
    let plaintext = decrypt(ciphertext, &private_key.d, &private_key.n)?;
    decode_text(&plaintext)
}
