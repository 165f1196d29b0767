// RSA Errors
// Failure modes of prime generation, key assembly and the cipher

use super::bigint::RsaBigInt;

/// Errors that can occur while generating keys or running the cipher.
///
/// Rejected prime candidates are not errors; they are retried inside
/// the generation loops.
#[derive(Debug, thiserror::Error)]
pub enum RsaError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Randomness source unavailable: {0}")]
    RandomnessUnavailable(#[from] rand::Error),

    #[error("Miller-Rabin requires an odd candidate greater than 2, got {candidate}")]
    PrimalityTestPrecondition { candidate: RsaBigInt },

    #[error("No probable prime found after {attempts} attempts")]
    AttemptsExhausted { attempts: u64 },

    #[error("Message element at index {index} is not smaller than the modulus")]
    MessageOutOfRange { index: usize },

    #[error("Exponent has no inverse modulo the totient")]
    NoModularInverse,

    #[error("Invalid text: {0}")]
    InvalidText(String),
}

pub type Result<T> = std::result::Result<T, RsaError>;
