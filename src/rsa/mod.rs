// RSA Module - Main module file
// Exports prime generation, key assembly and the textbook cipher

pub mod bigint;
pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod keygen;
pub mod miller_rabin;
pub mod prime;
pub mod random;
pub mod small_primes;

pub use bigint::{mod_inverse, mod_pow, RsaBigInt};
pub use decrypt::{decode_text, decrypt, decrypt_to_string};
pub use encrypt::{encode_text, encrypt, encrypt_str};
pub use error::{Result, RsaError};
pub use keygen::{generate_keypair, KeyGenConfig, KeyMaterial, KeyPairBuilder, RsaPrivateKey, RsaPublicKey};
pub use miller_rabin::{is_probable_prime, MillerRabin, DEFAULT_TRIALS};
pub use prime::{next_prime, PrimeFactory};
pub use random::random_candidate;
pub use small_primes::{passes_trial_division, SmallPrimeTable};
