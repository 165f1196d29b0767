//! Probable-prime generation and textbook RSA.
//!
//! Candidates are drawn at a requested bit length, filtered by trial
//! division against a table of small primes and confirmed with Miller-Rabin.
//! Three such primes become p, q and the public exponent e of a key pair.
//! Encryption is raw modular exponentiation with no padding.

pub mod cli;
pub mod rsa;
pub mod util;
