// Prime Factory
// Draws candidates until one survives trial division and Miller-Rabin

use log::{debug, trace};
use rand::RngCore;

use super::bigint::RsaBigInt;
use super::error::{Result, RsaError};
use super::miller_rabin::MillerRabin;
use super::random::random_candidate;
use super::small_primes::SmallPrimeTable;

/// Generates probable primes of a requested bit length.
///
/// The search is unbounded unless `max_attempts` is set, in which case it
/// gives up with `AttemptsExhausted` after that many candidates.
#[derive(Debug, Clone)]
pub struct PrimeFactory<'a> {
    table: &'a SmallPrimeTable,
    tester: MillerRabin,
    max_attempts: Option<u64>,
}

impl<'a> PrimeFactory<'a> {
    pub fn new(table: &'a SmallPrimeTable, tester: MillerRabin) -> Self {
        Self {
            table,
            tester,
            max_attempts: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u64>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn tester(&self) -> &MillerRabin {
        &self.tester
    }

    pub fn table(&self) -> &SmallPrimeTable {
        self.table
    }

    /// Generate one probable prime P with 2^(L-1) < P < 2^L.
    pub fn next_prime<R: RngCore + ?Sized>(&self, bit_length: u64, rng: &mut R) -> Result<RsaBigInt> {
        if bit_length < 2 {
            return Err(RsaError::InvalidConfiguration(format!(
                "bit length must be at least 2, got {}",
                bit_length
            )));
        }
        if self.max_attempts == Some(0) {
            return Err(RsaError::InvalidConfiguration(
                "max attempts must be positive".to_string(),
            ));
        }

        let mut attempts = 0u64;
        loop {
            if let Some(max) = self.max_attempts {
                if attempts >= max {
                    return Err(RsaError::AttemptsExhausted { attempts });
                }
            }
            attempts += 1;

            let candidate = random_candidate(rng, bit_length)?;

            if !self.table.passes(&candidate) {
                trace!("candidate #{} rejected by trial division", attempts);
                continue;
            }
            if !self.tester.check(&candidate, rng)? {
                trace!("candidate #{} rejected by Miller-Rabin", attempts);
                continue;
            }

            debug!("found {}-bit probable prime after {} attempts", bit_length, attempts);
            return Ok(candidate);
        }
    }
}

/// Generate one probable prime of `bit_length` bits with the default tester.
pub fn next_prime<R: RngCore + ?Sized>(
    bit_length: u64,
    small_primes: &SmallPrimeTable,
    rng: &mut R,
) -> Result<RsaBigInt> {
    PrimeFactory::new(small_primes, MillerRabin::default()).next_prime(bit_length, rng)
}
