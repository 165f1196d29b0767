// Small Prime Table and Trial Division
// Cheap pre-filter run before Miller-Rabin

use num_traits::Zero;

use super::bigint::RsaBigInt;
use super::error::{Result, RsaError};

/// Bound of the default table: every prime below 1000 (168 entries)
const DEFAULT_TABLE_LIMIT: u64 = 1000;

/// Ascending, non-empty sequence of small primes used for fast rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmallPrimeTable {
    primes: Vec<u64>,
}

impl SmallPrimeTable {
    /// Wrap an externally supplied list, checking that it is non-empty,
    /// strictly ascending and prime-valued.
    pub fn new(primes: Vec<u64>) -> Result<Self> {
        if primes.is_empty() {
            return Err(RsaError::InvalidConfiguration(
                "small prime table is empty".to_string(),
            ));
        }
        if let Some(pair) = primes.windows(2).find(|w| w[0] >= w[1]) {
            return Err(RsaError::InvalidConfiguration(format!(
                "small prime table is not ascending: {} followed by {}",
                pair[0], pair[1]
            )));
        }
        if let Some(bad) = primes.iter().find(|&&p| !is_small_prime(p)) {
            return Err(RsaError::InvalidConfiguration(format!(
                "small prime table contains non-prime {}",
                bad
            )));
        }

        Ok(Self { primes })
    }

    /// The first `count` primes, computed with a sieve of Eratosthenes.
    pub fn first(count: usize) -> Result<Self> {
        if count == 0 {
            return Err(RsaError::InvalidConfiguration(
                "small prime table must hold at least one prime".to_string(),
            ));
        }

        // Grow the sieve bound until it holds enough primes.
        let mut limit = (count as u64).max(16) * 16;
        loop {
            let mut primes = sieve(limit);
            if primes.len() >= count {
                primes.truncate(count);
                return Ok(Self { primes });
            }
            limit *= 2;
        }
    }

    /// Every prime strictly below `limit`.
    pub fn below(limit: u64) -> Result<Self> {
        let primes = sieve(limit);
        if primes.is_empty() {
            return Err(RsaError::InvalidConfiguration(format!(
                "no primes below {}",
                limit
            )));
        }
        Ok(Self { primes })
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.primes
    }

    pub fn len(&self) -> usize {
        self.primes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }

    /// Largest prime in the table
    pub fn largest(&self) -> u64 {
        // non-empty by construction
        self.primes[self.primes.len() - 1]
    }

    /// Run the trial-division filter against this table.
    pub fn passes(&self, candidate: &RsaBigInt) -> bool {
        passes_trial_division(candidate, &self.primes)
    }
}

impl Default for SmallPrimeTable {
    fn default() -> Self {
        Self {
            primes: sieve(DEFAULT_TABLE_LIMIT),
        }
    }
}

/// Trial division filter.
///
/// Walks the ascending divisors and rejects the candidate as soon as one
/// with d² <= candidate divides it. The first divisor with d² > candidate
/// ends the walk with a pass, as does running out of divisors. Passing is
/// not a proof of primality.
pub fn passes_trial_division(candidate: &RsaBigInt, small_primes: &[u64]) -> bool {
    for &divisor in small_primes {
        let square = RsaBigInt::from(divisor as u128 * divisor as u128);
        if &square > candidate {
            return true;
        }
        if (candidate % divisor).is_zero() {
            return false;
        }
    }
    true
}

/// Sieve of Eratosthenes returning every prime below `limit`.
fn sieve(limit: u64) -> Vec<u64> {
    if limit < 3 {
        return Vec::new();
    }

    let size = limit as usize;
    let mut composite = vec![false; size];
    let mut primes = Vec::new();

    for n in 2..size {
        if composite[n] {
            continue;
        }
        primes.push(n as u64);
        let mut multiple = n * n;
        while multiple < size {
            composite[multiple] = true;
            multiple += n;
        }
    }

    primes
}

/// Deterministic primality check for table validation.
fn is_small_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3u64;
    while d.saturating_mul(d) <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}
