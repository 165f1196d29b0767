// Miller-Rabin Primality Test
// Probabilistic compositeness test with a tunable number of witness rounds

use num_integer::Integer;
use num_traits::One;
use rand::RngCore;

use super::bigint::{from_u64, mod_pow, RsaBigInt};
use super::error::{Result, RsaError};
use super::random::random_range;

/// Default number of witness rounds. A composite survives all of them with
/// probability at most 4^-20.
pub const DEFAULT_TRIALS: u32 = 20;

/// candidate - 1 = 2^s * d with d odd
#[derive(Debug, Clone, PartialEq, Eq)]
struct Decomposition {
    s: u64,
    d: RsaBigInt,
}

impl Decomposition {
    fn of(candidate: &RsaBigInt) -> Self {
        let mut d = candidate - 1u8;
        let mut s = 0u64;
        while d.is_even() {
            d >>= 1;
            s += 1;
        }
        Decomposition { s, d }
    }
}

/// Miller-Rabin tester holding the number of witness rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MillerRabin {
    trials: u32,
}

impl MillerRabin {
    pub fn new(trials: u32) -> Result<Self> {
        if trials == 0 {
            return Err(RsaError::InvalidConfiguration(
                "Miller-Rabin needs at least one trial".to_string(),
            ));
        }
        Ok(Self { trials })
    }

    pub fn trials(&self) -> u32 {
        self.trials
    }

    /// Test an odd candidate greater than 2.
    ///
    /// Other inputs fail with `PrimalityTestPrecondition`, since n - 1 can
    /// not be decomposed into 2^s * d for them.
    pub fn check<R: RngCore + ?Sized>(&self, candidate: &RsaBigInt, rng: &mut R) -> Result<bool> {
        if candidate <= &from_u64(2) || candidate.is_even() {
            return Err(RsaError::PrimalityTestPrecondition {
                candidate: candidate.clone(),
            });
        }

        // The witness range [2, candidate - 1) is empty for 3.
        if candidate == &from_u64(3) {
            return Ok(true);
        }

        let decomposition = Decomposition::of(candidate);
        let low = from_u64(2);
        let high = candidate - 1u8;

        for _ in 0..self.trials {
            let witness = random_range(rng, &low, &high)?;
            if proves_composite(&witness, &decomposition, candidate) {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Like `check`, but answers directly for 0, 1, 2 and even numbers.
    pub fn is_probable_prime<R: RngCore + ?Sized>(
        &self,
        candidate: &RsaBigInt,
        rng: &mut R,
    ) -> Result<bool> {
        if candidate < &from_u64(2) {
            return Ok(false);
        }
        if candidate.is_even() {
            return Ok(candidate == &from_u64(2));
        }
        self.check(candidate, rng)
    }
}

impl Default for MillerRabin {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
        }
    }
}

/// Test `candidate` with `trials` rounds using the thread-local RNG.
pub fn is_probable_prime(candidate: &RsaBigInt, trials: u32) -> Result<bool> {
    MillerRabin::new(trials)?.is_probable_prime(candidate, &mut rand::thread_rng())
}

/// One witness round: true when `witness` proves `candidate` composite.
fn proves_composite(witness: &RsaBigInt, decomposition: &Decomposition, candidate: &RsaBigInt) -> bool {
    let minus_one = candidate - 1u8;
    let two = from_u64(2);

    let mut x = mod_pow(witness, &decomposition.d, candidate);
    if x.is_one() || x == minus_one {
        return false;
    }

    for _ in 1..decomposition.s {
        x = mod_pow(&x, &two, candidate);
        if x == minus_one {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5EED)
    }

    #[test]
    fn test_decomposition() {
        // 97 - 1 = 2^5 * 3
        let dec = Decomposition::of(&from_u64(97));
        assert_eq!(dec.s, 5);
        assert_eq!(dec.d, from_u64(3));

        // 221 - 1 = 2^2 * 55
        let dec = Decomposition::of(&from_u64(221));
        assert_eq!(dec.s, 2);
        assert_eq!(dec.d, from_u64(55));
    }

    #[test]
    fn test_known_primes() {
        let mut rng = rng();
        for trials in [1, 5, 20] {
            let tester = MillerRabin::new(trials).unwrap();
            for p in [3u64, 5, 7, 13, 97, 7919, 104_729, 2_147_483_647] {
                assert!(tester.check(&from_u64(p), &mut rng).unwrap(), "{} is prime", p);
            }
        }
    }

    #[test]
    fn test_known_composites() {
        let mut rng = rng();
        let tester = MillerRabin::default();
        for _ in 0..200 {
            // includes the Carmichael numbers 561, 1105 and 41041
            for c in [9u64, 15, 221, 561, 1105, 41_041, 999_999_999_999] {
                assert!(!tester.check(&from_u64(c), &mut rng).unwrap(), "{} is composite", c);
            }
        }
    }

    #[test]
    fn test_large_prime() {
        // 2^127 - 1 (Mersenne prime) and 2^128 + 1 (composite)
        let mut rng = rng();
        let tester = MillerRabin::default();
        let m127 = (RsaBigInt::one() << 127u32) - 1u8;
        assert!(tester.check(&m127, &mut rng).unwrap());
        let f7 = (RsaBigInt::one() << 128u32) + 1u8;
        assert!(!tester.check(&f7, &mut rng).unwrap());
    }

    #[test]
    fn test_precondition() {
        let mut rng = rng();
        let tester = MillerRabin::default();
        for n in [0u64, 1, 2, 4, 100] {
            assert!(matches!(
                tester.check(&from_u64(n), &mut rng),
                Err(RsaError::PrimalityTestPrecondition { .. })
            ));
        }
    }

    #[test]
    fn test_unchecked_small_inputs() {
        let mut rng = rng();
        let tester = MillerRabin::default();
        assert!(!tester.is_probable_prime(&from_u64(0), &mut rng).unwrap());
        assert!(!tester.is_probable_prime(&from_u64(1), &mut rng).unwrap());
        assert!(tester.is_probable_prime(&from_u64(2), &mut rng).unwrap());
        assert!(tester.is_probable_prime(&from_u64(3), &mut rng).unwrap());
        assert!(!tester.is_probable_prime(&from_u64(4), &mut rng).unwrap());
    }

    #[test]
    fn test_zero_trials_rejected() {
        assert!(MillerRabin::new(0).is_err());
        assert!(is_probable_prime(&from_u64(13), 0).is_err());
    }

    #[test]
    fn test_thread_rng_helper() {
        assert!(is_probable_prime(&from_u64(13), DEFAULT_TRIALS).unwrap());
        assert!(!is_probable_prime(&from_u64(15), DEFAULT_TRIALS).unwrap());
    }
}
