// RSA Key Generation
// Assembles p, q, e and the private exponent d from generated probable primes

use log::{debug, trace, warn};
use num_traits::One;
use rand::rngs::OsRng;
use rand::RngCore;

use super::bigint::{gcd, mod_inverse, RsaBigInt};
use super::error::{Result, RsaError};
use super::miller_rabin::{MillerRabin, DEFAULT_TRIALS};
use super::prime::PrimeFactory;
use super::small_primes::SmallPrimeTable;

/// Bit lengths below this draw a warning when a key pair is built.
const WEAK_BIT_LENGTH: u64 = 1024;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: RsaBigInt, // Modulus
    pub e: RsaBigInt, // Public exponent
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub n: RsaBigInt, // Modulus (same as public)
    pub d: RsaBigInt, // Private exponent
}

impl RsaPublicKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Encrypt a sequence of integers, each smaller than n
    pub fn encrypt(&self, message: &[RsaBigInt]) -> Result<Vec<RsaBigInt>> {
        super::encrypt::encrypt(message, &self.e, &self.n)
    }
}

impl RsaPrivateKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Decrypt a sequence of ciphertext integers
    pub fn decrypt(&self, ciphertext: &[RsaBigInt]) -> Result<Vec<RsaBigInt>> {
        super::decrypt::decrypt(ciphertext, &self.d, &self.n)
    }
}

/// Complete key material. Immutable once built; e * d ≡ 1 (mod totient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    p: RsaBigInt,
    q: RsaBigInt,
    n: RsaBigInt,
    totient: RsaBigInt,
    e: RsaBigInt,
    d: RsaBigInt,
}

impl KeyMaterial {
    /// Derive n, the totient and d from two primes and a public exponent.
    ///
    /// The primes are taken as given. Fails with `NoModularInverse` when
    /// gcd(e, totient) != 1.
    pub fn from_parts(p: RsaBigInt, q: RsaBigInt, e: RsaBigInt) -> Result<Self> {
        if p <= RsaBigInt::one() || q <= RsaBigInt::one() {
            return Err(RsaError::InvalidConfiguration(
                "primes must be greater than 1".to_string(),
            ));
        }

        let totient = totient(&p, &q);
        if e <= RsaBigInt::one() || e >= totient {
            return Err(RsaError::InvalidConfiguration(format!(
                "public exponent must lie in (1, {})",
                totient
            )));
        }
        if !gcd(&e, &totient).is_one() {
            return Err(RsaError::NoModularInverse);
        }

        Ok(Self::assemble(p, q, totient, e))
    }

    /// Combine parts whose exponent is already known to be invertible.
    fn assemble(p: RsaBigInt, q: RsaBigInt, totient: RsaBigInt, e: RsaBigInt) -> Self {
        // gcd(e, totient) == 1 was checked by every caller
        let d = mod_inverse(&e, &totient).unwrap_or_default();
        let n = &p * &q;
        KeyMaterial { p, q, n, totient, e, d }
    }

    pub fn p(&self) -> &RsaBigInt {
        &self.p
    }

    pub fn q(&self) -> &RsaBigInt {
        &self.q
    }

    pub fn n(&self) -> &RsaBigInt {
        &self.n
    }

    pub fn totient(&self) -> &RsaBigInt {
        &self.totient
    }

    pub fn e(&self) -> &RsaBigInt {
        &self.e
    }

    pub fn d(&self) -> &RsaBigInt {
        &self.d
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey {
            n: self.n.clone(),
            e: self.e.clone(),
        }
    }

    pub fn private_key(&self) -> RsaPrivateKey {
        RsaPrivateKey {
            n: self.n.clone(),
            d: self.d.clone(),
        }
    }
}

/// Configuration for key pair generation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyGenConfig {
    /// Bit length of each of p, q and e
    pub bit_length: u64,
    pub miller_rabin_trials: u32,
    /// Candidate draws allowed per prime; `None` searches without bound
    pub max_attempts: Option<u64>,
    /// Reject exponents sharing a factor with the totient
    pub require_coprime_exponent: bool,
    /// Redraw q while it equals p
    pub require_distinct_primes: bool,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            bit_length: 2048,
            miller_rabin_trials: DEFAULT_TRIALS,
            max_attempts: None,
            require_coprime_exponent: true,
            require_distinct_primes: true,
        }
    }
}

impl KeyGenConfig {
    pub fn with_bit_length(mut self, bit_length: u64) -> Self {
        self.bit_length = bit_length;
        self
    }

    pub fn with_trials(mut self, trials: u32) -> Self {
        self.miller_rabin_trials = trials;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u64>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_coprime_exponent(mut self, required: bool) -> Self {
        self.require_coprime_exponent = required;
        self
    }

    pub fn with_distinct_primes(mut self, required: bool) -> Self {
        self.require_distinct_primes = required;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.bit_length < 2 {
            return Err(RsaError::InvalidConfiguration(format!(
                "bit length must be at least 2, got {}",
                self.bit_length
            )));
        }
        // Only 3 fits in two bits, so p and q can never differ.
        if self.bit_length == 2 && self.require_distinct_primes {
            return Err(RsaError::InvalidConfiguration(
                "distinct primes need a bit length of at least 3".to_string(),
            ));
        }
        if self.miller_rabin_trials == 0 {
            return Err(RsaError::InvalidConfiguration(
                "Miller-Rabin needs at least one trial".to_string(),
            ));
        }
        if self.max_attempts == Some(0) {
            return Err(RsaError::InvalidConfiguration(
                "max attempts must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builds RSA key material from generated probable primes.
#[derive(Debug, Clone)]
pub struct KeyPairBuilder {
    config: KeyGenConfig,
    table: SmallPrimeTable,
}

impl KeyPairBuilder {
    pub fn new(config: KeyGenConfig, table: SmallPrimeTable) -> Self {
        Self { config, table }
    }

    pub fn config(&self) -> &KeyGenConfig {
        &self.config
    }

    /// Build key material using the operating system RNG.
    pub fn build(&self) -> Result<KeyMaterial> {
        self.build_with_rng(&mut OsRng)
    }

    /// Build key material drawing all randomness from `rng`.
    pub fn build_with_rng<R: RngCore + ?Sized>(&self, rng: &mut R) -> Result<KeyMaterial> {
        self.config.validate()?;
        if self.table.is_empty() {
            return Err(RsaError::InvalidConfiguration(
                "small prime table is empty".to_string(),
            ));
        }

        let bits = self.config.bit_length;
        if bits < WEAK_BIT_LENGTH {
            warn!("{}-bit primes are cryptographically weak", bits);
        }
        debug!("generating key material with {}-bit primes", bits);

        let tester = MillerRabin::new(self.config.miller_rabin_trials)?;
        let factory =
            PrimeFactory::new(&self.table, tester).with_max_attempts(self.config.max_attempts);

        // Step 1: two independent primes
        let p = factory.next_prime(bits, rng)?;
        let mut q = factory.next_prime(bits, rng)?;
        while self.config.require_distinct_primes && q == p {
            trace!("q collided with p, drawing again");
            q = factory.next_prime(bits, rng)?;
        }

        // Step 2: φ(n) = (p-1)(q-1)
        let totient = totient(&p, &q);

        // Step 3: public exponent e < φ(n), re-checked with Miller-Rabin
        let e = loop {
            let candidate = factory.next_prime(bits, rng)?;
            if candidate >= totient {
                trace!("exponent candidate not below the totient, drawing again");
                continue;
            }
            if !tester.check(&candidate, rng)? {
                trace!("exponent candidate failed the Miller-Rabin re-check");
                continue;
            }
            if self.config.require_coprime_exponent && !gcd(&candidate, &totient).is_one() {
                trace!("exponent candidate shares a factor with the totient");
                continue;
            }
            break candidate;
        };

        // Step 4: d = e^(-1) mod φ(n). Without the coprimality gate a
        // non-invertible e falls back to the degenerate inverse 0.
        let d = mod_inverse(&e, &totient).unwrap_or_default();
        let n = &p * &q;

        debug!("generated {}-bit modulus", n.bits());
        Ok(KeyMaterial { p, q, n, totient, e, d })
    }
}

/// Generate key material with the default small-prime table.
pub fn generate_keypair(bit_length: u64) -> Result<KeyMaterial> {
    let config = KeyGenConfig::default().with_bit_length(bit_length);
    KeyPairBuilder::new(config, SmallPrimeTable::default()).build()
}

fn totient(p: &RsaBigInt, q: &RsaBigInt) -> RsaBigInt {
    (p - 1u8) * (q - 1u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::{from_u64, pow2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn builder(bits: u64) -> KeyPairBuilder {
        KeyPairBuilder::new(
            KeyGenConfig::default().with_bit_length(bits),
            SmallPrimeTable::default(),
        )
    }

    #[test]
    fn test_textbook_key() {
        let key = KeyMaterial::from_parts(from_u64(61), from_u64(53), from_u64(17)).unwrap();
        assert_eq!(key.n(), &from_u64(3233));
        assert_eq!(key.totient(), &from_u64(3120));
        assert_eq!(key.d(), &from_u64(2753));
    }

    #[test]
    fn test_from_parts_rejects_shared_factor() {
        // totient = 60 * 52, which 3 divides
        let result = KeyMaterial::from_parts(from_u64(61), from_u64(53), from_u64(3));
        assert!(matches!(result, Err(RsaError::NoModularInverse)));
    }

    #[test]
    fn test_from_parts_rejects_out_of_range_exponent() {
        assert!(KeyMaterial::from_parts(from_u64(61), from_u64(53), from_u64(3120)).is_err());
        assert!(KeyMaterial::from_parts(from_u64(61), from_u64(53), from_u64(1)).is_err());
        assert!(KeyMaterial::from_parts(from_u64(1), from_u64(53), from_u64(17)).is_err());
    }

    #[test]
    fn test_key_generation() {
        let mut rng = StdRng::seed_from_u64(2024);
        let key = builder(128).build_with_rng(&mut rng).unwrap();

        for prime in [key.p(), key.q(), key.e()] {
            assert!(prime > &pow2(127) && prime < &pow2(128));
        }
        assert_ne!(key.p(), key.q());
        assert!(key.e() < key.totient());
    }

    #[test]
    fn test_key_properties() {
        let mut rng = StdRng::seed_from_u64(99);
        let key = builder(96).build_with_rng(&mut rng).unwrap();

        // Verify n = p * q
        assert_eq!(key.n(), &(key.p() * key.q()));

        // Verify φ(n) = (p-1)(q-1)
        assert_eq!(key.totient(), &((key.p() - 1u8) * (key.q() - 1u8)));

        // Verify e * d ≡ 1 (mod φ(n))
        assert_eq!((key.e() * key.d()) % key.totient(), from_u64(1));
        assert!(key.d() < key.totient());
    }

    #[test]
    fn test_small_bit_lengths() {
        let mut rng = StdRng::seed_from_u64(5);
        for bits in [3u64, 4, 8, 12] {
            let key = builder(bits).build_with_rng(&mut rng).unwrap();
            assert_ne!(key.p(), key.q());
            assert_eq!((key.e() * key.d()) % key.totient(), from_u64(1));
        }
    }

    #[test]
    fn test_two_bits_without_distinct_primes() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = KeyGenConfig::default()
            .with_bit_length(2)
            .with_distinct_primes(false);
        let key = KeyPairBuilder::new(config, SmallPrimeTable::default())
            .build_with_rng(&mut rng)
            .unwrap();
        // p = q = e = 3, totient = 4
        assert_eq!(key.n(), &from_u64(9));
        assert_eq!(key.totient(), &from_u64(4));
        assert_eq!(key.d(), &from_u64(3));
    }

    #[test]
    fn test_invalid_configuration() {
        let mut rng = StdRng::seed_from_u64(5);
        let table = SmallPrimeTable::default();

        for config in [
            KeyGenConfig::default().with_bit_length(1),
            KeyGenConfig::default().with_bit_length(2),
            KeyGenConfig::default().with_bit_length(64).with_trials(0),
            KeyGenConfig::default().with_bit_length(64).with_max_attempts(Some(0)),
        ] {
            let result = KeyPairBuilder::new(config, table.clone()).build_with_rng(&mut rng);
            assert!(matches!(result, Err(RsaError::InvalidConfiguration(_))));
        }
    }

    #[test]
    fn test_key_views() {
        let key = KeyMaterial::from_parts(from_u64(61), from_u64(53), from_u64(17)).unwrap();
        let public = key.public_key();
        let private = key.private_key();
        assert_eq!(public.n, private.n);
        assert_eq!(public.e, from_u64(17));
        assert_eq!(private.d, from_u64(2753));
        assert_eq!(public.bit_length(), 12);
        assert_eq!(key.bit_length(), 12);
    }

    #[test]
    fn test_default_config() {
        let config = KeyGenConfig::default();
        assert_eq!(config.bit_length, 2048);
        assert_eq!(config.miller_rabin_trials, 20);
        assert_eq!(config.max_attempts, None);
        assert!(config.require_coprime_exponent);
        assert!(config.require_distinct_primes);
    }
}
