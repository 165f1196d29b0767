// RSA Big Integer Operations
// Wrapper around num-bigint for the arithmetic used by key generation and the cipher

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Modular exponentiation: base^exp mod modulus
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    // modpow panics on a zero modulus and x mod 1 is always zero
    if modulus.is_zero() || modulus.is_one() {
        return RsaBigInt::zero();
    }
    base.modpow(exp, modulus)
}

/// Compute modular inverse: a^(-1) mod m
///
/// Iterative extended Euclid. Returns `Some(0)` for the degenerate modulus 1
/// and `None` when gcd(a, m) != 1 (no inverse exists). The result is
/// normalized into [0, m).
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    if m.is_zero() {
        return None;
    }
    if m.is_one() {
        return Some(RsaBigInt::zero());
    }

    let modulus = BigInt::from(m.clone());
    let mut a = BigInt::from(a % m);
    let mut m = modulus.clone();
    let mut x = BigInt::one();
    let mut y = BigInt::zero();

    while a > BigInt::one() {
        if m.is_zero() {
            // a is now gcd(a, m) > 1
            return None;
        }
        let q = &a / &m;

        let t = m.clone();
        m = &a % &m;
        a = t;

        let t = y.clone();
        y = x - &q * &y;
        x = t;
    }

    if a.is_zero() {
        return None;
    }
    if x.is_negative() {
        x += &modulus;
    }

    x.to_biguint()
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

/// 2^exp as a big integer
pub fn pow2(exp: u64) -> RsaBigInt {
    RsaBigInt::one() << exp
}
