// Random Candidate Generation
// Uniform sampling of big integers from a fallible randomness source

use num_traits::Zero;
use rand::RngCore;

use super::bigint::{pow2, RsaBigInt};
use super::error::{Result, RsaError};

/// Draw a uniformly random integer in [0, bound).
///
/// Uses rejection sampling over `bound.bits()` random bits, so on average
/// fewer than two draws are needed. Failures of the source are propagated
/// as `RandomnessUnavailable`.
pub fn random_below<R: RngCore + ?Sized>(rng: &mut R, bound: &RsaBigInt) -> Result<RsaBigInt> {
    if bound.is_zero() {
        return Err(RsaError::InvalidConfiguration(
            "cannot sample below zero".to_string(),
        ));
    }

    let bits = bound.bits();
    let byte_len = ((bits + 7) / 8) as usize;
    let excess = (byte_len as u64) * 8 - bits;
    let mut bytes = vec![0u8; byte_len];

    loop {
        rng.try_fill_bytes(&mut bytes)?;
        bytes[0] &= 0xFFu8 >> excess;

        let value = RsaBigInt::from_bytes_be(&bytes);
        if &value < bound {
            return Ok(value);
        }
    }
}

/// Draw a uniformly random integer in [low, high).
pub fn random_range<R: RngCore + ?Sized>(
    rng: &mut R,
    low: &RsaBigInt,
    high: &RsaBigInt,
) -> Result<RsaBigInt> {
    if low >= high {
        return Err(RsaError::InvalidConfiguration(format!(
            "empty range [{}, {})",
            low, high
        )));
    }
    Ok(low + random_below(rng, &(high - low))?)
}

/// Draw a prime candidate of `bit_length` bits.
///
/// The value is uniform over [2^(L-1)+1, 2^L-1] before its low bit is
/// set, so every candidate is odd and stays inside that range.
pub fn random_candidate<R: RngCore + ?Sized>(rng: &mut R, bit_length: u64) -> Result<RsaBigInt> {
    if bit_length < 2 {
        return Err(RsaError::InvalidConfiguration(format!(
            "bit length must be at least 2, got {}",
            bit_length
        )));
    }

    let low = pow2(bit_length - 1) + 1u8;
    let high = pow2(bit_length);

    let mut candidate = random_range(rng, &low, &high)?;
    candidate.set_bit(0, true);
    Ok(candidate)
}
