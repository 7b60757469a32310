//! Domain parameter generation: safe prime `p = 2q + 1` and a generator of the order-`q` subgroup

use log::{debug, trace, warn};
use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::{CryptoRng, RngCore};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ElGamalError, Result};
use crate::types::GenerationConfig;
use crate::utils::{is_probable_prime, mod_exp, random_prime, secure_rng};

/// Smallest modulus width that admits `p = 2q + 1` with `q` an odd prime (p = 7).
pub const MIN_BIT_SIZE: u64 = 3;

/// Group parameters `(p, q, g)`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawDomainParameters")
)]
pub struct DomainParameters {
    pub(crate) p: BigUint, // Safe prime modulus
    pub(crate) q: BigUint, // Prime subgroup order, p = 2q + 1
    pub(crate) g: BigUint, // Generator of the order-q subgroup
}

impl DomainParameters {
    /// Build parameters from known values, checking `p = 2q + 1` and the order of `g`.
    ///
    /// Primality is not tested here; use [`DomainParameters::validate`] for that.
    pub fn new(p: BigUint, q: BigUint, g: BigUint) -> Result<Self> {
        let params = DomainParameters { p, q, g };
        params.check_structure()?;
        Ok(params)
    }

    /// Get the safe prime modulus
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// Get the prime order of the subgroup
    pub fn order(&self) -> &BigUint {
        &self.q
    }

    /// Get the subgroup generator
    pub fn generator(&self) -> &BigUint {
        &self.g
    }

    /// Get the bit size of the modulus
    pub fn bit_size(&self) -> u64 {
        self.p.bits()
    }

    /// Check every invariant, including probabilistic primality of `p` and `q`.
    pub fn validate(&self, certainty: usize) -> Result<()> {
        self.check_structure()?;

        let mut rng = secure_rng()?;
        if !is_probable_prime(&self.q, certainty, &mut rng) {
            return Err(ElGamalError::InvalidParameter(
                "Order q is not prime".to_string(),
            ));
        }
        if !is_probable_prime(&self.p, certainty, &mut rng) {
            return Err(ElGamalError::InvalidParameter(
                "Modulus p is not prime".to_string(),
            ));
        }

        Ok(())
    }

    fn check_structure(&self) -> Result<()> {
        if self.p != &self.q * 2u32 + 1u32 {
            return Err(ElGamalError::InvalidParameter(
                "Modulus p must equal 2q + 1".to_string(),
            ));
        }

        if self.g <= BigUint::one() || self.g >= self.p {
            return Err(ElGamalError::InvalidParameter(
                "Generator g must be in range (1, p)".to_string(),
            ));
        }

        if !is_subgroup_generator(&self.g, &self.p, &self.q) {
            return Err(ElGamalError::InvalidParameter(
                "Generator g must have order q".to_string(),
            ));
        }

        Ok(())
    }
}

/// Unchecked wire form; deserialization goes through [`DomainParameters::new`]
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawDomainParameters {
    p: BigUint,
    q: BigUint,
    g: BigUint,
}

#[cfg(feature = "serde")]
impl TryFrom<RawDomainParameters> for DomainParameters {
    type Error = ElGamalError;

    fn try_from(raw: RawDomainParameters) -> Result<Self> {
        DomainParameters::new(raw.p, raw.q, raw.g)
    }
}

impl fmt::Display for DomainParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DomainParameters({} bits)", self.bit_size())
    }
}

/// `g` generates the order-`q` subgroup iff `g^2 != 1` and `g^q == 1` (mod p)
fn is_subgroup_generator(g: &BigUint, p: &BigUint, q: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    !mod_exp(g, &two, p).is_one() && mod_exp(g, q, p).is_one()
}

/// Generate domain parameters with a `bit_size`-bit safe prime.
///
/// `certainty` is the number of Miller-Rabin rounds applied to `p`. The search
/// is unbounded; use [`generate_parameters_with_config`] to cap it.
///
/// # Example
///
/// ```rust
/// use elgamal::generate_parameters;
///
/// let params = generate_parameters(64, 20).expect("Failed to generate parameters");
/// assert_eq!(params.bit_size(), 64);
/// ```
pub fn generate_parameters(bit_size: u64, certainty: usize) -> Result<DomainParameters> {
    generate_parameters_with_config(bit_size, &GenerationConfig::new(certainty))
}

/// Generate domain parameters with an explicit configuration
pub fn generate_parameters_with_config(
    bit_size: u64,
    config: &GenerationConfig,
) -> Result<DomainParameters> {
    let mut rng = secure_rng()?;
    generate_parameters_with_rng(bit_size, config, &mut rng)
}

/// Generate domain parameters drawing all randomness from `rng`
pub fn generate_parameters_with_rng<R: RngCore + CryptoRng>(
    bit_size: u64,
    config: &GenerationConfig,
    rng: &mut R,
) -> Result<DomainParameters> {
    if bit_size < MIN_BIT_SIZE {
        return Err(ElGamalError::Generation(format!(
            "No safe prime fits in {} bits (minimum {})",
            bit_size, MIN_BIT_SIZE
        )));
    }

    debug!("Searching for {}-bit safe prime", bit_size);
    let (p, q) = find_safe_prime(bit_size, config, rng)?;
    let g = find_generator(&p, &q, config, rng)?;
    debug!("Generated {}-bit domain parameters", p.bits());

    Ok(DomainParameters { p, q, g })
}

/// Sample prime `q` of `bit_size - 1` bits until `p = 2q + 1` is also prime
fn find_safe_prime<R: RngCore + CryptoRng>(
    bit_size: u64,
    config: &GenerationConfig,
    rng: &mut R,
) -> Result<(BigUint, BigUint)> {
    let mut attempts = 0u64;

    loop {
        if config.max_attempts.is_some_and(|max| attempts >= max) {
            warn!(
                "Safe prime search for {} bits exhausted after {} attempts",
                bit_size, attempts
            );
            return Err(ElGamalError::Generation(format!(
                "Failed to generate {}-bit safe prime after {} attempts",
                bit_size, attempts
            )));
        }
        attempts += 1;

        let q = random_prime(bit_size - 1, config.certainty, config.max_attempts, rng)
            .ok_or_else(|| {
                ElGamalError::Generation(format!(
                    "Failed to generate {}-bit prime order",
                    bit_size - 1
                ))
            })?;

        let p = &q * 2u32 + 1u32;

        if is_probable_prime(&p, config.certainty, rng) {
            debug!("Found safe prime after {} attempts", attempts);
            return Ok((p, q));
        }

        trace!("2q + 1 composite, resampling q (attempt {})", attempts);
    }
}

/// Sample `g` in `[2, p - 1]` until it generates the order-`q` subgroup
fn find_generator<R: RngCore + CryptoRng>(
    p: &BigUint,
    q: &BigUint,
    config: &GenerationConfig,
    rng: &mut R,
) -> Result<BigUint> {
    let two = BigUint::from(2u32);
    let mut attempts = 0u64;

    loop {
        if config.max_attempts.is_some_and(|max| attempts >= max) {
            warn!("Generator search exhausted after {} attempts", attempts);
            return Err(ElGamalError::Generation(format!(
                "Failed to find generator after {} attempts",
                attempts
            )));
        }
        attempts += 1;

        let g = rng.gen_biguint_range(&two, p);

        if is_subgroup_generator(&g, p, q) {
            trace!("Found generator after {} attempts", attempts);
            return Ok(g);
        }
    }
}
