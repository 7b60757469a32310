//! Key generation and management

use log::debug;
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ElGamalError, Result};
use crate::params::{generate_parameters, DomainParameters};
use crate::utils::{mod_exp, secure_rng};

/// ElGamal public key
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawPublicKey")
)]
pub struct PublicKey {
    pub(crate) g: BigUint, // Generator
    pub(crate) p: BigUint, // Prime modulus
    pub(crate) y: BigUint, // g^x mod p (public key component)
}

impl PublicKey {
    /// Create a public key from components, checking their ranges
    pub fn new(p: BigUint, g: BigUint, y: BigUint) -> Result<Self> {
        let key = PublicKey { g, p, y };
        key.validate()?;
        Ok(key)
    }

    /// Get the prime modulus
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// Get the generator
    pub fn generator(&self) -> &BigUint {
        &self.g
    }

    /// Get the public component (g^x mod p)
    pub fn public_component(&self) -> &BigUint {
        &self.y
    }

    /// Get the bit size of the modulus
    pub fn bit_size(&self) -> u64 {
        self.p.bits()
    }

    /// Validate the public key
    pub fn validate(&self) -> Result<()> {
        if self.p <= BigUint::from(2u32) {
            return Err(ElGamalError::InvalidParameter(
                "Modulus p must be > 2".to_string(),
            ));
        }

        if self.g <= BigUint::one() || self.g >= self.p {
            return Err(ElGamalError::InvalidParameter(
                "Generator g must be in range (1, p)".to_string(),
            ));
        }

        if self.y.is_zero() || self.y >= self.p {
            return Err(ElGamalError::InvalidParameter(
                "Public component y must be in range (0, p)".to_string(),
            ));
        }

        Ok(())
    }
}

/// Unchecked wire form; deserialization goes through [`PublicKey::new`]
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawPublicKey {
    g: BigUint,
    p: BigUint,
    y: BigUint,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPublicKey> for PublicKey {
    type Error = ElGamalError;

    fn try_from(raw: RawPublicKey) -> Result<Self> {
        PublicKey::new(raw.p, raw.g, raw.y)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({} bits)", self.bit_size())
    }
}

/// ElGamal private key
///
/// Holds its public half. The secret exponent never appears in `Debug` or
/// `Display` output.
#[derive(Clone)]
pub struct PrivateKey {
    pub(crate) public: PublicKey,
    pub(crate) x: BigUint, // Secret exponent, 1 <= x < q
}

impl PrivateKey {
    /// Build a private key from domain parameters and a secret exponent in `[1, q)`
    pub fn from_components(params: &DomainParameters, x: BigUint) -> Result<Self> {
        if x.is_zero() || x >= params.q {
            return Err(ElGamalError::InvalidParameter(
                "Secret exponent x must be in range [1, q)".to_string(),
            ));
        }

        Ok(Self::derive(params, x))
    }

    fn derive(params: &DomainParameters, x: BigUint) -> Self {
        let y = mod_exp(&params.g, &x, &params.p);

        PrivateKey {
            public: PublicKey {
                g: params.g.clone(),
                p: params.p.clone(),
                y,
            },
            x,
        }
    }

    /// Get the public half of the key pair
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Get the bit size of the modulus
    pub fn bit_size(&self) -> u64 {
        self.public.bit_size()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public", &self.public)
            .field("x", &"***")
            .finish()
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({} bits, ***)", self.bit_size())
    }
}

/// Generate a new ElGamal key pair with a `bit_size`-bit safe prime modulus
///
/// # Arguments
///
/// * `bit_size` - The bit size for the prime modulus
/// * `certainty` - Miller-Rabin rounds; a composite modulus slips through with probability at most 4^-certainty
///
/// # Example
///
/// ```rust
/// use elgamal::generate_key_pair;
///
/// let private_key = generate_key_pair(64, 20).expect("Failed to generate keys");
/// let public_key = private_key.public_key();
/// assert_eq!(public_key.bit_size(), 64);
/// ```
pub fn generate_key_pair(bit_size: u64, certainty: usize) -> Result<PrivateKey> {
    let params = generate_parameters(bit_size, certainty)?;
    generate_key_pair_from_parameters(&params)
}

/// Generate a key pair over existing domain parameters
pub fn generate_key_pair_from_parameters(params: &DomainParameters) -> Result<PrivateKey> {
    let mut rng = secure_rng()?;
    Ok(generate_key_pair_with_rng(params, &mut rng))
}

/// Generate a key pair over existing domain parameters, drawing `x` from `rng`
pub fn generate_key_pair_with_rng<R: RngCore + CryptoRng>(
    params: &DomainParameters,
    rng: &mut R,
) -> PrivateKey {
    // x uniform in [1, q - 1]
    let x = rng.gen_biguint_range(&BigUint::one(), &params.q);
    debug!("Derived {}-bit key pair", params.bit_size());

    PrivateKey::derive(params, x)
}
