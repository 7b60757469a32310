//! Core types and data structures

use num_bigint::BigUint;
use num_traits::One;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::utils::{from_bytes, to_bytes};

/// ElGamal ciphertext (c1, c2)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ciphertext {
    pub(crate) c1: BigUint,
    pub(crate) c2: BigUint,
}

impl Ciphertext {
    /// Create a new ciphertext
    pub fn new(c1: BigUint, c2: BigUint) -> Self {
        Ciphertext { c1, c2 }
    }

    /// Multiplicative identity `(1, 1)` used as the seed of a fold.
    ///
    /// This is what encrypting `1` with ephemeral exponent `0` would give. It
    /// hides nothing and must never be handed out as a ciphertext by itself.
    pub(crate) fn identity() -> Self {
        Ciphertext {
            c1: BigUint::one(),
            c2: BigUint::one(),
        }
    }

    /// Decode a ciphertext from big-endian component bytes
    pub fn from_bytes(c1: &[u8], c2: &[u8]) -> Self {
        Ciphertext {
            c1: from_bytes(c1),
            c2: from_bytes(c2),
        }
    }

    /// Encode both components as minimal big-endian bytes
    pub fn to_bytes(&self) -> (Vec<u8>, Vec<u8>) {
        (to_bytes(&self.c1), to_bytes(&self.c2))
    }

    /// Get the first component (g^k mod p)
    pub fn c1(&self) -> &BigUint {
        &self.c1
    }

    /// Get the second component (m * y^k mod p)
    pub fn c2(&self) -> &BigUint {
        &self.c2
    }

    /// Whether both components lie in `[0, p)`
    pub fn is_below(&self, p: &BigUint) -> bool {
        &self.c1 < p && &self.c2 < p
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        let (c1, c2) = self.to_bytes();
        c1.len() + c2.len()
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ciphertext({} bytes)", self.size_bytes())
    }
}

/// Configuration for domain parameter generation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Number of Miller-Rabin rounds; false-positive rate is at most 4^-certainty
    pub certainty: usize,
    /// Bound on safe-prime candidates and on generator candidates. `None` searches until found.
    pub max_attempts: Option<u64>,
}

impl GenerationConfig {
    /// Config with the given Miller-Rabin rounds and no attempt bound
    pub fn new(certainty: usize) -> Self {
        GenerationConfig {
            certainty,
            ..Default::default()
        }
    }

    /// Bound every candidate search to `max_attempts` draws
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            certainty: 20,
            max_attempts: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ciphertext_bytes() {
        let ct = Ciphertext::new(BigUint::from(0x1234u32), BigUint::from(0u32));
        let (c1, c2) = ct.to_bytes();
        assert_eq!(c1, vec![0x12, 0x34]);
        assert!(c2.is_empty());
        assert_eq!(Ciphertext::from_bytes(&c1, &c2), ct);
        assert_eq!(ct.size_bytes(), 2);
        assert_eq!(ct.to_string(), "Ciphertext(2 bytes)");
    }

    #[test]
    fn test_is_below() {
        let p = BigUint::from(23u32);
        assert!(Ciphertext::new(BigUint::from(22u32), BigUint::from(0u32)).is_below(&p));
        assert!(!Ciphertext::new(BigUint::from(23u32), BigUint::from(0u32)).is_below(&p));
        assert!(!Ciphertext::new(BigUint::from(1u32), BigUint::from(23u32)).is_below(&p));
    }

    #[test]
    fn test_config_builder() {
        let config = GenerationConfig::new(8).with_max_attempts(10);
        assert_eq!(config.certainty, 8);
        assert_eq!(config.max_attempts, Some(10));
        assert_eq!(GenerationConfig::default().max_attempts, None);
    }
}
