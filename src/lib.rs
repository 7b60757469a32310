//! # ElGamal Encryption Library
//!
//! ElGamal public-key encryption over the prime-order subgroup of `(Z/pZ)*`
//! for a safe prime `p = 2q + 1`:
//! - Domain parameter generation (safe prime and subgroup generator)
//! - Key pair generation
//! - Probabilistic encryption and decryption
//! - Multiplicative homomorphic combination of ciphertexts
//!
//! All secret draws come from a cryptographically secure generator acquired
//! per call. Every type is immutable after construction and safe to share
//! across threads.
//!
//! ## Example
//!
//! ```rust
//! use elgamal::{generate_key_pair, HomomorphicOperations};
//! use num_bigint::BigUint;
//!
//! // Generate keys
//! let private_key = generate_key_pair(128, 20).unwrap();
//! let public_key = private_key.public_key();
//!
//! // Encrypt values
//! let ct1 = public_key.encrypt(&BigUint::from(6u32)).unwrap();
//! let ct2 = public_key.encrypt(&BigUint::from(7u32)).unwrap();
//!
//! // Perform homomorphic multiplication
//! let product = public_key.combine_two(&ct1, &ct2).unwrap();
//!
//! // Decrypt result
//! let result = private_key.decrypt(&product).unwrap();
//! assert_eq!(result, BigUint::from(42u32));
//! ```

pub mod encryption;
pub mod error;
pub mod homomorphic;
pub mod keys;
pub mod params;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use error::{ElGamalError, Result};
pub use homomorphic::HomomorphicOperations;
pub use keys::{
    generate_key_pair, generate_key_pair_from_parameters, generate_key_pair_with_rng, PrivateKey,
    PublicKey,
};
pub use params::{
    generate_parameters, generate_parameters_with_config, generate_parameters_with_rng,
    DomainParameters,
};
pub use types::{Ciphertext, GenerationConfig};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
