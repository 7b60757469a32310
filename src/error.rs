//! Error types for the ElGamal library

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ElGamalError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElGamalError {
    /// Randomness failure or an exhausted parameter search. Retry or abort.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Plaintext is not in `[0, p)`.
    #[error("Message is larger than the public key modulus")]
    MessageTooLarge,

    /// A ciphertext component is not in `[0, p)`.
    #[error("Cipher is larger than the public key modulus")]
    CipherTooLarge,

    /// The shared secret has no inverse modulo `p`.
    #[error("Invalid private key")]
    InvalidKey,

    #[error("Empty list provided for batch operation")]
    EmptyBatch,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
