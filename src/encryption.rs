//! Core ElGamal encryption and decryption operations

use num_bigint::{BigUint, RandBigInt};
use rand::{CryptoRng, RngCore};

use crate::error::{ElGamalError, Result};
use crate::keys::{PrivateKey, PublicKey};
use crate::types::Ciphertext;
use crate::utils::{from_bytes, mod_exp, mod_inverse, secure_rng, to_bytes};

impl PublicKey {
    /// Encrypt a plaintext `m` in `[0, p)` with fresh ephemeral randomness
    ///
    /// # Example
    ///
    /// ```rust
    /// use elgamal::generate_key_pair;
    /// use num_bigint::BigUint;
    ///
    /// let private_key = generate_key_pair(64, 20).unwrap();
    /// let m = BigUint::from(42u32);
    /// let ct = private_key.public_key().encrypt(&m).unwrap();
    /// assert_eq!(private_key.decrypt(&ct).unwrap(), m);
    /// ```
    pub fn encrypt(&self, message: &BigUint) -> Result<Ciphertext> {
        let mut rng = secure_rng()?;
        self.encrypt_with_rng(message, &mut rng)
    }

    /// Encrypt drawing the ephemeral exponent from `rng`
    pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
        &self,
        message: &BigUint,
        rng: &mut R,
    ) -> Result<Ciphertext> {
        if message >= &self.p {
            return Err(ElGamalError::MessageTooLarge);
        }

        // k uniform in [0, p - 1]
        let k = rng.gen_biguint_below(&self.p);
        self.encrypt_with_ephemeral(message, &k)
    }

    /// Encrypt with a caller-chosen ephemeral exponent `k`.
    ///
    /// Only for fixed test vectors. Reusing `k` for two messages under the same
    /// key reveals their ratio.
    pub fn encrypt_with_ephemeral(&self, message: &BigUint, k: &BigUint) -> Result<Ciphertext> {
        if message >= &self.p {
            return Err(ElGamalError::MessageTooLarge);
        }

        let c1 = mod_exp(&self.g, k, &self.p);
        let s = mod_exp(&self.y, k, &self.p);
        let c2 = (message * s) % &self.p;

        Ok(Ciphertext::new(c1, c2))
    }

    /// Encrypt a big-endian plaintext, returning big-endian `(c1, c2)`
    pub fn encrypt_bytes(&self, message: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
        self.encrypt(&from_bytes(message)).map(|ct| ct.to_bytes())
    }
}

impl PrivateKey {
    /// Decrypt a ciphertext whose components lie in `[0, p)`
    pub fn decrypt(&self, ciphertext: &Ciphertext) -> Result<BigUint> {
        let p = &self.public.p;

        if !ciphertext.is_below(p) {
            return Err(ElGamalError::CipherTooLarge);
        }

        // s = c1^x = y^k, so c2 * s^-1 = m
        let s = mod_exp(&ciphertext.c1, &self.x, p);
        let s_inv = mod_inverse(&s, p).ok_or(ElGamalError::InvalidKey)?;

        Ok((&ciphertext.c2 * s_inv) % p)
    }

    /// Decrypt big-endian `(c1, c2)`, returning the big-endian plaintext
    pub fn decrypt_bytes(&self, c1: &[u8], c2: &[u8]) -> Result<Vec<u8>> {
        self.decrypt(&Ciphertext::from_bytes(c1, c2))
            .map(|m| to_bytes(&m))
    }
}
