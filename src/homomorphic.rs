//! Homomorphic operations on ciphertexts

use rayon::prelude::*;

use crate::error::{ElGamalError, Result};
use crate::keys::PublicKey;
use crate::types::Ciphertext;

/// Trait for homomorphic operations
///
/// ElGamal is multiplicatively homomorphic: multiplying ciphertexts component-wise
/// yields an encryption of the product of the plaintexts modulo `p`.
pub trait HomomorphicOperations {
    /// Combine two ciphertexts into an encryption of `m_a * m_b mod p`
    fn combine_two(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext>;

    /// Combine any number of ciphertexts into an encryption of the product of their plaintexts
    fn combine_many(&self, ciphertexts: &[Ciphertext]) -> Result<Ciphertext>;
}

impl HomomorphicOperations for PublicKey {
    fn combine_two(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        if !a.is_below(&self.p) || !b.is_below(&self.p) {
            return Err(ElGamalError::CipherTooLarge);
        }

        Ok(self.multiply(a, b))
    }

    fn combine_many(&self, ciphertexts: &[Ciphertext]) -> Result<Ciphertext> {
        if ciphertexts.is_empty() {
            return Err(ElGamalError::EmptyBatch);
        }

        // Validate everything up front so no partial product is ever computed
        if ciphertexts.par_iter().any(|ct| !ct.is_below(&self.p)) {
            return Err(ElGamalError::CipherTooLarge);
        }

        // The group operation is commutative and associative, so any fold order works
        Ok(ciphertexts
            .par_iter()
            .fold(Ciphertext::identity, |acc, ct| self.multiply(&acc, ct))
            .reduce(Ciphertext::identity, |a, b| self.multiply(&a, &b)))
    }
}

impl PublicKey {
    /// Component-wise product modulo `p`. Callers range-check the inputs.
    fn multiply(&self, a: &Ciphertext, b: &Ciphertext) -> Ciphertext {
        let c1 = (&a.c1 * &b.c1) % &self.p;
        let c2 = (&a.c2 * &b.c2) % &self.p;
        Ciphertext::new(c1, c2)
    }

    /// Byte-level [`HomomorphicOperations::combine_two`] over `(c1, c2)` and `(c1', c2')`
    pub fn combine_two_bytes(
        &self,
        c1: &[u8],
        c2: &[u8],
        c1_dash: &[u8],
        c2_dash: &[u8],
    ) -> Result<(Vec<u8>, Vec<u8>)> {
        let a = Ciphertext::from_bytes(c1, c2);
        let b = Ciphertext::from_bytes(c1_dash, c2_dash);
        self.combine_two(&a, &b).map(|ct| ct.to_bytes())
    }

    /// Byte-level [`HomomorphicOperations::combine_many`]
    pub fn combine_many_bytes<B: AsRef<[u8]>>(
        &self,
        ciphertexts: &[(B, B)],
    ) -> Result<(Vec<u8>, Vec<u8>)> {
        let decoded: Vec<Ciphertext> = ciphertexts
            .iter()
            .map(|(c1, c2)| Ciphertext::from_bytes(c1.as_ref(), c2.as_ref()))
            .collect();
        self.combine_many(&decoded).map(|ct| ct.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_key_pair, PrivateKey};
    use crate::params::DomainParameters;
    use num_bigint::BigUint;

    fn toy_key() -> PrivateKey {
        let params = DomainParameters::new(23u32.into(), 11u32.into(), 4u32.into()).unwrap();
        PrivateKey::from_components(&params, 3u32.into()).unwrap()
    }

    #[test]
    fn test_homomorphic_multiplication() {
        let private_key = generate_key_pair(64, 20).unwrap();
        let public_key = private_key.public_key();

        let m1 = BigUint::from(7u32);
        let m2 = BigUint::from(6u32);

        let ct1 = public_key.encrypt(&m1).unwrap();
        let ct2 = public_key.encrypt(&m2).unwrap();

        let ct_product = public_key.combine_two(&ct1, &ct2).unwrap();
        let decrypted = private_key.decrypt(&ct_product).unwrap();

        assert_eq!(decrypted, BigUint::from(42u32));
    }

    #[test]
    fn test_product_wraps_modulus() {
        let key = toy_key();
        let public_key = key.public_key();

        let ct1 = public_key.encrypt(&BigUint::from(20u32)).unwrap();
        let ct2 = public_key.encrypt(&BigUint::from(19u32)).unwrap();

        let ct = public_key.combine_two(&ct1, &ct2).unwrap();
        // 20 * 19 = 380 = 16 * 23 + 12
        assert_eq!(key.decrypt(&ct).unwrap(), BigUint::from(12u32));
    }

    #[test]
    fn test_batch_operations() {
        let private_key = generate_key_pair(64, 20).unwrap();
        let public_key = private_key.public_key();

        let values = [2u32, 3, 5, 7, 11, 13];
        let ciphertexts: Vec<_> = values
            .iter()
            .map(|v| public_key.encrypt(&BigUint::from(*v)).unwrap())
            .collect();

        let ct_product = public_key.combine_many(&ciphertexts).unwrap();
        let decrypted = private_key.decrypt(&ct_product).unwrap();

        assert_eq!(decrypted, BigUint::from(30030u32));
    }

    #[test]
    fn test_batch_of_one() {
        let key = toy_key();
        let ct = key.public_key().encrypt(&BigUint::from(9u32)).unwrap();
        let combined = key.public_key().combine_many(&[ct.clone()]).unwrap();
        assert_eq!(combined, ct);
    }

    #[test]
    fn test_empty_batch_rejected() {
        let key = toy_key();
        assert_eq!(
            key.public_key().combine_many(&[]),
            Err(ElGamalError::EmptyBatch)
        );
    }

    #[test]
    fn test_oversized_component_rejected() {
        let key = toy_key();
        let public_key = key.public_key();
        let good = public_key.encrypt(&BigUint::from(2u32)).unwrap();
        let bad = Ciphertext::new(BigUint::from(1u32), BigUint::from(23u32));

        assert_eq!(
            public_key.combine_two(&good, &bad),
            Err(ElGamalError::CipherTooLarge)
        );
        assert_eq!(
            public_key.combine_two(&bad, &good),
            Err(ElGamalError::CipherTooLarge)
        );
        assert_eq!(
            public_key.combine_many(&[good.clone(), good, bad]),
            Err(ElGamalError::CipherTooLarge)
        );
    }

    #[test]
    fn test_byte_level_combination() {
        let key = toy_key();
        let public_key = key.public_key();

        let (a1, a2) = public_key.encrypt_bytes(&[3]).unwrap();
        let (b1, b2) = public_key.encrypt_bytes(&[5]).unwrap();

        let (c1, c2) = public_key.combine_two_bytes(&a1, &a2, &b1, &b2).unwrap();
        assert_eq!(key.decrypt_bytes(&c1, &c2).unwrap(), vec![15]);

        let batch = vec![(a1, a2), (b1, b2), (vec![1], vec![2])];
        let (c1, c2) = public_key.combine_many_bytes(&batch).unwrap();
        // (1, 2) is the degenerate encryption of 2 with k = 0
        assert_eq!(key.decrypt_bytes(&c1, &c2).unwrap(), vec![7]);
    }
}
