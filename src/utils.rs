//! Utility functions for cryptographic operations

use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::error::{ElGamalError, Result};

/// Acquire a fresh cryptographically secure generator seeded from the OS.
///
/// Each call gets its own generator, so concurrent callers never share state.
pub fn secure_rng() -> Result<ChaCha20Rng> {
    ChaCha20Rng::from_rng(OsRng)
        .map_err(|e| ElGamalError::Generation(format!("OS randomness unavailable: {}", e)))
}

/// Modular exponentiation: base^exp mod modulus
pub fn mod_exp(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> BigUint {
    base.modpow(exp, modulus)
}

/// Compute modular inverse using extended Euclidean algorithm
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }

    let m_int = BigInt::from_biguint(Sign::Plus, m.clone());
    let (gcd, x) = extended_gcd(&BigInt::from_biguint(Sign::Plus, a % m), &m_int);

    if !gcd.is_one() {
        return None;
    }

    // mod_floor keeps the result in [0, m) even when x is negative
    x.mod_floor(&m_int).to_biguint()
}

/// Iterative extended Euclid. Returns `(gcd(a, b), s)` with `a*s ≡ gcd (mod b)`.
fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    (old_r, old_s)
}

/// Miller-Rabin primality test with `rounds` random witnesses.
///
/// A composite passes with probability at most `4^-rounds`. At least one round
/// always runs.
pub fn is_probable_prime<R: RngCore + CryptoRng>(
    n: &BigUint,
    rounds: usize,
    rng: &mut R,
) -> bool {
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);

    if n < &two {
        return false;
    }
    if n == &two || n == &three {
        return true;
    }
    if n.is_even() {
        return false;
    }

    let n_minus_1 = n - BigUint::one();
    let (s, d) = factor_powers_of_two(&n_minus_1);

    'witness: for _ in 0..rounds.max(1) {
        // n >= 5 here, so [2, n-1) is never empty
        let a = rng.gen_biguint_range(&two, &n_minus_1);

        let mut x = mod_exp(&a, &d, n);

        if x.is_one() || x == n_minus_1 {
            continue;
        }

        for _ in 1..s {
            x = mod_exp(&x, &two, n);
            if x == n_minus_1 {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// Factor out powers of 2 from n: returns `(s, d)` with `n = 2^s * d`, `d` odd.
pub fn factor_powers_of_two(n: &BigUint) -> (u64, BigUint) {
    let s = n.trailing_zeros().unwrap_or(0);
    (s, n >> s)
}

/// Sample a probable prime with exactly `bits` bits (`bits >= 2`).
///
/// Returns `None` when `max_attempts` candidates were rejected.
pub fn random_prime<R: RngCore + CryptoRng>(
    bits: u64,
    rounds: usize,
    max_attempts: Option<u64>,
    rng: &mut R,
) -> Option<BigUint> {
    let mut attempts = 0u64;

    loop {
        if max_attempts.is_some_and(|max| attempts >= max) {
            return None;
        }
        attempts += 1;

        // Force the top bit for the exact width and the low bit for oddness
        let mut candidate = rng.gen_biguint(bits);
        candidate |= BigUint::one() << (bits - 1);
        candidate |= BigUint::one();

        if is_probable_prime(&candidate, rounds, rng) {
            return Some(candidate);
        }
    }
}

/// Encode an integer as minimal big-endian bytes. Zero is the empty string.
pub fn to_bytes(n: &BigUint) -> Vec<u8> {
    if n.is_zero() {
        Vec::new()
    } else {
        n.to_bytes_be()
    }
}

/// Decode big-endian unsigned bytes. Leading zeros and the empty string are accepted.
pub fn from_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(7)
    }

    #[test]
    fn test_mod_inverse() {
        let a = BigUint::from(3u32);
        let m = BigUint::from(11u32);
        let inv = mod_inverse(&a, &m).unwrap();

        assert_eq!((a * inv) % m, BigUint::one());
    }

    #[test]
    fn test_mod_inverse_missing() {
        let m = BigUint::from(12u32);
        assert!(mod_inverse(&BigUint::from(4u32), &m).is_none());
        assert!(mod_inverse(&BigUint::zero(), &BigUint::from(23u32)).is_none());
    }

    #[test]
    fn test_mod_inverse_larger_than_modulus() {
        let inv = mod_inverse(&BigUint::from(26u32), &BigUint::from(23u32)).unwrap();
        assert_eq!(inv, BigUint::from(8u32));
    }

    #[test]
    fn test_is_probable_prime() {
        let mut rng = rng();
        for p in [2u32, 3, 5, 7, 11, 13, 23, 7919] {
            assert!(is_probable_prime(&BigUint::from(p), 20, &mut rng), "{p}");
        }
        for c in [0u32, 1, 4, 6, 8, 9, 10, 12, 15, 561, 7917] {
            assert!(!is_probable_prime(&BigUint::from(c), 20, &mut rng), "{c}");
        }
    }

    #[test]
    fn test_zero_rounds_still_tests() {
        let mut rng = rng();
        // 221 = 13 * 17 has only four strong liars in [2, 219]
        let composite = BigUint::from(221u32);
        let hits = (0..16)
            .filter(|_| is_probable_prime(&composite, 0, &mut rng))
            .count();
        assert!(hits < 16);
    }

    #[test]
    fn test_factor_powers_of_two() {
        let (s, d) = factor_powers_of_two(&BigUint::from(48u32));
        assert_eq!(s, 4);
        assert_eq!(d, BigUint::from(3u32));
    }

    #[test]
    fn test_random_prime_width() {
        let mut rng = rng();
        let p = random_prime(64, 20, None, &mut rng).unwrap();
        assert_eq!(p.bits(), 64);
        assert!(is_probable_prime(&p, 20, &mut rng));
    }

    #[test]
    fn test_random_prime_attempt_bound() {
        let mut rng = rng();
        assert!(random_prime(64, 20, Some(0), &mut rng).is_none());
    }

    #[test]
    fn test_byte_codec() {
        assert!(to_bytes(&BigUint::zero()).is_empty());
        assert_eq!(to_bytes(&BigUint::from(0x0102u32)), vec![1, 2]);
        assert_eq!(from_bytes(&[0, 0, 1, 2]), BigUint::from(0x0102u32));
        assert_eq!(from_bytes(&[]), BigUint::zero());
    }

    #[test]
    fn test_secure_rng_is_fresh() {
        let mut a = secure_rng().unwrap();
        let mut b = secure_rng().unwrap();
        assert_ne!(a.next_u64(), b.next_u64());
    }
}
