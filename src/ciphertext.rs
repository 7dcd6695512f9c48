//! Re-encryption primitive (C2) and the `Ciphertext` wire type.

use rand_core::{CryptoRng, RngCore};
use rug::Integer;
use serde::{Deserialize, Serialize};

use crate::arith::{modpow, rand_int};
use crate::bigint_serde::decimal;
use crate::error::MixnetError;
use crate::params::CryptosystemParams;

/// An ElGamal ciphertext `(α, β)` over a [`CryptosystemParams`] subgroup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    #[serde(with = "decimal")]
    pub alpha: Integer,
    #[serde(with = "decimal")]
    pub beta: Integer,
}

impl Ciphertext {
    pub fn new(alpha: Integer, beta: Integer) -> Self {
        Self { alpha, beta }
    }

    /// Both components must lie in `[1, p)`.
    pub fn validate(&self, params: &CryptosystemParams) -> Result<(), MixnetError> {
        if self.alpha < 1 || self.alpha >= params.modulus {
            return Err(MixnetError::InvalidCiphertext(
                "alpha out of range [1, p)".into(),
            ));
        }
        if self.beta < 1 || self.beta >= params.modulus {
            return Err(MixnetError::InvalidCiphertext(
                "beta out of range [1, p)".into(),
            ));
        }
        Ok(())
    }
}

/// Re-encrypt `(alpha, beta)` under `params`, producing `(alpha', beta', r)`
/// with `alpha' = alpha * g^r mod p`, `beta' = beta * y^r mod p`.
///
/// When `secret` is `None`, `r` is drawn uniformly from `[3, q)`; the `3`
/// excludes the trivial exponents `0, 1, 2` per the existing protocol
/// constant. When `secret` is supplied, that value is used as `r` directly
/// (the verifier uses this to recompute a round's re-encryption from a
/// published witness).
pub fn reencrypt<R: RngCore + CryptoRng>(
    params: &CryptosystemParams,
    alpha: &Integer,
    beta: &Integer,
    secret: Option<&Integer>,
    rng: &mut R,
) -> (Integer, Integer, Integer) {
    let r = match secret {
        Some(r) => r.clone(),
        None => rand_int(&Integer::from(3), &params.order, rng),
    };
    let new_alpha =
        Integer::from(alpha * modpow(&params.generator, &r, &params.modulus)) % &params.modulus;
    let new_beta = Integer::from(beta * modpow(&params.public, &r, &params.modulus)) % &params.modulus;
    (new_alpha, new_beta, r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    fn toy_params() -> CryptosystemParams {
        CryptosystemParams::new(
            Integer::from(23),
            Integer::from(2),
            Integer::from(11),
            Integer::from(4),
        )
    }

    #[test]
    fn reencrypt_with_explicit_secret_matches_hand_computation() {
        let params = toy_params();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        // S1 scenario: (3,5) with r=3 => (3*2^3 mod 23, 5*4^3 mod 23) = (1, 18)
        let (a, b, r) = reencrypt(
            &params,
            &Integer::from(3),
            &Integer::from(5),
            Some(&Integer::from(3)),
            &mut rng,
        );
        assert_eq!(a, 1);
        assert_eq!(b, 18);
        assert_eq!(r, 3);
    }

    #[test]
    fn reencrypt_samples_r_at_least_three() {
        let params = toy_params();
        let mut rng = ChaCha20Rng::seed_from_u64(99);
        for _ in 0..200 {
            let (_, _, r) = reencrypt(&params, &Integer::from(3), &Integer::from(5), None, &mut rng);
            assert!(r >= 3 && r < params.order);
        }
    }

    #[test]
    fn reencryption_round_trips_through_decryption_shape() {
        // Re-encryption preserves the ElGamal relation structurally: if we
        // decrypt with the same secret key used to derive `public`, the
        // plaintext is unchanged. We don't have the secret key here, so we
        // instead check the algebraic identity directly:
        // alpha' / g^r == alpha, beta' / y^r == beta (mod p).
        let params = toy_params();
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let alpha = Integer::from(7);
        let beta = Integer::from(9);
        let (a2, b2, r) = reencrypt(&params, &alpha, &beta, None, &mut rng);
        let g_r = crate::arith::modpow(&params.generator, &r, &params.modulus);
        let y_r = crate::arith::modpow(&params.public, &r, &params.modulus);
        let g_r_inv = g_r.invert(&params.modulus).unwrap();
        let y_r_inv = y_r.invert(&params.modulus).unwrap();
        let recovered_alpha = Integer::from(&a2 * &g_r_inv) % &params.modulus;
        let recovered_beta = Integer::from(&b2 * &y_r_inv) % &params.modulus;
        assert_eq!(recovered_alpha, alpha);
        assert_eq!(recovered_beta, beta);
    }
}
