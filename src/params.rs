//! Cryptosystem parameters shared by every component.

use rug::Integer;
use serde::{Deserialize, Serialize};

use crate::bigint_serde::decimal;
use crate::error::MixnetError;

/// Immutable `(p, g, q, y)` tuple for a single election: modulus `p` (safe
/// prime, `p = 2q + 1`), generator `g` of the unique order-`q` subgroup,
/// subgroup order `q` (prime), election public key `y ∈ ⟨g⟩`.
///
/// Wire field names (`modulus`, `generator`, `order`, `public`) match the
/// key names already in use by existing published election transcripts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptosystemParams {
    #[serde(with = "decimal")]
    pub modulus: Integer,
    #[serde(with = "decimal")]
    pub generator: Integer,
    #[serde(with = "decimal")]
    pub order: Integer,
    #[serde(with = "decimal")]
    pub public: Integer,
}

impl CryptosystemParams {
    pub fn new(modulus: Integer, generator: Integer, order: Integer, public: Integer) -> Self {
        Self {
            modulus,
            generator,
            order,
            public,
        }
    }

    /// `p`, `q`, and `y` must be positive and `y` must lie in `[1, p)`.
    /// `g^q ≡ 1 (mod p)` is checked too: a generator that does not close the
    /// subgroup is as invalid as a non-positive modulus.
    pub fn validate(&self) -> Result<(), MixnetError> {
        if self.modulus <= 0 {
            return Err(MixnetError::InvalidParams(
                "modulus p must be positive".into(),
            ));
        }
        if self.order <= 0 {
            return Err(MixnetError::InvalidParams(
                "order q must be positive".into(),
            ));
        }
        if self.public == 0 {
            return Err(MixnetError::InvalidParams(
                "public key y must not be zero".into(),
            ));
        }
        if self.public < 1 || self.public >= self.modulus {
            return Err(MixnetError::InvalidParams(
                "public key y must lie in [1, p)".into(),
            ));
        }
        let subgroup_check = crate::arith::modpow(&self.generator, &self.order, &self.modulus);
        if subgroup_check != 1 {
            return Err(MixnetError::InvalidParams(
                "generator g does not generate a subgroup of order q (g^q != 1 mod p)".into(),
            ));
        }
        Ok(())
    }
}
