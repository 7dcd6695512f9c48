//! The published `MixTranscript` record and its challenge derivation.

use rug::Integer;
use serde::{Deserialize, Serialize};

use crate::arith::Sha256Absorb;
use crate::bigint_serde::decimal_vec;
use crate::ciphertext::Ciphertext;
use crate::params::CryptosystemParams;

/// The published mix-net record. Constructed monotonically by the prover in
/// a single pass and never mutated after the challenge is computed: the
/// answer phase rewrites `offset_collections[k]`/`random_collections[k]`
/// *before* the transcript is considered complete; once serialized it is
/// immutable.
///
/// Wire field names match the key names already in use by existing
/// published election transcripts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MixTranscript {
    #[serde(flatten)]
    pub params: CryptosystemParams,
    pub original_ciphers: Vec<Ciphertext>,
    pub mixed_ciphers: Vec<Ciphertext>,
    pub cipher_collections: Vec<Vec<Ciphertext>>,
    pub offset_collections: Vec<Vec<usize>>,
    #[serde(with = "random_collections_serde")]
    pub random_collections: Vec<Vec<Integer>>,
    pub challenge: String,
}

mod random_collections_serde {
    use super::*;
    use serde::de::Error as DeError;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(value: &[Vec<Integer>], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let rows: Vec<Vec<String>> = value
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();
        rows.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Vec<Integer>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<Vec<String>>::deserialize(deserializer)?;
        rows.into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|s| Integer::parse(&s).map(Integer::from).map_err(DeError::custom))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    }
}

/// Absorb the transcript's challenge-relevant fields into SHA-256, in the
/// exact lowercase-hex, newline-free order fixed by the protocol:
/// `p, g, q, y`, then each `(α, β)` of `original_ciphers`, then each
/// `(α, β)` of `mixed_ciphers`, then each `(α, β)` of every round's cipher
/// collection in round order. This framing is load-bearing for backward
/// compatibility with existing published election transcripts; never add
/// delimiters, length prefixes, or type tags here.
pub fn compute_challenge(
    params: &CryptosystemParams,
    original_ciphers: &[Ciphertext],
    mixed_ciphers: &[Ciphertext],
    cipher_collections: &[Vec<Ciphertext>],
) -> String {
    let mut hasher = Sha256Absorb::new();

    hasher.update(&params.modulus.to_string_radix(16));
    hasher.update(&params.generator.to_string_radix(16));
    hasher.update(&params.order.to_string_radix(16));
    hasher.update(&params.public.to_string_radix(16));

    for cipher in original_ciphers {
        hasher.update(&cipher.alpha.to_string_radix(16));
        hasher.update(&cipher.beta.to_string_radix(16));
    }
    for cipher in mixed_ciphers {
        hasher.update(&cipher.alpha.to_string_radix(16));
        hasher.update(&cipher.beta.to_string_radix(16));
    }
    for collection in cipher_collections {
        for cipher in collection {
            hasher.update(&cipher.alpha.to_string_radix(16));
            hasher.update(&cipher.beta.to_string_radix(16));
        }
    }

    hasher.finalize_hex()
}
