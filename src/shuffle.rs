//! Shuffle engine (C3): produces a uniformly permuted re-encryption of a
//! ciphertext vector, together with its permutation and randomness
//! witnesses.

use rand_core::{CryptoRng, RngCore};
use rug::Integer;
use serde::{Deserialize, Serialize};

use crate::arith::rand_permutation;
use crate::bigint_serde::decimal_vec;
use crate::ciphertext::{reencrypt, Ciphertext};
use crate::params::CryptosystemParams;
use crate::progress::ProgressReporter;

const LOG_TARGET: &str = "mixnet::shuffle";

/// Default batch size at which the progress reporter is advanced. Purely
/// about synchronization overhead, with zero bearing on correctness.
pub const DEFAULT_REPORT_THRESH: u32 = 128;

/// A shuffle's witness bundle: `ciphers'[offsets[i]] = Reenc(ciphers[i],
/// randoms[i])` for every `i`, with `offsets` a permutation of `[0, n)` and
/// every `randoms[i]` drawn uniformly from `[3, q)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShuffleWitness {
    pub ciphers: Vec<Ciphertext>,
    pub offsets: Vec<usize>,
    #[serde(with = "decimal_vec")]
    pub randoms: Vec<Integer>,
}

/// Produce a uniformly permuted re-encryption of `ciphers`.
///
/// `n = 0` yields empty vectors. `n = 1` still samples a fresh random `r`
/// and shuffles (trivially); this must not be short-circuited, or the
/// shuffle's uniformity across `S_n` breaks for `n = 1` callers.
#[tracing::instrument(target = LOG_TARGET, skip(params, ciphers, rng, progress), fields(n = ciphers.len()))]
pub fn shuffle<R: RngCore + CryptoRng>(
    params: &CryptosystemParams,
    ciphers: &[Ciphertext],
    rng: &mut R,
    progress: &dyn ProgressReporter,
    report_thresh: u32,
) -> ShuffleWitness {
    let n = ciphers.len();
    let offsets = rand_permutation(n, rng);
    let mut out_ciphers: Vec<Option<Ciphertext>> = vec![None; n];
    let mut randoms: Vec<Integer> = Vec::with_capacity(n);

    let mut batch = 0u32;
    for i in 0..n {
        let (alpha, beta, r) = reencrypt(
            params,
            &ciphers[i].alpha,
            &ciphers[i].beta,
            None,
            rng,
        );
        randoms.push(r);
        out_ciphers[offsets[i]] = Some(Ciphertext::new(alpha, beta));

        batch += 1;
        if batch >= report_thresh.max(1) {
            progress.advance(batch as u64);
            batch = 0;
        }
    }
    if batch > 0 {
        progress.advance(batch as u64);
    }

    let ciphers = out_ciphers
        .into_iter()
        .map(|c| c.expect("every offset position is written exactly once"))
        .collect();

    ShuffleWitness {
        ciphers,
        offsets,
        randoms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;
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
    fn offsets_are_always_a_permutation() {
        let params = toy_params();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        for n in [0usize, 1, 2, 5, 37] {
            let ciphers: Vec<Ciphertext> = (0..n)
                .map(|i| Ciphertext::new(Integer::from(3 + i), Integer::from(5 + i)))
                .collect();
            let witness = shuffle(&params, &ciphers, &mut rng, &NullProgress, 128);
            let mut sorted = witness.offsets.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..n).collect::<Vec<_>>());
            assert_eq!(witness.randoms.len(), n);
            assert_eq!(witness.ciphers.len(), n);
        }
    }

    #[test]
    fn reencryption_equality_holds_for_every_index() {
        let params = toy_params();
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let ciphers = vec![
            Ciphertext::new(Integer::from(3), Integer::from(5)),
            Ciphertext::new(Integer::from(7), Integer::from(9)),
            Ciphertext::new(Integer::from(11), Integer::from(13)),
        ];
        let witness = shuffle(&params, &ciphers, &mut rng, &NullProgress, 128);
        for i in 0..ciphers.len() {
            let (expected_a, expected_b, _) = reencrypt(
                &params,
                &ciphers[i].alpha,
                &ciphers[i].beta,
                Some(&witness.randoms[i]),
                &mut rng,
            );
            let out = &witness.ciphers[witness.offsets[i]];
            assert_eq!(out.alpha, expected_a);
            assert_eq!(out.beta, expected_b);
        }
    }

    #[test]
    fn n1_still_samples_a_random_r_and_shuffles() {
        let params = toy_params();
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let ciphers = vec![Ciphertext::new(Integer::from(3), Integer::from(5))];
        let witness = shuffle(&params, &ciphers, &mut rng, &NullProgress, 128);
        assert_eq!(witness.offsets, vec![0]);
        assert!(witness.randoms[0] >= 3);
    }

    #[test]
    fn progress_reporter_is_advanced_in_batches() {
        use crate::progress::CountingProgress;
        let params = toy_params();
        let mut rng = ChaCha20Rng::seed_from_u64(13);
        let ciphers: Vec<Ciphertext> = (0..300)
            .map(|i| Ciphertext::new(Integer::from(3 + i), Integer::from(5 + i)))
            .collect();
        let progress = CountingProgress::new();
        shuffle(&params, &ciphers, &mut rng, &progress, 128);
        assert_eq!(progress.total(), 300);
    }
}
