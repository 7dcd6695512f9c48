//! Prover (C4): builds the mix, generates `R` auxiliary shuffles, derives
//! the Fiat-Shamir challenge, and answers each round per the challenge bit.

use rand_core::{CryptoRng, RngCore};
use rug::Integer;

use crate::ciphertext::Ciphertext;
use crate::config::MixConfig;
use crate::error::MixnetError;
use crate::params::CryptosystemParams;
use crate::parallel::dispatch;
use crate::progress::ProgressReporter;
use crate::shuffle::{shuffle, ShuffleWitness};
use crate::transcript::{compute_challenge, MixTranscript};

const LOG_TARGET: &str = "mixnet::prove";

/// Build a verifiable mix of `ciphers_in` under `params`. `config.rounds`
/// auxiliary shuffles are produced in parallel when `config.workers > 0`;
/// their order in the output collections always matches round index,
/// regardless of completion order.
///
/// `cancel`, if supplied, is polled between rounds: before the primary
/// shuffle, before each auxiliary round shuffle (inside [`dispatch`]), after
/// the full auxiliary batch, before the challenge hash, and before each
/// round's answer is computed. A cancelled run returns
/// `Err(MixnetError::Cancelled)` without producing a transcript.
#[tracing::instrument(
    target = LOG_TARGET,
    skip(params, ciphers_in, progress, rng, cancel),
    fields(n = ciphers_in.len(), rounds = config.rounds, workers = config.workers)
)]
pub fn mix_ciphers<R: RngCore + CryptoRng>(
    params: &CryptosystemParams,
    ciphers_in: &[Ciphertext],
    config: &MixConfig,
    progress: &dyn ProgressReporter,
    rng: &mut R,
    cancel: Option<&(dyn Fn() -> bool + Sync)>,
) -> Result<MixTranscript, MixnetError> {
    config.validate()?;
    params.validate()?;
    for cipher in ciphers_in {
        cipher.validate(params)?;
    }

    if is_cancelled(cancel) {
        return Err(MixnetError::Cancelled);
    }

    tracing::info!(
        target: LOG_TARGET,
        "mixing {} ciphers for {} rounds",
        ciphers_in.len(),
        config.rounds
    );

    progress.task(
        "Producing final mixed ciphers",
        Some(ciphers_in.len() as u64),
    );
    let primary = shuffle(params, ciphers_in, rng, progress, config.report_thresh);
    progress.finish("Producing final mixed ciphers");

    if is_cancelled(cancel) {
        return Err(MixnetError::Cancelled);
    }

    let rounds = config.rounds as usize;
    let total = ciphers_in.len() as u64 * rounds as u64;
    progress.task("Producing ciphers for proof", Some(total));

    let mut seeds = Vec::with_capacity(rounds);
    for _ in 0..rounds {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        seeds.push(seed);
    }

    let params_for_workers = params.clone();
    let ciphers_for_workers = ciphers_in.to_vec();
    let report_thresh = config.report_thresh;
    let round_items: Vec<usize> = (0..rounds).collect();

    let witnesses: Vec<ShuffleWitness> = dispatch(
        round_items,
        seeds,
        config.workers,
        cancel,
        move |_round, mut round_rng| {
            Ok(shuffle(
                &params_for_workers,
                &ciphers_for_workers,
                &mut round_rng,
                progress,
                report_thresh,
            ))
        },
    )?;
    progress.finish("Producing ciphers for proof");

    if is_cancelled(cancel) {
        return Err(MixnetError::Cancelled);
    }

    let mut cipher_collections = Vec::with_capacity(rounds);
    let mut offset_collections = Vec::with_capacity(rounds);
    let mut random_collections = Vec::with_capacity(rounds);
    for w in witnesses {
        cipher_collections.push(w.ciphers);
        offset_collections.push(w.offsets);
        random_collections.push(w.randoms);
    }

    progress.task("Producing cryptographic hash challenge", None);
    let challenge = compute_challenge(
        params,
        ciphers_in,
        &primary.ciphers,
        &cipher_collections,
    );
    progress.finish("Producing cryptographic hash challenge");

    if is_cancelled(cancel) {
        return Err(MixnetError::Cancelled);
    }

    let challenge_int = Integer::from(
        Integer::parse_radix(&challenge, 16).expect("sha256_hex always produces valid hex"),
    );
    let n = ciphers_in.len();

    progress.task("Answering according to challenge", Some(rounds as u64));
    let mut bits = crate::arith::bit_iterator(challenge_int);
    for k in 0..rounds {
        if is_cancelled(cancel) {
            return Err(MixnetError::Cancelled);
        }
        let bit = bits.next().expect("bit_iterator never terminates");
        match bit {
            0 => {
                // Nothing to do: we just publish offsets and randoms as-is.
            }
            1 => {
                let offsets = &offset_collections[k];
                let randoms = &random_collections[k];
                let mut new_offsets = vec![0usize; n];
                let mut new_randoms = vec![Integer::from(0); n];

                for j in 0..n {
                    let cipher_random = &randoms[j];
                    let cipher_offset = offsets[j];
                    let mixed_random = &primary.randoms[j];
                    let mixed_offset = primary.offsets[j];

                    new_offsets[cipher_offset] = mixed_offset;
                    new_randoms[cipher_offset] =
                        Integer::from(mixed_random - cipher_random).rem_euc(&params.order);
                }

                offset_collections[k] = new_offsets;
                random_collections[k] = new_randoms;
            }
            other => unreachable!("challenge bit must be 0 or 1, got {other}"),
        }
        progress.advance(1);
    }
    progress.finish("Answering according to challenge");

    Ok(MixTranscript {
        params: params.clone(),
        original_ciphers: ciphers_in.to_vec(),
        mixed_ciphers: primary.ciphers,
        cipher_collections,
        offset_collections,
        random_collections,
        challenge,
    })
}

fn is_cancelled(cancel: Option<&(dyn Fn() -> bool + Sync)>) -> bool {
    cancel.map(|c| c()).unwrap_or(false)
}

/// Convenience entry point for callers who don't manage their own RNG:
/// draws every random exponent, permutation, and per-round worker seed
/// straight from the OS CSPRNG rather than a caller-supplied, possibly
/// seeded, source. Prefer [`mix_ciphers`] directly when a reproducible run
/// (fixed-seed regression tests, testable property 7 of spec.md §8) is
/// needed instead.
pub fn mix_ciphers_with_os_rng(
    params: &CryptosystemParams,
    ciphers_in: &[Ciphertext],
    config: &MixConfig,
    progress: &dyn ProgressReporter,
    cancel: Option<&(dyn Fn() -> bool + Sync)>,
) -> Result<MixTranscript, MixnetError> {
    let mut rng = rand::rngs::OsRng;
    mix_ciphers(params, ciphers_in, config, progress, &mut rng, cancel)
}
