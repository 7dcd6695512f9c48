//! Parallel dispatcher (C6): fans out round-level work across a worker
//! pool, preserving input order in the output, with each worker owning an
//! independently-seeded CSPRNG.

use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use rayon::prelude::*;

use crate::error::MixnetError;

const LOG_TARGET: &str = "mixnet::parallel";

/// Run `f` over `items`, one independently-seeded CSPRNG per item, using up
/// to `workers` threads (`workers == 0` means sequential execution in the
/// calling context). Results appear in input order regardless of
/// completion order.
///
/// Each `seed` in `seeds` must already have been drawn from a properly
/// seeded source by the caller (see [`crate::prove::mix_ciphers`]); workers
/// never share or derive from a common in-flight RNG, since thread-pool
/// workers are long-lived OS threads, not forked processes. A shared RNG
/// hoisted into the closure's environment would compromise the
/// unpredictability of every round's randomness.
///
/// `cancel`, if supplied, is polled before each item starts (between rounds
/// in the sequential path; best-effort per item in the parallel path, since
/// completion order there isn't guaranteed). A cancelled run returns
/// `Err(MixnetError::Cancelled)` and discards every partial output, the same
/// way any other worker error does.
///
/// If `f` returns an error for any item, the first error (by input order)
/// is surfaced to the caller and every partial output is discarded; the
/// dispatcher never downgrades a failed parallel run to a partial success.
#[tracing::instrument(target = LOG_TARGET, skip(items, seeds, cancel, f), fields(n = items.len(), workers))]
pub fn dispatch<T, R, F>(
    items: Vec<T>,
    seeds: Vec<[u8; 32]>,
    workers: usize,
    cancel: Option<&(dyn Fn() -> bool + Sync)>,
    f: F,
) -> Result<Vec<R>, MixnetError>
where
    T: Send,
    R: Send,
    F: Fn(T, ChaCha20Rng) -> Result<R, MixnetError> + Sync,
{
    assert_eq!(items.len(), seeds.len(), "one seed per item is required");
    let paired: Vec<(T, [u8; 32])> = items.into_iter().zip(seeds).collect();
    let is_cancelled = || cancel.map(|c| c()).unwrap_or(false);

    if workers == 0 {
        tracing::debug!(target: LOG_TARGET, "running sequentially (workers = 0)");
        paired
            .into_iter()
            .map(|(item, seed)| {
                if is_cancelled() {
                    return Err(MixnetError::Cancelled);
                }
                f(item, ChaCha20Rng::from_seed(seed))
            })
            .collect()
    } else {
        tracing::debug!(target: LOG_TARGET, workers, "running on a rayon thread pool");
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| MixnetError::WorkerFailure(e.to_string()))?;
        pool.install(|| {
            paired
                .into_par_iter()
                .map(|(item, seed)| {
                    if is_cancelled() {
                        return Err(MixnetError::Cancelled);
                    }
                    f(item, ChaCha20Rng::from_seed(seed))
                })
                .collect()
        })
    }
}
