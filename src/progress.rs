//! Purely observational progress reporting. Has no bearing on cryptographic
//! output: a `ProgressReporter` exists only so a caller's UI can show
//! advancement through a long-running shuffle or verification.

use std::sync::atomic::{AtomicU64, Ordering};

/// Implemented by callers who want progress callbacks. The default,
/// no-op implementation ([`NullProgress`]) is used when the caller passes
/// none.
pub trait ProgressReporter: Send + Sync {
    /// A named sub-task is starting, optionally with a known total unit
    /// count (e.g. `nr_ciphers * nr_rounds`).
    fn task(&self, _label: &str, _total: Option<u64>) {}

    /// `count` more units of work completed since the last call.
    fn advance(&self, _count: u64) {}

    /// The named sub-task is complete.
    fn finish(&self, _label: &str) {}
}

/// The default reporter: observes nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressReporter for NullProgress {}

/// A simple reporter that accumulates total advancement, useful for tests
/// and for callers who just want a final count rather than a live UI.
#[derive(Debug, Default)]
pub struct CountingProgress {
    total: AtomicU64,
}

impl CountingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}

impl ProgressReporter for CountingProgress {
    fn advance(&self, count: u64) {
        self.total.fetch_add(count, Ordering::Relaxed);
    }
}
