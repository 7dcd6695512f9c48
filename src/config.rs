//! The one configuration surface the core exposes. No environment
//! variables, no files, no CLI: the caller constructs a [`MixConfig`] and
//! passes it in.

use crate::error::MixnetError;
use crate::shuffle::DEFAULT_REPORT_THRESH;

/// Minimum accepted number of auxiliary shuffle rounds. Rejected by the
/// prover below this floor; the verifier accepts whatever round count a
/// transcript declares, since historic transcripts may exist at exactly
/// this minimum.
pub const R_MIN: u32 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MixConfig {
    /// Number of auxiliary shuffle rounds `R`. Must be `>= R_MIN`.
    pub rounds: u32,
    /// Worker count for the parallel dispatcher. `0` means sequential.
    pub workers: usize,
    /// Batch size at which the progress reporter is advanced.
    pub report_thresh: u32,
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            rounds: R_MIN,
            workers: 0,
            report_thresh: DEFAULT_REPORT_THRESH,
        }
    }
}

impl MixConfig {
    pub fn validate(&self) -> Result<(), MixnetError> {
        if self.rounds < R_MIN {
            return Err(MixnetError::InvalidParams(format!(
                "rounds must be >= {R_MIN}, got {}",
                self.rounds
            )));
        }
        if self.report_thresh == 0 {
            return Err(MixnetError::InvalidParams(
                "report_thresh must be positive".into(),
            ));
        }
        Ok(())
    }
}
