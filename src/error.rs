use thiserror::Error;

/// Error taxonomy for the mix-net core.
///
/// Every fallible boundary in this crate returns `Result<_, MixnetError>`.
/// Nothing is ever swallowed: a failed parallel run is a failed run, and the
/// core never silently downgrades to a sequential retry.
#[derive(Error, Debug)]
pub enum MixnetError {
    #[error("invalid cryptosystem parameters: {0}")]
    InvalidParams(String),

    #[error("invalid ciphertext component: {0}")]
    InvalidCiphertext(String),

    #[error("invalid mix transcript format: {0}")]
    InvalidFormat(String),

    #[error("recomputed challenge does not match the stored challenge")]
    InvalidChallenge,

    #[error("mixing verification failed at round {round} cipher {index} bit {bit}")]
    RoundMismatch { round: usize, index: usize, bit: u8 },

    #[error("worker failed: {0}")]
    WorkerFailure(String),

    #[error("operation cancelled")]
    Cancelled,
}
