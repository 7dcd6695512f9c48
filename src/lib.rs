//! Verifiable Sako-Kilian re-encryption mix-net for ElGamal ciphertext
//! batches over a multiplicative subgroup of `(Z/pZ)*`.
//!
//! Given a batch of ciphertexts encrypted under a shared public key, the
//! prover ([`prove::mix_ciphers`]) produces a permuted batch of
//! re-encryptions together with a non-interactive zero-knowledge proof that
//! the output is a valid permutation of re-encryptions of the input. The
//! verifier ([`verify::verify_cipher_mix`]) checks that proof from the
//! published transcript alone, without learning the permutation.

pub mod arith;
pub mod bigint_serde;
pub mod ciphertext;
pub mod config;
pub mod error;
pub mod parallel;
pub mod params;
pub mod progress;
pub mod prove;
pub mod shuffle;
pub mod transcript;
pub mod verify;

pub use ciphertext::{reencrypt, Ciphertext};
pub use config::{MixConfig, R_MIN};
pub use error::MixnetError;
pub use params::CryptosystemParams;
pub use prove::{mix_ciphers, mix_ciphers_with_os_rng};
pub use shuffle::{shuffle, ShuffleWitness};
pub use transcript::MixTranscript;
pub use verify::verify_cipher_mix;
