//! Cryptosystem primitives (C1): modular exponentiation, uniform sampling,
//! uniform random permutations, and the SHA-256 challenge hash.

use rand_core::{CryptoRng, RngCore};
use rug::integer::Order;
use rug::Integer;

const LOG_TARGET: &str = "mixnet::arith";

/// `base^exp mod modulus`, for arbitrary-precision operands.
///
/// `modulus` must be positive; this is an internal invariant of this crate
/// (never attacker-controlled without having already passed
/// [`crate::params::CryptosystemParams::validate`]), so a zero modulus is a
/// programming error, not a recoverable input error.
pub fn modpow(base: &Integer, exp: &Integer, modulus: &Integer) -> Integer {
    debug_assert!(*modulus > 0, "modpow called with non-positive modulus");
    let reduced_base = base.clone().rem_euc(modulus);
    reduced_base
        .pow_mod(exp, modulus)
        .expect("exponent is non-negative; pow_mod cannot fail")
}

/// Uniform integer in `[lo, hi)`, via rejection sampling over a CSPRNG.
///
/// Panics if `hi <= lo`; callers only invoke this with validated ranges
/// (e.g. `[3, q)` with `q` a prime far larger than 3).
pub fn rand_int<R: RngCore + CryptoRng>(lo: &Integer, hi: &Integer, rng: &mut R) -> Integer {
    assert!(hi > lo, "rand_int requires hi > lo");
    let span = Integer::from(hi - lo);
    let bits = span.significant_bits();
    let bytes_len = (bits as usize).div_ceil(8);
    let top_bits_in_last_byte = bits % 8;
    let mask: u8 = if top_bits_in_last_byte == 0 {
        0xff
    } else {
        (1u16.wrapping_shl(top_bits_in_last_byte) - 1) as u8
    };

    let mut buf = vec![0u8; bytes_len.max(1)];
    loop {
        rng.fill_bytes(&mut buf);
        if let Some(first) = buf.first_mut() {
            *first &= mask;
        }
        let candidate = Integer::from_digits(&buf, Order::Msf);
        if candidate < span {
            return Integer::from(lo + candidate);
        }
    }
}

/// Unbiased uniform value in `[0, bound)` for small (`u64`-sized) bounds,
/// via Lemire-style rejection sampling. Used by [`rand_permutation`]'s
/// Fisher-Yates core, where indices always fit comfortably in a `u64`.
pub fn rand_below_u64<R: RngCore + CryptoRng>(bound: u64, rng: &mut R) -> u64 {
    assert!(bound > 0, "rand_below_u64 requires a positive bound");
    let zone = u64::MAX - (u64::MAX % bound);
    loop {
        let v = rng.next_u64();
        if v < zone {
            return v % bound;
        }
    }
}

/// Uniform random permutation of `[0, n)` via Fisher-Yates. Must not bias:
/// every one of the `n!` permutations is equally likely. `n = 0` and `n = 1`
/// are valid and return `[]` / `[0]` without special-casing.
#[tracing::instrument(target = LOG_TARGET, skip(rng))]
pub fn rand_permutation<R: RngCore + CryptoRng>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        let j = rand_below_u64((i + 1) as u64, rng) as usize;
        perm.swap(i, j);
    }
    perm
}

/// Lowercase hex-encoded SHA-256 digest of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(bytes);
    hex::encode(digest)
}

/// Streaming SHA-256 absorber. Callers feed it plain strings (the hash
/// framing fixed by the challenge derivation has no delimiters, length
/// prefixes, or type tags) and take the lowercase hex digest at the end.
pub struct Sha256Absorb {
    hasher: sha2::Sha256,
}

impl Default for Sha256Absorb {
    fn default() -> Self {
        Self::new()
    }
}

impl Sha256Absorb {
    pub fn new() -> Self {
        use sha2::Digest;
        Self {
            hasher: sha2::Sha256::new(),
        }
    }

    pub fn update(&mut self, s: &str) {
        use sha2::Digest;
        self.hasher.update(s.as_bytes());
    }

    pub fn finalize_hex(self) -> String {
        use sha2::Digest;
        hex::encode(self.hasher.finalize())
    }
}

/// Lazily yields the bits of a non-negative integer, least-significant bit
/// first. Used to index Fiat-Shamir challenge bits into mix-net rounds.
pub struct BitIterator {
    value: Integer,
    index: u32,
}

impl BitIterator {
    pub fn new(value: Integer) -> Self {
        Self { value, index: 0 }
    }
}

impl Iterator for BitIterator {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let bit = self.value.get_bit(self.index);
        self.index += 1;
        Some(if bit { 1 } else { 0 })
    }
}

pub fn bit_iterator(k: Integer) -> BitIterator {
    BitIterator::new(k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    #[test]
    fn modpow_matches_textbook_values() {
        let p = Integer::from(23);
        assert_eq!(modpow(&Integer::from(2), &Integer::from(3), &p), 8);
        assert_eq!(modpow(&Integer::from(7), &Integer::from(4), &p), 9);
    }

    #[test]
    fn rand_int_stays_in_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let lo = Integer::from(3);
        let hi = Integer::from(11);
        for _ in 0..1000 {
            let v = rand_int(&lo, &hi, &mut rng);
            assert!(v >= lo && v < hi);
        }
    }

    #[test]
    fn rand_int_handles_large_ranges() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let lo = Integer::from(3);
        let hi = Integer::from(2u32) << 2048u32;
        for _ in 0..20 {
            let v = rand_int(&lo, &hi, &mut rng);
            assert!(v >= lo && v < hi);
        }
    }

    #[test]
    fn rand_permutation_is_a_permutation() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for n in [0usize, 1, 2, 10, 100] {
            let mut perm = rand_permutation(n, &mut rng);
            perm.sort_unstable();
            assert_eq!(perm, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn rand_permutation_n1_still_samples() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let perm = rand_permutation(1, &mut rng);
        assert_eq!(perm, vec![0]);
    }

    #[test]
    fn sha256_hex_is_lowercase_and_64_chars() {
        let digest = sha256_hex(b"hello");
        assert_eq!(digest.len(), 64);
        assert!(digest
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn bit_iterator_is_lsb_first() {
        let bits: Vec<u8> = bit_iterator(Integer::from(0b1011)).take(4).collect();
        assert_eq!(bits, vec![1, 1, 0, 1]);
    }
}
