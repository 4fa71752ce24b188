//! Seeded RNG for **drawing lots on ties only** (no OS entropy).
//!
//! The 64-bit seed maps to the ChaCha20 32-byte seed as `seed.to_le_bytes()`
//! in the first 8 bytes, the remaining 24 bytes zero. Range draws use
//! rejection sampling, so picks are unbiased and identical on every platform.

use alloc::vec::Vec;

use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

/// Newtype over ChaCha20Rng for tie-breaking.
#[derive(Debug, Clone)]
pub struct TieRng {
    rng: ChaCha20Rng,
    words_consumed: u64,
}

impl TieRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        let mut seed32 = [0u8; 32];
        seed32[..8].copy_from_slice(&seed.to_le_bytes());
        TieRng { rng: ChaCha20Rng::from_seed(seed32), words_consumed: 0 }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.words_consumed = self.words_consumed.saturating_add(1);
        self.rng.next_u64()
    }

    /// Uniform integer in `[0, n)`; `n` must be ≥ 1.
    pub fn gen_range(&mut self, n: u64) -> u64 {
        debug_assert!(n > 0, "gen_range requires n >= 1");
        if n <= 1 {
            return 0;
        }
        let zone = u64::MAX - (u64::MAX % n);
        loop {
            let x = self.next_u64();
            if x < zone {
                return x % n;
            }
        }
    }

    /// Draw `k` distinct items from `pool` (partial Fisher–Yates over a copy).
    /// Returns them in draw order. `k` is clamped to `pool.len()`.
    pub fn draw<T: Clone>(&mut self, pool: &[T], k: usize) -> Vec<T> {
        let mut items: Vec<T> = pool.to_vec();
        let k = k.min(items.len());
        for i in 0..k {
            let remaining = (items.len() - i) as u64;
            let j = i + self.gen_range(remaining) as usize;
            items.swap(i, j);
        }
        items.truncate(k);
        items
    }

    /// Number of 64-bit words consumed so far (rejected draws included).
    #[inline]
    pub fn words_consumed(&self) -> u64 {
        self.words_consumed
    }
}

/// Create a tie RNG from an integer seed.
#[inline]
pub fn tie_rng_from_seed(seed: u64) -> TieRng {
    TieRng::from_seed_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn same_seed_same_stream() {
        let mut a = tie_rng_from_seed(42);
        let mut b = tie_rng_from_seed(42);
        for _ in 0..16 {
            assert_eq!(a.gen_range(7), b.gen_range(7));
        }
        assert_eq!(a.words_consumed(), b.words_consumed());
    }

    #[test]
    fn gen_range_bounds() {
        let mut r = tie_rng_from_seed(7);
        for n in 1..50u64 {
            assert!(r.gen_range(n) < n);
        }
        assert_eq!(r.gen_range(1), 0);
    }

    #[test]
    fn draw_is_distinct_and_clamped() {
        let mut r = tie_rng_from_seed(1);
        let pool = vec!["A", "B", "C", "D"];
        let two = r.draw(&pool, 2);
        assert_eq!(two.len(), 2);
        assert_ne!(two[0], two[1]);
        assert!(two.iter().all(|x| pool.contains(x)));

        let all = r.draw(&pool, 9);
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(sorted, pool);
    }
}
