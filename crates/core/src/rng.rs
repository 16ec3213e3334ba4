//! Seeded random stream shared by generation and the turn loop.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Uniform integer in `min..=max`.
    pub fn range_inclusive(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max);
        let span = (i64::from(max) - i64::from(min) + 1) as u64;
        (i64::from(min) + (self.next_u64() % span) as i64) as i32
    }

    pub fn range_usize(&mut self, min: usize, max: usize) -> usize {
        debug_assert!(min <= max);
        let span = (max - min + 1) as u64;
        min + (self.next_u64() % span) as usize
    }

    /// True with probability `1 / n`.
    pub fn one_in(&mut self, n: u32) -> bool {
        n <= 1 || self.next_u64() % u64::from(n) == 0
    }

    /// True with probability `percent / 100`.
    pub fn percent(&mut self, percent: u32) -> bool {
        self.next_u64() % 100 < u64::from(percent)
    }

    /// One of -1, 0, 1.
    pub fn unit_offset(&mut self) -> i32 {
        self.range_inclusive(-1, 1)
    }

    pub fn pick<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            return None;
        }
        let index = (self.next_u64() % slice.len() as u64) as usize;
        slice.get(index)
    }
}
