use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Mutex;

/// Source of uniform random indices for picking a recommendation
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send + Sync {
    /// Returns an index drawn uniformly from `[0, len)`. `len` is never zero.
    fn pick_index(&self, len: usize) -> usize;
}

/// Thread-local OS-seeded generator used in production
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Seeded generator that yields the same picks for the same seed
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick_index(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_random_stays_in_range() {
        let random = ThreadRandom;
        for len in 1..50 {
            assert!(random.pick_index(len) < len);
        }
    }

    #[test]
    fn test_single_element_always_zero() {
        let random = SeededRandom::new(7);
        for _ in 0..20 {
            assert_eq!(random.pick_index(1), 0);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);

        let first: Vec<usize> = (0..32).map(|_| a.pick_index(100)).collect();
        let second: Vec<usize> = (0..32).map(|_| b.pick_index(100)).collect();
        assert_eq!(first, second);
    }
}
