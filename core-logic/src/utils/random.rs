use crate::traits::Randomness;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Production randomness, seeded from the OS.
pub struct ThreadRandomness {
    rng: StdRng,
}

impl ThreadRandomness {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible stream, handy when replaying a run.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for ThreadRandomness {
    fn default() -> Self {
        Self::new()
    }
}

impl Randomness for ThreadRandomness {
    fn uniform_u64(&mut self, min: u64, max: u64) -> u64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.rng.gen_range(lo..=hi)
    }

    fn uniform_f64(&mut self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..high)
    }
}
