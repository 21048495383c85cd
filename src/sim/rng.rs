//! Linear congruential generator
//!
//! Uses GCC's constants so sequences match any other implementation seeded
//! the same way. The generator is a `Copy` value: drawing returns the sample
//! together with the successor, and the caller threads it forward.

use serde::{Deserialize, Serialize};

const MODULUS: u64 = 1 << 31;
const MULTIPLIER: u64 = 1_103_515_245;
const INCREMENT: u64 = 12_345;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Lcg {
    seed: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    pub fn seed(self) -> u32 {
        self.seed
    }

    fn next_int(self) -> u32 {
        // seed < 2^32 and MULTIPLIER < 2^31, so the product fits in u64
        ((MULTIPLIER * self.seed as u64 + INCREMENT) % MODULUS) as u32
    }

    /// Draw a sample in `[0, 1]` and the generator to use for the next draw
    #[must_use]
    pub fn draw(self) -> (f64, Lcg) {
        let next = self.next_int();
        (next as f64 / (MODULUS - 1) as f64, Lcg::new(next))
    }
}
