//! RNG module - seedable randomness for piece drawing.
//!
//! A simple LCG keeps draws deterministic per seed, which is what the tests
//! and any replay tooling rely on. Uses constants from Numerical Recipes.

/// Simple LCG (Linear Congruential Generator) RNG.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32.
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max).
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Current internal state, usable as a seed to continue the sequence.
    pub fn state(&self) -> u32 {
        self.state
    }
}
