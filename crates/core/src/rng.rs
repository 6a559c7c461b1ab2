//! RNG module - deterministic tile generation
//!
//! A simple LCG drives every random choice the engine makes: initial boards,
//! refills and the target color of chain-triggered Color Bombs. The same seed
//! and the same swaps always replay to the same event stream.

use crate::types::Color;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High half only; the low bits cycle quickly.
        (self.next_u32() >> 16) % max.max(1)
    }

    /// Pick one element uniformly; `None` for an empty slice
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let i = self.next_range(items.len() as u32) as usize;
        items.get(i).copied()
    }

    /// Random color among the first `active` colors
    pub fn next_color(&mut self, active: u8) -> Color {
        let active = active.clamp(1, Color::ALL.len() as u8);
        let i = self.next_range(active as u32) as usize;
        Color::ALL[i]
    }

    /// Current RNG state (reseeding with it continues the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}
