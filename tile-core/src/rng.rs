use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// Source of the solver's random draws.
///
/// The solver draws twice per step, always in the same order: first the
/// target cell, then the card. Implementations must return identical
/// sequences for identical seeds and call sequences.
pub trait TileRng {
    /// Returns an integer uniformly distributed in `[0, n)`.
    ///
    /// Callers never pass `n == 0`.
    fn int_range(&mut self, n: usize) -> usize;
}

impl<R: TileRng + ?Sized> TileRng for &mut R {
    fn int_range(&mut self, n: usize) -> usize {
        (**self).int_range(n)
    }
}

impl<R: TileRng + ?Sized> TileRng for Box<R> {
    fn int_range(&mut self, n: usize) -> usize {
        (**self).int_range(n)
    }
}

/// PCG-backed generator; a given seed yields the same draws on every platform.
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: u64,
    inner: Pcg64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg64::seed_from_u64(seed),
        }
    }

    /// Seeds from the operating system's entropy source.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this generator started from.
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl TileRng for SeededRng {
    fn int_range(&mut self, n: usize) -> usize {
        self.inner.gen_range(0..n)
    }
}

/// Deterministic draws: call `k` returns `k mod n`.
#[derive(Debug, Clone, Default)]
pub struct RoundRobinRng {
    calls: usize,
}

impl RoundRobinRng {
    pub const fn new() -> Self {
        Self { calls: 0 }
    }
}

impl TileRng for RoundRobinRng {
    fn int_range(&mut self, n: usize) -> usize {
        let value = self.calls % n;
        self.calls += 1;
        value
    }
}

/// Always draws the first value.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstRng;

impl TileRng for FirstRng {
    fn int_range(&mut self, _n: usize) -> usize {
        0
    }
}
