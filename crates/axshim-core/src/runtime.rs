//! Runtime primitive contract and the reference pseudo-random generator.
//!
//! The libc shim never owns generator state or termination logic. Both belong
//! to whatever implements [`AxRuntime`]: the reference runtime exported by
//! `axshim-abi`, an externally linked runtime, or a test double.

use std::sync::atomic::{AtomicU64, Ordering};

/// The three primitives the libc shim forwards onto.
pub trait AxRuntime: Sync {
    /// Set the process-wide generator seed.
    fn srand(&self, seed: u32);

    /// Produce the next 32-bit pseudo-random value.
    fn rand_u32(&self) -> u32;

    /// Terminate the calling context. Never returns.
    fn panic(&self) -> !;
}

/// LCG multiplier (Knuth's MMIX constant).
pub const LCG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;

/// LCG increment.
pub const LCG_INCREMENT: u64 = 1;

/// Generator state before anything has been seeded.
pub const LCG_DEFAULT_STATE: u64 = 0xa2ce_a2ce;

/// 64-bit linear congruential generator emitting the high 31 bits of state.
///
/// `seed(s)` stores `s - 1` so that the first draw after seeding matches the
/// traditional `srand`/`rand` pairing: seeding with 1 yields 0 first.
/// Draws are lock-free; concurrent callers each consume a distinct state
/// transition.
#[derive(Debug)]
pub struct Lcg {
    state: AtomicU64,
}

impl Lcg {
    /// Create a generator in the default unseeded state.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_state(LCG_DEFAULT_STATE)
    }

    /// Create a generator with an explicit raw state.
    #[must_use]
    pub const fn with_state(state: u64) -> Self {
        Self {
            state: AtomicU64::new(state),
        }
    }

    /// Create a generator already seeded with `seed`.
    #[must_use]
    pub const fn seeded(seed: u32) -> Self {
        Self::with_state(seed_to_state(seed))
    }

    /// Reseed the generator.
    pub fn seed(&self, seed: u32) {
        self.state.store(seed_to_state(seed), Ordering::SeqCst);
    }

    /// Advance the generator and return the next value.
    pub fn next_u32(&self) -> u32 {
        let mut current = self.state.load(Ordering::Relaxed);
        loop {
            let next = step(current);
            match self.state.compare_exchange_weak(
                current,
                next,
                Ordering::SeqCst,
                Ordering::Relaxed,
            ) {
                Ok(_) => return output(next),
                Err(observed) => current = observed,
            }
        }
    }

    /// Raw generator state, for snapshots and tests.
    #[must_use]
    pub fn state(&self) -> u64 {
        self.state.load(Ordering::SeqCst)
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
const fn seed_to_state(seed: u32) -> u64 {
    // The subtraction wraps in 32 bits before widening: seed 0 -> 0xffff_ffff.
    seed.wrapping_sub(1) as u64
}

#[inline]
const fn step(state: u64) -> u64 {
    state.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT)
}

#[inline]
const fn output(state: u64) -> u32 {
    (state >> 33) as u32
}

/// Expected draw sequence for `seed`, computed without touching any shared
/// generator. Used to build and check conformance fixtures.
#[must_use]
pub fn reference_sequence(seed: u32, count: usize) -> Vec<u32> {
    let mut state = seed_to_state(seed);
    (0..count)
        .map(|_| {
            state = step(state);
            output(state)
        })
        .collect()
}
