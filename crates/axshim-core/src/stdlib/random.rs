//! `srand`, `rand` and `abort` as forwards onto an [`AxRuntime`].
//!
//! These functions hold no state. Every call reaches the runtime exactly once;
//! nothing is cached, counted, or transformed beyond the `u32` to `c_int`
//! bit reinterpretation that `rand` needs.

use std::ffi::{c_int, c_uint};

use crate::runtime::AxRuntime;

/// Forward `srand(seed)` to the runtime seed primitive.
#[inline]
pub fn srand_via<R: AxRuntime + ?Sized>(runtime: &R, seed: c_uint) {
    runtime.srand(seed);
}

/// Forward `rand()` to the runtime's 32-bit primitive.
#[inline]
pub fn rand_via<R: AxRuntime + ?Sized>(runtime: &R) -> c_int {
    reinterpret_rand(runtime.rand_u32())
}

/// Forward `abort()` to the runtime panic primitive.
#[inline]
pub fn abort_via<R: AxRuntime + ?Sized>(runtime: &R) -> ! {
    runtime.panic()
}

/// Reinterpret the runtime's `u32` as the C `int` returned by `rand`.
///
/// Bit pattern is preserved; values above `i32::MAX` come out negative.
#[inline]
#[must_use]
pub const fn reinterpret_rand(value: u32) -> c_int {
    c_int::from_ne_bytes(value.to_ne_bytes())
}
