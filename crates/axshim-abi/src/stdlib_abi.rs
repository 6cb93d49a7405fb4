//! ABI layer for the `<stdlib.h>` random-number and abort entry points.
//!
//! Each symbol is a single forward onto the installed runtime. Nothing here
//! caches values, counts calls, or keeps generator state.

use std::ffi::{c_int, c_uint};

use axshim_core::stdlib::random;

use crate::runtime_bridge;

// ---------------------------------------------------------------------------
// srand
// ---------------------------------------------------------------------------

/// C `srand`: seed the runtime's process-wide generator.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn srand(seed: c_uint) {
    random::srand_via(runtime_bridge::runtime(), seed);
}

// ---------------------------------------------------------------------------
// rand
// ---------------------------------------------------------------------------

/// C `rand`: the runtime's next 32-bit value, bit-reinterpreted as `int`.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn rand() -> c_int {
    random::rand_via(runtime_bridge::runtime())
}

// ---------------------------------------------------------------------------
// abort
// ---------------------------------------------------------------------------

/// C `abort`: hand control to the runtime panic primitive. Never returns.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn abort() -> ! {
    random::abort_via(runtime_bridge::runtime())
}
