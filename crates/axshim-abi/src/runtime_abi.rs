//! Exported `ax_*` runtime primitives backed by the host runtime.
//!
//! Code built against the runtime's own C header (`ax_srand`, `ax_rand_u32`,
//! `ax_panic`) links against these directly.

use axshim_core::runtime::AxRuntime;

use crate::host_runtime::HOST_RUNTIME;

/// Seed the host runtime's generator.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn ax_srand(seed: u32) {
    HOST_RUNTIME.srand(seed);
}

/// Draw the next value from the host runtime's generator.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn ax_rand_u32() -> u32 {
    HOST_RUNTIME.rand_u32()
}

/// Terminate the process using the configured abort strategy.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn ax_panic() -> ! {
    HOST_RUNTIME.panic()
}
