//! Runtime backed by an externally linked `ax_*` primitive layer.

use axshim_core::runtime::AxRuntime;

unsafe extern "C" {
    fn ax_srand(seed: u32);
    fn ax_rand_u32() -> u32;
    fn ax_panic();
}

/// Forwards every primitive to the `ax_*` symbols resolved at link time.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExternRuntime;

/// The process-wide external runtime handle.
pub static EXTERN_RUNTIME: ExternRuntime = ExternRuntime;

impl AxRuntime for ExternRuntime {
    fn srand(&self, seed: u32) {
        // SAFETY: plain value argument; the runtime owns all generator state.
        unsafe { ax_srand(seed) }
    }

    fn rand_u32(&self) -> u32 {
        // SAFETY: no arguments, returns by value.
        unsafe { ax_rand_u32() }
    }

    fn panic(&self) -> ! {
        // SAFETY: no arguments.
        unsafe { ax_panic() };
        // SAFETY: `ax_panic` does not return; a runtime that returns here has
        // broken its contract and behavior is undefined.
        unsafe { core::hint::unreachable_unchecked() }
    }
}
