//! Reference runtime for hosted Linux builds.
//!
//! Generator state lives in a process-wide [`Lcg`]; termination follows the
//! configured [`AbortStrategy`](axshim_core::config::AbortStrategy).

use axshim_core::config::abort_strategy;
use axshim_core::runtime::{AxRuntime, Lcg};

use crate::terminate;

/// `ax_*` primitives implemented in-process.
#[derive(Debug, Default)]
pub struct HostRuntime {
    lcg: Lcg,
}

impl HostRuntime {
    /// Create a runtime whose generator is in the default unseeded state.
    #[must_use]
    pub const fn new() -> Self {
        Self { lcg: Lcg::new() }
    }

    /// Raw generator state.
    #[must_use]
    pub fn generator_state(&self) -> u64 {
        self.lcg.state()
    }
}

impl AxRuntime for HostRuntime {
    fn srand(&self, seed: u32) {
        self.lcg.seed(seed);
    }

    fn rand_u32(&self) -> u32 {
        self.lcg.next_u32()
    }

    fn panic(&self) -> ! {
        terminate::terminate(abort_strategy())
    }
}

/// The process-wide host runtime behind `ax_srand`, `ax_rand_u32` and `ax_panic`.
pub static HOST_RUNTIME: HostRuntime = HostRuntime::new();
