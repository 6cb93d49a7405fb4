//! Runtime bridge for ABI entrypoints.
//!
//! Holds the process-wide [`AxRuntime`] that `srand`, `rand` and `abort`
//! forward to. A different runtime may be installed once, before the first
//! entry point touches the bridge; after that the choice is sealed.

use std::sync::atomic::{AtomicPtr, AtomicU8, Ordering};

use axshim_core::runtime::AxRuntime;
use thiserror::Error;

// Slot lifecycle states.
const STATE_EMPTY: u8 = 0;
const STATE_INSTALLING: u8 = 1;
const STATE_INSTALLED: u8 = 2;
const STATE_SEALED: u8 = 3;

/// Reasons a runtime installation is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InstallError {
    /// Another runtime was installed first.
    #[error("a runtime is already installed")]
    AlreadyInstalled,
    /// An entry point already used the default runtime.
    #[error("the default runtime is already in use")]
    AlreadyInUse,
}

/// Install-once holder for a `&'static dyn AxRuntime`.
///
/// Uses a plain atomic state machine (EMPTY -> INSTALLING -> INSTALLED, or
/// EMPTY -> SEALED) instead of OnceLock, whose futex wait can deadlock when a
/// libc entry point is re-entered during initialization.
pub struct RuntimeSlot {
    state: AtomicU8,
    // Leaked box holding the installed fat reference; valid once INSTALLED.
    installed: AtomicPtr<&'static dyn AxRuntime>,
    default: &'static dyn AxRuntime,
}

impl RuntimeSlot {
    /// Create an empty slot that falls back to `default`.
    #[must_use]
    pub const fn new(default: &'static dyn AxRuntime) -> Self {
        Self {
            state: AtomicU8::new(STATE_EMPTY),
            installed: AtomicPtr::new(std::ptr::null_mut()),
            default,
        }
    }

    /// Install `runtime` in place of the default.
    pub fn install(&self, runtime: &'static dyn AxRuntime) -> Result<(), InstallError> {
        // Allocate before claiming the slot so nothing between INSTALLING and
        // INSTALLED can re-enter the allocator.
        let ptr = Box::into_raw(Box::new(runtime));

        if let Err(observed) = self.state.compare_exchange(
            STATE_EMPTY,
            STATE_INSTALLING,
            Ordering::SeqCst,
            Ordering::Acquire,
        ) {
            // SAFETY: `ptr` came from `Box::into_raw` above and was never shared.
            drop(unsafe { Box::from_raw(ptr) });
            return Err(if observed == STATE_SEALED {
                InstallError::AlreadyInUse
            } else {
                InstallError::AlreadyInstalled
            });
        }

        self.installed.store(ptr, Ordering::Release);
        self.state.store(STATE_INSTALLED, Ordering::Release);
        Ok(())
    }

    /// The runtime entry points should forward to. Seals the slot on first use.
    ///
    /// While an install is in flight the default is handed out without
    /// sealing, so a re-entrant call never waits on the installer.
    pub fn get(&self) -> &'static dyn AxRuntime {
        loop {
            match self.state.load(Ordering::Acquire) {
                STATE_INSTALLED => {
                    let ptr = self.installed.load(Ordering::Acquire);
                    // SAFETY: once INSTALLED, `installed` points at a leaked box
                    // that is never written again.
                    return unsafe { *ptr };
                }
                STATE_SEALED | STATE_INSTALLING => return self.default,
                _ => {
                    // Lost races land back in the loop and read the winner.
                    let _ = self.state.compare_exchange(
                        STATE_EMPTY,
                        STATE_SEALED,
                        Ordering::SeqCst,
                        Ordering::Relaxed,
                    );
                }
            }
        }
    }

    /// Returns true if a runtime other than the default was installed.
    #[must_use]
    pub fn is_overridden(&self) -> bool {
        self.state.load(Ordering::Acquire) == STATE_INSTALLED
    }
}

#[cfg(any(test, not(feature = "external-runtime")))]
static RUNTIME: RuntimeSlot = RuntimeSlot::new(&crate::host_runtime::HOST_RUNTIME);

#[cfg(all(not(test), feature = "external-runtime"))]
static RUNTIME: RuntimeSlot = RuntimeSlot::new(&crate::extern_runtime::EXTERN_RUNTIME);

/// The process-wide runtime.
#[must_use]
pub fn runtime() -> &'static dyn AxRuntime {
    RUNTIME.get()
}

/// Replace the default runtime for this process.
///
/// Must run before any `srand`/`rand`/`abort` call reaches the bridge.
pub fn install_runtime(runtime: &'static dyn AxRuntime) -> Result<(), InstallError> {
    RUNTIME.install(runtime)
}

/// Returns true if [`install_runtime`] succeeded in this process.
#[must_use]
pub fn runtime_overridden() -> bool {
    RUNTIME.is_overridden()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    struct Fixed(u32);

    impl AxRuntime for Fixed {
        fn srand(&self, _seed: u32) {}

        fn rand_u32(&self) -> u32 {
            self.0
        }

        fn panic(&self) -> ! {
            panic!("fixed runtime abort");
        }
    }

    struct LastSeed(AtomicU32);

    impl AxRuntime for LastSeed {
        fn srand(&self, seed: u32) {
            self.0.store(seed, Ordering::SeqCst);
        }

        fn rand_u32(&self) -> u32 {
            self.0.load(Ordering::SeqCst)
        }

        fn panic(&self) -> ! {
            panic!("last-seed runtime abort");
        }
    }

    static DEFAULT: Fixed = Fixed(1);
    static OTHER: Fixed = Fixed(2);
    static THIRD: Fixed = Fixed(3);

    #[test]
    fn empty_slot_falls_back_to_default_and_seals() {
        let slot = RuntimeSlot::new(&DEFAULT);
        assert_eq!(slot.get().rand_u32(), 1);
        assert!(!slot.is_overridden());
        assert_eq!(slot.install(&OTHER), Err(InstallError::AlreadyInUse));
        assert_eq!(slot.get().rand_u32(), 1);
    }

    #[test]
    fn install_before_use_wins() {
        let slot = RuntimeSlot::new(&DEFAULT);
        assert_eq!(slot.install(&OTHER), Ok(()));
        assert!(slot.is_overridden());
        assert_eq!(slot.get().rand_u32(), 2);
    }

    #[test]
    fn second_install_is_refused() {
        let slot = RuntimeSlot::new(&DEFAULT);
        slot.install(&OTHER).expect("first install");
        assert_eq!(slot.install(&THIRD), Err(InstallError::AlreadyInstalled));
        assert_eq!(slot.get().rand_u32(), 2);
    }

    #[test]
    fn installed_runtime_sees_forwarded_seeds() {
        static SEEDED: LastSeed = LastSeed(AtomicU32::new(0));
        let slot = RuntimeSlot::new(&DEFAULT);
        slot.install(&SEEDED).expect("install");
        slot.get().srand(77);
        assert_eq!(slot.get().rand_u32(), 77);
    }

    #[test]
    fn concurrent_first_use_agrees_on_one_runtime() {
        static SLOT: RuntimeSlot = RuntimeSlot::new(&DEFAULT);
        let handles: Vec<_> = (0..8)
            .map(|i| {
                std::thread::spawn(move || {
                    if i % 2 == 0 {
                        let _ = SLOT.install(&OTHER);
                    }
                    SLOT.get().rand_u32()
                })
            })
            .collect();
        let seen: Vec<u32> = handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .collect();
        assert!(seen.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn lookup_during_install_gets_default_without_sealing() {
        let slot = RuntimeSlot::new(&DEFAULT);
        slot.state.store(STATE_INSTALLING, Ordering::SeqCst);

        assert_eq!(slot.get().rand_u32(), 1);
        assert_eq!(slot.state.load(Ordering::SeqCst), STATE_INSTALLING);

        let ptr = Box::into_raw(Box::new(&OTHER as &'static dyn AxRuntime));
        slot.installed.store(ptr, Ordering::Release);
        slot.state.store(STATE_INSTALLED, Ordering::Release);
        assert_eq!(slot.get().rand_u32(), 2);
        assert!(slot.is_overridden());
    }

    #[test]
    fn refused_install_leaves_slot_untouched() {
        let slot = RuntimeSlot::new(&DEFAULT);
        slot.install(&OTHER).expect("first install");
        for _ in 0..16 {
            assert_eq!(slot.install(&THIRD), Err(InstallError::AlreadyInstalled));
        }
        assert_eq!(slot.get().rand_u32(), 2);
    }

    #[test]
    fn install_error_messages() {
        assert_eq!(
            InstallError::AlreadyInstalled.to_string(),
            "a runtime is already installed"
        );
        assert_eq!(
            InstallError::AlreadyInUse.to_string(),
            "the default runtime is already in use"
        );
    }
}
