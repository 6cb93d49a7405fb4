// All extern "C" ABI exports take no pointers and cannot fail; per-function
// safety docs would be boilerplate.
#![allow(clippy::missing_safety_doc)]
//! # axshim-abi
//!
//! ABI-compatible extern "C" boundary layer for axshim.
//!
//! This crate produces a `cdylib` exposing `srand`, `rand` and `abort`. Each
//! entry point forwards onto the runtime held by [`runtime_bridge`]:
//!
//! ```text
//! C caller -> ABI entry (this crate) -> runtime bridge -> AxRuntime primitive
//! ```
//!
//! By default the runtime is [`host_runtime::HostRuntime`], which is also
//! exported as the `ax_srand`, `ax_rand_u32` and `ax_panic` primitives. With
//! the `external-runtime` feature those three symbols are imported instead and
//! the shim forwards to whatever the final link provides.

#[cfg(feature = "external-runtime")]
pub mod extern_runtime;
pub mod host_runtime;
pub mod runtime_bridge;
mod terminate;

// Gated behind cfg(not(test)) because these modules export #[no_mangle]
// symbols (rand, abort, ...) that would shadow the host libc in the test binary.
#[cfg(all(not(test), not(feature = "external-runtime")))]
pub mod runtime_abi;
#[cfg(not(test))]
pub mod sigabrt;
#[cfg(not(test))]
pub mod stdlib_abi;
