//! # axshim-core
//!
//! Safe Rust side of the axshim libc compatibility layer.
//!
//! The C entry points `srand`, `rand` and `abort` are thin forwards onto a
//! runtime's primitives. This crate defines that runtime contract
//! ([`runtime::AxRuntime`]), the reference generator behind it, and the
//! forwarding functions themselves. No `unsafe` code is permitted at the crate
//! level; the `extern "C"` symbols and process termination live in `axshim-abi`.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod runtime;
pub mod stdlib;

pub use config::{AbortStrategy, abort_strategy};
pub use error::ConfigError;
pub use runtime::{AxRuntime, Lcg};
