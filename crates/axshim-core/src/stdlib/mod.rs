//! `<stdlib.h>` pure-logic forwards.
//!
//! Only the random-number and abort entry points are provided; the exported
//! `extern "C"` symbols live in the ABI crate.

pub mod random;

pub use random::{abort_via, rand_via, reinterpret_rand, srand_via};
