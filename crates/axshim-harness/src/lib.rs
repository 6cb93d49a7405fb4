//! Conformance testing harness for axshim.
//!
//! This crate provides:
//! - Fixture capture: record the reference runtime's `srand`/`rand` sequences
//!   and the expected `abort` outcomes as JSON fixture sets
//! - Fixture verify: replay fixtures through the shim and diff the results
//! - Abort probing: run `abort` in a child process and classify how it ended
//! - Structured JSONL logs and an artifact index for every verification run

#![forbid(unsafe_code)]

pub mod capture;
pub mod diff;
pub mod error;
pub mod execute;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use error::HarnessError;
pub use fixtures::{FixtureCase, FixtureSet};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::VerificationResult;
