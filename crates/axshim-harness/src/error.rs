//! Harness error type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by harness tooling.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("fixture {path}: {source}")]
    Fixture {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported function '{0}'")]
    UnsupportedFunction(String),

    #[error("case input '{field}' missing or invalid")]
    BadInput { field: &'static str },

    #[error("abort cases need a probe executable")]
    NoProbe,

    #[error("invalid {what}: {message}")]
    Invalid { what: &'static str, message: String },
}
