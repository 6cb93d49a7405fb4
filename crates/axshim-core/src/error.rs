//! Error types for axshim configuration.

use thiserror::Error;

/// Errors produced while parsing runtime configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The abort strategy name is not one of the recognized spellings.
    #[error("unknown abort strategy '{0}' (expected signal, exit or panic)")]
    UnknownAbortStrategy(String),
}
