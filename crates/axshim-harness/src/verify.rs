//! Verification result type.

use serde::{Deserialize, Serialize};

/// Outcome of verifying one fixture case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Case name (plus strategy/mode suffix where relevant).
    pub case_name: String,
    /// Function the case exercised.
    pub function: String,
    /// Standard reference carried over from the fixture.
    pub standard_ref: String,
    /// Whether actual matched expected.
    pub passed: bool,
    /// Expected output.
    pub expected: String,
    /// Actual output.
    pub actual: String,
    /// Diff or extra notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}
