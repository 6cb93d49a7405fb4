//! Test execution engine.

use std::path::PathBuf;

use crate::diff;
use crate::execute::execute_fixture_case;
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::verify::VerificationResult;

/// Runs a fixture set and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
    /// Executable providing the `abort-probe` subcommand, if abort cases run.
    pub probe: Option<PathBuf>,
}

impl TestRunner {
    /// Create a runner without an abort probe; abort cases report unsupported.
    #[must_use]
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
            probe: None,
        }
    }

    /// Attach the executable used for abort cases.
    #[must_use]
    pub fn with_probe(mut self, probe: impl Into<PathBuf>) -> Self {
        self.probe = Some(probe.into());
        self
    }

    /// Run all fixtures in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .map(|case| {
                let (actual, diff) = self.execute_case(case);
                VerificationResult {
                    case_name: case.name.clone(),
                    function: case.function.clone(),
                    standard_ref: case.standard_ref.clone(),
                    passed: actual == case.expected_output,
                    expected: case.expected_output.clone(),
                    actual,
                    diff,
                }
            })
            .collect()
    }

    fn execute_case(&self, case: &FixtureCase) -> (String, Option<String>) {
        match execute_fixture_case(&case.function, &case.inputs, self.probe.as_deref()) {
            Ok(run) => {
                let diff_out = if run.output != case.expected_output {
                    let mut rendered = diff::render_diff(&case.expected_output, &run.output);
                    if let Some(note) = run.note {
                        rendered.push_str(&note);
                    }
                    Some(rendered)
                } else {
                    run.note
                };
                (run.output, diff_out)
            }
            Err(err) => {
                let actual = format!("unsupported:{err}");
                let diff_out = Some(diff::render_diff(&case.expected_output, &actual));
                (actual, diff_out)
            }
        }
    }
}
