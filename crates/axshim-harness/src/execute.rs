//! Fixture case execution against the shim.
//!
//! `srand`/`rand` cases run in-process on a private host runtime so that cases
//! cannot disturb each other's generator state. `abort` cases run the harness
//! binary's `abort-probe` subcommand in a child process and classify how it
//! ended.

use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::Command;

use axshim_abi::host_runtime::HostRuntime;
use axshim_core::config::ABORT_MODE_ENV;
use axshim_core::stdlib::{rand_via, srand_via};
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// Printed by the probe right before it calls `abort`.
pub const ABORT_PROBE_READY: &str = "axshim-abort-probe: calling abort";
/// Printed by the probe only if `abort` came back.
pub const ABORT_PROBE_RETURNED: &str = "axshim-abort-probe: abort returned";

/// Upper bound on draws per case.
pub const MAX_DRAWS: usize = 1 << 16;

/// Result of executing one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRun {
    /// Normalized output compared against the fixture expectation.
    pub output: String,
    /// Extra observations that do not take part in the comparison.
    pub note: Option<String>,
}

/// How an abort probe child process ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbortOutcome {
    /// Abort strategy requested through the environment.
    pub strategy: String,
    /// The probe reached the `abort` call.
    pub started: bool,
    /// Code after `abort` ran.
    pub returned: bool,
    /// Exit code, when the child exited normally.
    pub exit_code: Option<i32>,
    /// Terminating signal, when the child was killed.
    pub signal: Option<i32>,
}

impl AbortOutcome {
    /// Normalized classification used as the fixture output.
    #[must_use]
    pub fn classify(&self) -> &'static str {
        if !self.started {
            "probe_failed"
        } else if self.returned {
            "returned"
        } else if self.exit_code == Some(0) {
            "exited_cleanly"
        } else {
            "terminated"
        }
    }

    /// Human-readable termination detail (`signal=6`, `exit=134`).
    #[must_use]
    pub fn detail(&self) -> String {
        match (self.signal, self.exit_code) {
            (Some(sig), _) => format!("signal={sig}"),
            (None, Some(code)) => format!("exit={code}"),
            (None, None) => "unknown".to_string(),
        }
    }
}

/// Execute one fixture case.
pub fn execute_fixture_case(
    function: &str,
    inputs: &serde_json::Value,
    probe: Option<&Path>,
) -> Result<CaseRun, HarnessError> {
    match function {
        "srand_rand" => {
            let seed = input_u32(inputs, "seed")?;
            let count = input_count(inputs)?;
            let runtime = HostRuntime::new();
            srand_via(&runtime, seed);
            draw(&runtime, count)
        }
        "rand_unseeded" => {
            let count = input_count(inputs)?;
            draw(&HostRuntime::new(), count)
        }
        "abort" => {
            let strategy = inputs
                .get("strategy")
                .and_then(serde_json::Value::as_str)
                .ok_or(HarnessError::BadInput { field: "strategy" })?;
            let probe = probe.ok_or(HarnessError::NoProbe)?;
            let outcome = run_abort_probe(probe, strategy)?;
            Ok(CaseRun {
                output: outcome.classify().to_string(),
                note: Some(outcome.detail()),
            })
        }
        other => Err(HarnessError::UnsupportedFunction(other.to_string())),
    }
}

fn draw(runtime: &HostRuntime, count: usize) -> Result<CaseRun, HarnessError> {
    let values: Vec<i32> = (0..count).map(|_| rand_via(runtime)).collect();
    Ok(CaseRun {
        output: serde_json::to_string(&values)?,
        note: None,
    })
}

fn input_u32(inputs: &serde_json::Value, field: &'static str) -> Result<u32, HarnessError> {
    inputs
        .get(field)
        .and_then(serde_json::Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or(HarnessError::BadInput { field })
}

fn input_count(inputs: &serde_json::Value) -> Result<usize, HarnessError> {
    inputs
        .get("count")
        .and_then(serde_json::Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .filter(|&n| n <= MAX_DRAWS)
        .ok_or(HarnessError::BadInput { field: "count" })
}

/// Spawn `probe abort-probe` with `strategy` and observe how it ends.
pub fn run_abort_probe(probe: &Path, strategy: &str) -> Result<AbortOutcome, HarnessError> {
    run_abort_probe_with_handler(probe, strategy, None)
}

/// Like [`run_abort_probe`], first installing a `SIGABRT` handler in the child
/// (`return` or `reabort`).
pub fn run_abort_probe_with_handler(
    probe: &Path,
    strategy: &str,
    sigabrt_handler: Option<&str>,
) -> Result<AbortOutcome, HarnessError> {
    let mut command = Command::new(probe);
    command.arg("abort-probe").env(ABORT_MODE_ENV, strategy);
    if let Some(handler) = sigabrt_handler {
        command.args(["--sigabrt-handler", handler]);
    }
    let output = command.output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(AbortOutcome {
        strategy: strategy.to_string(),
        started: stdout.contains(ABORT_PROBE_READY),
        returned: stdout.contains(ABORT_PROBE_RETURNED),
        exit_code: output.status.code(),
        signal: output.status.signal(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axshim_core::runtime::reference_sequence;
    use serde_json::json;

    #[test]
    fn srand_rand_case_matches_reference_sequence() {
        let run = execute_fixture_case("srand_rand", &json!({"seed": 5, "count": 3}), None)
            .expect("case runs");
        let expected: Vec<i32> = reference_sequence(5, 3).iter().map(|&v| v as i32).collect();
        assert_eq!(run.output, serde_json::to_string(&expected).expect("json"));
        assert_eq!(run.note, None);
    }

    #[test]
    fn cases_do_not_share_generator_state() {
        let inputs = json!({"seed": 8, "count": 4});
        let a = execute_fixture_case("srand_rand", &inputs, None).expect("first");
        let b = execute_fixture_case("srand_rand", &inputs, None).expect("second");
        assert_eq!(a, b);
    }

    #[test]
    fn zero_count_yields_empty_array() {
        let run = execute_fixture_case("rand_unseeded", &json!({"count": 0}), None)
            .expect("case runs");
        assert_eq!(run.output, "[]");
    }

    #[test]
    fn bad_inputs_are_reported() {
        let err = execute_fixture_case("srand_rand", &json!({"seed": -1, "count": 1}), None)
            .expect_err("negative seed");
        assert!(matches!(err, HarnessError::BadInput { field: "seed" }));

        let err = execute_fixture_case("srand_rand", &json!({"seed": 1, "count": 1u64 << 40}), None)
            .expect_err("count too large");
        assert!(matches!(err, HarnessError::BadInput { field: "count" }));
    }

    #[test]
    fn abort_without_probe_is_an_error() {
        let err = execute_fixture_case("abort", &json!({"strategy": "exit"}), None)
            .expect_err("no probe");
        assert!(matches!(err, HarnessError::NoProbe));
    }

    #[test]
    fn unknown_function_is_unsupported() {
        let err = execute_fixture_case("random", &json!({}), None).expect_err("unsupported");
        assert_eq!(err.to_string(), "unsupported function 'random'");
    }

    #[test]
    fn abort_outcome_classification() {
        let mut outcome = AbortOutcome {
            strategy: "signal".into(),
            started: true,
            returned: false,
            exit_code: None,
            signal: Some(6),
        };
        assert_eq!(outcome.classify(), "terminated");
        assert_eq!(outcome.detail(), "signal=6");

        outcome.returned = true;
        assert_eq!(outcome.classify(), "returned");

        outcome.returned = false;
        outcome.signal = None;
        outcome.exit_code = Some(0);
        assert_eq!(outcome.classify(), "exited_cleanly");

        outcome.started = false;
        assert_eq!(outcome.classify(), "probe_failed");
    }
}
