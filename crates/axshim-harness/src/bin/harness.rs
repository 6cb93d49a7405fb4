//! CLI entrypoint for the axshim conformance harness.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use axshim_abi::sigabrt::{SigabrtHandler, call_abort, install_sigabrt_handler};
use axshim_core::config::abort_strategy;
use axshim_harness::capture::{DEFAULT_SEEDS, capture_random_fixture_set};
use axshim_harness::execute::{ABORT_PROBE_READY, ABORT_PROBE_RETURNED};
use axshim_harness::structured_log::{
    ArtifactIndex, LogEmitter, LogEntry, LogLevel, Outcome, now_utc, validate_log_file,
};
use axshim_harness::{ConformanceReport, FixtureSet, HarnessError, TestRunner, VerificationResult};

/// Conformance tooling for axshim.
#[derive(Debug, Parser)]
#[command(name = "axshim-harness")]
#[command(about = "Conformance testing harness for the axshim libc shim")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Capture reference srand/rand sequences and abort expectations.
    Capture {
        /// Output fixture JSON path.
        #[arg(long)]
        output: PathBuf,
        /// Seeds to capture (comma-separated). Defaults to a fixed edge-case set.
        #[arg(long, value_delimiter = ',')]
        seeds: Vec<u32>,
        /// Draws per seed.
        #[arg(long, default_value_t = 16)]
        count: usize,
    },
    /// Verify the shim against a fixture set.
    Verify {
        /// Input fixture path.
        #[arg(long)]
        fixture: PathBuf,
        /// Output markdown report path.
        #[arg(long)]
        report_md: Option<PathBuf>,
        /// Output JSON report path.
        #[arg(long)]
        report_json: Option<PathBuf>,
        /// Structured JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Artifact index JSON path (hashes the reports and log).
        #[arg(long)]
        artifact_index: Option<PathBuf>,
        /// Optional fixed timestamp string for deterministic report generation.
        #[arg(long)]
        timestamp: Option<String>,
        /// Campaign name recorded in reports and logs.
        #[arg(long, default_value = "local")]
        campaign: String,
        /// Skip abort cases instead of probing in a child process.
        #[arg(long)]
        skip_abort: bool,
    },
    /// Call abort() through the shim. Used as a child process by `verify`.
    AbortProbe {
        /// SIGABRT handler to install before calling abort().
        #[arg(long, value_enum, default_value_t = HandlerChoice::Default)]
        sigabrt_handler: HandlerChoice,
    },
    /// Validate a structured JSONL log file.
    ValidateLog {
        /// JSONL log path.
        #[arg(long)]
        log: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HandlerChoice {
    /// Keep the default SIGABRT disposition.
    Default,
    /// A handler that returns.
    Return,
    /// A handler that calls abort() again.
    Reabort,
}

fn main() -> Result<(), HarnessError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Capture {
            output,
            seeds,
            count,
        } => {
            let seeds = if seeds.is_empty() {
                DEFAULT_SEEDS.to_vec()
            } else {
                seeds
            };
            let fixture = capture_random_fixture_set(&seeds, count)?;
            std::fs::write(&output, fixture.to_json()?)?;
            println!(
                "captured {} cases into {}",
                fixture.cases.len(),
                output.display()
            );
        }
        Command::Verify {
            fixture,
            report_md,
            report_json,
            log,
            artifact_index,
            timestamp,
            campaign,
            skip_abort,
        } => {
            let passed = verify(VerifyArgs {
                fixture,
                report_md,
                report_json,
                log,
                artifact_index,
                timestamp,
                campaign,
                skip_abort,
            })?;
            if !passed {
                std::process::exit(1);
            }
        }
        Command::AbortProbe { sigabrt_handler } => abort_probe(sigabrt_handler)?,
        Command::ValidateLog { log } => match validate_log_file(&log) {
            Ok(entries) => println!("{}: {} valid entries", log.display(), entries.len()),
            Err(errors) => {
                for e in &errors {
                    eprintln!("{e}");
                }
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

struct VerifyArgs {
    fixture: PathBuf,
    report_md: Option<PathBuf>,
    report_json: Option<PathBuf>,
    log: Option<PathBuf>,
    artifact_index: Option<PathBuf>,
    timestamp: Option<String>,
    campaign: String,
    skip_abort: bool,
}

fn verify(args: VerifyArgs) -> Result<bool, HarnessError> {
    let started = Instant::now();
    let mut fixture_set = FixtureSet::from_file(&args.fixture)?;
    if args.skip_abort {
        fixture_set.cases.retain(|c| c.function != "abort");
    }

    let mut runner = TestRunner::new(&args.campaign);
    if !args.skip_abort {
        runner = runner.with_probe(std::env::current_exe()?);
    }
    let results = runner.run(&fixture_set);

    let timestamp = args.timestamp.unwrap_or_else(now_utc);
    let report = ConformanceReport::new(&args.campaign, &fixture_set.family, timestamp, results);

    let mut index = ArtifactIndex::new(&args.campaign);
    if let Some(path) = &args.report_md {
        std::fs::write(path, report.to_markdown())?;
        index.add_file(path, "report_markdown")?;
    }
    if let Some(path) = &args.report_json {
        std::fs::write(path, report.to_json()?)?;
        index.add_file(path, "report_json")?;
    }
    if let Some(path) = &args.log {
        let mut emitter = LogEmitter::to_file(path, &args.campaign)?;
        emitter.emit(LogLevel::Info, "verify_start")?;
        for result in &report.results {
            emitter.emit_entry(case_entry(result, &fixture_set))?;
        }
        emitter.emit_entry(
            LogEntry::new("", LogLevel::Info, "verify_end")
                .with_outcome(Outcome::from_passed(report.all_passed()))
                .with_duration_ms(started.elapsed().as_millis() as u64)
                .with_details(serde_json::json!({
                    "total": report.total,
                    "passed": report.passed,
                    "failed": report.failed,
                })),
        )?;
        emitter.flush()?;
        drop(emitter);
        index.add_file(path, "log_jsonl")?;
    }
    if let Some(path) = &args.artifact_index {
        std::fs::write(path, index.to_json()?)?;
    }

    println!(
        "{}: {}/{} passed",
        fixture_set.family, report.passed, report.total
    );
    for r in report.results.iter().filter(|r| !r.passed) {
        eprintln!("FAIL {}\n{}", r.case_name, r.diff.as_deref().unwrap_or(""));
    }
    Ok(report.all_passed())
}

fn case_entry(result: &VerificationResult, fixture_set: &FixtureSet) -> LogEntry {
    let level = if result.passed {
        LogLevel::Info
    } else {
        LogLevel::Error
    };
    let symbol = match result.function.as_str() {
        "srand_rand" => "srand",
        "abort" => "abort",
        _ => "rand",
    };
    let mut entry = LogEntry::new("", level, "case_result")
        .with_symbol(symbol)
        .with_outcome(Outcome::from_passed(result.passed))
        .with_details(serde_json::json!({
            "case": result.case_name,
            "standard_ref": result.standard_ref,
            "expected": result.expected,
            "actual": result.actual,
            "note": result.diff,
        }));

    let inputs = fixture_set
        .cases
        .iter()
        .find(|c| c.name == result.case_name)
        .map(|c| &c.inputs);
    if let Some(seed) = inputs
        .and_then(|i| i.get("seed"))
        .and_then(serde_json::Value::as_u64)
        .and_then(|s| u32::try_from(s).ok())
    {
        entry = entry.with_seed(seed);
    }
    if let Some(strategy) = inputs
        .and_then(|i| i.get("strategy"))
        .and_then(serde_json::Value::as_str)
    {
        entry = entry.with_mode(strategy);
    }
    entry
}

#[allow(unreachable_code)]
fn abort_probe(handler: HandlerChoice) -> Result<(), HarnessError> {
    match handler {
        HandlerChoice::Default => {}
        HandlerChoice::Return => install_sigabrt_handler(SigabrtHandler::Return)?,
        HandlerChoice::Reabort => install_sigabrt_handler(SigabrtHandler::Reabort)?,
    }
    println!("{ABORT_PROBE_READY} (strategy={})", abort_strategy());
    call_abort();
    println!("{ABORT_PROBE_RETURNED}");
    Ok(())
}
