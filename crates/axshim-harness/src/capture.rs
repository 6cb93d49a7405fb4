//! Fixture capture from the reference generator.

use axshim_core::config::AbortStrategy;
use axshim_core::runtime::reference_sequence;
use serde_json::json;

use crate::error::HarnessError;
use crate::execute::MAX_DRAWS;
use crate::fixtures::{FIXTURE_VERSION, FixtureCase, FixtureSet};
use crate::structured_log::now_utc;

/// Seeds captured when none are given on the command line.
pub const DEFAULT_SEEDS: [u32; 6] = [0, 1, 2, 42, 0x7fff_ffff, u32::MAX];

/// Build a `stdlib/random` fixture set.
///
/// Every seed gets a `srand_rand` case with `count` expected draws; one
/// `rand_unseeded` case covers the default state, and each abort strategy
/// gets an `abort` case expecting termination. `count` is capped at
/// [`MAX_DRAWS`], the same bound verification enforces.
pub fn capture_random_fixture_set(seeds: &[u32], count: usize) -> Result<FixtureSet, HarnessError> {
    if count > MAX_DRAWS {
        return Err(HarnessError::Invalid {
            what: "count",
            message: format!("{count} draws exceeds the limit of {MAX_DRAWS}"),
        });
    }

    let mut cases = Vec::with_capacity(seeds.len() + 4);

    for &seed in seeds {
        cases.push(FixtureCase {
            name: format!("srand_{seed}_rand_x{count}"),
            function: "srand_rand".to_string(),
            standard_ref: "C11 7.22.2.2 srand".to_string(),
            inputs: json!({ "seed": seed, "count": count }),
            expected_output: expected_draws(seed, count)?,
        });
    }

    cases.push(FixtureCase {
        name: format!("rand_unseeded_x{count}"),
        function: "rand_unseeded".to_string(),
        standard_ref: "C11 7.22.2.1 rand".to_string(),
        inputs: json!({ "count": count }),
        expected_output: unseeded_draws(count)?,
    });

    for strategy in [
        AbortStrategy::Signal,
        AbortStrategy::Exit,
        AbortStrategy::Panic,
    ] {
        cases.push(FixtureCase {
            name: format!("abort_{strategy}"),
            function: "abort".to_string(),
            standard_ref: "C11 7.22.4.1 abort".to_string(),
            inputs: json!({ "strategy": strategy.as_str() }),
            expected_output: "terminated".to_string(),
        });
    }

    Ok(FixtureSet {
        version: FIXTURE_VERSION.to_string(),
        family: "stdlib/random".to_string(),
        captured_at: now_utc(),
        cases,
    })
}

fn expected_draws(seed: u32, count: usize) -> Result<String, HarnessError> {
    let values: Vec<i32> = reference_sequence(seed, count)
        .into_iter()
        .map(|v| v as i32)
        .collect();
    Ok(serde_json::to_string(&values)?)
}

fn unseeded_draws(count: usize) -> Result<String, HarnessError> {
    let lcg = axshim_core::runtime::Lcg::new();
    let values: Vec<i32> = (0..count).map(|_| lcg.next_u32() as i32).collect();
    Ok(serde_json::to_string(&values)?)
}
