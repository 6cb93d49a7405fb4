//! Runtime termination configuration.
//!
//! The reference runtime's `ax_panic` primitive terminates the process the way
//! the `AXSHIM_ABORT_MODE` environment variable says:
//! - `signal` (default): raise `SIGABRT` like a conformant C `abort`, falling
//!   back to `exit_group(134)` if the signal does not terminate the process.
//! - `exit`: `exit_group(134)` immediately, no signal and no core dump.
//! - `panic`: raise a Rust panic. Unwinding out of the `extern "C"` frame makes
//!   the Rust runtime abort the process after the panic hook runs.

use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::ConfigError;

/// Environment variable that selects the [`AbortStrategy`].
pub const ABORT_MODE_ENV: &str = "AXSHIM_ABORT_MODE";

/// Exit status used when termination falls back to `exit_group` (128 + SIGABRT).
pub const ABORT_EXIT_STATUS: i32 = 134;

/// How the reference runtime terminates on `ax_panic`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbortStrategy {
    /// Raise `SIGABRT`; `exit_group(134)` if a handler swallows it.
    #[default]
    Signal,
    /// `exit_group(134)` without raising a signal.
    Exit,
    /// Rust panic, which aborts when it reaches the C boundary.
    Panic,
}

impl AbortStrategy {
    /// Parse from string (case-insensitive). Unknown names fall back to `Signal`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Canonical lowercase name, as accepted by `AXSHIM_ABORT_MODE`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Signal => "signal",
            Self::Exit => "exit",
            Self::Panic => "panic",
        }
    }

    /// Returns true if this strategy delivers `SIGABRT` to the process.
    #[must_use]
    pub const fn raises_signal(self) -> bool {
        matches!(self, Self::Signal)
    }
}

impl FromStr for AbortStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "signal" | "sigabrt" | "default" | "abi" => Ok(Self::Signal),
            "exit" | "exit_group" | "quiet" => Ok(Self::Exit),
            "panic" | "unwind" | "rust" => Ok(Self::Panic),
            _ => Err(ConfigError::UnknownAbortStrategy(s.to_string())),
        }
    }
}

impl std::fmt::Display for AbortStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Atomic cache: 0=unresolved, 1=Signal, 2=Exit, 3=Panic, 255=resolving.
// A non-blocking state machine instead of OnceLock: std::env::var may call
// back into exported libc symbols while the cache is being filled.
static CACHED_STRATEGY: AtomicU8 = AtomicU8::new(0);

const STRATEGY_UNRESOLVED: u8 = 0;
const STRATEGY_SIGNAL: u8 = 1;
const STRATEGY_EXIT: u8 = 2;
const STRATEGY_PANIC: u8 = 3;
const STRATEGY_RESOLVING: u8 = 255;

fn strategy_to_u8(strategy: AbortStrategy) -> u8 {
    match strategy {
        AbortStrategy::Signal => STRATEGY_SIGNAL,
        AbortStrategy::Exit => STRATEGY_EXIT,
        AbortStrategy::Panic => STRATEGY_PANIC,
    }
}

fn u8_to_strategy(v: u8) -> AbortStrategy {
    match v {
        STRATEGY_EXIT => AbortStrategy::Exit,
        STRATEGY_PANIC => AbortStrategy::Panic,
        _ => AbortStrategy::Signal,
    }
}

/// Get the configured abort strategy (reads the env var on first call, caches
/// thereafter).
///
/// A re-entrant call that arrives while the environment is being read sees the
/// RESOLVING state and gets `Signal`.
#[must_use]
pub fn abort_strategy() -> AbortStrategy {
    let cached = CACHED_STRATEGY.load(Ordering::Relaxed);

    if cached != STRATEGY_UNRESOLVED && cached != STRATEGY_RESOLVING {
        return u8_to_strategy(cached);
    }

    if cached == STRATEGY_RESOLVING {
        return AbortStrategy::Signal;
    }

    if CACHED_STRATEGY
        .compare_exchange(
            STRATEGY_UNRESOLVED,
            STRATEGY_RESOLVING,
            Ordering::SeqCst,
            Ordering::Relaxed,
        )
        .is_err()
    {
        let v = CACHED_STRATEGY.load(Ordering::Relaxed);
        return if v != STRATEGY_UNRESOLVED && v != STRATEGY_RESOLVING {
            u8_to_strategy(v)
        } else {
            AbortStrategy::Signal
        };
    }

    let strategy = std::env::var(ABORT_MODE_ENV)
        .map(|v| AbortStrategy::from_str_loose(&v))
        .unwrap_or_default();
    CACHED_STRATEGY.store(strategy_to_u8(strategy), Ordering::Release);
    strategy
}

#[cfg(test)]
mod tests {
    use super::*;

    // Serializes tests that poke the process-wide cache.
    static CACHE_LOCK: parking_lot::Mutex<()> = parking_lot::Mutex::new(());

    #[test]
    fn parse_strategies() {
        assert_eq!("signal".parse::<AbortStrategy>(), Ok(AbortStrategy::Signal));
        assert_eq!("SIGABRT".parse::<AbortStrategy>(), Ok(AbortStrategy::Signal));
        assert_eq!("exit".parse::<AbortStrategy>(), Ok(AbortStrategy::Exit));
        assert_eq!(" Exit_Group ".parse::<AbortStrategy>(), Ok(AbortStrategy::Exit));
        assert_eq!("panic".parse::<AbortStrategy>(), Ok(AbortStrategy::Panic));
        assert_eq!("unwind".parse::<AbortStrategy>(), Ok(AbortStrategy::Panic));
    }

    #[test]
    fn strict_parse_rejects_unknown_names() {
        assert_eq!(
            "bogus".parse::<AbortStrategy>(),
            Err(ConfigError::UnknownAbortStrategy("bogus".to_string()))
        );
    }

    #[test]
    fn loose_parse_falls_back_to_signal() {
        assert_eq!(AbortStrategy::from_str_loose("bogus"), AbortStrategy::Signal);
        assert_eq!(AbortStrategy::from_str_loose(""), AbortStrategy::Signal);
        assert_eq!(AbortStrategy::from_str_loose("PANIC"), AbortStrategy::Panic);
    }

    #[test]
    fn names_round_trip_through_display() {
        for strategy in [
            AbortStrategy::Signal,
            AbortStrategy::Exit,
            AbortStrategy::Panic,
        ] {
            assert_eq!(strategy.to_string().parse::<AbortStrategy>(), Ok(strategy));
        }
    }

    #[test]
    fn only_signal_raises() {
        assert!(AbortStrategy::Signal.raises_signal());
        assert!(!AbortStrategy::Exit.raises_signal());
        assert!(!AbortStrategy::Panic.raises_signal());
    }

    #[test]
    fn cached_strategy_is_process_sticky_until_cache_reset() {
        let _guard = CACHE_LOCK.lock();
        let previous = CACHED_STRATEGY.swap(STRATEGY_EXIT, Ordering::SeqCst);
        assert_eq!(abort_strategy(), AbortStrategy::Exit);
        assert_eq!(abort_strategy(), AbortStrategy::Exit);

        CACHED_STRATEGY.store(STRATEGY_PANIC, Ordering::SeqCst);
        assert_eq!(abort_strategy(), AbortStrategy::Panic);

        CACHED_STRATEGY.store(previous, Ordering::SeqCst);
    }

    #[test]
    fn resolving_state_returns_signal() {
        let _guard = CACHE_LOCK.lock();
        let previous = CACHED_STRATEGY.swap(STRATEGY_RESOLVING, Ordering::SeqCst);
        assert_eq!(abort_strategy(), AbortStrategy::Signal);
        CACHED_STRATEGY.store(previous, Ordering::SeqCst);
    }
}
