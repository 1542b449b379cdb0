//! Diagnostic logging to stderr.
//!
//! Stdout is reserved for the `Fixed: <path>` lines, so the subscriber always
//! writes to stderr.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Environment variable read before `RUST_LOG`.
pub const LOG_ENV: &str = "TW_PATCHER_LOG";

/// Filter used when `--verbose` is passed.
const VERBOSE_FILTER: &str = "tw_patcher=debug";
const DEFAULT_FILTER: &str = "warn";

/// Build the filter: `--verbose` wins, then `TW_PATCHER_LOG`, then `RUST_LOG`.
pub fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new(VERBOSE_FILTER);
    }
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_env_filter(filter(verbose))
        .with_target(false)
        .without_time()
        .try_init();
}
