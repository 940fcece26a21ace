//! Host-side pieces of the mock-interview workspace: environment settings,
//! tracing setup, and the post-interview report built from what the
//! [`proctoring`] and [`whiteboard`] crates persisted.

pub mod config;
pub mod report;

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber filtered by `filter` (an `EnvFilter`
/// directive such as `info` or `proctoring=debug`). An invalid directive
/// falls back to [`config::DEFAULT_LOG_FILTER`]. Calling this twice is harmless.
pub fn init_tracing(filter: &str) {
    let env_filter = match EnvFilter::try_new(filter) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("invalid log filter {filter:?}: {e}");
            EnvFilter::new(config::DEFAULT_LOG_FILTER)
        }
    };
    if let Err(e) = tracing_subscriber::fmt().with_env_filter(env_filter).try_init() {
        tracing::debug!(error = %e, "tracing subscriber already installed");
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
