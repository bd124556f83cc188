//! Shared tracing/logging initialization.
//!
//! The embedding chat client and the test harness set up
//! `tracing_subscriber` the same way: env-filter with a library default,
//! optional JSON output. Installation is idempotent so every entry point
//! can call it unconditionally.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber if none is registered yet.
///
/// * `default_filter` -- default `RUST_LOG` value when the env-var is not set
///   (e.g. `"parley_core=info"`).
/// * `log_json` -- when `true`, emit structured JSON log lines instead of the
///   human-readable format.
///
/// Returns `true` when this call installed the subscriber, `false` when one
/// was already in place.
pub fn init_tracing(default_filter: &str, log_json: bool) -> bool {
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );
    let registry = tracing_subscriber::registry().with(env_filter);
    if log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .is_ok()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialization_is_safe() {
        // No other unit test in this binary installs a subscriber, so the
        // first call wins and later calls report an existing one.
        assert!(init_tracing("parley_core=info", false));
        assert!(!init_tracing("parley_core=info", false));
        assert!(!init_tracing("parley_core=debug", true));
    }
}
