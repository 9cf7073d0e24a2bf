//! Logging initialization for the Starkward service.
//!
//! Verbosity maps to a default `tracing` level which can always be
//! overridden per-target through the standard `RUST_LOG` environment
//! variable.

use tracing_subscriber::EnvFilter;

/// Errors that can occur during logging initialization.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// A global subscriber was already installed.
    #[error("logging already initialized")]
    AlreadyInitialized,
}

/// Map a `-v` count to a default log level directive.
///
/// 0 = warn, 1 = info, 2 = debug, 3+ = trace.
#[must_use]
pub const fn verbosity_to_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity-derived default, so
/// operators can raise individual targets without touching the CLI.
///
/// # Errors
///
/// Returns [`LogError::AlreadyInitialized`] if a subscriber is already
/// installed, which only happens when called twice in one process.
pub fn init_logging(verbose: u8) -> Result<(), LogError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_level(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|_| LogError::AlreadyInitialized)
}

// ============================================================================
// Unit Tests
// ============================================================================
