//! Subscriber setup for binaries and test harnesses.
//!
//! Library code only emits `tracing` events; installing a subscriber is
//! left to the application. This helper covers the common case.

use anvil_registry::BoxError;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive (e.g. `anvil_engine=debug`).
pub const LOG_ENV: &str = "ANVIL_LOG";

/// Install a formatted subscriber filtered by [`LOG_ENV`], defaulting to `info`.
///
/// Fails if a global subscriber is already set.
pub fn init_logging() -> Result<(), BoxError> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).try_init()
}
