//! Tracing initialization
//!
//! Logs go to stderr so prompts and reports on stdout stay readable.
//! The filter comes from `FAIRSHARE_LOG`, then `RUST_LOG`, then `warn`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "FAIRSHARE_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Initialize tracing for the process
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
