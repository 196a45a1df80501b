//! Tracing setup for the CLI.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `NOTEHUB_LOG=notehub=debug`.
pub const LOG_ENV: &str = "NOTEHUB_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install a stderr subscriber so stdout stays clean for `--json` output.
/// Calling this twice is harmless; the second install is ignored.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
