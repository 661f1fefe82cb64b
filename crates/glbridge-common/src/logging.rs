use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "GLBRIDGE_LOG";

/// Initialize structured logging with environment filter.
/// Set GLBRIDGE_LOG=debug (or trace, info, warn, error) for verbosity control.
///
/// Hosts that embed the bridge usually install their own subscriber first;
/// in that case this call leaves it in place.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init();
}
