//! Subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

use crate::error::{HarnessError, Result};

const DEFAULT_DIRECTIVE: &str = "warn";

/// Build the log filter: an explicit `--log` directive wins, then
/// `RUST_LOG`, then `warn`.
pub fn env_filter(directive: Option<&str>) -> Result<EnvFilter> {
    match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|err| HarnessError::invalid(format!("--log {directive:?}: {err}"))),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))),
    }
}

/// Install the global fmt subscriber on stderr. A second call is a no-op.
pub fn init(directive: Option<&str>) -> Result<()> {
    let filter = env_filter(directive)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
    Ok(())
}
