//! Tracing setup for hosts embedding the editor.

use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter, e.g. `EASEL_LOG=easel_persist=debug`.
pub const LOG_ENV_VAR: &str = "EASEL_LOG";

/// Initialize tracing with the EASEL_LOG environment variable.
///
/// Defaults to `info` when unset or unparsable. Fails if a global
/// subscriber is already installed.
pub fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

/// Test-friendly variant: writes through the test harness and ignores
/// repeated initialization.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_test_init_is_harmless() {
        init_test_tracing();
        init_test_tracing();
        tracing::info!("still logging");
    }
}
