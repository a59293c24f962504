//! Tracing subscriber setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{AppError, Result};

/// Install a stderr subscriber filtered by `RUST_LOG`, falling back to `level`.
///
/// Does nothing if a global subscriber is already installed.
pub fn init(level: &str) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| AppError::Config(format!("invalid log level {level:?}: {e}")))?;

    let installed = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match installed {
        Ok(()) => Ok(()),
        // another thread won the race
        Err(_) if tracing::dispatcher::has_been_set() => Ok(()),
        Err(e) => Err(AppError::Config(format!("failed to initialize logging: {e}"))),
    }
}
