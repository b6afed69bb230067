//! Structured logging setup for embedding applications

use crate::error::Result;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes precedence; `log_level` is the fallback filter. Fails if a
/// global subscriber is already installed.
pub fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
