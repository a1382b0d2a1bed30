//! Tracing subscriber setup for binaries and tests.

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Installs the global subscriber. `RUST_LOG` overrides the configured
/// filter. Fails if a global subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(config)?,
    };

    let json_layer = config.json.then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
    });
    let text_layer = (!config.json).then(|| fmt::layer().with_target(true));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .context("Failed to set global default subscriber")?;

    tracing::debug!(json = config.json, "Tracing initialized");
    Ok(())
}

fn build_filter(config: &LoggingConfig) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(&config.filter).with_context(|| format!("Invalid log filter '{}'", config.filter))
}
