//! Boot — logging init, config load and validation.

use chrono::{DateTime, FixedOffset};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::EngineConfig;
use crate::decorator::parse::DATESTAMP_FORMAT;
use crate::error::EngineError;

/// Initialise the tracing / logging subsystem.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load and validate configuration.
pub fn boot() -> Result<EngineConfig, EngineError> {
    let config = EngineConfig::load()?;
    config.validate().map_err(EngineError::Config)?;
    info!(
        "Loaded configuration: unidentified_capacity={}, time_warp_tolerance={}s",
        config.unidentified_capacity, config.time_warp_tolerance_secs
    );
    Ok(config)
}

/// Parse the configured JVM start wall-clock, when present.
pub fn jvm_start(config: &EngineConfig) -> Result<Option<DateTime<FixedOffset>>, EngineError> {
    match &config.jvm_start_date {
        Some(raw) => DateTime::parse_from_str(raw, DATESTAMP_FORMAT)
            .map(Some)
            .map_err(|_| EngineError::InvalidJvmStartDate(raw.clone())),
        None => Ok(None),
    }
}
