//! Load — config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::EngineError;

use super::model::EngineConfig;

impl EngineConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, EngineError> {
        let config_path =
            std::env::var("ENGINE_CONFIG_FILE").unwrap_or_else(|_| "engine.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!(
                "Config file not found at {}, using environment variables",
                config_path
            );
            Self::from_env()
        };

        // Environment variables override file config
        if let Some(capacity) = env_parsed("ENGINE_UNIDENTIFIED_CAPACITY") {
            config.unidentified_capacity = capacity;
        }
        if let Some(tolerance) = env_parsed("ENGINE_TIME_WARP_TOLERANCE_SECS") {
            config.time_warp_tolerance_secs = tolerance;
        }
        if let Ok(start) = std::env::var("ENGINE_JVM_START_DATE") {
            config.jvm_start_date = Some(start);
        }
        if let Some(emit) = env_parsed("ENGINE_EMIT_JSON") {
            config.emit_json = emit;
        }

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, EngineError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: EngineConfig =
            toml::from_str(&contents).map_err(|e| EngineError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            unidentified_capacity: env_parsed("ENGINE_UNIDENTIFIED_CAPACITY")
                .unwrap_or(defaults.unidentified_capacity),
            time_warp_tolerance_secs: env_parsed("ENGINE_TIME_WARP_TOLERANCE_SECS")
                .unwrap_or(defaults.time_warp_tolerance_secs),
            jvm_start_date: std::env::var("ENGINE_JVM_START_DATE").ok(),
            emit_json: env_parsed("ENGINE_EMIT_JSON").unwrap_or(defaults.emit_json),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}
