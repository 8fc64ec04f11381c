//! Model — EngineConfig.

use serde::{Deserialize, Serialize};

use crate::order;
use crate::preprocess::DEFAULT_UNIDENTIFIED_CAPACITY;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity of the unidentified-line bucket.
    pub unidentified_capacity: usize,
    /// Backwards-jump slack before a time warp is fatal.
    pub time_warp_tolerance_secs: u64,
    /// JVM start wall-clock, `YYYY-MM-DDTHH:MM:SS.mmm±zzzz`. Needed to
    /// place datestamp-only logs on the uptime axis.
    pub jvm_start_date: Option<String>,
    /// Emit hydrated events as JSON lines instead of the text summary.
    pub emit_json: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            unidentified_capacity: DEFAULT_UNIDENTIFIED_CAPACITY,
            time_warp_tolerance_secs: order::DEFAULT_TOLERANCE_SECS,
            jvm_start_date: None,
            emit_json: false,
        }
    }
}

impl EngineConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.unidentified_capacity == 0 {
            return Err("unidentified_capacity must be > 0".to_string());
        }
        if self.time_warp_tolerance_secs == 0 {
            return Err("time_warp_tolerance_secs must be > 0".to_string());
        }
        Ok(())
    }

    pub fn time_warp_tolerance_micros(&self) -> i64 {
        self.time_warp_tolerance_secs as i64 * 1_000_000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── EngineConfig Defaults ────────────────────────────────────

    #[test]
    fn test_engine_config_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.unidentified_capacity, 1000);
        assert_eq!(cfg.time_warp_tolerance_secs, 5);
        assert!(cfg.jvm_start_date.is_none());
        assert!(!cfg.emit_json);
    }

    // ── EngineConfig Validation ──────────────────────────────────

    #[test]
    fn test_engine_config_validate_default_passes() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_engine_config_validate_rejects_zero_capacity() {
        let cfg = EngineConfig {
            unidentified_capacity: 0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("unidentified_capacity"), "Error should mention unidentified_capacity: {}", err);
    }

    #[test]
    fn test_engine_config_validate_rejects_zero_tolerance() {
        let cfg = EngineConfig {
            time_warp_tolerance_secs: 0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("time_warp_tolerance_secs"), "Error should mention time_warp_tolerance_secs: {}", err);
    }

    // ── Serialization Round-trip ─────────────────────────────────

    #[test]
    fn test_engine_config_toml_round_trip() {
        let cfg = EngineConfig::default();
        let toml_str = toml::to_string(&cfg).expect("Should serialize to TOML");
        let deserialized: EngineConfig = toml::from_str(&toml_str).expect("Should deserialize from TOML");
        assert_eq!(deserialized.unidentified_capacity, cfg.unidentified_capacity);
        assert_eq!(deserialized.time_warp_tolerance_secs, cfg.time_warp_tolerance_secs);
    }

    #[test]
    fn test_engine_config_deserialize_partial_toml() {
        // Only set capacity; rest should use defaults via #[serde(default)]
        let toml_str = r#"unidentified_capacity = 64"#;
        let cfg: EngineConfig = toml::from_str(toml_str).expect("Should accept partial TOML");
        assert_eq!(cfg.unidentified_capacity, 64);
        assert_eq!(cfg.time_warp_tolerance_secs, 5); // default
    }

    #[test]
    fn test_tolerance_conversion_to_micros() {
        let cfg = EngineConfig {
            time_warp_tolerance_secs: 2,
            ..Default::default()
        };
        assert_eq!(cfg.time_warp_tolerance_micros(), 2_000_000);
    }
}
