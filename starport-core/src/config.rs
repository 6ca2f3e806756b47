//! Runtime configuration for cadence, chance and projection knobs.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;

/// Errors raised when station configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: u64,
        value: u64,
    },
    #[error("configuration is not valid JSON: {0}")]
    Parse(String),
}

/// Station tuning loaded from JSON; every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    #[serde(default = "StationConfig::default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "StationConfig::default_max_tick_secs")]
    pub max_tick_secs: f64,
    #[serde(default = "StationConfig::default_autosave_interval_ms")]
    pub autosave_interval_ms: u64,
    #[serde(default = "StationConfig::default_base_spawn_interval_secs")]
    pub base_spawn_interval_secs: f64,
    #[serde(default = "StationConfig::default_min_spawn_interval_secs")]
    pub min_spawn_interval_secs: f64,
    #[serde(default = "StationConfig::default_min_service_secs")]
    pub min_service_secs: f64,
    #[serde(default = "StationConfig::default_hiccup_chance_per_sec")]
    pub hiccup_chance_per_sec: f64,
    #[serde(default = "StationConfig::default_hiccup_delay_secs")]
    pub hiccup_delay_secs: f64,
    #[serde(default = "StationConfig::default_random_event_chance_per_sec")]
    pub random_event_chance_per_sec: f64,
    #[serde(default = "StationConfig::default_brunch_chance")]
    pub brunch_chance: f64,
    #[serde(default = "StationConfig::default_offline_cap_secs")]
    pub offline_cap_secs: u64,
    #[serde(default = "StationConfig::default_offline_utilization")]
    pub offline_utilization: f64,
    #[serde(default = "StationConfig::default_prestige_threshold")]
    pub prestige_threshold: f64,
    #[serde(default = "StationConfig::default_log_capacity")]
    pub log_capacity: usize,
}

impl StationConfig {
    const fn default_tick_interval_ms() -> u64 {
        constants::TICK_INTERVAL_MS
    }

    const fn default_max_tick_secs() -> f64 {
        constants::MAX_TICK_SECS
    }

    const fn default_autosave_interval_ms() -> u64 {
        constants::AUTOSAVE_INTERVAL_MS
    }

    const fn default_base_spawn_interval_secs() -> f64 {
        constants::BASE_SPAWN_INTERVAL_SECS
    }

    const fn default_min_spawn_interval_secs() -> f64 {
        constants::MIN_SPAWN_INTERVAL_SECS
    }

    const fn default_min_service_secs() -> f64 {
        constants::MIN_SERVICE_SECS
    }

    const fn default_hiccup_chance_per_sec() -> f64 {
        constants::HICCUP_CHANCE_PER_SEC
    }

    const fn default_hiccup_delay_secs() -> f64 {
        constants::HICCUP_DELAY_SECS
    }

    const fn default_random_event_chance_per_sec() -> f64 {
        constants::RANDOM_EVENT_CHANCE_PER_SEC
    }

    const fn default_brunch_chance() -> f64 {
        constants::BRUNCH_CHANCE
    }

    const fn default_offline_cap_secs() -> u64 {
        constants::OFFLINE_CAP_SECS
    }

    const fn default_offline_utilization() -> f64 {
        constants::OFFLINE_UTILIZATION
    }

    const fn default_prestige_threshold() -> f64 {
        constants::PRESTIGE_THRESHOLD
    }

    const fn default_log_capacity() -> usize {
        constants::LOG_CAPACITY
    }

    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or the first
    /// invariant violation reported by [`StationConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::ensure_positive("max_tick_secs", self.max_tick_secs)?;
        Self::ensure_positive("base_spawn_interval_secs", self.base_spawn_interval_secs)?;
        Self::ensure_positive("min_spawn_interval_secs", self.min_spawn_interval_secs)?;
        Self::ensure_positive("min_service_secs", self.min_service_secs)?;
        Self::ensure_positive("prestige_threshold", self.prestige_threshold)?;
        Self::ensure_non_negative("hiccup_delay_secs", self.hiccup_delay_secs)?;
        Self::ensure_range("hiccup_chance_per_sec", self.hiccup_chance_per_sec, 0.0, 1.0)?;
        Self::ensure_range(
            "random_event_chance_per_sec",
            self.random_event_chance_per_sec,
            0.0,
            1.0,
        )?;
        Self::ensure_range("brunch_chance", self.brunch_chance, 0.0, 1.0)?;
        Self::ensure_range("offline_utilization", self.offline_utilization, 0.0, 1.0)?;
        Self::ensure_min("tick_interval_ms", self.tick_interval_ms, 1)?;
        Self::ensure_min("autosave_interval_ms", self.autosave_interval_ms, 1)?;
        Self::ensure_min(
            "log_capacity",
            u64::try_from(self.log_capacity).unwrap_or(u64::MAX),
            1,
        )?;
        Ok(())
    }

    fn ensure_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::NotPositive { field, value })
        }
    }

    fn ensure_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
        Self::ensure_range(field, value, 0.0, f64::MAX)
    }

    fn ensure_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
        if value.is_finite() && (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::RangeViolation {
                field,
                min,
                max,
                value,
            })
        }
    }

    const fn ensure_min(field: &'static str, value: u64, min: u64) -> Result<(), ConfigError> {
        if value >= min {
            Ok(())
        } else {
            Err(ConfigError::MinViolation { field, min, value })
        }
    }
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: Self::default_tick_interval_ms(),
            max_tick_secs: Self::default_max_tick_secs(),
            autosave_interval_ms: Self::default_autosave_interval_ms(),
            base_spawn_interval_secs: Self::default_base_spawn_interval_secs(),
            min_spawn_interval_secs: Self::default_min_spawn_interval_secs(),
            min_service_secs: Self::default_min_service_secs(),
            hiccup_chance_per_sec: Self::default_hiccup_chance_per_sec(),
            hiccup_delay_secs: Self::default_hiccup_delay_secs(),
            random_event_chance_per_sec: Self::default_random_event_chance_per_sec(),
            brunch_chance: Self::default_brunch_chance(),
            offline_cap_secs: Self::default_offline_cap_secs(),
            offline_utilization: Self::default_offline_utilization(),
            prestige_threshold: Self::default_prestige_threshold(),
            log_capacity: Self::default_log_capacity(),
        }
    }
}
