//! Centralized balance and tuning constants for Starport simulation logic.
//!
//! Per-level bonuses and prestige coefficients define the multiplier math
//! and only change through code review. Cadence and probability knobs that
//! operators may want to tune are mirrored as defaults in
//! [`StationConfig`](crate::config::StationConfig).

// Persistence ---------------------------------------------------------------
pub const STORAGE_KEY: &str = "starport_save";
pub const SCHEMA_VERSION: u32 = 1;

// Cadence -------------------------------------------------------------------
pub(crate) const TICK_INTERVAL_MS: u64 = 100;
pub(crate) const MAX_TICK_SECS: f64 = 0.25;
pub(crate) const AUTOSAVE_INTERVAL_MS: u64 = 30_000;

// Spawning and service ------------------------------------------------------
pub(crate) const BASE_SPAWN_INTERVAL_SECS: f64 = 3.5;
pub(crate) const MIN_SPAWN_INTERVAL_SECS: f64 = 0.05;
/// Hard floor applied even when a hand-built config disables the minimum.
pub(crate) const SPAWN_INTERVAL_FLOOR_SECS: f64 = 0.001;
pub(crate) const MIN_SERVICE_SECS: f64 = 1.2;
pub(crate) const HICCUP_CHANCE_PER_SEC: f64 = 0.0006;
pub(crate) const HICCUP_DELAY_SECS: f64 = 0.5;
pub(crate) const HICCUP_RELIEF_PER_MAINT_LEVEL: f64 = 0.02;

// Timed modifiers -----------------------------------------------------------
pub(crate) const RANDOM_EVENT_CHANCE_PER_SEC: f64 = 0.000_12;
pub(crate) const BRUNCH_CHANCE: f64 = 0.05;

// Offline projection --------------------------------------------------------
pub(crate) const OFFLINE_CAP_SECS: u64 = 8 * 3600;
pub(crate) const OFFLINE_UTILIZATION: f64 = 0.9;

// Prestige ------------------------------------------------------------------
pub(crate) const PRESTIGE_THRESHOLD: f64 = 25_000.0;
pub(crate) const PRESTIGE_TRAFFIC_PER_CRED: f64 = 0.03;
pub(crate) const PRESTIGE_SPEED_PER_CRED: f64 = 0.03;
pub(crate) const PRESTIGE_TIPS_PER_CRED: f64 = 0.05;

// Event log -----------------------------------------------------------------
pub(crate) const LOG_CAPACITY: usize = 500;

// Per-level upgrade bonuses -------------------------------------------------
pub(crate) const TRAFFIC_PER_DOME: f64 = 0.06;
pub(crate) const TRAFFIC_PER_NEON: f64 = 0.02;
pub(crate) const SPEED_PER_FUEL_PUMP: f64 = 0.05;
pub(crate) const SPEED_PER_MAINT_BAY: f64 = 0.05;
pub(crate) const TIPS_PER_NEON: f64 = 0.05;
pub(crate) const TIPS_PER_CAFE: f64 = 0.10;
pub(crate) const TIPS_PER_GARDEN: f64 = 0.10;
pub(crate) const BRUNCH_SYNERGY_TIPS: f64 = 0.10;

// Class spawn weights -------------------------------------------------------
pub(crate) const ORGANIC_WEIGHT_PER_CAFE: f64 = 0.10;
pub(crate) const ORGANIC_WEIGHT_PER_GARDEN: f64 = 0.06;
pub(crate) const AQUATIC_WEIGHT_PER_GARDEN: f64 = 0.08;
pub(crate) const SYNTHETIC_WEIGHT_PER_NEON: f64 = 0.10;
pub(crate) const SYNTHETIC_WEIGHT_PER_MAINT_BAY: f64 = 0.04;
pub(crate) const TOURIST_WEIGHT_PER_DOME: f64 = 0.15;
pub(crate) const TOURIST_WEIGHT_PER_NEON: f64 = 0.05;
