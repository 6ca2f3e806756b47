use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use crate::catalog::UpgradeId;
use crate::constants::SCHEMA_VERSION;
use crate::fleet::{OccupantClass, ShipType};
use crate::modifiers::TimedModifier;

/// Wall-clock instant in milliseconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn plus_millis(self, millis: u64) -> Self {
        Self(self.0.saturating_add(millis))
    }

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is in the future.
    #[must_use]
    pub const fn millis_since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Seconds elapsed since `earlier` as a float.
    #[must_use]
    pub fn secs_since(self, earlier: Self) -> f64 {
        crate::numbers::u64_to_f64(self.millis_since(earlier)) / 1000.0
    }

    /// Current system time; falls back to the epoch if the clock is before it.
    #[must_use]
    pub fn now() -> Self {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        Self(millis)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Multiplier axis a timed modifier adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoostAxis {
    Traffic,
    Tips,
    Speed,
}

/// Running sum of active modifier contributions per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Boosts {
    #[serde(default)]
    pub traffic: f64,
    #[serde(default)]
    pub tips: f64,
    #[serde(default)]
    pub speed: f64,
}

impl Boosts {
    #[must_use]
    pub const fn get(&self, axis: BoostAxis) -> f64 {
        match axis {
            BoostAxis::Traffic => self.traffic,
            BoostAxis::Tips => self.tips,
            BoostAxis::Speed => self.speed,
        }
    }

    pub fn add(&mut self, axis: BoostAxis, amount: f64) {
        match axis {
            BoostAxis::Traffic => self.traffic += amount,
            BoostAxis::Tips => self.tips += amount,
            BoostAxis::Speed => self.speed += amount,
        }
    }
}

/// One service bay.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockSlot {
    pub occupied: bool,
    pub remaining_time: f64,
    pub total_service_time: f64,
    #[serde(default)]
    pub occupant_class: Option<OccupantClass>,
    #[serde(default)]
    pub occupant_type: Option<ShipType>,
}

impl DockSlot {
    /// Place a ship in this bay.
    pub fn dock(&mut self, class: OccupantClass, ship: ShipType, service_secs: f64) {
        *self = Self {
            occupied: true,
            remaining_time: service_secs,
            total_service_time: service_secs,
            occupant_class: Some(class),
            occupant_type: Some(ship),
        };
    }

    /// Return the bay to idle.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Service progress in `[0, 1]`; zero when idle.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if !self.occupied || self.total_service_time <= 0.0 {
            return 0.0;
        }
        (1.0 - self.remaining_time / self.total_service_time).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    #[default]
    Neutral,
    Good,
    Warn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub at: Timestamp,
    pub text: String,
    #[serde(default)]
    pub kind: LogKind,
}

/// Bounded event log; pushing past capacity evicts the oldest entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
}

impl EventLog {
    pub fn push(&mut self, entry: LogEntry, capacity: usize) {
        self.entries.push_back(entry);
        self.trim(capacity);
    }

    pub fn trim(&mut self, capacity: usize) {
        while self.entries.len() > capacity {
            self.entries.pop_front();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Newest first, at most `limit` entries.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().rev().take(limit)
    }

    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }
}

/// Root simulation state; the only shared mutable resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationState {
    pub schema_version: u32,
    #[serde(default)]
    pub credits: f64,
    #[serde(default)]
    pub lifetime_credits: f64,
    #[serde(default)]
    pub prestige_currency: u64,
    #[serde(default)]
    pub upgrades: BTreeMap<UpgradeId, u32>,
    #[serde(default)]
    pub docks: Vec<DockSlot>,
    #[serde(default)]
    pub active_modifiers: Vec<TimedModifier>,
    #[serde(default)]
    pub boosts: Boosts,
    #[serde(default)]
    pub event_log: EventLog,
    #[serde(default)]
    pub spawn_accumulator: f64,
    #[serde(default)]
    pub session_start: Timestamp,
    #[serde(default)]
    pub last_tick_time: Timestamp,
    #[serde(default)]
    pub last_save_time: Timestamp,
    /// Earnings credited by the most recent offline projection this session.
    #[serde(skip)]
    pub offline_gains: f64,
}

impl Default for StationState {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            credits: 0.0,
            lifetime_credits: 0.0,
            prestige_currency: 0,
            upgrades: UpgradeId::ALL.iter().map(|id| (*id, 0)).collect(),
            docks: vec![DockSlot::default()],
            active_modifiers: Vec::new(),
            boosts: Boosts::default(),
            event_log: EventLog::default(),
            spawn_accumulator: 0.0,
            session_start: Timestamp::default(),
            last_tick_time: Timestamp::default(),
            last_save_time: Timestamp::default(),
            offline_gains: 0.0,
        }
    }
}

impl StationState {
    /// Fresh state with every clock anchored at `now`.
    #[must_use]
    pub fn new_at(now: Timestamp) -> Self {
        Self {
            session_start: now,
            last_tick_time: now,
            last_save_time: now,
            ..Self::default()
        }
    }

    /// Current level of an upgrade (missing entries count as zero).
    #[must_use]
    pub fn level(&self, id: UpgradeId) -> u32 {
        self.upgrades.get(&id).copied().unwrap_or(0)
    }

    /// Number of dock slots the current upgrades provide.
    #[must_use]
    pub fn dock_count(&self) -> usize {
        let extra = usize::try_from(self.level(UpgradeId::ExtraDock)).unwrap_or(0);
        extra.saturating_add(1)
    }

    /// Grow or shrink the slot list to the derived dock count.
    pub fn ensure_dock_slots(&mut self) {
        let target = self.dock_count();
        self.docks.resize_with(target, DockSlot::default);
    }

    /// Credit a payout to both spendable and lifetime balances.
    pub fn earn(&mut self, amount: f64) {
        if amount <= 0.0 || !amount.is_finite() {
            return;
        }
        self.credits += amount;
        self.lifetime_credits += amount;
    }

    pub fn push_log(&mut self, at: Timestamp, text: impl Into<String>, kind: LogKind, cap: usize) {
        self.event_log.push(
            LogEntry {
                at,
                text: text.into(),
                kind,
            },
            cap,
        );
    }
}
