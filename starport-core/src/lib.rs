//! Starport Forever Station Engine
//!
//! Platform-agnostic simulation core for the Starport Forever idle game.
//! This crate owns the station state, the tick scheduler, derived rates,
//! offline projection, prestige and persistence, with no UI or
//! platform-specific dependencies.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod fleet;
pub mod modifiers;
pub mod numbers;
pub mod offline;
pub mod persistence;
pub mod prestige;
pub mod rates;
pub mod rng;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod store;

// Re-export commonly used types
pub use catalog::{UPGRADES, UpgradeDefinition, UpgradeId};
pub use config::{ConfigError, StationConfig};
pub use constants::{SCHEMA_VERSION, STORAGE_KEY};
pub use fleet::{OccupantClass, ShipSpec, ShipType};
pub use modifiers::{ModifierKind, TimedModifier};
pub use offline::{OfflineReport, apply_offline_progress, project_offline};
pub use persistence::{
    MemoryStorage, PersistError, StationStorage, decode_state, encode_state, load_or_default,
};
pub use prestige::{PrestigeError, PrestigeOutcome, can_prestige, next_prestige_gain};
pub use rates::RateSnapshot;
pub use rng::{RandomSource, ScriptedRolls, StationRng};
pub use scheduler::{CompletedService, TickReport, tick};
pub use session::StationSession;
pub use state::{DockSlot, EventLog, LogEntry, LogKind, StationState, Timestamp};
pub use store::{StoreError, can_purchase, purchase_upgrade, synergy_hint, upgrade_price};

/// Main engine binding a storage backend to station sessions
pub struct StationEngine<S>
where
    S: StationStorage,
{
    storage: S,
    config: StationConfig,
}

impl<S> StationEngine<S>
where
    S: StationStorage,
{
    /// Create an engine over the provided storage and configuration
    pub const fn new(storage: S, config: StationConfig) -> Self {
        Self { storage, config }
    }

    /// Open the saved station (or a fresh one) with a seeded stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be read. Unreadable
    /// blobs are not errors; they fall back to a fresh station.
    pub fn open_session(&self, seed: u64, now: Timestamp) -> Result<StationSession, S::Error> {
        self.open_session_with(StationRng::from_user_seed(seed), now)
    }

    /// Open the saved station with a caller-supplied random source.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be read.
    pub fn open_session_with<R: RandomSource>(
        &self,
        rng: R,
        now: Timestamp,
    ) -> Result<StationSession<R>, S::Error> {
        let blob = self.storage.get(STORAGE_KEY)?;
        Ok(StationSession::restore(
            blob.as_deref(),
            self.config.clone(),
            rng,
            now,
        ))
    }

    /// Persist a session's station
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be encoded or written.
    pub fn save<R: RandomSource>(
        &self,
        session: &mut StationSession<R>,
        now: Timestamp,
    ) -> Result<(), PersistError> {
        session.save(&self.storage, now)
    }

    /// Delete the saved station (hard reset)
    ///
    /// # Errors
    ///
    /// Returns an error if the storage delete fails.
    pub fn wipe(&self) -> Result<(), PersistError> {
        persistence::wipe_save(&self.storage)
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub const fn config(&self) -> &StationConfig {
        &self.config
    }
}
