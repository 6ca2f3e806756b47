//! Save blob encoding and the key-value storage seam.
//!
//! The station is persisted as one JSON document under [`STORAGE_KEY`].
//! Loading never fails: a missing, malformed or foreign-version blob yields a
//! fresh station, and anything that does load is sanitized before use.
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;
use thiserror::Error;

use crate::catalog::UpgradeId;
use crate::config::StationConfig;
use crate::constants::{SCHEMA_VERSION, STORAGE_KEY};
use crate::modifiers::recompute_boosts;
use crate::state::{StationState, Timestamp};

/// Opaque blob store keyed by string.
pub trait StationStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `blob` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, blob: &str) -> Result<(), Self::Error>;

    /// Delete the blob under `key`; absent keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// In-process storage; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blobs: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StationStorage for MemoryStorage {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, blob: &str) -> Result<(), Self::Error> {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.blobs.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to encode station state: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode station state: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("save schema version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },
    #[error("storage backend failed: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PersistError {
    fn storage<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Serialize the full station state.
///
/// # Errors
///
/// Returns [`PersistError::Encode`] if serialization fails.
pub fn encode_state(state: &StationState) -> Result<String, PersistError> {
    serde_json::to_string(state).map_err(PersistError::Encode)
}

/// Parse a save blob, rejecting other schema versions.
///
/// # Errors
///
/// Returns [`PersistError::Decode`] for malformed JSON and
/// [`PersistError::VersionMismatch`] for foreign schema versions.
pub fn decode_state(blob: &str) -> Result<StationState, PersistError> {
    let state: StationState = serde_json::from_str(blob).map_err(PersistError::Decode)?;
    if state.schema_version != SCHEMA_VERSION {
        return Err(PersistError::VersionMismatch {
            found: state.schema_version,
            expected: SCHEMA_VERSION,
        });
    }
    Ok(state)
}

/// Repair a restored state so every invariant holds.
pub fn sanitize(state: &mut StationState, cfg: &StationConfig) {
    if !state.credits.is_finite() || state.credits < 0.0 {
        state.credits = 0.0;
    }
    if !state.lifetime_credits.is_finite() || state.lifetime_credits < state.credits {
        state.lifetime_credits = state.credits;
    }
    for id in UpgradeId::ALL {
        let level = id.definition().clamp_level(state.level(*id));
        state.upgrades.insert(*id, level);
    }
    state.ensure_dock_slots();
    for dock in &mut state.docks {
        let valid = dock.occupied
            && dock.occupant_class.is_some()
            && dock.occupant_type.is_some()
            && dock.total_service_time.is_finite()
            && dock.total_service_time > 0.0;
        if valid {
            dock.remaining_time = if dock.remaining_time.is_finite() {
                dock.remaining_time.clamp(0.0, dock.total_service_time)
            } else {
                dock.total_service_time
            };
        } else {
            dock.clear();
        }
    }
    if !state.spawn_accumulator.is_finite() || state.spawn_accumulator < 0.0 {
        state.spawn_accumulator = 0.0;
    }
    state.boosts = recompute_boosts(&state.active_modifiers);
    state.event_log.trim(cfg.log_capacity);
    state.offline_gains = 0.0;
}

/// Load the saved station, falling back to a fresh one anchored at `now`.
pub fn load_or_default<S: StationStorage + ?Sized>(
    storage: &S,
    cfg: &StationConfig,
    now: Timestamp,
) -> StationState {
    match storage.get(STORAGE_KEY) {
        Ok(blob) => state_from_blob(blob.as_deref(), cfg, now),
        Err(err) => {
            log::warn!("could not read save, starting fresh: {err}");
            StationState::new_at(now)
        }
    }
}

/// Decode and sanitize an optional blob, falling back to a fresh station.
#[must_use]
pub fn state_from_blob(blob: Option<&str>, cfg: &StationConfig, now: Timestamp) -> StationState {
    let Some(blob) = blob else {
        return StationState::new_at(now);
    };
    match decode_state(blob) {
        Ok(mut state) => {
            sanitize(&mut state, cfg);
            state
        }
        Err(err) => {
            log::warn!("discarding unreadable save: {err}");
            StationState::new_at(now)
        }
    }
}

/// Stamp `last_save_time` and overwrite the stored blob.
///
/// # Errors
///
/// Returns an error if encoding or the storage write fails.
pub fn save_state<S: StationStorage + ?Sized>(
    storage: &S,
    state: &mut StationState,
    now: Timestamp,
) -> Result<(), PersistError> {
    state.last_save_time = now;
    let blob = encode_state(state)?;
    storage
        .set(STORAGE_KEY, &blob)
        .map_err(PersistError::storage)?;
    log::info!("station saved ({} bytes)", blob.len());
    Ok(())
}

/// Remove the stored blob (hard reset).
///
/// # Errors
///
/// Returns an error if the storage delete fails.
pub fn wipe_save<S: StationStorage + ?Sized>(storage: &S) -> Result<(), PersistError> {
    storage.remove(STORAGE_KEY).map_err(PersistError::storage)?;
    log::info!("save wiped");
    Ok(())
}
