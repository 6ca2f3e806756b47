//! Session controller tying a station to its clock, config and random source.
use crate::catalog::UpgradeId;
use crate::config::StationConfig;
use crate::modifiers::expire_modifiers;
use crate::numbers::format_clock;
use crate::offline::{OfflineReport, apply_offline_progress};
use crate::persistence::{PersistError, StationStorage, save_state, state_from_blob};
use crate::prestige::{PrestigeError, PrestigeOutcome, prestige};
use crate::rates::RateSnapshot;
use crate::rng::{RandomSource, StationRng};
use crate::scheduler::{TickReport, tick};
use crate::state::{LogKind, StationState, Timestamp};
use crate::store::{StoreError, purchase_upgrade};

const WELCOME: &str = "Welcome aboard. Dock 1 smells like cinnamon rolls.";

/// High-level session wrapper binding configuration and a random source to
/// the mutable station state.
#[derive(Debug, Clone)]
pub struct StationSession<R: RandomSource = StationRng> {
    state: StationState,
    config: StationConfig,
    rng: R,
    offline: OfflineReport,
}

impl StationSession<StationRng> {
    /// Fresh station driven by the seeded production stream.
    #[must_use]
    pub fn seeded(config: StationConfig, seed: u64, now: Timestamp) -> Self {
        Self::new(config, StationRng::from_user_seed(seed), now)
    }
}

impl<R: RandomSource> StationSession<R> {
    /// Start a brand-new station at `now`.
    #[must_use]
    pub fn new(config: StationConfig, rng: R, now: Timestamp) -> Self {
        Self::restore(None, config, rng, now)
    }

    /// Resume from an optional save blob: load, drop modifiers that ran out
    /// while away, project offline earnings, then greet.
    #[must_use]
    pub fn restore(blob: Option<&str>, config: StationConfig, rng: R, now: Timestamp) -> Self {
        let mut state = state_from_blob(blob, &config, now);
        expire_modifiers(&mut state, now, config.log_capacity);
        let offline = apply_offline_progress(&mut state, &config, now);
        state.session_start = now;
        state.last_tick_time = now;
        state.ensure_dock_slots();
        state.push_log(now, WELCOME, LogKind::Good, config.log_capacity);
        Self {
            state,
            config,
            rng,
            offline,
        }
    }

    /// Advance to `now`; the step is clamped to the configured maximum.
    pub fn step(&mut self, now: Timestamp) -> TickReport {
        let dt = now
            .secs_since(self.state.last_tick_time)
            .min(self.config.max_tick_secs);
        tick(&mut self.state, &self.config, dt, now, &mut self.rng)
    }

    /// Buy one level of an upgrade.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the purchase is refused.
    pub fn purchase(&mut self, id: UpgradeId, now: Timestamp) -> Result<u32, StoreError> {
        purchase_upgrade(&mut self.state, id, now, self.config.log_capacity)
    }

    /// Reset for Star Cred.
    ///
    /// # Errors
    ///
    /// Returns [`PrestigeError`] when lifetime earnings are below threshold.
    pub fn prestige(&mut self, now: Timestamp) -> Result<PrestigeOutcome, PrestigeError> {
        prestige(&mut self.state, &self.config, now)
    }

    #[must_use]
    pub fn rates(&self) -> RateSnapshot {
        RateSnapshot::capture(&self.state, &self.config)
    }

    #[must_use]
    pub const fn autosave_due(&self, now: Timestamp) -> bool {
        now.millis_since(self.state.last_save_time) >= self.config.autosave_interval_ms
    }

    /// Persist the station.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if encoding or the storage write fails.
    pub fn save<S: StationStorage + ?Sized>(
        &mut self,
        storage: &S,
        now: Timestamp,
    ) -> Result<(), PersistError> {
        save_state(storage, &mut self.state, now)
    }

    /// Best-effort save on teardown; failures are logged, not returned.
    pub fn shutdown<S: StationStorage + ?Sized>(&mut self, storage: &S, now: Timestamp) -> bool {
        match self.save(storage, now) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("save on shutdown failed: {err}");
                false
            }
        }
    }

    /// Whole seconds since this session started.
    #[must_use]
    pub const fn session_elapsed(&self, now: Timestamp) -> u64 {
        now.millis_since(self.state.session_start) / 1000
    }

    /// Session timer as `HH:MM:SS`.
    #[must_use]
    pub fn session_clock(&self, now: Timestamp) -> String {
        format_clock(self.session_elapsed(now))
    }

    /// Offline projection applied when this session opened.
    #[must_use]
    pub const fn offline_report(&self) -> OfflineReport {
        self.offline
    }

    #[must_use]
    pub const fn state(&self) -> &StationState {
        &self.state
    }

    pub fn with_state_mut<T>(&mut self, f: impl FnOnce(&mut StationState) -> T) -> T {
        f(&mut self.state)
    }

    #[must_use]
    pub const fn config(&self) -> &StationConfig {
        &self.config
    }

    #[must_use]
    pub fn into_state(self) -> StationState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStorage, encode_state};
    use crate::rng::ScriptedRolls;

    fn quiet_session(now: u64) -> StationSession<ScriptedRolls> {
        StationSession::new(
            StationConfig::default(),
            ScriptedRolls::quiet(),
            Timestamp::from_millis(now),
        )
    }

    #[test]
    fn new_session_greets() {
        let session = quiet_session(1_000);
        let last = session.state().event_log.last().unwrap();
        assert_eq!(last.text, WELCOME);
        assert_eq!(session.offline_report().gains, 0);
        assert_eq!(session.session_clock(Timestamp::from_millis(3_726_000)), "01:02:05");
    }

    #[test]
    fn step_clamps_long_gaps() {
        let mut session = quiet_session(0);
        session.step(Timestamp::from_millis(60_000));
        assert!((session.state().spawn_accumulator - 0.25).abs() < 1e-12);
        session.step(Timestamp::from_millis(60_100));
        assert!((session.state().spawn_accumulator - 0.35).abs() < 1e-12);
    }

    #[test]
    fn restore_projects_offline_earnings() {
        let mut saved = StationState::new_at(Timestamp::from_millis(0));
        saved.credits = 10.0;
        saved.lifetime_credits = 10.0;
        let blob = encode_state(&saved).unwrap();
        let now = Timestamp::from_millis(600_000);
        let session = StationSession::restore(
            Some(&blob),
            StationConfig::default(),
            ScriptedRolls::quiet(),
            now,
        );
        let report = session.offline_report();
        assert!(report.gains > 0);
        assert_eq!(session.state().session_start, now);
        assert!(session.state().credits > 10.0);
        let texts: Vec<&str> = session
            .state()
            .event_log
            .iter()
            .map(|entry| entry.text.as_str())
            .collect();
        assert!(texts[texts.len() - 2].starts_with("While away"));
        assert_eq!(texts[texts.len() - 1], WELCOME);
    }

    #[test]
    fn autosave_tracks_last_save() {
        let storage = MemoryStorage::new();
        let mut session = quiet_session(0);
        assert!(!session.autosave_due(Timestamp::from_millis(29_999)));
        assert!(session.autosave_due(Timestamp::from_millis(30_000)));
        assert!(session.shutdown(&storage, Timestamp::from_millis(30_000)));
        assert!(!session.autosave_due(Timestamp::from_millis(45_000)));
    }

    #[test]
    fn purchase_and_prestige_route_through_session() {
        let mut session = quiet_session(0);
        let now = Timestamp::from_millis(10);
        assert!(session.purchase(UpgradeId::Neon, now).is_err());
        session.with_state_mut(|state| {
            state.credits = 30_000.0;
            state.lifetime_credits = 30_000.0;
        });
        assert_eq!(session.purchase(UpgradeId::Neon, now), Ok(1));
        assert!(session.rates().tips_all > 1.0);
        let outcome = session.prestige(now).unwrap();
        assert_eq!(outcome.total, 1);
        assert_eq!(session.state().level(UpgradeId::Neon), 0);
    }
}
