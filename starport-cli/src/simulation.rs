use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;
use starport_core::numbers::floor_f64_to_u64;
use starport_core::{
    OfflineReport, RateSnapshot, STORAGE_KEY, StationEngine, StationState, StationStorage,
    TickReport, Timestamp, UpgradeId, decode_state,
};

use crate::policy::AutoBuyPolicy;

/// Virtual clock origin for runs without a prior save.
pub const VIRTUAL_EPOCH_MS: u64 = 1_700_000_000_000;

/// Configuration for one headless run.
#[derive(Debug, Clone, Copy)]
pub struct RunSettings {
    pub seed: u64,
    pub duration_secs: u64,
    pub policy: AutoBuyPolicy,
    pub auto_prestige: bool,
    /// Virtual time between the previous save and this run.
    pub away_secs: u64,
}

/// Counters folded from every tick of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunTotals {
    pub spawn_attempts: u64,
    pub spawns: u64,
    pub completions: u64,
    pub hiccups: u64,
    pub modifiers_started: u64,
    pub credits_earned: f64,
}

impl RunTotals {
    fn record(&mut self, report: &TickReport) {
        self.spawn_attempts += u64::from(report.spawn_attempts);
        self.spawns += u64::from(report.spawned);
        self.completions += count(report.completed.len());
        self.hiccups += u64::from(report.hiccups);
        self.modifiers_started += count(report.modifiers_started.len());
        self.credits_earned += report.credits_earned;
    }
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

/// Outcome of one seeded run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub policy: AutoBuyPolicy,
    pub simulated_secs: u64,
    pub session_clock: String,
    pub offline: OfflineReport,
    pub credits: f64,
    pub lifetime_credits: f64,
    pub prestige_currency: u64,
    pub prestiges: u32,
    pub purchases: u32,
    pub autosaves: u32,
    pub saved: bool,
    pub dock_count: usize,
    pub upgrades: BTreeMap<UpgradeId, u32>,
    pub totals: RunTotals,
    pub rates: RateSnapshot,
    pub recent_log: Vec<String>,
}

/// Virtual start time: the last save plus the away gap, or the epoch.
///
/// # Errors
///
/// Returns an error if the storage backend cannot be read.
pub fn resume_point<S: StationStorage>(storage: &S, away_secs: u64) -> Result<Timestamp> {
    let blob = storage.get(STORAGE_KEY).context("reading existing save")?;
    let last_save = blob
        .as_deref()
        .and_then(|blob| decode_state(blob).ok())
        .map(|state| state.last_save_time);
    Ok(last_save.map_or_else(
        || Timestamp::from_millis(VIRTUAL_EPOCH_MS),
        |saved| saved.plus_millis(away_secs.saturating_mul(1000)),
    ))
}

/// Star Cred is only worth claiming once lifetime earnings cover a new point.
fn prestige_pays(state: &StationState, threshold: f64) -> bool {
    floor_f64_to_u64(state.lifetime_credits / threshold) > state.prestige_currency
}

/// Drive one station for `duration_secs` of virtual time.
///
/// # Errors
///
/// Returns an error if storage reads or autosaves fail.
pub fn run_station<S: StationStorage>(
    engine: &StationEngine<S>,
    settings: RunSettings,
) -> Result<RunSummary> {
    let start = resume_point(engine.storage(), settings.away_secs)?;
    let mut session = engine
        .open_session(settings.seed, start)
        .context("opening station session")?;
    let offline = session.offline_report();
    let tick_ms = session.config().tick_interval_ms;
    let threshold = session.config().prestige_threshold;
    let total_ticks = settings.duration_secs.saturating_mul(1000) / tick_ms;
    let decide_every = (1000 / tick_ms).max(1);

    let mut totals = RunTotals::default();
    let (mut prestiges, mut purchases, mut autosaves) = (0_u32, 0_u32, 0_u32);
    let mut now = start;
    for step in 1..=total_ticks {
        now = now.plus_millis(tick_ms);
        totals.record(&session.step(now));

        if step % decide_every == 0 {
            if settings.auto_prestige && prestige_pays(session.state(), threshold) {
                let outcome = session.prestige(now)?;
                log::debug!("seed {}: prestige +{}", settings.seed, outcome.gained);
                prestiges += 1;
            }
            while let Some(id) = settings.policy.choose(session.state()) {
                if session.purchase(id, now).is_err() {
                    break;
                }
                purchases += 1;
            }
        }

        if session.autosave_due(now) {
            engine
                .save(&mut session, now)
                .with_context(|| format!("autosave for seed {}", settings.seed))?;
            autosaves += 1;
        }
    }

    let saved = session.shutdown(engine.storage(), now);
    let rates = session.rates();
    let state = session.state();
    Ok(RunSummary {
        seed: settings.seed,
        policy: settings.policy,
        simulated_secs: settings.duration_secs,
        session_clock: session.session_clock(now),
        offline,
        credits: state.credits,
        lifetime_credits: state.lifetime_credits,
        prestige_currency: state.prestige_currency,
        prestiges,
        purchases,
        autosaves,
        saved,
        dock_count: state.dock_count(),
        upgrades: state.upgrades.clone(),
        totals,
        rates,
        recent_log: state
            .event_log
            .recent(5)
            .map(|entry| entry.text.clone())
            .collect(),
    })
}
