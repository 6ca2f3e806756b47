//! Closed-form projection of earnings while the station was unattended.
use serde::{Deserialize, Serialize};

use crate::config::StationConfig;
use crate::numbers::{floor_f64_to_u64, format_credits, u64_to_f64};
use crate::rates::{average_payout, average_service_time, spawn_interval};
use crate::state::{LogKind, StationState, Timestamp};

/// Result of one offline projection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OfflineReport {
    /// Whole seconds since the last save, before capping.
    pub elapsed_secs: u64,
    /// Seconds actually projected.
    pub credited_secs: u64,
    pub ships: u64,
    pub gains: u64,
}

impl OfflineReport {
    #[must_use]
    pub const fn was_capped(&self) -> bool {
        self.elapsed_secs > self.credited_secs
    }
}

/// Estimate what the station earned between the last save and `now`.
///
/// Pure with respect to `state`; see [`apply_offline_progress`] to credit it.
#[must_use]
pub fn project_offline(state: &StationState, cfg: &StationConfig, now: Timestamp) -> OfflineReport {
    let elapsed_secs = now.millis_since(state.last_save_time) / 1000;
    let credited_secs = elapsed_secs.min(cfg.offline_cap_secs);
    if credited_secs == 0 {
        return OfflineReport {
            elapsed_secs,
            ..OfflineReport::default()
        };
    }

    let cycle = average_service_time(state, cfg) + spawn_interval(state, cfg);
    let per_dock = u64_to_f64(credited_secs) / cycle;
    let docks = u64_to_f64(u64::try_from(state.dock_count()).unwrap_or(1));
    let ships = floor_f64_to_u64(per_dock * docks * cfg.offline_utilization);
    let gains = floor_f64_to_u64(u64_to_f64(ships) * average_payout(state));

    OfflineReport {
        elapsed_secs,
        credited_secs,
        ships,
        gains,
    }
}

/// Credit projected offline earnings and record them for display.
///
/// Zero elapsed time leaves the state untouched.
pub fn apply_offline_progress(
    state: &mut StationState,
    cfg: &StationConfig,
    now: Timestamp,
) -> OfflineReport {
    let report = project_offline(state, cfg, now);
    if report.credited_secs == 0 {
        return report;
    }

    let gains = u64_to_f64(report.gains);
    state.earn(gains);
    state.offline_gains = gains;
    state.push_log(
        now,
        format!("While away, you earned {} credits.", format_credits(gains)),
        if report.gains > 0 {
            LogKind::Good
        } else {
            LogKind::Neutral
        },
        cfg.log_capacity,
    );
    log::info!(
        "offline progress: {}s credited ({}s elapsed), {} ships, {} credits",
        report.credited_secs,
        report.elapsed_secs,
        report.ships,
        report.gains
    );
    report
}
