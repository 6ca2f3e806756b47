//! Prestige: trade a run's progress for permanent Star Cred.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::UpgradeId;
use crate::config::StationConfig;
use crate::numbers::{floor_f64_to_u64, format_credits};
use crate::state::{Boosts, DockSlot, LogKind, StationState, Timestamp};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrestigeError {
    #[error("reach {threshold} lifetime credits to prestige (have {lifetime:.0})")]
    BelowThreshold { lifetime: f64, threshold: f64 },
}

/// Star Cred awarded by one prestige reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrestigeOutcome {
    pub gained: u64,
    pub total: u64,
}

#[must_use]
pub fn can_prestige(state: &StationState, cfg: &StationConfig) -> bool {
    state.lifetime_credits >= cfg.prestige_threshold
}

/// Star Cred a prestige would award right now; zero when ineligible.
#[must_use]
pub fn next_prestige_gain(state: &StationState, cfg: &StationConfig) -> u64 {
    if !can_prestige(state, cfg) {
        return 0;
    }
    let earned = floor_f64_to_u64(state.lifetime_credits / cfg.prestige_threshold);
    earned.saturating_sub(state.prestige_currency).max(1)
}

/// Reset the run and award Star Cred.
///
/// Lifetime credits and Star Cred survive; spendable credits, upgrade
/// levels, docks, modifiers, boosts and the spawn accumulator do not.
///
/// # Errors
///
/// Returns [`PrestigeError::BelowThreshold`] and leaves the state untouched
/// when lifetime earnings are short of the threshold.
pub fn prestige(
    state: &mut StationState,
    cfg: &StationConfig,
    now: Timestamp,
) -> Result<PrestigeOutcome, PrestigeError> {
    if !can_prestige(state, cfg) {
        return Err(PrestigeError::BelowThreshold {
            lifetime: state.lifetime_credits,
            threshold: cfg.prestige_threshold,
        });
    }

    let gained = next_prestige_gain(state, cfg);
    state.prestige_currency = state.prestige_currency.saturating_add(gained);
    state.credits = 0.0;
    for id in UpgradeId::ALL {
        state.upgrades.insert(*id, 0);
    }
    state.docks = vec![DockSlot::default()];
    state.active_modifiers.clear();
    state.boosts = Boosts::default();
    state.spawn_accumulator = 0.0;

    state.push_log(
        now,
        format!(
            "Prestiged! +{gained} Star Cred (total {}). Lifetime earnings: {}.",
            state.prestige_currency,
            format_credits(state.lifetime_credits)
        ),
        LogKind::Good,
        cfg.log_capacity,
    );
    log::info!(
        "prestige: +{gained} star cred, total {}",
        state.prestige_currency
    );
    Ok(PrestigeOutcome {
        gained,
        total: state.prestige_currency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::{ModifierKind, start_modifier};

    fn rich(lifetime: f64) -> StationState {
        let mut state = StationState::default();
        state.lifetime_credits = lifetime;
        state.credits = lifetime / 2.0;
        state
    }

    #[test]
    fn below_threshold_is_rejected_untouched() {
        let mut state = rich(24_999.0);
        let before = state.clone();
        let err = prestige(&mut state, &StationConfig::default(), Timestamp::default()).unwrap_err();
        assert!(matches!(err, PrestigeError::BelowThreshold { .. }));
        assert_eq!(state, before);
        assert_eq!(next_prestige_gain(&state, &StationConfig::default()), 0);
    }

    #[test]
    fn reset_clears_run_but_keeps_lifetime() {
        let cfg = StationConfig::default();
        let mut state = rich(80_000.0);
        state.upgrades.insert(UpgradeId::ExtraDock, 3);
        state.upgrades.insert(UpgradeId::Neon, 9);
        state.ensure_dock_slots();
        state.spawn_accumulator = 1.2;
        start_modifier(&mut state, ModifierKind::CometFlyby, Timestamp::default(), 10);

        let outcome = prestige(&mut state, &cfg, Timestamp::from_millis(5)).unwrap();
        assert_eq!(outcome, PrestigeOutcome { gained: 3, total: 3 });
        assert!(state.credits.abs() < f64::EPSILON);
        assert!((state.lifetime_credits - 80_000.0).abs() < f64::EPSILON);
        assert!(UpgradeId::ALL.iter().all(|id| state.level(*id) == 0));
        assert_eq!(state.docks, vec![DockSlot::default()]);
        assert!(state.active_modifiers.is_empty());
        assert_eq!(state.boosts, Boosts::default());
        assert!(state.spawn_accumulator.abs() < f64::EPSILON);
    }

    #[test]
    fn repeat_prestige_awards_at_least_one() {
        let cfg = StationConfig::default();
        let mut state = rich(30_000.0);
        state.prestige_currency = 4;
        let outcome = prestige(&mut state, &cfg, Timestamp::default()).unwrap();
        assert_eq!(outcome.gained, 1);
        assert_eq!(state.prestige_currency, 5);
    }
}
