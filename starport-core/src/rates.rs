//! Derived-rate calculator.
//!
//! Every multiplier is composed in one fixed order: the upgrade base
//! `1 + Σ level × bonus`, then prestige scaling `× (1 + k × prestige)`, then
//! the additive boost from active timed modifiers. Nothing here mutates
//! state, so values can be recomputed at will or cached for one tick in a
//! [`RateSnapshot`].
use serde::Serialize;

use crate::catalog::UpgradeId;
use crate::config::StationConfig;
use crate::constants::{
    AQUATIC_WEIGHT_PER_GARDEN, BRUNCH_SYNERGY_TIPS, HICCUP_RELIEF_PER_MAINT_LEVEL,
    ORGANIC_WEIGHT_PER_CAFE, ORGANIC_WEIGHT_PER_GARDEN, PRESTIGE_SPEED_PER_CRED,
    PRESTIGE_TIPS_PER_CRED, PRESTIGE_TRAFFIC_PER_CRED, SPAWN_INTERVAL_FLOOR_SECS,
    SPEED_PER_FUEL_PUMP, SPEED_PER_MAINT_BAY, SYNTHETIC_WEIGHT_PER_MAINT_BAY,
    SYNTHETIC_WEIGHT_PER_NEON, TIPS_PER_CAFE, TIPS_PER_GARDEN, TIPS_PER_NEON,
    TOURIST_WEIGHT_PER_DOME, TOURIST_WEIGHT_PER_NEON, TRAFFIC_PER_DOME, TRAFFIC_PER_NEON,
};
use crate::fleet::{OccupantClass, ShipType};
use crate::numbers::{u32_to_f64, u64_to_f64};
use crate::state::{BoostAxis, StationState};

/// Prestige-tier scaling factors derived from Star Cred.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrestigeScaling {
    pub traffic: f64,
    pub speed: f64,
    pub tips: f64,
}

#[must_use]
pub fn prestige_scaling(state: &StationState) -> PrestigeScaling {
    let creds = u64_to_f64(state.prestige_currency);
    PrestigeScaling {
        traffic: PRESTIGE_TRAFFIC_PER_CRED.mul_add(creds, 1.0),
        speed: PRESTIGE_SPEED_PER_CRED.mul_add(creds, 1.0),
        tips: PRESTIGE_TIPS_PER_CRED.mul_add(creds, 1.0),
    }
}

fn level(state: &StationState, id: UpgradeId) -> f64 {
    u32_to_f64(state.level(id))
}

/// base → prestige → modifier, in that order.
fn compose(base: f64, prestige: f64, boost: f64) -> f64 {
    base.mul_add(prestige, boost)
}

/// Spawn frequency multiplier.
#[must_use]
pub fn traffic_multiplier(state: &StationState) -> f64 {
    let base = 1.0
        + TRAFFIC_PER_DOME * level(state, UpgradeId::ObsDome)
        + TRAFFIC_PER_NEON * level(state, UpgradeId::Neon);
    compose(
        base,
        prestige_scaling(state).traffic,
        state.boosts.get(BoostAxis::Traffic),
    )
}

/// Service speed multiplier.
#[must_use]
pub fn speed_multiplier(state: &StationState) -> f64 {
    let base = 1.0
        + SPEED_PER_FUEL_PUMP * level(state, UpgradeId::FuelPump)
        + SPEED_PER_MAINT_BAY * level(state, UpgradeId::MaintBay);
    compose(
        base,
        prestige_scaling(state).speed,
        state.boosts.get(BoostAxis::Speed),
    )
}

/// Whether café and garden are both owned.
#[must_use]
pub fn brunch_synergy_active(state: &StationState) -> bool {
    state.level(UpgradeId::Cafe) > 0 && state.level(UpgradeId::Garden) > 0
}

/// Tip multiplier for one occupant class.
#[must_use]
pub fn tip_multiplier(state: &StationState, class: OccupantClass) -> f64 {
    let mut base = 1.0 + TIPS_PER_NEON * level(state, UpgradeId::Neon);
    if class.enjoys_botanicals() {
        base += TIPS_PER_CAFE * level(state, UpgradeId::Cafe)
            + TIPS_PER_GARDEN * level(state, UpgradeId::Garden);
        if brunch_synergy_active(state) {
            base += BRUNCH_SYNERGY_TIPS;
        }
    }
    compose(
        base,
        prestige_scaling(state).tips,
        state.boosts.get(BoostAxis::Tips),
    )
}

/// Unweighted mean tip multiplier across every class.
#[must_use]
pub fn tip_multiplier_all(state: &StationState) -> f64 {
    OccupantClass::ALL
        .iter()
        .map(|class| tip_multiplier(state, *class))
        .sum::<f64>()
        / 4.0
}

/// Spawn weights in [`OccupantClass::ALL`] order.
#[must_use]
pub fn class_weights(state: &StationState) -> [f64; 4] {
    let cafe = level(state, UpgradeId::Cafe);
    let garden = level(state, UpgradeId::Garden);
    let neon = level(state, UpgradeId::Neon);
    let maint = level(state, UpgradeId::MaintBay);
    let dome = level(state, UpgradeId::ObsDome);
    [
        1.0 + ORGANIC_WEIGHT_PER_CAFE * cafe + ORGANIC_WEIGHT_PER_GARDEN * garden,
        1.0 + AQUATIC_WEIGHT_PER_GARDEN * garden,
        1.0 + SYNTHETIC_WEIGHT_PER_NEON * neon + SYNTHETIC_WEIGHT_PER_MAINT_BAY * maint,
        1.0 + TOURIST_WEIGHT_PER_DOME * dome + TOURIST_WEIGHT_PER_NEON * neon,
    ]
}

/// Seconds between spawn attempts; scales down with traffic and dock count.
#[must_use]
pub fn spawn_interval(state: &StationState, cfg: &StationConfig) -> f64 {
    let docks = u64_to_f64(u64::try_from(state.dock_count().max(1)).unwrap_or(1));
    let traffic = traffic_multiplier(state).max(f64::EPSILON);
    (cfg.base_spawn_interval_secs / traffic / docks)
        .max(cfg.min_spawn_interval_secs)
        .max(SPAWN_INTERVAL_FLOOR_SECS)
}

/// Time a ship spends docked under the current speed multiplier.
#[must_use]
pub fn service_time(state: &StationState, cfg: &StationConfig, ship: ShipType) -> f64 {
    scaled_service(ship.spec().service_secs, state, cfg)
}

fn scaled_service(nominal: f64, state: &StationState, cfg: &StationConfig) -> f64 {
    (nominal / speed_multiplier(state).max(f64::EPSILON)).max(cfg.min_service_secs)
}

/// Mean service time across ship types under the current speed multiplier.
#[must_use]
pub fn average_service_time(state: &StationState, cfg: &StationConfig) -> f64 {
    scaled_service(ShipType::average_service_secs(), state, cfg)
}

/// Fee plus class-scaled tip for one completed service.
#[must_use]
pub fn payout(state: &StationState, ship: ShipType, class: OccupantClass) -> f64 {
    let spec = ship.spec();
    spec.base_tip(class).mul_add(tip_multiplier(state, class), spec.base_fee)
}

/// Class-weighted mean payout over every class and ship type.
#[must_use]
pub fn average_payout(state: &StationState) -> f64 {
    let weights = class_weights(state);
    let total: f64 = weights.iter().sum();
    let fee = ShipType::average_fee();
    OccupantClass::ALL
        .iter()
        .zip(weights)
        .map(|(class, weight)| {
            let tip = ShipType::average_tip(*class).mul_add(tip_multiplier(state, *class), fee);
            weight / total * tip
        })
        .sum()
}

/// Per-second hiccup probability after maintenance relief.
#[must_use]
pub fn hiccup_chance_per_sec(state: &StationState, cfg: &StationConfig) -> f64 {
    let relief = HICCUP_RELIEF_PER_MAINT_LEVEL.mul_add(-level(state, UpgradeId::MaintBay), 1.0);
    cfg.hiccup_chance_per_sec * relief.max(0.0)
}

/// Every derived rate for one instant, for display or per-tick caching.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSnapshot {
    pub dock_count: usize,
    pub traffic: f64,
    pub speed: f64,
    pub tips_all: f64,
    pub tips_by_class: [f64; 4],
    pub class_weights: [f64; 4],
    pub spawn_interval: f64,
    pub average_payout: f64,
    pub synergy_active: bool,
}

impl RateSnapshot {
    #[must_use]
    pub fn capture(state: &StationState, cfg: &StationConfig) -> Self {
        Self {
            dock_count: state.dock_count(),
            traffic: traffic_multiplier(state),
            speed: speed_multiplier(state),
            tips_all: tip_multiplier_all(state),
            tips_by_class: OccupantClass::ALL.map(|class| tip_multiplier(state, class)),
            class_weights: class_weights(state),
            spawn_interval: spawn_interval(state, cfg),
            average_payout: average_payout(state),
            synergy_active: brunch_synergy_active(state),
        }
    }

    #[must_use]
    pub const fn tips_for(&self, class: OccupantClass) -> f64 {
        self.tips_by_class[class as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Boosts;

    fn with_level(id: UpgradeId, lvl: u32) -> StationState {
        let mut state = StationState::default();
        state.upgrades.insert(id, lvl);
        state.ensure_dock_slots();
        state
    }

    #[test]
    fn fresh_station_has_unit_multipliers() {
        let state = StationState::default();
        assert!((traffic_multiplier(&state) - 1.0).abs() < 1e-12);
        assert!((speed_multiplier(&state) - 1.0).abs() < 1e-12);
        assert!((tip_multiplier_all(&state) - 1.0).abs() < 1e-12);
        let cfg = StationConfig::default();
        assert!((spawn_interval(&state, &cfg) - 3.5).abs() < 1e-12);
    }

    #[test]
    fn organic_shuttle_pays_fee_plus_tip() {
        let state = StationState::default();
        let pay = payout(&state, ShipType::Shuttle, OccupantClass::Organic);
        assert!((pay - 16.0).abs() < 1e-12);
    }

    #[test]
    fn synergy_requires_both_botanical_upgrades() {
        let mut state = StationState::default();
        state.upgrades.insert(UpgradeId::Cafe, 1);
        let cafe_only = tip_multiplier(&state, OccupantClass::Organic);
        assert!((cafe_only - 1.10).abs() < 1e-12);
        assert!(!brunch_synergy_active(&state));

        state.upgrades.insert(UpgradeId::Garden, 1);
        let both = tip_multiplier(&state, OccupantClass::Organic);
        assert!((both - 1.30).abs() < 1e-12);
        assert!(brunch_synergy_active(&state));

        state.upgrades.insert(UpgradeId::Cafe, 0);
        let garden_only = tip_multiplier(&state, OccupantClass::Aquatic);
        assert!((garden_only - 1.10).abs() < 1e-12);
    }

    #[test]
    fn synergy_never_reaches_synthetic_or_tourist() {
        let mut state = StationState::default();
        state.upgrades.insert(UpgradeId::Cafe, 3);
        state.upgrades.insert(UpgradeId::Garden, 3);
        assert!((tip_multiplier(&state, OccupantClass::Synthetic) - 1.0).abs() < 1e-12);
        assert!((tip_multiplier(&state, OccupantClass::Tourist) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn prestige_scales_before_modifier_boost() {
        let mut state = with_level(UpgradeId::ObsDome, 5);
        state.prestige_currency = 10;
        state.boosts = Boosts {
            traffic: 0.5,
            ..Boosts::default()
        };
        let expected = (1.0 + 0.06 * 5.0) * (1.0 + 0.03 * 10.0) + 0.5;
        assert!((traffic_multiplier(&state) - expected).abs() < 1e-12);
    }

    #[test]
    fn multipliers_are_monotonic_in_every_upgrade() {
        for id in UpgradeId::ALL {
            let mut previous =
                RateSnapshot::capture(&StationState::default(), &StationConfig::default());
            for lvl in 1..=id.definition().max_level.unwrap_or(10) {
                let state = with_level(*id, lvl);
                let snap = RateSnapshot::capture(&state, &StationConfig::default());
                assert!(snap.traffic >= previous.traffic, "{id} traffic");
                assert!(snap.speed >= previous.speed, "{id} speed");
                assert!(snap.tips_all >= previous.tips_all, "{id} tips");
                for class in OccupantClass::ALL {
                    assert!(snap.tips_for(class) >= previous.tips_for(class), "{id} {class}");
                }
                previous = snap;
            }
        }
    }

    #[test]
    fn spawn_interval_divides_by_docks() {
        let cfg = StationConfig::default();
        let state = with_level(UpgradeId::ExtraDock, 3);
        assert!((spawn_interval(&state, &cfg) - 3.5 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn spawn_interval_floors_dock_count_and_interval() {
        let cfg = StationConfig {
            base_spawn_interval_secs: 0.01,
            ..StationConfig::default()
        };
        let mut state = StationState::default();
        state.docks.clear();
        assert!((spawn_interval(&state, &cfg) - cfg.min_spawn_interval_secs).abs() < 1e-12);
    }

    #[test]
    fn service_time_respects_floor() {
        let cfg = StationConfig::default();
        let mut state = StationState::default();
        assert!((service_time(&state, &cfg, ShipType::Freighter) - 6.5).abs() < 1e-12);
        state.boosts.speed = 10.0;
        assert!((service_time(&state, &cfg, ShipType::Shuttle) - 1.2).abs() < 1e-12);
    }

    #[test]
    fn maintenance_reduces_hiccups() {
        let cfg = StationConfig::default();
        let base = hiccup_chance_per_sec(&StationState::default(), &cfg);
        let maintained = hiccup_chance_per_sec(&with_level(UpgradeId::MaintBay, 10), &cfg);
        assert!(maintained < base);
        assert!((maintained - base * 0.8).abs() < 1e-15);
    }

    #[test]
    fn average_payout_matches_uniform_weights() {
        let state = StationState::default();
        let fee = 58.0 / 3.0;
        let expected = OccupantClass::ALL
            .iter()
            .map(|class| fee + ShipType::average_tip(*class))
            .sum::<f64>()
            / 4.0;
        assert!((average_payout(&state) - expected).abs() < 1e-9);
    }
}
