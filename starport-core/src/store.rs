//! Upgrade store: pricing, purchase validation and synergy hints.
use thiserror::Error;

use crate::catalog::UpgradeId;
use crate::numbers::{floor_f64_to_u64, u64_to_f64};
use crate::rates::brunch_synergy_active;
use crate::state::{LogKind, StationState, Timestamp};

/// Reasons a purchase is refused. Never fatal; the state is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{name} is already at max level {max}")]
    MaxLevel { name: &'static str, max: u32 },
    #[error("{name} costs {price} credits (have {available})")]
    InsufficientCredits {
        name: &'static str,
        price: u64,
        available: u64,
    },
}

/// Price of the next level given the current `level`:
/// `floor(base_cost × growth^level)`.
#[must_use]
pub fn upgrade_price(id: UpgradeId, level: u32) -> u64 {
    let def = id.definition();
    let exponent = i32::try_from(level).unwrap_or(i32::MAX);
    floor_f64_to_u64(def.base_cost * def.cost_growth.powi(exponent))
}

/// Price of the next level of `id` for this station.
#[must_use]
pub fn next_price(state: &StationState, id: UpgradeId) -> u64 {
    upgrade_price(id, state.level(id))
}

/// Check whether `id` can be bought right now.
///
/// # Errors
///
/// Returns the first reason the purchase would be refused.
pub fn can_purchase(state: &StationState, id: UpgradeId) -> Result<u64, StoreError> {
    let def = id.definition();
    let level = state.level(id);
    if def.is_maxed(level) {
        return Err(StoreError::MaxLevel {
            name: def.name,
            max: def.max_level.unwrap_or(level),
        });
    }
    let price = upgrade_price(id, level);
    if state.credits < u64_to_f64(price) {
        return Err(StoreError::InsufficientCredits {
            name: def.name,
            price,
            available: floor_f64_to_u64(state.credits),
        });
    }
    Ok(price)
}

/// Buy one level of `id`, returning the new level.
///
/// # Errors
///
/// Returns [`StoreError`] without touching the state when the upgrade is
/// capped or unaffordable.
pub fn purchase_upgrade(
    state: &mut StationState,
    id: UpgradeId,
    now: Timestamp,
    log_cap: usize,
) -> Result<u32, StoreError> {
    let price = can_purchase(state, id)?;
    let def = id.definition();
    state.credits = (state.credits - u64_to_f64(price)).max(0.0);
    let level = state.level(id).saturating_add(1);
    state.upgrades.insert(id, level);
    state.ensure_dock_slots();

    state.push_log(
        now,
        format!("Purchased {} (Lv {level}).", def.name),
        LogKind::Good,
        log_cap,
    );
    match id {
        UpgradeId::Cafe => state.push_log(now, "Café brews Nebula Latte!", LogKind::Good, log_cap),
        UpgradeId::Garden => {
            state.push_log(now, "Hydro Garden smells fresh!", LogKind::Good, log_cap);
        }
        _ => {}
    }
    log::debug!("purchased {id} level {level} for {price}");
    Ok(level)
}

/// Display hint describing how `id` combines with other upgrades.
#[must_use]
pub fn synergy_hint(state: &StationState, id: UpgradeId) -> &'static str {
    match id {
        UpgradeId::Cafe | UpgradeId::Garden => {
            if brunch_synergy_active(state) {
                "Synergy: Botanical Brunch active!"
            } else {
                "Pair Café+Garden for Brunch bursts."
            }
        }
        UpgradeId::ObsDome => "Pairs with Neon to draw tourists.",
        UpgradeId::Neon => "Pairs with Dome to draw tourists.",
        UpgradeId::MaintBay => "Reduces slowdown events.",
        UpgradeId::ExtraDock | UpgradeId::FuelPump => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAP: usize = 50;

    #[test]
    fn prices_grow_exponentially() {
        assert_eq!(upgrade_price(UpgradeId::ExtraDock, 0), 50);
        assert_eq!(upgrade_price(UpgradeId::ExtraDock, 1), 85);
        assert_eq!(upgrade_price(UpgradeId::ExtraDock, 2), 144);
        assert_eq!(upgrade_price(UpgradeId::FuelPump, 0), 25);
        assert_eq!(upgrade_price(UpgradeId::FuelPump, 3), 38);
    }

    #[test]
    fn purchase_deducts_and_adds_dock() {
        let mut state = StationState::default();
        state.credits = 60.0;
        let level = purchase_upgrade(&mut state, UpgradeId::ExtraDock, Timestamp::default(), CAP)
            .unwrap();
        assert_eq!(level, 1);
        assert!((state.credits - 10.0).abs() < f64::EPSILON);
        assert_eq!(state.docks.len(), 2);
        assert_eq!(
            state.event_log.last().unwrap().text,
            "Purchased Docking Arm (Lv 1)."
        );
    }

    #[test]
    fn insufficient_credits_leave_state_unchanged() {
        let mut state = StationState::default();
        state.credits = 24.0;
        let before = state.clone();
        let err = purchase_upgrade(&mut state, UpgradeId::FuelPump, Timestamp::default(), CAP)
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::InsufficientCredits {
                name: "Fuel Pump",
                price: 25,
                available: 24,
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn capped_upgrade_is_refused() {
        let mut state = StationState::default();
        state.credits = 1e12;
        state.upgrades.insert(UpgradeId::ExtraDock, 6);
        state.ensure_dock_slots();
        let err = purchase_upgrade(&mut state, UpgradeId::ExtraDock, Timestamp::default(), CAP)
            .unwrap_err();
        assert!(matches!(err, StoreError::MaxLevel { max: 6, .. }));
        assert_eq!(state.docks.len(), 7);
    }

    #[test]
    fn cafe_and_garden_log_flavour_and_enable_synergy() {
        let mut state = StationState::default();
        state.credits = 500.0;
        assert_eq!(
            synergy_hint(&state, UpgradeId::Cafe),
            "Pair Café+Garden for Brunch bursts."
        );
        purchase_upgrade(&mut state, UpgradeId::Cafe, Timestamp::default(), CAP).unwrap();
        assert_eq!(state.event_log.last().unwrap().text, "Café brews Nebula Latte!");
        purchase_upgrade(&mut state, UpgradeId::Garden, Timestamp::default(), CAP).unwrap();
        assert_eq!(state.event_log.last().unwrap().text, "Hydro Garden smells fresh!");
        assert_eq!(
            synergy_hint(&state, UpgradeId::Garden),
            "Synergy: Botanical Brunch active!"
        );
    }
}
