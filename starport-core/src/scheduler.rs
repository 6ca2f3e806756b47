//! Spawn and service scheduler: one simulation tick.
use serde::{Deserialize, Serialize};

use crate::config::StationConfig;
use crate::fleet::{OccupantClass, ShipType, pick_class, pick_ship_type};
use crate::modifiers::{ModifierKind, expire_modifiers, pick_random_event, start_modifier};
use crate::numbers::format_credits;
use crate::rates::{
    brunch_synergy_active, class_weights, hiccup_chance_per_sec, payout, service_time,
    spawn_interval,
};
use crate::rng::RandomSource;
use crate::state::{LogKind, StationState, Timestamp};

/// A ship that finished service during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletedService {
    pub dock: usize,
    pub ship: ShipType,
    pub class: OccupantClass,
    pub payout: f64,
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub spawn_attempts: u32,
    pub spawned: u32,
    pub hiccups: u32,
    pub completed: Vec<CompletedService>,
    pub credits_earned: f64,
    pub modifiers_started: Vec<ModifierKind>,
    pub modifiers_expired: Vec<ModifierKind>,
}

/// Advance the station by `dt` seconds at wall-clock `now`.
///
/// Order within a tick: expire modifiers, roll a random modifier, spawn for
/// every elapsed interval, then service every occupied dock.
pub fn tick<R: RandomSource + ?Sized>(
    state: &mut StationState,
    cfg: &StationConfig,
    dt: f64,
    now: Timestamp,
    rng: &mut R,
) -> TickReport {
    let mut report = TickReport::default();
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let cap = cfg.log_capacity;
    state.ensure_dock_slots();

    report.modifiers_expired = expire_modifiers(state, now, cap)
        .into_iter()
        .map(|modifier| modifier.kind)
        .collect();

    if rng.next_unit() < dt * cfg.random_event_chance_per_sec {
        let kind = pick_random_event(rng);
        start_modifier(state, kind, now, cap);
        report.modifiers_started.push(kind);
    }

    run_spawns(state, cfg, dt, rng, &mut report);
    service_docks(state, cfg, dt, now, rng, &mut report);

    state.last_tick_time = now;
    report
}

fn run_spawns<R: RandomSource + ?Sized>(
    state: &mut StationState,
    cfg: &StationConfig,
    dt: f64,
    rng: &mut R,
    report: &mut TickReport,
) {
    state.spawn_accumulator += dt;
    let interval = spawn_interval(state, cfg);
    while state.spawn_accumulator >= interval {
        state.spawn_accumulator -= interval;
        report.spawn_attempts += 1;
        if try_spawn(state, cfg, rng) {
            report.spawned += 1;
        }
    }
}

/// Dock one ship in the first free slot; `false` when every dock is busy.
fn try_spawn<R: RandomSource + ?Sized>(
    state: &mut StationState,
    cfg: &StationConfig,
    rng: &mut R,
) -> bool {
    let Some(index) = state.docks.iter().position(|dock| !dock.occupied) else {
        return false;
    };
    let class = pick_class(&class_weights(state), rng);
    let ship = pick_ship_type(class, rng);
    let service = service_time(state, cfg, ship);
    state.docks[index].dock(class, ship, service);
    log::debug!("dock {index}: {ship} ({class}) docked for {service:.2}s");
    true
}

fn service_docks<R: RandomSource + ?Sized>(
    state: &mut StationState,
    cfg: &StationConfig,
    dt: f64,
    now: Timestamp,
    rng: &mut R,
    report: &mut TickReport,
) {
    let hiccup_chance = hiccup_chance_per_sec(state, cfg) * dt;
    for index in 0..state.docks.len() {
        if !state.docks[index].occupied {
            continue;
        }
        if rng.next_unit() < hiccup_chance {
            let dock = &mut state.docks[index];
            dock.remaining_time += cfg.hiccup_delay_secs;
            dock.total_service_time += cfg.hiccup_delay_secs;
            report.hiccups += 1;
        }

        let dock = &mut state.docks[index];
        dock.remaining_time -= dt;
        if dock.remaining_time > 0.0 {
            continue;
        }

        let (Some(ship), Some(class)) = (dock.occupant_type, dock.occupant_class) else {
            dock.clear();
            continue;
        };
        dock.clear();
        let amount = payout(state, ship, class);
        state.earn(amount);
        state.push_log(
            now,
            format!("+{} from {} ({class}).", format_credits(amount), ship.name()),
            LogKind::Good,
            cfg.log_capacity,
        );
        report.credits_earned += amount;
        report.completed.push(CompletedService {
            dock: index,
            ship,
            class,
            payout: amount,
        });

        if class.enjoys_botanicals()
            && brunch_synergy_active(state)
            && rng.next_unit() < cfg.brunch_chance
        {
            start_modifier(state, ModifierKind::BotanicalBrunch, now, cfg.log_capacity);
            report.modifiers_started.push(ModifierKind::BotanicalBrunch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::UpgradeId;
    use crate::rng::ScriptedRolls;

    fn cfg() -> StationConfig {
        StationConfig::default()
    }

    #[test]
    fn one_interval_yields_one_spawn_attempt() {
        let mut state = StationState::default();
        let mut rolls = ScriptedRolls::quiet();
        let report = tick(&mut state, &cfg(), 4.0, Timestamp::from_millis(4_000), &mut rolls);
        assert_eq!(report.spawn_attempts, 1);
        assert_eq!(report.spawned, 1);
        assert!((state.spawn_accumulator - 0.5).abs() < 1e-9);
    }

    #[test]
    fn several_elapsed_intervals_each_attempt_a_spawn() {
        let mut state = StationState::default();
        state.upgrades.insert(UpgradeId::ExtraDock, 2);
        state.ensure_dock_slots();
        // Interval is 3.5 / 3 docks; 3.6s covers three attempts.
        let report = tick(
            &mut state,
            &cfg(),
            3.6,
            Timestamp::from_millis(3_600),
            &mut ScriptedRolls::quiet(),
        );
        assert_eq!(report.spawn_attempts, 3);
        assert_eq!(report.spawned, 3);
    }

    #[test]
    fn zero_interval_config_still_terminates() {
        let config = StationConfig {
            base_spawn_interval_secs: 0.0,
            min_spawn_interval_secs: 0.0,
            ..cfg()
        };
        let mut state = StationState::default();
        let report = tick(
            &mut state,
            &config,
            0.1,
            Timestamp::from_millis(100),
            &mut ScriptedRolls::quiet(),
        );
        assert!((99..=100).contains(&report.spawn_attempts));
        assert_eq!(report.spawned, 1);
        assert!(state.spawn_accumulator < 0.001 + 1e-12);
    }

    #[test]
    fn busy_docks_turn_spawns_into_no_ops() {
        let mut state = StationState::default();
        state.docks[0].dock(OccupantClass::Tourist, ShipType::Freighter, 60.0);
        let report = tick(
            &mut state,
            &cfg(),
            7.0,
            Timestamp::from_millis(7_000),
            &mut ScriptedRolls::quiet(),
        );
        assert_eq!(report.spawn_attempts, 2);
        assert_eq!(report.spawned, 0);
        assert!((state.docks[0].remaining_time - 53.0).abs() < 1e-9);
    }

    #[test]
    fn organic_shuttle_completion_pays_sixteen() {
        let mut state = StationState::default();
        state.docks[0].dock(OccupantClass::Organic, ShipType::Shuttle, 0.5);
        let report = tick(
            &mut state,
            &cfg(),
            1.0,
            Timestamp::from_millis(1_000),
            &mut ScriptedRolls::quiet(),
        );
        assert_eq!(report.completed.len(), 1);
        assert!((report.completed[0].payout - 16.0).abs() < 1e-12);
        assert!((state.credits - 16.0).abs() < 1e-12);
        assert!((state.lifetime_credits - 16.0).abs() < 1e-12);
        assert!(!state.docks[0].occupied);
        assert!(state.docks[0].remaining_time.abs() < f64::EPSILON);
        let last = state.event_log.last().unwrap();
        assert_eq!(last.kind, LogKind::Good);
        assert!(last.text.contains("Shuttle"));
    }

    #[test]
    fn spawned_ship_is_serviced_in_the_same_tick() {
        let mut state = StationState::default();
        state.upgrades.insert(UpgradeId::ExtraDock, 1);
        state.ensure_dock_slots();
        // Interval is 1.75s with two docks. Rolls: event, class (organic),
        // ship type (shuttle), then one hiccup roll per occupied dock.
        let mut rolls = ScriptedRolls::new([0.99, 0.0, 0.0, 0.99], 0.99);
        let report = tick(&mut state, &cfg(), 2.0, Timestamp::from_millis(2_000), &mut rolls);
        assert_eq!(report.spawned, 1);
        assert_eq!(rolls.draws(), 4);
        let dock = &state.docks[0];
        assert!(dock.occupied);
        assert_eq!(dock.occupant_type, Some(ShipType::Shuttle));
        assert!((dock.total_service_time - 3.5).abs() < 1e-9);
        assert!((dock.remaining_time - 1.5).abs() < 1e-9);
    }

    #[test]
    fn hiccup_extends_remaining_and_total_time() {
        let mut state = StationState::default();
        state.docks[0].dock(OccupantClass::Synthetic, ShipType::Freighter, 6.5);
        // event roll stays quiet; hiccup roll of zero always fires.
        let mut rolls = ScriptedRolls::new([0.99, 0.0], 0.99);
        let report = tick(&mut state, &cfg(), 0.1, Timestamp::from_millis(100), &mut rolls);
        assert_eq!(report.hiccups, 1);
        let dock = &state.docks[0];
        assert!((dock.total_service_time - 7.0).abs() < 1e-9);
        assert!((dock.remaining_time - 6.9).abs() < 1e-9);
        assert!(dock.remaining_time <= dock.total_service_time);
    }

    #[test]
    fn random_event_starts_when_roll_is_low() {
        let mut state = StationState::default();
        // event roll fires, event pick selects a comet.
        let mut rolls = ScriptedRolls::new([0.0, 0.1], 0.99);
        let report = tick(&mut state, &cfg(), 0.1, Timestamp::from_millis(100), &mut rolls);
        assert_eq!(report.modifiers_started, vec![ModifierKind::CometFlyby]);
        assert!((state.boosts.traffic - 0.5).abs() < 1e-9);
    }

    #[test]
    fn brunch_triggers_only_with_both_botanicals() {
        let mut state = StationState::default();
        state.upgrades.insert(UpgradeId::Cafe, 1);
        state.upgrades.insert(UpgradeId::Garden, 1);
        state.docks[0].dock(OccupantClass::Aquatic, ShipType::Shuttle, 0.05);
        // event roll quiet, hiccup quiet, brunch roll fires.
        let mut rolls = ScriptedRolls::new([0.99, 0.99, 0.0], 0.99);
        let report = tick(&mut state, &cfg(), 0.1, Timestamp::from_millis(100), &mut rolls);
        assert_eq!(report.modifiers_started, vec![ModifierKind::BotanicalBrunch]);
        assert!((state.boosts.tips - 0.2).abs() < 1e-9);

        let mut without = StationState::default();
        without.upgrades.insert(UpgradeId::Cafe, 1);
        without.docks[0].dock(OccupantClass::Aquatic, ShipType::Shuttle, 0.05);
        let mut rolls = ScriptedRolls::new([0.99, 0.99, 0.0], 0.99);
        let report = tick(&mut without, &cfg(), 0.1, Timestamp::from_millis(100), &mut rolls);
        assert!(report.modifiers_started.is_empty());
    }

    #[test]
    fn expired_modifiers_are_reported() {
        let mut state = StationState::default();
        start_modifier(
            &mut state,
            ModifierKind::CometFlyby,
            Timestamp::from_millis(0),
            50,
        );
        let report = tick(
            &mut state,
            &cfg(),
            0.1,
            Timestamp::from_millis(30_000),
            &mut ScriptedRolls::quiet(),
        );
        assert_eq!(report.modifiers_expired, vec![ModifierKind::CometFlyby]);
        assert!(state.boosts.traffic.abs() < 1e-12);
    }

    #[test]
    fn negative_or_nan_dt_is_ignored() {
        let mut state = StationState::default();
        for dt in [-5.0, f64::NAN] {
            let report = tick(
                &mut state,
                &cfg(),
                dt,
                Timestamp::from_millis(10),
                &mut ScriptedRolls::quiet(),
            );
            assert_eq!(report.spawn_attempts, 0);
        }
        assert!(state.spawn_accumulator.abs() < f64::EPSILON);
    }
}
