//! Timed modifiers: temporary additive boosts with an expiry.
//!
//! Starting a modifier adds its contribution to [`Boosts`]; expiry subtracts
//! exactly that contribution, so overlapping modifiers on the same axis
//! stack and unstack without disturbing each other.
use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;
use crate::state::{BoostAxis, Boosts, LogKind, StationState, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    CometFlyby,
    SolarTailwind,
    BotanicalBrunch,
}

/// Boost contributed while a modifier is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifierEffect {
    pub axis: BoostAxis,
    pub amount: f64,
    pub duration_ms: u64,
}

impl ModifierKind {
    pub const ALL: &'static [Self] = &[
        Self::CometFlyby,
        Self::SolarTailwind,
        Self::BotanicalBrunch,
    ];

    /// Kinds eligible for the ambient per-tick random roll, with weights.
    pub const RANDOM_EVENTS: &'static [(Self, f64)] =
        &[(Self::CometFlyby, 2.0), (Self::SolarTailwind, 1.0)];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CometFlyby => "Comet Flyby",
            Self::SolarTailwind => "Solar Tailwind",
            Self::BotanicalBrunch => "Botanical Brunch",
        }
    }

    #[must_use]
    pub const fn effect(self) -> ModifierEffect {
        match self {
            Self::CometFlyby => ModifierEffect {
                axis: BoostAxis::Traffic,
                amount: 0.5,
                duration_ms: 30_000,
            },
            Self::SolarTailwind => ModifierEffect {
                axis: BoostAxis::Speed,
                amount: 0.25,
                duration_ms: 25_000,
            },
            Self::BotanicalBrunch => ModifierEffect {
                axis: BoostAxis::Tips,
                amount: 0.2,
                duration_ms: 20_000,
            },
        }
    }
}

/// An active modifier instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedModifier {
    pub kind: ModifierKind,
    pub started_at: Timestamp,
    pub expires_at: Timestamp,
}

impl TimedModifier {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    #[must_use]
    pub const fn is_expired(&self, now: Timestamp) -> bool {
        now.as_millis() >= self.expires_at.as_millis()
    }

    /// Whole seconds left before expiry, rounded up.
    #[must_use]
    pub const fn secs_remaining(&self, now: Timestamp) -> u64 {
        self.expires_at.millis_since(now).div_ceil(1000)
    }

    fn apply(&self, boosts: &mut Boosts) {
        let effect = self.kind.effect();
        boosts.add(effect.axis, effect.amount);
    }

    fn revert(&self, boosts: &mut Boosts) {
        let effect = self.kind.effect();
        boosts.add(effect.axis, -effect.amount);
    }
}

/// Begin a modifier at `now`, applying its boost and logging the start.
pub fn start_modifier(
    state: &mut StationState,
    kind: ModifierKind,
    now: Timestamp,
    log_cap: usize,
) -> TimedModifier {
    let modifier = TimedModifier {
        kind,
        started_at: now,
        expires_at: now.plus_millis(kind.effect().duration_ms),
    };
    modifier.apply(&mut state.boosts);
    state.active_modifiers.push(modifier);
    state.push_log(now, format!("{} began!", kind.name()), LogKind::Good, log_cap);
    log::debug!("modifier started: {} until {}", kind.name(), modifier.expires_at);
    modifier
}

/// Revert and drop every modifier whose expiry is at or before `now`.
///
/// Returns the expired modifiers in the order they were started.
pub fn expire_modifiers(
    state: &mut StationState,
    now: Timestamp,
    log_cap: usize,
) -> Vec<TimedModifier> {
    let (expired, active): (Vec<_>, Vec<_>) = state
        .active_modifiers
        .drain(..)
        .partition(|modifier| modifier.is_expired(now));
    state.active_modifiers = active;
    for modifier in &expired {
        modifier.revert(&mut state.boosts);
        state.push_log(
            now,
            format!("{} ended.", modifier.name()),
            LogKind::Warn,
            log_cap,
        );
        log::debug!("modifier expired: {}", modifier.name());
    }
    if state.active_modifiers.is_empty() {
        // Drop accumulated float residue once nothing is active.
        state.boosts = Boosts::default();
    }
    expired
}

/// Rebuild boosts from the active modifier list.
#[must_use]
pub fn recompute_boosts(active: &[TimedModifier]) -> Boosts {
    let mut boosts = Boosts::default();
    for modifier in active {
        modifier.apply(&mut boosts);
    }
    boosts
}

/// Weighted pick over [`ModifierKind::RANDOM_EVENTS`].
pub fn pick_random_event<R: RandomSource + ?Sized>(rng: &mut R) -> ModifierKind {
    let total: f64 = ModifierKind::RANDOM_EVENTS.iter().map(|(_, w)| w).sum();
    let mut roll = rng.next_unit() * total;
    for (kind, weight) in ModifierKind::RANDOM_EVENTS {
        roll -= weight;
        if roll <= 0.0 {
            return *kind;
        }
    }
    ModifierKind::CometFlyby
}
