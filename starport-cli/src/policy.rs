use std::fmt;

use clap::ValueEnum;
use serde::Serialize;
use starport_core::numbers::u64_to_f64;
use starport_core::store::next_price;
use starport_core::{StationState, UpgradeId, can_purchase};

/// Built-in purchasing strategies for headless runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoBuyPolicy {
    /// Never buy anything
    Idle,
    /// Always buy the cheapest affordable upgrade
    Cheapest,
    /// Weight prices by how much each upgrade tends to pay back
    Balanced,
}

impl AutoBuyPolicy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Cheapest => "Cheapest",
            Self::Balanced => "Balanced",
        }
    }

    /// Next upgrade to buy, if any is affordable.
    #[must_use]
    pub fn choose(self, state: &StationState) -> Option<UpgradeId> {
        let affordable = UpgradeId::ALL
            .iter()
            .copied()
            .filter(|id| can_purchase(state, *id).is_ok());
        match self {
            Self::Idle => None,
            Self::Cheapest => affordable.min_by_key(|id| next_price(state, *id)),
            Self::Balanced => affordable.min_by(|a, b| {
                balanced_cost(state, *a).total_cmp(&balanced_cost(state, *b))
            }),
        }
    }
}

impl fmt::Display for AutoBuyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Price discounted by a rough payback priority.
fn balanced_cost(state: &StationState, id: UpgradeId) -> f64 {
    let priority = match id {
        UpgradeId::ExtraDock => 3.0,
        UpgradeId::Cafe | UpgradeId::Garden => 1.4,
        UpgradeId::Neon => 1.3,
        UpgradeId::FuelPump | UpgradeId::ObsDome => 1.2,
        UpgradeId::MaintBay => 0.8,
    };
    u64_to_f64(next_price(state, id)) / priority
}
