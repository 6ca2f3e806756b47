//! Visiting ships: occupant classes, ship types and the random picks that
//! populate a dock.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rng::RandomSource;

/// Category of visitor; drives tip rates and spawn weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccupantClass {
    Organic,
    Aquatic,
    Synthetic,
    Tourist,
}

impl OccupantClass {
    /// Weighted picks walk classes in this order.
    pub const ALL: [Self; 4] = [Self::Organic, Self::Aquatic, Self::Synthetic, Self::Tourist];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Organic => "Organic",
            Self::Aquatic => "Aquatic",
            Self::Synthetic => "Synthetic",
            Self::Tourist => "Tourist",
        }
    }

    /// Organic and aquatic visitors respond to café and garden upgrades.
    #[must_use]
    pub const fn enjoys_botanicals(self) -> bool {
        matches!(self, Self::Organic | Self::Aquatic)
    }
}

impl fmt::Display for OccupantClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hull type of a visiting ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipType {
    Shuttle,
    Freighter,
    Cruiser,
}

/// Static economics of a ship type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipSpec {
    pub name: &'static str,
    pub base_fee: f64,
    pub service_secs: f64,
    tips: [f64; 4],
}

impl ShipSpec {
    #[must_use]
    pub const fn base_tip(&self, class: OccupantClass) -> f64 {
        self.tips[class as usize]
    }
}

// Tips are indexed in OccupantClass::ALL order (Organic, Aquatic, Synthetic, Tourist).
const SHUTTLE: ShipSpec = ShipSpec {
    name: "Shuttle",
    base_fee: 10.0,
    service_secs: 3.5,
    tips: [6.0, 7.0, 5.0, 8.0],
};
const FREIGHTER: ShipSpec = ShipSpec {
    name: "Freighter",
    base_fee: 30.0,
    service_secs: 6.5,
    tips: [8.0, 9.0, 7.0, 10.0],
};
const CRUISER: ShipSpec = ShipSpec {
    name: "Tourist Cruiser",
    base_fee: 18.0,
    service_secs: 5.0,
    tips: [7.0, 8.0, 6.0, 12.0],
};

impl ShipType {
    pub const ALL: [Self; 3] = [Self::Shuttle, Self::Freighter, Self::Cruiser];

    #[must_use]
    pub const fn spec(self) -> &'static ShipSpec {
        match self {
            Self::Shuttle => &SHUTTLE,
            Self::Freighter => &FREIGHTER,
            Self::Cruiser => &CRUISER,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        self.spec().name
    }

    /// Mean nominal service time across all ship types.
    #[must_use]
    pub fn average_service_secs() -> f64 {
        Self::ALL.iter().map(|ship| ship.spec().service_secs).sum::<f64>() / 3.0
    }

    /// Mean docking fee across all ship types.
    #[must_use]
    pub fn average_fee() -> f64 {
        Self::ALL.iter().map(|ship| ship.spec().base_fee).sum::<f64>() / 3.0
    }

    /// Mean base tip a class leaves across all ship types.
    #[must_use]
    pub fn average_tip(class: OccupantClass) -> f64 {
        Self::ALL
            .iter()
            .map(|ship| ship.spec().base_tip(class))
            .sum::<f64>()
            / 3.0
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Weighted class selection; `weights` follows [`OccupantClass::ALL`] order.
pub fn pick_class<R: RandomSource + ?Sized>(weights: &[f64; 4], rng: &mut R) -> OccupantClass {
    let total: f64 = weights.iter().sum();
    let mut roll = rng.next_unit() * total;
    for (class, weight) in OccupantClass::ALL.into_iter().zip(weights) {
        roll -= weight;
        if roll <= 0.0 {
            return class;
        }
    }
    OccupantClass::Organic
}

/// Class-conditional ship type thresholds.
pub fn pick_ship_type<R: RandomSource + ?Sized>(class: OccupantClass, rng: &mut R) -> ShipType {
    let roll = rng.next_unit();
    match class {
        OccupantClass::Tourist => {
            if roll < 0.65 {
                ShipType::Cruiser
            } else if roll < 0.85 {
                ShipType::Shuttle
            } else {
                ShipType::Freighter
            }
        }
        OccupantClass::Synthetic => {
            if roll < 0.55 {
                ShipType::Freighter
            } else if roll < 0.85 {
                ShipType::Shuttle
            } else {
                ShipType::Cruiser
            }
        }
        OccupantClass::Organic | OccupantClass::Aquatic => {
            if roll < 0.65 {
                ShipType::Shuttle
            } else if roll < 0.9 {
                ShipType::Cruiser
            } else {
                ShipType::Freighter
            }
        }
    }
}
