//! Static upgrade catalog ("station modules").
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a purchasable station module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpgradeId {
    ExtraDock,
    FuelPump,
    Cafe,
    ObsDome,
    MaintBay,
    Garden,
    Neon,
}

impl UpgradeId {
    pub const ALL: &'static [Self] = &[
        Self::ExtraDock,
        Self::FuelPump,
        Self::Cafe,
        Self::ObsDome,
        Self::MaintBay,
        Self::Garden,
        Self::Neon,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ExtraDock => "extraDock",
            Self::FuelPump => "fuelPump",
            Self::Cafe => "cafe",
            Self::ObsDome => "obsDome",
            Self::MaintBay => "maintBay",
            Self::Garden => "garden",
            Self::Neon => "neon",
        }
    }

    /// Static definition backing this id.
    #[must_use]
    pub fn definition(self) -> &'static UpgradeDefinition {
        // UPGRADES is declared in the same order as ALL.
        &UPGRADES[self as usize]
    }
}

impl fmt::Display for UpgradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for UpgradeId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.key().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// Catalog entry for a station module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeDefinition {
    pub id: UpgradeId,
    pub name: &'static str,
    pub desc: &'static str,
    pub base_cost: f64,
    pub cost_growth: f64,
    pub max_level: Option<u32>,
}

impl UpgradeDefinition {
    /// Whether `level` is at or above the cap.
    #[must_use]
    pub fn is_maxed(&self, level: u32) -> bool {
        self.max_level.is_some_and(|max| level >= max)
    }

    /// Clamp a (possibly restored) level to the cap.
    #[must_use]
    pub fn clamp_level(&self, level: u32) -> u32 {
        self.max_level.map_or(level, |max| level.min(max))
    }
}

pub static UPGRADES: [UpgradeDefinition; 7] = [
    UpgradeDefinition {
        id: UpgradeId::ExtraDock,
        name: "Docking Arm",
        desc: "Adds a new dock.",
        base_cost: 50.0,
        cost_growth: 1.7,
        max_level: Some(6),
    },
    UpgradeDefinition {
        id: UpgradeId::FuelPump,
        name: "Fuel Pump",
        desc: "+5% ship speed per level.",
        base_cost: 25.0,
        cost_growth: 1.15,
        max_level: Some(50),
    },
    UpgradeDefinition {
        id: UpgradeId::Cafe,
        name: "Alien Café",
        desc: "+10% tips from organic/aquatic.",
        base_cost: 40.0,
        cost_growth: 1.2,
        max_level: Some(40),
    },
    UpgradeDefinition {
        id: UpgradeId::ObsDome,
        name: "Observation Dome",
        desc: "+6% traffic & +15% tourists.",
        base_cost: 60.0,
        cost_growth: 1.22,
        max_level: Some(30),
    },
    UpgradeDefinition {
        id: UpgradeId::MaintBay,
        name: "Maintenance Bay",
        desc: "+5% speed; reduces slowdowns.",
        base_cost: 35.0,
        cost_growth: 1.18,
        max_level: Some(40),
    },
    UpgradeDefinition {
        id: UpgradeId::Garden,
        name: "Hydro Garden",
        desc: "+10% tips (org/aquatic).",
        base_cost: 45.0,
        cost_growth: 1.2,
        max_level: Some(40),
    },
    UpgradeDefinition {
        id: UpgradeId::Neon,
        name: "Neon Signage",
        desc: "+5% tips (all).",
        base_cost: 30.0,
        cost_growth: 1.17,
        max_level: Some(50),
    },
];
