//! Unit types and their fixed stat table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Kind of military or civilian unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitType {
    /// Basic melee infantry.
    Warrior,
    /// Founds cities.
    Settler,
    /// Ranged infantry.
    Archer,
    /// Fast mounted unit.
    Cavalry,
    /// Long sight, weak in combat.
    Scout,
    /// Slow ranged siege weapon.
    SiegeEngine,
}

/// Combat and movement stats of a unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitStats {
    /// Attack strength.
    pub attack: u32,
    /// Defense strength.
    pub defense: u32,
    /// Maximum hit points.
    pub max_health: u32,
    /// Hexes per move.
    pub movement_range: u32,
}

impl UnitType {
    /// Every unit type, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Warrior,
        Self::Settler,
        Self::Archer,
        Self::Cavalry,
        Self::Scout,
        Self::SiegeEngine,
    ];

    /// The fixed stat table.
    #[must_use]
    pub const fn stats(self) -> UnitStats {
        let (attack, defense, max_health, movement_range) = match self {
            Self::Warrior => (15, 12, 100, 2),
            Self::Settler => (5, 8, 80, 2),
            Self::Archer => (12, 8, 80, 2),
            Self::Cavalry => (18, 10, 90, 4),
            Self::Scout => (8, 6, 60, 5),
            Self::SiegeEngine => (25, 5, 120, 1),
        };
        UnitStats {
            attack,
            defense,
            max_health,
            movement_range,
        }
    }

    /// Maximum hex distance at which this unit can attack.
    #[must_use]
    pub const fn attack_range(self) -> u32 {
        match self {
            Self::Archer | Self::SiegeEngine => 2,
            _ => 1,
        }
    }

    /// Upper-case name as used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warrior => "WARRIOR",
            Self::Settler => "SETTLER",
            Self::Archer => "ARCHER",
            Self::Cavalry => "CAVALRY",
            Self::Scout => "SCOUT",
            Self::SiegeEngine => "SIEGE_ENGINE",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitType {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValueError::UnknownVariant {
                kind: "unit type",
                value: s.to_owned(),
            })
    }
}
