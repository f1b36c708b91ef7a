//! Map terrain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Terrain of a single map tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Terrain {
    /// Open grassland.
    Plains,
    /// Woodland.
    Forest,
    /// Arid land.
    Desert,
    /// Impassable peaks.
    Mountain,
    /// Lakes and sea.
    Water,
    /// Marsh.
    Swamp,
}

impl Terrain {
    /// Every terrain, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Plains,
        Self::Forest,
        Self::Desert,
        Self::Mountain,
        Self::Water,
        Self::Swamp,
    ];

    /// Upper-case name as used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plains => "PLAINS",
            Self::Forest => "FOREST",
            Self::Desert => "DESERT",
            Self::Mountain => "MOUNTAIN",
            Self::Water => "WATER",
            Self::Swamp => "SWAMP",
        }
    }

    /// Land units may stand here.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Mountain | Self::Water)
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Terrain {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValueError::UnknownVariant {
                kind: "terrain",
                value: s.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("forest".parse::<Terrain>().unwrap(), Terrain::Forest);
        assert_eq!("SWAMP".parse::<Terrain>().unwrap(), Terrain::Swamp);
        assert!("lava".parse::<Terrain>().is_err());
    }

    #[test]
    fn test_serializes_upper_case() {
        assert_eq!(
            serde_json::to_value(Terrain::Mountain).unwrap(),
            serde_json::json!("MOUNTAIN")
        );
    }
}
