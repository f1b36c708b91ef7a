//! Rule violations for the City context.

use hexrealm_core::error::{DomainError, RuleViolation};
use hexrealm_core::ids::{CityId, UnitId};
use hexrealm_core::position::Position;
use hexrealm_core::terrain::Terrain;
use thiserror::Error;

/// City rules that can refuse a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CityRuleError {
    /// Cities cannot be founded on this terrain.
    #[error("cannot found a city on {terrain} at {position}")]
    InvalidTerrain {
        /// Terrain at the requested position.
        terrain: Terrain,
        /// The requested position.
        position: Position,
    },

    /// Another city already stands here.
    #[error("position {0} is already occupied by a city")]
    PositionOccupied(Position),

    /// The founding unit is not a living unit of the founding player.
    #[error("unit {0} is not a living unit of the founding player in this game")]
    InvalidFoundingUnit(UnitId),

    /// A city with this id already exists.
    #[error("city {0} already exists")]
    CityAlreadyExists(CityId),
}

impl CityRuleError {
    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTerrain { .. } => "invalid_terrain",
            Self::PositionOccupied(_) => "position_occupied",
            Self::InvalidFoundingUnit(_) => "invalid_founding_unit",
            Self::CityAlreadyExists(_) => "city_already_exists",
        }
    }
}

impl From<CityRuleError> for DomainError {
    fn from(err: CityRuleError) -> Self {
        DomainError::RuleViolation(RuleViolation::new(err.code(), err.to_string()))
    }
}
