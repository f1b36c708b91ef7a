//! Rule violations for the Unit context.

use hexrealm_core::error::{DomainError, RuleViolation};
use hexrealm_core::ids::UnitId;
use hexrealm_core::position::Position;
use thiserror::Error;

/// Unit rules that can refuse a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitRuleError {
    /// The unit has been destroyed.
    #[error("unit {0} is dead")]
    UnitIsDead(UnitId),

    /// The destination is further than the unit can move.
    #[error("destination is {distance} hexes away, movement range is {range}")]
    OutOfMovementRange {
        /// Hex distance to the destination.
        distance: u32,
        /// Movement range of the unit type.
        range: u32,
    },

    /// The unit is already standing on the destination.
    #[error("unit is already at {0}")]
    AlreadyAtPosition(Position),

    /// Another unit stands on the destination.
    #[error("position {0} is occupied by another unit")]
    PositionOccupied(Position),

    /// The target is further than the attacker can reach.
    #[error("target is {distance} hexes away, attack range is {range}")]
    OutOfAttackRange {
        /// Hex distance to the target.
        distance: u32,
        /// Attack range of the attacker.
        range: u32,
    },

    /// Attacker and target belong to the same player.
    #[error("units of the same player cannot attack each other")]
    FriendlyFire,
}

impl UnitRuleError {
    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnitIsDead(_) => "unit_is_dead",
            Self::OutOfMovementRange { .. } => "out_of_movement_range",
            Self::AlreadyAtPosition(_) => "already_at_position",
            Self::PositionOccupied(_) => "position_occupied",
            Self::OutOfAttackRange { .. } => "out_of_attack_range",
            Self::FriendlyFire => "friendly_fire",
        }
    }
}

impl From<UnitRuleError> for DomainError {
    fn from(err: UnitRuleError) -> Self {
        DomainError::RuleViolation(RuleViolation::new(err.code(), err.to_string()))
    }
}
