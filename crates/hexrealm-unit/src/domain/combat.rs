//! Combat resolution.

use hexrealm_core::ids::{GameId, PlayerId, UnitId};
use hexrealm_core::position::Position;
use hexrealm_core::unit_type::UnitType;

/// What the target needs to know about its attacker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attacker {
    /// The attacking unit.
    pub unit_id: UnitId,
    /// Its owner.
    pub owner_id: PlayerId,
    /// Its game.
    pub game_id: GameId,
    /// Its type, which fixes attack strength and range.
    pub unit_type: UnitType,
    /// Where it stands.
    pub position: Position,
}

/// Damage dealt by one strike: attack minus half the defense, at least 1.
#[must_use]
pub fn damage(attacker: UnitType, defender: UnitType) -> u32 {
    attacker
        .stats()
        .attack
        .saturating_sub(defender.stats().defense / 2)
        .max(1)
}

/// Hex distance as an unsigned count.
#[must_use]
pub fn hex_steps(from: Position, to: Position) -> u32 {
    from.hex_distance(to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_subtracts_half_defense() {
        // 15 - 12 / 2
        assert_eq!(damage(UnitType::Warrior, UnitType::Warrior), 9);
        // 25 - 6 / 2
        assert_eq!(damage(UnitType::SiegeEngine, UnitType::Scout), 22);
    }

    #[test]
    fn test_damage_is_at_least_one() {
        // 5 - 12 / 2 would be negative.
        assert_eq!(damage(UnitType::Settler, UnitType::Warrior), 1);
    }
}
