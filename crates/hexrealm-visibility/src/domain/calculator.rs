//! Sight radii and hex-grid range checks.
//!
//! Sight is enumerated with [`Position::axial_neighborhood`] while range
//! checks use true cube distance. The two shapes differ away from the
//! centre row.

use hexrealm_core::position::Position;
use hexrealm_core::unit_type::UnitType;

/// Pure visibility calculations.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityCalculator;

impl VisibilityCalculator {
    /// Cells within `radius` of `center`, clipped to the non-negative
    /// quadrant. Includes the centre.
    #[must_use]
    pub fn calculate_hexes_in_radius(center: Position, radius: u32) -> Vec<Position> {
        center.axial_neighborhood(i32::try_from(radius).unwrap_or(i32::MAX))
    }

    /// Sight radius of a unit type.
    #[must_use]
    pub const fn unit_visibility_radius(unit_type: UnitType) -> u32 {
        match unit_type {
            UnitType::Scout => 3,
            UnitType::Cavalry => 2,
            UnitType::Warrior | UnitType::Settler | UnitType::Archer | UnitType::SiegeEngine => 1,
        }
    }

    /// Sight radius of a city by level. Unknown levels see as far as level 1.
    #[must_use]
    pub const fn city_visibility_radius(level: u32) -> u32 {
        match level {
            2 => 3,
            3 => 4,
            _ => 2,
        }
    }

    #[must_use]
    pub fn calculate_unit_visibility(position: Position, unit_type: UnitType) -> Vec<Position> {
        Self::calculate_hexes_in_radius(position, Self::unit_visibility_radius(unit_type))
    }

    #[must_use]
    pub fn calculate_city_visibility(position: Position, level: u32) -> Vec<Position> {
        Self::calculate_hexes_in_radius(position, Self::city_visibility_radius(level))
    }

    /// Cube distance between two odd-row offset positions.
    #[must_use]
    pub fn calculate_hex_distance(from: Position, to: Position) -> u32 {
        from.hex_distance(to)
    }

    #[must_use]
    pub fn is_in_visibility_range(from: Position, to: Position, radius: u32) -> bool {
        Self::calculate_hex_distance(from, to) <= radius
    }
}
