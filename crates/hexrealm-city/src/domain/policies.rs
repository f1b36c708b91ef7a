//! Where cities may be founded.

use hexrealm_core::position::Position;
use hexrealm_core::terrain::Terrain;

use super::errors::CityRuleError;

/// Terrain and occupancy rules for founding a city.
#[derive(Debug, Clone, Copy, Default)]
pub struct CityFoundingPolicy;

impl CityFoundingPolicy {
    /// Terrains a city can be founded on.
    pub const ALLOWED_TERRAINS: [Terrain; 3] = [Terrain::Plains, Terrain::Forest, Terrain::Desert];

    #[must_use]
    pub fn can_found_city(
        position: Position,
        terrain: Terrain,
        existing_city_positions: &[Position],
    ) -> bool {
        Self::validate_city_founding(position, terrain, existing_city_positions).is_ok()
    }

    /// Terrain is checked before occupancy.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTerrain` or `PositionOccupied`.
    pub fn validate_city_founding(
        position: Position,
        terrain: Terrain,
        existing_city_positions: &[Position],
    ) -> Result<(), CityRuleError> {
        if !Self::ALLOWED_TERRAINS.contains(&terrain) {
            return Err(CityRuleError::InvalidTerrain { terrain, position });
        }
        if existing_city_positions.contains(&position) {
            return Err(CityRuleError::PositionOccupied(position));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexrealm_test_support::position;

    #[test]
    fn test_allowed_terrains_on_free_positions_pass() {
        for terrain in [Terrain::Plains, Terrain::Forest, Terrain::Desert] {
            assert!(CityFoundingPolicy::can_found_city(position(3, 3), terrain, &[]));
        }
    }

    #[test]
    fn test_forbidden_terrains_report_invalid_terrain_with_name_and_position() {
        for terrain in [Terrain::Mountain, Terrain::Water, Terrain::Swamp] {
            // Act
            let err = CityFoundingPolicy::validate_city_founding(position(2, 7), terrain, &[])
                .unwrap_err();

            // Assert
            assert_eq!(
                err,
                CityRuleError::InvalidTerrain {
                    terrain,
                    position: position(2, 7)
                }
            );
            let message = err.to_string();
            assert!(message.contains(terrain.as_str()), "{message}");
            assert!(message.contains("(2, 7)"), "{message}");
        }
    }

    #[test]
    fn test_occupied_position_is_rejected_on_valid_terrain() {
        let existing = [position(1, 1), position(4, 4)];

        let result =
            CityFoundingPolicy::validate_city_founding(position(4, 4), Terrain::Plains, &existing);

        assert_eq!(result, Err(CityRuleError::PositionOccupied(position(4, 4))));
    }

    #[test]
    fn test_terrain_is_checked_before_occupancy() {
        let existing = [position(4, 4)];

        let result =
            CityFoundingPolicy::validate_city_founding(position(4, 4), Terrain::Water, &existing);

        assert!(matches!(result, Err(CityRuleError::InvalidTerrain { .. })));
    }
}
