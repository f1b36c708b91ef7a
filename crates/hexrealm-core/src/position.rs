//! Map positions and hex-grid geometry.
//!
//! Positions are odd-row offset coordinates on a hex map. Two metrics are
//! exposed and deliberately kept apart:
//!
//! - [`Position::axial_neighborhood`] enumerates offsets inside the axial
//!   hexagon `max(-r, -r - dx) <= dy <= min(r, r - dx)` applied directly to
//!   offset coordinates. Sight radii are defined on this shape.
//! - [`Position::hex_distance`] converts both ends to cube coordinates with
//!   the odd-row correction and measures true hex distance. Range checks
//!   and movement use this one.
//!
//! The two agree on small radii near the origin row but not in general.

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// A non-negative cell coordinate on the game map. Defaults to the origin.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "RawPosition", into = "RawPosition")]
pub struct Position {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawPosition {
    x: i32,
    y: i32,
}

impl TryFrom<RawPosition> for Position {
    type Error = ValueError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Self::new(raw.x, raw.y)
    }
}

impl From<Position> for RawPosition {
    fn from(position: Position) -> Self {
        Self {
            x: position.x,
            y: position.y,
        }
    }
}

impl Position {
    /// Creates a position.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidPosition` if either coordinate is negative.
    pub fn new(x: i32, y: i32) -> Result<Self, ValueError> {
        if x < 0 || y < 0 {
            return Err(ValueError::InvalidPosition { x, y });
        }
        Ok(Self { x, y })
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    /// Vertical coordinate (row).
    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    /// Returns `[x, y]`.
    #[must_use]
    pub const fn to_array(self) -> [i32; 2] {
        [self.x, self.y]
    }

    /// Builds a position from `[x, y]`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidPosition` if either coordinate is negative.
    pub fn from_array(coords: [i32; 2]) -> Result<Self, ValueError> {
        Self::new(coords[0], coords[1])
    }

    /// Returns the position shifted by `(dx, dy)`, or `None` if the result
    /// would leave the non-negative quadrant or overflow `i32`.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?).ok()
    }

    /// Cube coordinates `(q, r, s)` of this odd-row offset position. Widened
    /// to `i64` so every valid position converts without overflow.
    #[must_use]
    pub fn cube(self) -> (i64, i64, i64) {
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        let q = x - (y - (y & 1)) / 2;
        (q, y, -q - y)
    }

    /// True hex distance between two positions, saturating at `u32::MAX`.
    #[must_use]
    pub fn hex_distance(self, other: Self) -> u32 {
        let (q1, r1, s1) = self.cube();
        let (q2, r2, s2) = other.cube();
        let steps = ((q1 - q2).abs() + (r1 - r2).abs() + (s1 - s2).abs()) / 2;
        u32::try_from(steps).unwrap_or(u32::MAX)
    }

    /// All cells of the axial hexagon of `radius` around this position,
    /// clipped to non-negative coordinates. The centre is included.
    #[must_use]
    pub fn axial_neighborhood(self, radius: i32) -> Vec<Self> {
        let radius = radius.max(0);
        let mut cells = Vec::new();
        for dx in -radius..=radius {
            let dy_min = (-radius).max((-radius).saturating_sub(dx));
            let dy_max = radius.min(radius.saturating_sub(dx));
            for dy in dy_min..=dy_max {
                if let Some(cell) = self.offset(dx, dy) {
                    cells.push(cell);
                }
            }
        }
        cells
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y).unwrap()
    }

    #[test]
    fn test_new_rejects_negative_coordinates() {
        assert_eq!(
            Position::new(-1, 3),
            Err(ValueError::InvalidPosition { x: -1, y: 3 })
        );
        assert_eq!(
            Position::new(3, -1),
            Err(ValueError::InvalidPosition { x: 3, y: -1 })
        );
    }

    #[test]
    fn test_array_round_trip_preserves_position() {
        for (x, y) in [(0, 0), (7, 0), (0, 12), (49, 31)] {
            let position = pos(x, y);

            assert_eq!(Position::from_array(position.to_array()).unwrap(), position);
        }
    }

    #[test]
    fn test_deserialize_rejects_negative_coordinates() {
        let result: Result<Position, _> = serde_json::from_str(r#"{"x":-2,"y":1}"#);

        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_as_flat_xy_object() {
        let json = serde_json::to_value(pos(4, 9)).unwrap();

        assert_eq!(json, serde_json::json!({ "x": 4, "y": 9 }));
    }

    #[test]
    fn test_hex_distance_uses_odd_row_cube_conversion() {
        assert_eq!(pos(5, 5).hex_distance(pos(6, 5)), 1);
        assert_eq!(pos(5, 5).hex_distance(pos(8, 8)), 4);
        assert_eq!(pos(2, 2).hex_distance(pos(2, 2)), 0);
    }

    #[test]
    fn test_axial_neighborhood_counts_follow_hexagon_formula() {
        for radius in 0..=4 {
            let expected = usize::try_from(1 + 3 * radius * (radius + 1)).unwrap();

            assert_eq!(pos(10, 10).axial_neighborhood(radius).len(), expected);
        }
    }

    #[test]
    fn test_axial_neighborhood_is_clipped_at_origin() {
        let cells = pos(0, 0).axial_neighborhood(3);

        assert_eq!(cells.len(), 10);
        assert!(cells.iter().all(|c| c.x() >= 0 && c.y() >= 0));
    }

    #[test]
    fn test_geometry_at_the_coordinate_limit_does_not_overflow() {
        // Arrange
        let corner = pos(i32::MAX, i32::MAX);

        // Act
        let cells = corner.axial_neighborhood(3);

        // Assert
        assert!(cells.contains(&corner));
        assert_eq!(cells.len(), 10);
        assert_eq!(corner.offset(1, 0), None);
        assert_eq!(pos(i32::MAX, 0).offset(0, 1), Some(pos(i32::MAX, 1)));
        assert_eq!(pos(0, 0).hex_distance(pos(i32::MAX, 0)), i32::MAX.unsigned_abs());
        assert_eq!(corner.hex_distance(pos(0, 0)), 3_221_225_471);
    }
}
