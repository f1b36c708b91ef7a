//! World map generation and validation.
//!
//! Maps are rectangular grids of odd-row offset hexes stored row-major.
//! Terrain is rolled from the injected [`DeterministicRng`], so a seeded
//! generator always produces the same map.

use hexrealm_core::position::Position;
use hexrealm_core::rng::DeterministicRng;
use hexrealm_core::terrain::Terrain;
use serde::{Deserialize, Serialize};

use super::errors::GameRuleError;

/// Inclusive bounds for map width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDimensionBounds {
    /// Smallest allowed width or height.
    pub min: u32,
    /// Largest allowed width or height.
    pub max: u32,
}

impl Default for MapDimensionBounds {
    fn default() -> Self {
        Self { min: 5, max: 50 }
    }
}

impl MapDimensionBounds {
    #[must_use]
    pub fn contains(&self, dimension: u32) -> bool {
        (self.min..=self.max).contains(&dimension)
    }
}

/// Validates requested map sizes against configured bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapGenerationPolicy {
    bounds: MapDimensionBounds,
}

impl MapGenerationPolicy {
    #[must_use]
    pub fn new(bounds: MapDimensionBounds) -> Self {
        Self { bounds }
    }

    #[must_use]
    pub fn bounds(&self) -> MapDimensionBounds {
        self.bounds
    }

    #[must_use]
    pub fn can_generate(&self, width: u32, height: u32) -> bool {
        self.bounds.contains(width) && self.bounds.contains(height)
    }

    /// # Errors
    ///
    /// Returns `GameRuleError::InvalidMapDimensions` if either side is out
    /// of bounds.
    pub fn validate(&self, width: u32, height: u32) -> Result<(), GameRuleError> {
        if self.can_generate(width, height) {
            Ok(())
        } else {
            Err(GameRuleError::InvalidMapDimensions {
                width,
                height,
                min: self.bounds.min,
                max: self.bounds.max,
            })
        }
    }

    /// Suggested square map size for a player count.
    #[must_use]
    pub fn recommended_dimensions(players_count: usize) -> (u32, u32) {
        match players_count {
            0..=2 => (10, 10),
            3..=4 => (15, 15),
            _ => (20, 20),
        }
    }
}

/// One hex of a generated map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapTile {
    /// Location of the tile.
    pub position: Position,
    /// Terrain on the tile.
    pub terrain: Terrain,
}

/// Rolls terrain for a whole map.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapGenerator;

impl MapGenerator {
    /// Generates `width * height` tiles, row by row.
    #[must_use]
    pub fn generate(width: u32, height: u32, rng: &mut dyn DeterministicRng) -> Vec<MapTile> {
        let mut tiles = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                let terrain = terrain_for_roll(rng.next_u32_range(0, 99));
                tiles.push(MapTile {
                    position: grid_position(x, y),
                    terrain,
                });
            }
        }
        tiles
    }
}

/// Maps a roll in `0..=99` onto the terrain distribution.
#[must_use]
pub fn terrain_for_roll(roll: u32) -> Terrain {
    match roll {
        0..=39 => Terrain::Plains,
        40..=59 => Terrain::Forest,
        60..=69 => Terrain::Desert,
        70..=79 => Terrain::Mountain,
        80..=91 => Terrain::Water,
        _ => Terrain::Swamp,
    }
}

#[allow(clippy::cast_possible_wrap)]
fn grid_position(x: u32, y: u32) -> Position {
    // Dimensions are bounded far below i32::MAX, so the cast cannot wrap
    // and the coordinates are never negative.
    Position::new(x as i32, y as i32).unwrap_or_default()
}

/// Where a player's initial units are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartingPositions {
    /// Tile for the settler: nearest city-foundable tile to the anchor.
    pub settler: Position,
    /// Tile for the warrior: nearest other land tile.
    pub warrior: Position,
}

/// Spreads `players_count` starts along the map diagonal.
///
/// `terrain_at` returns `None` for cells without known terrain; such cells
/// are accepted for either unit so a start can be placed before the map
/// projection has caught up.
#[must_use]
pub fn starting_positions(
    width: u32,
    height: u32,
    players_count: usize,
    terrain_at: impl Fn(Position) -> Option<Terrain>,
) -> Vec<StartingPositions> {
    let cells: Vec<Position> = (0..height)
        .flat_map(|y| (0..width).map(move |x| grid_position(x, y)))
        .collect();
    let mut taken: Vec<Position> = Vec::new();
    let mut starts = Vec::with_capacity(players_count);

    for index in 0..players_count {
        let anchor = diagonal_anchor(width, height, index, players_count);
        let settler = nearest(anchor, &cells, &taken, |p| {
            terrain_at(p).is_none_or(is_foundable)
        })
        .unwrap_or(anchor);
        taken.push(settler);
        let warrior = nearest(settler, &cells, &taken, |p| {
            terrain_at(p).is_none_or(Terrain::is_passable)
        })
        .unwrap_or(settler);
        taken.push(warrior);
        starts.push(StartingPositions { settler, warrior });
    }
    starts
}

fn is_foundable(terrain: Terrain) -> bool {
    matches!(terrain, Terrain::Plains | Terrain::Forest | Terrain::Desert)
}

#[allow(clippy::cast_possible_truncation)]
fn diagonal_anchor(width: u32, height: u32, index: usize, count: usize) -> Position {
    let step = |extent: u32| -> u32 {
        let span = u64::from(extent.saturating_sub(1));
        (span * (index as u64 + 1) / (count as u64 + 1)) as u32
    };
    grid_position(step(width), step(height))
}

fn nearest(
    anchor: Position,
    cells: &[Position],
    taken: &[Position],
    accept: impl Fn(Position) -> bool,
) -> Option<Position> {
    cells
        .iter()
        .copied()
        .filter(|p| !taken.contains(p) && accept(*p))
        .min_by_key(|p| p.hex_distance(anchor))
}
