//! Fog-of-war read model.

use std::collections::HashMap;
use std::sync::RwLock;

use hexrealm_core::error::DomainError;
use hexrealm_core::ids::{GameId, PlayerId};
use hexrealm_core::position::Position;
use hexrealm_core::projection::{Checkpoints, Projection, read_view, write_view};
use hexrealm_core::repository::StoredEvent;
use hexrealm_core::timestamp::Timestamp;
use serde::Serialize;

use crate::domain::aggregates::CellVisibility;
use crate::domain::events::{
    VISIBILITY_REVEALED_EVENT_TYPE, VISIBILITY_UPDATED_EVENT_TYPE, VisibilityEventKind,
};

/// One cell as a player sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub position: Position,
    pub state: CellVisibility,
}

/// Read-only view of a player's fog of war.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerVisibilityView {
    pub game_id: GameId,
    pub player_id: PlayerId,
    /// Seen cells, active and discovered, sorted by position.
    pub cells: Vec<CellView>,
    pub updated_at: Timestamp,
}

impl PlayerVisibilityView {
    #[must_use]
    pub fn state_of(&self, position: Position) -> Option<CellVisibility> {
        self.cells
            .binary_search_by_key(&position, |c| c.position)
            .ok()
            .map(|i| self.cells[i].state)
    }
}

#[derive(Debug, Default)]
struct VisibilityTable {
    players: HashMap<(GameId, PlayerId), PlayerVisibilityView>,
    checkpoints: Checkpoints,
}

/// Projection of every player's fog of war.
#[derive(Debug, Default)]
pub struct VisibilityProjection {
    table: RwLock<VisibilityTable>,
}

impl VisibilityProjection {
    /// Creates an empty projection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, game_id: GameId, player_id: PlayerId) -> Option<PlayerVisibilityView> {
        read_view(&self.table)
            .players
            .get(&(game_id, player_id))
            .cloned()
    }

    #[must_use]
    pub fn by_game(&self, game_id: GameId) -> Vec<PlayerVisibilityView> {
        let mut views: Vec<PlayerVisibilityView> = read_view(&self.table)
            .players
            .values()
            .filter(|v| v.game_id == game_id)
            .cloned()
            .collect();
        views.sort_by_key(|v| v.player_id);
        views
    }
}

impl Projection for VisibilityProjection {
    fn name(&self) -> &'static str {
        "visibility"
    }

    fn event_types(&self) -> &'static [&'static str] {
        &[VISIBILITY_UPDATED_EVENT_TYPE, VISIBILITY_REVEALED_EVENT_TYPE]
    }

    fn apply(&self, event: &StoredEvent) -> Result<(), DomainError> {
        let kind = event.decode::<VisibilityEventKind>()?;
        let mut table = write_view(&self.table);
        if !table.checkpoints.is_new(event) {
            return Ok(());
        }
        if let VisibilityEventKind::VisibilityUpdated(updated) = kind {
            let mut cells: Vec<CellView> = updated
                .active
                .iter()
                .map(|p| CellView {
                    position: *p,
                    state: CellVisibility::Active,
                })
                .chain(updated.discovered.iter().map(|p| CellView {
                    position: *p,
                    state: CellVisibility::Discovered,
                }))
                .collect();
            cells.sort_by_key(|c| c.position);
            table.players.insert(
                (updated.game_id, updated.player_id),
                PlayerVisibilityView {
                    game_id: updated.game_id,
                    player_id: updated.player_id,
                    cells,
                    updated_at: updated.updated_at,
                },
            );
        }
        table.checkpoints.record(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::PlayerVisibility;
    use crate::domain::events::VisibilityUpdated;
    use hexrealm_test_support::{fixed_now, position, stored_event};

    #[test]
    fn test_update_replaces_the_players_cells() {
        // Arrange
        let projection = VisibilityProjection::new();
        let (game_id, player_id) = (GameId::generate(), PlayerId::generate());
        let stream = PlayerVisibility::stream_id(game_id, player_id);
        let update = |seq: i64, active: Vec<Position>, discovered: Vec<Position>| {
            stored_event(
                stream,
                seq,
                VISIBILITY_UPDATED_EVENT_TYPE,
                &VisibilityEventKind::VisibilityUpdated(VisibilityUpdated {
                    game_id,
                    player_id,
                    active,
                    discovered,
                    updated_at: Timestamp::from(fixed_now()),
                }),
            )
        };

        // Act
        projection
            .apply(&update(1, vec![position(1, 1), position(2, 1)], Vec::new()))
            .unwrap();
        projection
            .apply(&update(3, vec![position(2, 1)], vec![position(1, 1)]))
            .unwrap();

        // Assert
        let view = projection.get(game_id, player_id).unwrap();
        assert_eq!(view.cells.len(), 2);
        assert_eq!(view.state_of(position(1, 1)), Some(CellVisibility::Discovered));
        assert_eq!(view.state_of(position(2, 1)), Some(CellVisibility::Active));
        assert_eq!(view.state_of(position(9, 9)), None);
        assert_eq!(projection.by_game(game_id).len(), 1);
    }
}
