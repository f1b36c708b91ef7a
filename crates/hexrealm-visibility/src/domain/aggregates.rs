//! Aggregate roots for the Visibility context.

use std::collections::{BTreeMap, BTreeSet};

use hexrealm_core::aggregate::AggregateRoot;
use hexrealm_core::clock::Clock;
use hexrealm_core::event::EventMetadata;
use hexrealm_core::ids::{GameId, PlayerId, derived_id};
use hexrealm_core::position::Position;
use hexrealm_core::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calculator::VisibilityCalculator;
use super::commands::{CitySight, UnitSight};
use super::events::{VisibilityEvent, VisibilityEventKind, VisibilityRevealed, VisibilityUpdated};

/// Fog-of-war state of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellVisibility {
    /// In sight now.
    Active,
    /// Seen before, not in sight now.
    Discovered,
}

/// What one player of one game can see.
///
/// Cells never seen are absent from the map.
#[derive(Debug)]
pub struct PlayerVisibility {
    pub game_id: GameId,
    pub player_id: PlayerId,
    /// Current version (event count).
    pub(crate) version: i64,
    pub(crate) cells: BTreeMap<Position, CellVisibility>,
    uncommitted_events: Vec<VisibilityEvent>,
}

impl PlayerVisibility {
    /// Stream identifier for a player's visibility in a game.
    #[must_use]
    pub fn stream_id(game_id: GameId, player_id: PlayerId) -> Uuid {
        derived_id(game_id.as_uuid(), &format!("visibility/{player_id}"))
    }

    /// Creates an empty visibility ready for replay.
    #[must_use]
    pub fn new(game_id: GameId, player_id: PlayerId) -> Self {
        Self {
            game_id,
            player_id,
            version: 0,
            cells: BTreeMap::new(),
            uncommitted_events: Vec::new(),
        }
    }

    #[must_use]
    pub fn cell(&self, position: Position) -> Option<CellVisibility> {
        self.cells.get(&position).copied()
    }

    fn cells_in(&self, state: CellVisibility) -> Vec<Position> {
        self.cells
            .iter()
            .filter(|(_, s)| **s == state)
            .map(|(p, _)| *p)
            .collect()
    }

    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn record(&mut self, kind: VisibilityEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let metadata = EventMetadata::new(
            kind.event_type(),
            Self::stream_id(self.game_id, self.player_id),
            self.next_sequence_number(),
            correlation_id,
            clock.now(),
        );
        self.uncommitted_events.push(VisibilityEvent { metadata, kind });
    }

    /// Recomputes sight from the player's units and cities. Cells that
    /// drop out of sight become discovered. Records nothing if the state
    /// would not change.
    pub fn update(
        &mut self,
        units: &[UnitSight],
        cities: &[CitySight],
        updated_at: Timestamp,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) {
        let sight: BTreeSet<Position> = units
            .iter()
            .flat_map(|u| VisibilityCalculator::calculate_unit_visibility(u.position, u.unit_type))
            .chain(cities.iter().flat_map(|c| {
                VisibilityCalculator::calculate_city_visibility(c.position, c.level)
            }))
            .collect();

        let active: Vec<Position> = sight.iter().copied().collect();
        let discovered: Vec<Position> = self
            .cells
            .keys()
            .filter(|p| !sight.contains(*p))
            .copied()
            .collect();
        if active == self.cells_in(CellVisibility::Active)
            && discovered == self.cells_in(CellVisibility::Discovered)
        {
            return;
        }
        let revealed: Vec<Position> = sight
            .iter()
            .filter(|p| !self.cells.contains_key(*p))
            .copied()
            .collect();

        let updated = VisibilityEventKind::VisibilityUpdated(VisibilityUpdated {
            game_id: self.game_id,
            player_id: self.player_id,
            active,
            discovered,
            updated_at,
        });
        self.record(updated, correlation_id, clock);
        if !revealed.is_empty() {
            let kind = VisibilityEventKind::VisibilityRevealed(VisibilityRevealed {
                game_id: self.game_id,
                player_id: self.player_id,
                revealed,
                revealed_at: updated_at,
            });
            self.record(kind, correlation_id, clock);
        }
    }
}

impl AggregateRoot for PlayerVisibility {
    type Event = VisibilityEvent;

    fn aggregate_id(&self) -> Uuid {
        Self::stream_id(self.game_id, self.player_id)
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            VisibilityEventKind::VisibilityUpdated(payload) => {
                self.cells = payload
                    .active
                    .iter()
                    .map(|p| (*p, CellVisibility::Active))
                    .chain(
                        payload
                            .discovered
                            .iter()
                            .map(|p| (*p, CellVisibility::Discovered)),
                    )
                    .collect();
            }
            // Informational; the update before it already carries the state.
            VisibilityEventKind::VisibilityRevealed(_) => {}
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}
