//! Research tree read model.

use std::collections::HashMap;
use std::sync::RwLock;

use hexrealm_core::error::DomainError;
use hexrealm_core::ids::{GameId, PlayerId, TechnologyId};
use hexrealm_core::projection::{Checkpoints, Projection, read_view, write_view};
use hexrealm_core::repository::StoredEvent;
use hexrealm_core::timestamp::Timestamp;
use serde::Serialize;

use crate::domain::events::{
    SCIENCE_POINTS_GRANTED_EVENT_TYPE, TECHNOLOGY_DISCOVERED_EVENT_TYPE,
    TECHNOLOGY_TREE_CREATED_EVENT_TYPE, TechnologyEventKind,
};

/// Read-only view of a player's research tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnologyTreeView {
    pub player_id: PlayerId,
    pub game_id: GameId,
    /// Discovered technologies in discovery order.
    pub unlocked_technologies: Vec<TechnologyId>,
    pub science_points: u32,
    pub created_at: Timestamp,
}

#[derive(Debug, Default)]
struct TreeTable {
    trees: HashMap<PlayerId, TechnologyTreeView>,
    checkpoints: Checkpoints,
}

/// Projection of every player's research tree.
#[derive(Debug, Default)]
pub struct TechnologyProjection {
    table: RwLock<TreeTable>,
}

impl TechnologyProjection {
    /// Creates an empty projection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, player_id: PlayerId) -> Option<TechnologyTreeView> {
        read_view(&self.table).trees.get(&player_id).cloned()
    }

    #[must_use]
    pub fn by_game(&self, game_id: GameId) -> Vec<TechnologyTreeView> {
        let mut trees: Vec<TechnologyTreeView> = read_view(&self.table)
            .trees
            .values()
            .filter(|t| t.game_id == game_id)
            .cloned()
            .collect();
        trees.sort_by_key(|t| (t.created_at, t.player_id));
        trees
    }
}

impl Projection for TechnologyProjection {
    fn name(&self) -> &'static str {
        "technology_trees"
    }

    fn event_types(&self) -> &'static [&'static str] {
        &[
            TECHNOLOGY_TREE_CREATED_EVENT_TYPE,
            SCIENCE_POINTS_GRANTED_EVENT_TYPE,
            TECHNOLOGY_DISCOVERED_EVENT_TYPE,
        ]
    }

    fn apply(&self, event: &StoredEvent) -> Result<(), DomainError> {
        let kind = event.decode::<TechnologyEventKind>()?;
        let mut table = write_view(&self.table);
        if !table.checkpoints.is_new(event) {
            return Ok(());
        }
        match kind {
            TechnologyEventKind::TechnologyTreeWasCreated(created) => {
                table.trees.insert(
                    created.player_id,
                    TechnologyTreeView {
                        player_id: created.player_id,
                        game_id: created.game_id,
                        unlocked_technologies: Vec::new(),
                        science_points: created.initial_science_points,
                        created_at: created.created_at,
                    },
                );
            }
            TechnologyEventKind::SciencePointsWereGranted(granted) => {
                if let Some(view) = table.trees.get_mut(&granted.player_id) {
                    view.science_points = view.science_points.saturating_add(granted.amount);
                }
            }
            TechnologyEventKind::TechnologyWasDiscovered(discovered) => {
                if let Some(view) = table.trees.get_mut(&discovered.player_id) {
                    view.science_points = view.science_points.saturating_sub(discovered.cost);
                    view.unlocked_technologies.push(discovered.technology_id);
                }
            }
        }
        table.checkpoints.record(event);
        Ok(())
    }
}
