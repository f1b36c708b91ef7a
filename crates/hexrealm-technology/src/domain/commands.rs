//! Commands for the Technology context.

use hexrealm_core::command::Command;
use hexrealm_core::ids::{GameId, PlayerId, TechnologyId};
use hexrealm_core::timestamp::Timestamp;
use uuid::Uuid;

use super::aggregates::TechnologyTree;

/// Command to open a player's research tree. Idempotent per player.
#[derive(Debug, Clone)]
pub struct CreateTechnologyTree {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Owning player.
    pub player_id: PlayerId,
    /// Game the player is seated in.
    pub game_id: GameId,
    /// Starting balance, zero for joining players.
    pub initial_science_points: u32,
    /// Caller-set creation time.
    pub created_at: Timestamp,
}

/// Command to credit science points.
#[derive(Debug, Clone)]
pub struct GrantSciencePoints {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub player_id: PlayerId,
    /// Points to add. Must be positive.
    pub amount: u32,
    pub granted_at: Timestamp,
}

/// Command to research a catalog technology.
#[derive(Debug, Clone)]
pub struct DiscoverTechnology {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub player_id: PlayerId,
    pub technology_id: TechnologyId,
    pub discovered_at: Timestamp,
}

macro_rules! technology_command {
    ($command:ty, $name:literal) => {
        impl Command for $command {
            fn command_type(&self) -> &'static str {
                $name
            }

            fn correlation_id(&self) -> Uuid {
                self.correlation_id
            }

            fn target_stream(&self) -> Uuid {
                TechnologyTree::stream_id(self.player_id)
            }
        }
    };
}

technology_command!(CreateTechnologyTree, "technology.create_technology_tree");
technology_command!(GrantSciencePoints, "technology.grant_science_points");
technology_command!(DiscoverTechnology, "technology.discover_technology");
