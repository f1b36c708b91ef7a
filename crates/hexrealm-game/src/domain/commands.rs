//! Commands for the Game context.

use hexrealm_core::command::Command;
use hexrealm_core::ids::{GameId, PlayerId, UserId};
use hexrealm_core::timestamp::Timestamp;
use uuid::Uuid;

use super::map::MapTile;

/// Command to create a new game with its creator as the first player.
#[derive(Debug, Clone)]
pub struct CreateGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game identifier.
    pub game_id: GameId,
    /// The creating player.
    pub player_id: PlayerId,
    /// The creating user.
    pub user_id: UserId,
    /// Display name, 3 to 50 characters.
    pub name: String,
    /// Caller-set creation time.
    pub created_at: Timestamp,
}

/// Command to join a waiting game.
#[derive(Debug, Clone)]
pub struct JoinGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game identifier.
    pub game_id: GameId,
    /// The joining player.
    pub player_id: PlayerId,
    /// The joining user.
    pub user_id: UserId,
    /// Caller-set join time.
    pub joined_at: Timestamp,
}

/// Command to start a game.
#[derive(Debug, Clone)]
pub struct StartGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game identifier.
    pub game_id: GameId,
    /// Caller-set start time.
    pub started_at: Timestamp,
}

/// Command for the active player to end their turn.
#[derive(Debug, Clone)]
pub struct EndTurn {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game identifier.
    pub game_id: GameId,
    /// The player ending the turn.
    pub player_id: PlayerId,
    /// Caller-set time.
    pub ended_at: Timestamp,
}

/// Command to store a generated map on the game stream.
#[derive(Debug, Clone)]
pub struct GenerateMap {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game identifier.
    pub game_id: GameId,
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
    /// Generated tiles, row-major.
    pub tiles: Vec<MapTile>,
    /// Caller-set generation time.
    pub generated_at: Timestamp,
}

/// Command to create the player record for a (user, game). Idempotent.
#[derive(Debug, Clone)]
pub struct CreatePlayer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player identifier.
    pub player_id: PlayerId,
    /// Game the player belongs to.
    pub game_id: GameId,
    /// Owning user.
    pub user_id: UserId,
    /// Caller-set creation time.
    pub created_at: Timestamp,
}

macro_rules! game_command {
    ($command:ty, $name:literal, |$c:ident| $stream:expr) => {
        impl Command for $command {
            fn command_type(&self) -> &'static str {
                $name
            }

            fn correlation_id(&self) -> Uuid {
                self.correlation_id
            }

            fn target_stream(&self) -> Uuid {
                let $c = self;
                $stream
            }
        }
    };
}

game_command!(CreateGame, "game.create_game", |c| c.game_id.as_uuid());
game_command!(JoinGame, "game.join_game", |c| c.game_id.as_uuid());
game_command!(StartGame, "game.start_game", |c| c.game_id.as_uuid());
game_command!(EndTurn, "game.end_turn", |c| c.game_id.as_uuid());
game_command!(GenerateMap, "game.generate_map", |c| c.game_id.as_uuid());
game_command!(CreatePlayer, "player.create_player", |c| c.player_id.as_uuid());
