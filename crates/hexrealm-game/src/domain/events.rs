//! Domain events for the Game context.

use hexrealm_core::event::{DomainEvent, EventMetadata};
use hexrealm_core::ids::{GameId, PlayerId, UserId};
use hexrealm_core::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

use super::map::MapTile;

/// Event type tag for [`GameWasCreated`].
pub const GAME_CREATED_EVENT_TYPE: &str = "game.game_created";
/// Event type tag for [`PlayerWasJoined`].
pub const PLAYER_JOINED_EVENT_TYPE: &str = "game.player_joined";
/// Event type tag for [`GameWasStarted`].
pub const GAME_STARTED_EVENT_TYPE: &str = "game.game_started";
/// Event type tag for [`PlayerEndedTurn`].
pub const TURN_ENDED_EVENT_TYPE: &str = "game.turn_ended";
/// Event type tag for [`MapWasGenerated`].
pub const MAP_GENERATED_EVENT_TYPE: &str = "game.map_generated";
/// Event type tag for [`PlayerWasCreated`].
pub const PLAYER_CREATED_EVENT_TYPE: &str = "player.player_created";

/// Emitted when a game is created. The creator is the first player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameWasCreated {
    /// The game identifier.
    pub game_id: GameId,
    /// Display name.
    pub name: String,
    /// The creating player.
    pub player_id: PlayerId,
    /// The creating user.
    pub user_id: UserId,
    /// Caller-set creation time.
    pub created_at: Timestamp,
}

/// Emitted when a player joins a waiting game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerWasJoined {
    /// The game identifier.
    pub game_id: GameId,
    /// The joining player.
    pub player_id: PlayerId,
    /// The joining user.
    pub user_id: UserId,
    /// Caller-set join time.
    pub joined_at: Timestamp,
}

/// Emitted when a game starts. Carries the turn order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameWasStarted {
    /// The game identifier.
    pub game_id: GameId,
    /// Players in turn order.
    pub player_ids: Vec<PlayerId>,
    /// Caller-set start time.
    pub started_at: Timestamp,
}

/// Emitted when the active player ends their turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEndedTurn {
    /// The game identifier.
    pub game_id: GameId,
    /// Player who ended the turn.
    pub player_id: PlayerId,
    /// Player whose turn it is now.
    pub next_player_id: PlayerId,
    /// Turn number after the hand-over.
    pub turn: u32,
    /// Caller-set time.
    pub ended_at: Timestamp,
}

/// Emitted when the world map of a game is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapWasGenerated {
    /// The game identifier.
    pub game_id: GameId,
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
    /// All tiles, row-major.
    pub tiles: Vec<MapTile>,
    /// Caller-set generation time.
    pub generated_at: Timestamp,
}

/// Event payload variants for the Game aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventKind {
    /// A game has been created.
    GameWasCreated(GameWasCreated),
    /// A player has joined.
    PlayerWasJoined(PlayerWasJoined),
    /// The game has started.
    GameWasStarted(GameWasStarted),
    /// A turn has ended.
    PlayerEndedTurn(PlayerEndedTurn),
    /// The map has been generated.
    MapWasGenerated(MapWasGenerated),
}

impl GameEventKind {
    /// Routing tag of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::GameWasCreated(_) => GAME_CREATED_EVENT_TYPE,
            Self::PlayerWasJoined(_) => PLAYER_JOINED_EVENT_TYPE,
            Self::GameWasStarted(_) => GAME_STARTED_EVENT_TYPE,
            Self::PlayerEndedTurn(_) => TURN_ENDED_EVENT_TYPE,
            Self::MapWasGenerated(_) => MAP_GENERATED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Game aggregate.
#[derive(Debug, Clone)]
pub struct GameEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: GameEventKind,
}

impl DomainEvent for GameEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("GameEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

/// Emitted the first time a player record is created for a (user, game).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerWasCreated {
    /// The player identifier.
    pub player_id: PlayerId,
    /// Game the player belongs to.
    pub game_id: GameId,
    /// Owning user.
    pub user_id: UserId,
    /// Caller-set creation time.
    pub created_at: Timestamp,
}

/// Event payload variants for the Player aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerEventKind {
    /// A player has been created.
    PlayerWasCreated(PlayerWasCreated),
}

/// Domain event envelope for the Player aggregate.
#[derive(Debug, Clone)]
pub struct PlayerEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: PlayerEventKind,
}

impl DomainEvent for PlayerEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            PlayerEventKind::PlayerWasCreated(_) => PLAYER_CREATED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).expect("PlayerEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
