//! Rule violations for the Game context.

use hexrealm_core::error::{DomainError, RuleViolation};
use hexrealm_core::ids::{GameId, PlayerId};
use thiserror::Error;

/// Game rules that can refuse a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameRuleError {
    /// A game with this id already exists.
    #[error("game {0} already exists")]
    GameAlreadyExists(GameId),

    /// The game has already been started.
    #[error("game has already been started")]
    GameAlreadyStarted,

    /// The player (or their user) is already part of the game.
    #[error("player {0} has already joined the game")]
    PlayerAlreadyJoined(PlayerId),

    /// The player list is at capacity.
    #[error("game is full ({max} players)")]
    GameFull {
        /// Maximum number of players.
        max: usize,
    },

    /// Not enough players to start.
    #[error("at least {min} players are required to start, found {count}")]
    InsufficientPlayers {
        /// Players currently in the game.
        count: usize,
        /// Minimum number of players.
        min: usize,
    },

    /// The game has not been started yet.
    #[error("game has not been started")]
    GameNotStarted,

    /// Someone other than the active player tried to end the turn.
    #[error("it is not player {0}'s turn")]
    NotPlayerTurn(PlayerId),

    /// Map dimensions outside the configured bounds.
    #[error("map dimensions {width}x{height} must each be within [{min}, {max}]")]
    InvalidMapDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Lower bound.
        min: u32,
        /// Upper bound.
        max: u32,
    },
}

impl GameRuleError {
    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::GameAlreadyExists(_) => "game_already_exists",
            Self::GameAlreadyStarted => "game_already_started",
            Self::PlayerAlreadyJoined(_) => "player_already_joined",
            Self::GameFull { .. } => "game_full",
            Self::InsufficientPlayers { .. } => "insufficient_players",
            Self::GameNotStarted => "game_not_started",
            Self::NotPlayerTurn(_) => "not_player_turn",
            Self::InvalidMapDimensions { .. } => "invalid_map_dimensions",
        }
    }
}

impl From<GameRuleError> for DomainError {
    fn from(err: GameRuleError) -> Self {
        DomainError::RuleViolation(RuleViolation::new(err.code(), err.to_string()))
    }
}
