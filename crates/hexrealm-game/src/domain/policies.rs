//! Game lifecycle rules: starting, joining and ending turns.
//!
//! Each policy exposes a boolean predicate and a `validate_*` twin that
//! names the first rule the input breaks.

use hexrealm_core::ids::PlayerId;
use hexrealm_core::timestamp::Timestamp;

use super::errors::GameRuleError;

/// Rules for starting a game.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameStartPolicy;

impl GameStartPolicy {
    /// Minimum number of players needed to start.
    pub const MIN_PLAYERS: usize = 2;

    /// A game can start once, with at least two players.
    #[must_use]
    pub fn can_start(players_count: usize, started_at: Option<Timestamp>) -> bool {
        started_at.is_none() && players_count >= Self::MIN_PLAYERS
    }

    /// # Errors
    ///
    /// `GameAlreadyStarted` takes precedence over `InsufficientPlayers`.
    pub fn validate_start(
        players_count: usize,
        started_at: Option<Timestamp>,
    ) -> Result<(), GameRuleError> {
        if started_at.is_some() {
            return Err(GameRuleError::GameAlreadyStarted);
        }
        if players_count < Self::MIN_PLAYERS {
            return Err(GameRuleError::InsufficientPlayers {
                count: players_count,
                min: Self::MIN_PLAYERS,
            });
        }
        Ok(())
    }
}

/// Rules for joining a game.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerJoinPolicy;

impl PlayerJoinPolicy {
    /// Maximum number of players per game.
    pub const MAX_PLAYERS: usize = 4;

    #[must_use]
    pub fn can_join(
        player_id: PlayerId,
        existing_players: &[PlayerId],
        started_at: Option<Timestamp>,
    ) -> bool {
        Self::validate_join(player_id, existing_players, started_at).is_ok()
    }

    /// # Errors
    ///
    /// Checked in order: `GameAlreadyStarted`, `PlayerAlreadyJoined`,
    /// `GameFull`.
    pub fn validate_join(
        player_id: PlayerId,
        existing_players: &[PlayerId],
        started_at: Option<Timestamp>,
    ) -> Result<(), GameRuleError> {
        if started_at.is_some() {
            return Err(GameRuleError::GameAlreadyStarted);
        }
        if existing_players.contains(&player_id) {
            return Err(GameRuleError::PlayerAlreadyJoined(player_id));
        }
        if existing_players.len() >= Self::MAX_PLAYERS {
            return Err(GameRuleError::GameFull {
                max: Self::MAX_PLAYERS,
            });
        }
        Ok(())
    }
}

/// Rules for ending a turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnEndPolicy;

impl TurnEndPolicy {
    #[must_use]
    pub fn can_end_turn(
        player_id: PlayerId,
        active_player: Option<PlayerId>,
        started_at: Option<Timestamp>,
    ) -> bool {
        Self::validate_end_turn(player_id, active_player, started_at).is_ok()
    }

    /// # Errors
    ///
    /// `GameNotStarted` before the game starts, `NotPlayerTurn` when
    /// `player_id` is not the active player.
    pub fn validate_end_turn(
        player_id: PlayerId,
        active_player: Option<PlayerId>,
        started_at: Option<Timestamp>,
    ) -> Result<(), GameRuleError> {
        if started_at.is_none() {
            return Err(GameRuleError::GameNotStarted);
        }
        if active_player != Some(player_id) {
            return Err(GameRuleError::NotPlayerTurn(player_id));
        }
        Ok(())
    }
}
