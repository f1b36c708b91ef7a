//! Aggregate roots for the Game context.

use hexrealm_core::aggregate::AggregateRoot;
use hexrealm_core::clock::Clock;
use hexrealm_core::error::DomainError;
use hexrealm_core::event::EventMetadata;
use hexrealm_core::ids::{GameId, PlayerId, UserId};
use hexrealm_core::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::GameRuleError;
use super::events::{
    GameEvent, GameEventKind, GameWasCreated, GameWasStarted, MapWasGenerated,
    PLAYER_CREATED_EVENT_TYPE, PlayerEndedTurn, PlayerEvent, PlayerEventKind, PlayerWasCreated,
    PlayerWasJoined,
};
use super::map::{MapGenerationPolicy, MapTile};
use super::policies::{GameStartPolicy, PlayerJoinPolicy, TurnEndPolicy};

/// Lifecycle status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    /// Accepting players.
    WaitingForPlayers,
    /// Turns are being played.
    InProgress,
    /// Game over.
    Finished,
}

/// A seat at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// The player identifier.
    pub player_id: PlayerId,
    /// The user controlling the player.
    pub user_id: UserId,
}

/// The aggregate root for a game.
#[derive(Debug)]
pub struct Game {
    /// Aggregate identifier.
    pub id: GameId,
    /// Current version (event count).
    pub(crate) version: i64,
    pub(crate) name: String,
    pub(crate) status: GameStatus,
    /// Seats in join order, which is also turn order.
    pub(crate) seats: Vec<Seat>,
    pub(crate) active_player: Option<PlayerId>,
    pub(crate) current_turn: u32,
    pub(crate) created_at: Option<Timestamp>,
    pub(crate) started_at: Option<Timestamp>,
    pub(crate) map_size: Option<(u32, u32)>,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<GameEvent>,
}

impl Game {
    /// Creates an empty game aggregate ready for replay.
    #[must_use]
    pub fn new(id: GameId) -> Self {
        Self {
            id,
            version: 0,
            name: String::new(),
            status: GameStatus::WaitingForPlayers,
            seats: Vec::new(),
            active_player: None,
            current_turn: 0,
            created_at: None,
            started_at: None,
            map_size: None,
            uncommitted_events: Vec::new(),
        }
    }

    /// Players in turn order.
    #[must_use]
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.seats.iter().map(|s| s.player_id).collect()
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn active_player(&self) -> Option<PlayerId> {
        self.active_player
    }

    #[must_use]
    pub fn current_turn(&self) -> u32 {
        self.current_turn
    }

    #[must_use]
    pub fn started_at(&self) -> Option<Timestamp> {
        self.started_at
    }

    #[must_use]
    pub fn map_size(&self) -> Option<(u32, u32)> {
        self.map_size
    }

    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn record(&mut self, kind: GameEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let metadata = EventMetadata::new(
            kind.event_type(),
            self.id.as_uuid(),
            self.next_sequence_number(),
            correlation_id,
            clock.now(),
        );
        self.uncommitted_events.push(GameEvent { metadata, kind });
    }

    /// Creates the game, seating the creator first.
    ///
    /// # Errors
    ///
    /// Returns `GameAlreadyExists` if the stream already has events.
    pub fn create(
        &mut self,
        name: String,
        player_id: PlayerId,
        user_id: UserId,
        created_at: Timestamp,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.exists() {
            return Err(GameRuleError::GameAlreadyExists(self.id).into());
        }
        let kind = GameEventKind::GameWasCreated(GameWasCreated {
            game_id: self.id,
            name,
            player_id,
            user_id,
            created_at,
        });
        self.record(kind, correlation_id, clock);
        Ok(())
    }

    /// Seats a new player.
    ///
    /// # Errors
    ///
    /// Returns the first `PlayerJoinPolicy` rule the join breaks. A user
    /// who already holds a seat counts as already joined.
    pub fn join(
        &mut self,
        player_id: PlayerId,
        user_id: UserId,
        joined_at: Timestamp,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        PlayerJoinPolicy::validate_join(player_id, &self.player_ids(), self.started_at)?;
        if let Some(seat) = self.seats.iter().find(|s| s.user_id == user_id) {
            return Err(GameRuleError::PlayerAlreadyJoined(seat.player_id).into());
        }
        let kind = GameEventKind::PlayerWasJoined(PlayerWasJoined {
            game_id: self.id,
            player_id,
            user_id,
            joined_at,
        });
        self.record(kind, correlation_id, clock);
        Ok(())
    }

    /// Starts the game; the first seated player moves first.
    ///
    /// # Errors
    ///
    /// Returns `GameAlreadyStarted` or `InsufficientPlayers`.
    pub fn start(
        &mut self,
        started_at: Timestamp,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        GameStartPolicy::validate_start(self.seats.len(), self.started_at)?;
        let kind = GameEventKind::GameWasStarted(GameWasStarted {
            game_id: self.id,
            player_ids: self.player_ids(),
            started_at,
        });
        self.record(kind, correlation_id, clock);
        Ok(())
    }

    /// Hands the turn to the next player in seat order. The turn counter
    /// advances when the order wraps back to the first seat.
    ///
    /// # Errors
    ///
    /// Returns `GameNotStarted` or `NotPlayerTurn` for rule violations and
    /// `InvariantViolation` if the active player holds no seat.
    pub fn end_turn(
        &mut self,
        player_id: PlayerId,
        ended_at: Timestamp,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        TurnEndPolicy::validate_end_turn(player_id, self.active_player, self.started_at)?;
        let index = self
            .seats
            .iter()
            .position(|s| s.player_id == player_id)
            .ok_or_else(|| {
                DomainError::InvariantViolation(format!(
                    "active player {player_id} is not seated in game {}",
                    self.id
                ))
            })?;
        let next_index = (index + 1) % self.seats.len();
        let turn = if next_index == 0 {
            self.current_turn + 1
        } else {
            self.current_turn
        };
        let kind = GameEventKind::PlayerEndedTurn(PlayerEndedTurn {
            game_id: self.id,
            player_id,
            next_player_id: self.seats[next_index].player_id,
            turn,
            ended_at,
        });
        self.record(kind, correlation_id, clock);
        Ok(())
    }

    /// Attaches a generated map. A second generation is ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMapDimensions` when the size is out of bounds and
    /// `Validation` when the tiles do not cover the grid.
    #[allow(clippy::too_many_arguments)]
    pub fn generate_map(
        &mut self,
        width: u32,
        height: u32,
        tiles: Vec<MapTile>,
        generated_at: Timestamp,
        policy: &MapGenerationPolicy,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.map_size.is_some() {
            return Ok(());
        }
        policy.validate(width, height)?;
        let expected = u64::from(width) * u64::from(height);
        if tiles.len() as u64 != expected {
            return Err(DomainError::Validation(format!(
                "map of {width}x{height} needs {expected} tiles, got {}",
                tiles.len()
            )));
        }
        let kind = GameEventKind::MapWasGenerated(MapWasGenerated {
            game_id: self.id,
            width,
            height,
            tiles,
            generated_at,
        });
        self.record(kind, correlation_id, clock);
        Ok(())
    }
}

impl AggregateRoot for Game {
    type Event = GameEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id.as_uuid()
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            GameEventKind::GameWasCreated(payload) => {
                self.name.clone_from(&payload.name);
                self.created_at = Some(payload.created_at);
                self.seats.push(Seat {
                    player_id: payload.player_id,
                    user_id: payload.user_id,
                });
            }
            GameEventKind::PlayerWasJoined(payload) => {
                self.seats.push(Seat {
                    player_id: payload.player_id,
                    user_id: payload.user_id,
                });
            }
            GameEventKind::GameWasStarted(payload) => {
                self.status = GameStatus::InProgress;
                self.started_at = Some(payload.started_at);
                self.active_player = payload.player_ids.first().copied();
                self.current_turn = 1;
            }
            GameEventKind::PlayerEndedTurn(payload) => {
                self.active_player = Some(payload.next_player_id);
                self.current_turn = payload.turn;
            }
            GameEventKind::MapWasGenerated(payload) => {
                self.map_size = Some((payload.width, payload.height));
            }
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

/// The aggregate root for a player record.
#[derive(Debug)]
pub struct Player {
    /// Aggregate identifier.
    pub id: PlayerId,
    pub(crate) version: i64,
    pub(crate) game_id: Option<GameId>,
    pub(crate) user_id: Option<UserId>,
    uncommitted_events: Vec<PlayerEvent>,
}

impl Player {
    /// Creates an empty player aggregate ready for replay.
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            version: 0,
            game_id: None,
            user_id: None,
            uncommitted_events: Vec::new(),
        }
    }

    /// Records the player. Does nothing if the player already exists.
    #[allow(clippy::cast_possible_wrap)]
    pub fn create(
        &mut self,
        game_id: GameId,
        user_id: UserId,
        created_at: Timestamp,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) {
        if self.exists() || !self.uncommitted_events.is_empty() {
            return;
        }
        let kind = PlayerEventKind::PlayerWasCreated(PlayerWasCreated {
            player_id: self.id,
            game_id,
            user_id,
            created_at,
        });
        let metadata = EventMetadata::new(
            PLAYER_CREATED_EVENT_TYPE,
            self.id.as_uuid(),
            self.version + self.uncommitted_events.len() as i64 + 1,
            correlation_id,
            clock.now(),
        );
        self.uncommitted_events.push(PlayerEvent { metadata, kind });
    }
}

impl AggregateRoot for Player {
    type Event = PlayerEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id.as_uuid()
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            PlayerEventKind::PlayerWasCreated(payload) => {
                self.game_id = Some(payload.game_id);
                self.user_id = Some(payload.user_id);
            }
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

#[cfg(test)]
mod tests {
    use super::*;
    use hexrealm_core::event::DomainEvent;
    use hexrealm_test_support::{FixedClock, fixed_now};

    fn at() -> Timestamp {
        Timestamp::from(fixed_now())
    }

    fn replay(game: &mut Game, events: &[GameEvent]) {
        for event in events {
            game.apply(event);
        }
    }

    fn committed(game: &mut Game) -> Vec<GameEvent> {
        let events = game.uncommitted_events().to_vec();
        game.clear_uncommitted_events();
        replay(game, &events);
        events
    }

    #[test]
    fn test_create_produces_game_created_event_with_creator_seated() {
        // Arrange
        let clock = FixedClock::default();
        let game_id = GameId::generate();
        let player_a = PlayerId::generate();
        let mut game = Game::new(game_id);

        // Act
        game.create(
            "Test Game".to_owned(),
            player_a,
            UserId::generate(),
            at(),
            Uuid::new_v4(),
            &clock,
        )
        .unwrap();
        let events = committed(&mut game);

        // Assert
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "game.game_created");
        assert_eq!(events[0].metadata.sequence_number, 1);
        assert_eq!(game.player_ids(), vec![player_a]);
        assert_eq!(game.status(), GameStatus::WaitingForPlayers);
    }

    #[test]
    fn test_turn_order_wraps_and_advances_turn_counter() {
        // Arrange
        let clock = FixedClock::default();
        let (a, b) = (PlayerId::generate(), PlayerId::generate());
        let mut game = Game::new(GameId::generate());
        game.create("Test Game".into(), a, UserId::generate(), at(), Uuid::new_v4(), &clock)
            .unwrap();
        committed(&mut game);
        game.join(b, UserId::generate(), at(), Uuid::new_v4(), &clock)
            .unwrap();
        committed(&mut game);

        // Act / Assert
        game.start(at(), Uuid::new_v4(), &clock).unwrap();
        committed(&mut game);
        assert_eq!(game.active_player(), Some(a));
        assert_eq!(game.current_turn(), 1);

        game.end_turn(a, at(), Uuid::new_v4(), &clock).unwrap();
        committed(&mut game);
        assert_eq!(game.active_player(), Some(b));
        assert_eq!(game.current_turn(), 1);

        game.end_turn(b, at(), Uuid::new_v4(), &clock).unwrap();
        committed(&mut game);
        assert_eq!(game.active_player(), Some(a));
        assert_eq!(game.current_turn(), 2);
    }

    #[test]
    fn test_replaying_the_same_history_twice_yields_identical_state() {
        // Arrange
        let clock = FixedClock::default();
        let (a, b) = (PlayerId::generate(), PlayerId::generate());
        let mut source = Game::new(GameId::generate());
        let mut history = Vec::new();
        source
            .create("Replay".into(), a, UserId::generate(), at(), Uuid::new_v4(), &clock)
            .unwrap();
        history.extend(committed(&mut source));
        source
            .join(b, UserId::generate(), at(), Uuid::new_v4(), &clock)
            .unwrap();
        history.extend(committed(&mut source));
        source.start(at(), Uuid::new_v4(), &clock).unwrap();
        history.extend(committed(&mut source));
        source.end_turn(a, at(), Uuid::new_v4(), &clock).unwrap();
        history.extend(committed(&mut source));

        // Act
        let mut first = Game::new(source.id);
        replay(&mut first, &history);
        let mut second = Game::new(source.id);
        replay(&mut second, &history);

        // Assert
        assert_eq!(format!("{first:?}"), format!("{second:?}"));
        assert_eq!(first.version(), 4);
        assert_eq!(first.active_player(), Some(b));
    }

    #[test]
    fn test_same_user_cannot_take_two_seats() {
        // Arrange
        let clock = FixedClock::default();
        let user = UserId::generate();
        let creator = PlayerId::generate();
        let mut game = Game::new(GameId::generate());
        game.create("Test Game".into(), creator, user, at(), Uuid::new_v4(), &clock)
            .unwrap();
        committed(&mut game);

        // Act
        let result = game.join(PlayerId::generate(), user, at(), Uuid::new_v4(), &clock);

        // Assert
        match result.unwrap_err() {
            DomainError::RuleViolation(v) => assert_eq!(v.code, "player_already_joined"),
            other => panic!("expected RuleViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_end_turn_with_unseated_active_player_is_invariant_violation() {
        // Arrange
        let clock = FixedClock::default();
        let stranger = PlayerId::generate();
        let mut game = Game::new(GameId::generate());
        game.started_at = Some(at());
        game.active_player = Some(stranger);

        // Act
        let result = game.end_turn(stranger, at(), Uuid::new_v4(), &clock);

        // Assert
        assert!(matches!(result, Err(DomainError::InvariantViolation(_))));
    }

    #[test]
    fn test_second_map_generation_is_ignored() {
        // Arrange
        let clock = FixedClock::default();
        let policy = MapGenerationPolicy::default();
        let mut game = Game::new(GameId::generate());
        game.map_size = Some((10, 10));

        // Act
        game.generate_map(5, 5, Vec::new(), at(), &policy, Uuid::new_v4(), &clock)
            .unwrap();

        // Assert
        assert!(game.uncommitted_events().is_empty());
    }

    #[test]
    fn test_player_create_is_idempotent() {
        // Arrange
        let clock = FixedClock::default();
        let mut player = Player::new(PlayerId::generate());
        player.create(GameId::generate(), UserId::generate(), at(), Uuid::new_v4(), &clock);
        let events = player.uncommitted_events().to_vec();
        player.clear_uncommitted_events();
        for e in &events {
            player.apply(e);
        }

        // Act
        player.create(GameId::generate(), UserId::generate(), at(), Uuid::new_v4(), &clock);

        // Assert
        assert_eq!(events.len(), 1);
        assert!(player.uncommitted_events().is_empty());
    }
}
