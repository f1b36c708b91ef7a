//! Command handlers for the Game context.
//!
//! Each handler loads the target stream, folds it into the aggregate,
//! executes the command and appends the resulting events at the loaded
//! version.

use hexrealm_core::aggregate::AggregateRoot;
use hexrealm_core::clock::Clock;
use hexrealm_core::error::DomainError;
use hexrealm_core::ids::{GameId, PlayerId};
use hexrealm_core::repository::{EventRepository, StoredEvent, append_uncommitted};
use tracing::debug;

use crate::domain::aggregates::{Game, Player};
use crate::domain::commands::{CreateGame, CreatePlayer, EndTurn, GenerateMap, JoinGame, StartGame};
use crate::domain::events::GameEvent;
use crate::domain::events::PlayerEvent;
use crate::domain::map::MapGenerationPolicy;

const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 50;

/// Reconstitutes a `Game` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(game_id: GameId, events: &[StoredEvent]) -> Result<Game, DomainError> {
    let mut game = Game::new(game_id);
    for stored in events {
        game.apply(&GameEvent {
            metadata: stored.metadata(),
            kind: stored.decode()?,
        });
    }
    Ok(game)
}

fn reconstitute_player(
    player_id: PlayerId,
    events: &[StoredEvent],
) -> Result<Player, DomainError> {
    let mut player = Player::new(player_id);
    for stored in events {
        player.apply(&PlayerEvent {
            metadata: stored.metadata(),
            kind: stored.decode()?,
        });
    }
    Ok(player)
}

async fn load_existing_game(
    game_id: GameId,
    repo: &dyn EventRepository,
) -> Result<Game, DomainError> {
    let existing_events = repo.load_events(game_id.as_uuid()).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(game_id.as_uuid()));
    }
    reconstitute(game_id, &existing_events)
}

/// Handles `CreateGame`.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a name outside 3 to 50
/// characters and a rule violation if the game already exists.
pub async fn handle_create_game(
    command: &CreateGame,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let name = command.name.trim();
    let length = name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&length) {
        return Err(DomainError::Validation(format!(
            "game name must be between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters"
        )));
    }
    let existing_events = repo.load_events(command.game_id.as_uuid()).await?;
    let mut game = reconstitute(command.game_id, &existing_events)?;

    game.create(
        name.to_owned(),
        command.player_id,
        command.user_id,
        command.created_at,
        command.correlation_id,
        clock,
    )?;

    append_uncommitted(&game, repo).await
}

/// Handles `JoinGame`.
///
/// # Errors
///
/// Returns `AggregateNotFound` for an unknown game and rule violations
/// from `PlayerJoinPolicy`.
pub async fn handle_join_game(
    command: &JoinGame,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let mut game = load_existing_game(command.game_id, repo).await?;
    game.join(
        command.player_id,
        command.user_id,
        command.joined_at,
        command.correlation_id,
        clock,
    )?;
    append_uncommitted(&game, repo).await
}

/// Handles `StartGame`.
///
/// # Errors
///
/// Returns `AggregateNotFound` for an unknown game and rule violations
/// from `GameStartPolicy`.
pub async fn handle_start_game(
    command: &StartGame,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let mut game = load_existing_game(command.game_id, repo).await?;
    game.start(command.started_at, command.correlation_id, clock)?;
    append_uncommitted(&game, repo).await
}

/// Handles `EndTurn`.
///
/// # Errors
///
/// Returns `AggregateNotFound`, rule violations from `TurnEndPolicy`, or
/// `InvariantViolation` if the stored turn order is inconsistent.
pub async fn handle_end_turn(
    command: &EndTurn,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let mut game = load_existing_game(command.game_id, repo).await?;
    game.end_turn(
        command.player_id,
        command.ended_at,
        command.correlation_id,
        clock,
    )?;
    append_uncommitted(&game, repo).await
}

/// Handles `GenerateMap`. Returns no events if the game already has a map.
///
/// # Errors
///
/// Returns `AggregateNotFound`, `InvalidMapDimensions`, or `Validation`
/// when the tile list does not match the dimensions.
pub async fn handle_generate_map(
    command: &GenerateMap,
    policy: &MapGenerationPolicy,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let mut game = load_existing_game(command.game_id, repo).await?;
    game.generate_map(
        command.width,
        command.height,
        command.tiles.clone(),
        command.generated_at,
        policy,
        command.correlation_id,
        clock,
    )?;
    if game.uncommitted_events().is_empty() {
        debug!(game_id = %command.game_id, "map already generated, skipping");
    }
    append_uncommitted(&game, repo).await
}

/// Handles `CreatePlayer`. Returns no events if the player already exists.
///
/// # Errors
///
/// Returns `DomainError` if event loading or appending fails.
pub async fn handle_create_player(
    command: &CreatePlayer,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let existing_events = repo.load_events(command.player_id.as_uuid()).await?;
    let mut player = reconstitute_player(command.player_id, &existing_events)?;
    player.create(
        command.game_id,
        command.user_id,
        command.created_at,
        command.correlation_id,
        clock,
    );
    if player.uncommitted_events().is_empty() {
        debug!(player_id = %command.player_id, "player already exists, skipping");
    }
    append_uncommitted(&player, repo).await
}

#[cfg(test)]
mod tests {
    use hexrealm_core::error::DomainError;
    use hexrealm_core::ids::{GameId, PlayerId, UserId};
    use hexrealm_core::repository::EventRepository;
    use hexrealm_core::timestamp::Timestamp;
    use hexrealm_event_store::InMemoryEventRepository;
    use hexrealm_test_support::{
        EmptyEventRepository, FailingEventRepository, FixedClock, MockRng,
        RecordingEventRepository, fixed_now, stored_event,
    };
    use uuid::Uuid;

    use super::*;
    use crate::domain::events::{
        GAME_CREATED_EVENT_TYPE, GameEventKind, GameWasCreated, PLAYER_JOINED_EVENT_TYPE,
        PlayerWasJoined,
    };
    use crate::domain::map::MapGenerator;

    fn at() -> Timestamp {
        Timestamp::from(fixed_now())
    }

    fn create_command(game_id: GameId, player_id: PlayerId, name: &str) -> CreateGame {
        CreateGame {
            correlation_id: Uuid::new_v4(),
            game_id,
            player_id,
            user_id: UserId::generate(),
            name: name.to_owned(),
            created_at: at(),
        }
    }

    fn two_player_history(game_id: GameId, a: PlayerId, b: PlayerId) -> RecordingEventRepository {
        let created = GameEventKind::GameWasCreated(GameWasCreated {
            game_id,
            name: "Test Game".to_owned(),
            player_id: a,
            user_id: UserId::generate(),
            created_at: at(),
        });
        let joined = GameEventKind::PlayerWasJoined(PlayerWasJoined {
            game_id,
            player_id: b,
            user_id: UserId::generate(),
            joined_at: at(),
        });
        RecordingEventRepository::new(vec![
            stored_event(game_id.as_uuid(), 1, GAME_CREATED_EVENT_TYPE, &created),
            stored_event(game_id.as_uuid(), 2, PLAYER_JOINED_EVENT_TYPE, &joined),
        ])
    }

    #[tokio::test]
    async fn test_handle_create_game_appends_game_created_at_version_zero() {
        // Arrange
        let game_id = GameId::generate();
        let repo = RecordingEventRepository::new(Vec::new());
        let command = create_command(game_id, PlayerId::generate(), "Test Game");

        // Act
        let events = handle_create_game(&command, &FixedClock::default(), &repo)
            .await
            .unwrap();

        // Assert
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, GAME_CREATED_EVENT_TYPE);
        let appended = repo.appended_events();
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0].0, game_id.as_uuid());
        assert_eq!(appended[0].1, 0);
    }

    #[tokio::test]
    async fn test_handle_create_game_rejects_short_names() {
        // Arrange
        let command = create_command(GameId::generate(), PlayerId::generate(), "ab");

        // Act
        let result = handle_create_game(&command, &FixedClock::default(), &EmptyEventRepository).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_handle_join_game_returns_not_found_for_unknown_game() {
        // Arrange
        let game_id = GameId::generate();
        let command = JoinGame {
            correlation_id: Uuid::new_v4(),
            game_id,
            player_id: PlayerId::generate(),
            user_id: UserId::generate(),
            joined_at: at(),
        };

        // Act
        let result = handle_join_game(&command, &FixedClock::default(), &EmptyEventRepository).await;

        // Assert
        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, game_id.as_uuid()),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_start_game_appends_started_event_after_history() {
        // Arrange
        let game_id = GameId::generate();
        let (a, b) = (PlayerId::generate(), PlayerId::generate());
        let repo = two_player_history(game_id, a, b);
        let command = StartGame {
            correlation_id: Uuid::new_v4(),
            game_id,
            started_at: at(),
        };

        // Act
        let events = handle_start_game(&command, &FixedClock::default(), &repo)
            .await
            .unwrap();

        // Assert
        assert_eq!(events[0].sequence_number, 3);
        assert_eq!(repo.appended_events()[0].1, 2);
        let kind: GameEventKind = events[0].decode().unwrap();
        match kind {
            GameEventKind::GameWasStarted(started) => assert_eq!(started.player_ids, vec![a, b]),
            other => panic!("expected GameWasStarted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_end_turn_rejects_non_active_player() {
        // Arrange
        let game_id = GameId::generate();
        let (a, b) = (PlayerId::generate(), PlayerId::generate());
        let repo = InMemoryEventRepository::new();
        let clock = FixedClock::default();
        let mut create = create_command(game_id, a, "Test Game");
        create.user_id = UserId::generate();
        handle_create_game(&create, &clock, &repo).await.unwrap();
        let join = JoinGame {
            correlation_id: Uuid::new_v4(),
            game_id,
            player_id: b,
            user_id: UserId::generate(),
            joined_at: at(),
        };
        handle_join_game(&join, &clock, &repo).await.unwrap();
        let start = StartGame {
            correlation_id: Uuid::new_v4(),
            game_id,
            started_at: at(),
        };
        handle_start_game(&start, &clock, &repo).await.unwrap();

        // Act
        let result = handle_end_turn(
            &EndTurn {
                correlation_id: Uuid::new_v4(),
                game_id,
                player_id: b,
                ended_at: at(),
            },
            &clock,
            &repo,
        )
        .await;

        // Assert
        match result.unwrap_err() {
            DomainError::RuleViolation(v) => assert_eq!(v.code, "not_player_turn"),
            other => panic!("expected RuleViolation, got {other:?}"),
        }
        assert_eq!(repo.load_events(game_id.as_uuid()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_handle_generate_map_is_a_no_op_the_second_time() {
        // Arrange
        let game_id = GameId::generate();
        let repo = InMemoryEventRepository::new();
        let clock = FixedClock::default();
        handle_create_game(&create_command(game_id, PlayerId::generate(), "Maps"), &clock, &repo)
            .await
            .unwrap();
        let command = GenerateMap {
            correlation_id: Uuid::new_v4(),
            game_id,
            width: 10,
            height: 10,
            tiles: MapGenerator::generate(10, 10, &mut MockRng),
            generated_at: at(),
        };
        let policy = MapGenerationPolicy::default();

        // Act
        let first = handle_generate_map(&command, &policy, &clock, &repo).await.unwrap();
        let second = handle_generate_map(&command, &policy, &clock, &repo).await.unwrap();

        // Assert
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_handle_create_player_twice_appends_once() {
        // Arrange
        let repo = InMemoryEventRepository::new();
        let command = CreatePlayer {
            correlation_id: Uuid::new_v4(),
            player_id: PlayerId::generate(),
            game_id: GameId::generate(),
            user_id: UserId::generate(),
            created_at: at(),
        };

        // Act
        handle_create_player(&command, &FixedClock::default(), &repo).await.unwrap();
        let again = handle_create_player(&command, &FixedClock::default(), &repo).await.unwrap();

        // Assert
        assert!(again.is_empty());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_handle_start_game_propagates_infrastructure_errors() {
        let command = StartGame {
            correlation_id: Uuid::new_v4(),
            game_id: GameId::generate(),
            started_at: at(),
        };

        let result = handle_start_game(&command, &FixedClock::default(), &FailingEventRepository).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
