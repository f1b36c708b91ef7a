//! End-to-end flows through the engine with an in-memory store.

use std::sync::Arc;

use hexrealm_core::ids::{GameId, PlayerId, UserId};
use hexrealm_core::repository::EventRepository;
use hexrealm_core::terrain::Terrain;
use hexrealm_core::timestamp::Timestamp;
use hexrealm_core::unit_type::UnitType;
use hexrealm_engine::reactions::starting_unit_id;
use hexrealm_engine::{Engine, EngineConfig};
use hexrealm_event_store::InMemoryEventRepository;
use hexrealm_game::domain::aggregates::GameStatus;
use hexrealm_game::domain::commands::{CreateGame, EndTurn, JoinGame, StartGame};
use hexrealm_test_support::{FixedClock, MockRng, fixed_now};
use hexrealm_visibility::domain::aggregates::CellVisibility;
use uuid::Uuid;

struct Table {
    game_id: GameId,
    alice: PlayerId,
    bob: PlayerId,
    alice_user: UserId,
}

fn now() -> Timestamp {
    Timestamp::from(fixed_now())
}

fn start_engine(repo: Arc<dyn EventRepository>) -> Engine {
    Engine::start(
        repo,
        Arc::new(FixedClock::default()),
        Box::new(MockRng),
        EngineConfig::default(),
    )
    .unwrap()
}

async fn seat_two_players(engine: &Engine) -> Table {
    let table = Table {
        game_id: GameId::generate(),
        alice: PlayerId::generate(),
        bob: PlayerId::generate(),
        alice_user: UserId::generate(),
    };
    engine
        .execute(CreateGame {
            correlation_id: Uuid::new_v4(),
            game_id: table.game_id,
            player_id: table.alice,
            user_id: table.alice_user,
            name: "Dawn of Rivers".to_owned(),
            created_at: now(),
        })
        .await
        .unwrap();
    engine
        .execute(JoinGame {
            correlation_id: Uuid::new_v4(),
            game_id: table.game_id,
            player_id: table.bob,
            user_id: UserId::generate(),
            joined_at: now(),
        })
        .await
        .unwrap();
    table
}

async fn end_turn(engine: &Engine, game_id: GameId, player_id: PlayerId) {
    engine
        .execute(EndTurn {
            correlation_id: Uuid::new_v4(),
            game_id,
            player_id,
            ended_at: now(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_join_start_and_rotate_turns() {
    // Arrange
    let engine = start_engine(Arc::new(InMemoryEventRepository::new()));
    let table = seat_two_players(&engine).await;

    // Act
    engine
        .execute(StartGame {
            correlation_id: Uuid::new_v4(),
            game_id: table.game_id,
            started_at: now(),
        })
        .await
        .unwrap();
    end_turn(&engine, table.game_id, table.alice).await;
    engine.wait_until_idle().await;
    let after_first = engine.queries().get_game_view(table.game_id).unwrap();
    end_turn(&engine, table.game_id, table.bob).await;
    engine.wait_until_idle().await;

    // Assert
    assert_eq!(after_first.active_player, Some(table.bob));
    assert_eq!(after_first.current_turn, 1);
    let game = engine.queries().get_game_view(table.game_id).unwrap();
    assert_eq!(game.status, GameStatus::InProgress);
    assert_eq!(game.active_player, Some(table.alice));
    assert_eq!(game.current_turn, 2);
    assert_eq!(engine.queries().get_user_games(table.alice_user).len(), 1);
    assert!(engine.dead_letters().is_empty());
}

#[tokio::test]
async fn test_reactions_prepare_every_player() {
    // Arrange
    let engine = start_engine(Arc::new(InMemoryEventRepository::new()));
    let table = seat_two_players(&engine).await;
    engine.wait_until_idle().await;

    // Act
    engine
        .execute(StartGame {
            correlation_id: Uuid::new_v4(),
            game_id: table.game_id,
            started_at: now(),
        })
        .await
        .unwrap();
    engine.wait_until_idle().await;

    // Assert
    let queries = engine.queries();
    let map = queries.get_map_view(table.game_id).unwrap();
    assert_eq!((map.width, map.height), (10, 10));
    assert!(map.tiles.iter().all(|t| t.terrain == Terrain::Plains));

    assert_eq!(queries.get_units_by_game(table.game_id).len(), 4);
    for player_id in [table.alice, table.bob] {
        assert!(queries.get_player_view(player_id).is_ok());

        let tree = queries.get_technology_tree(player_id).unwrap();
        assert!(tree.unlocked_technologies.is_empty());
        assert_eq!(tree.science_points, 0);

        let settler = queries
            .get_unit_view(starting_unit_id(table.game_id, player_id, UnitType::Settler))
            .unwrap();
        assert_eq!(settler.owner_id, player_id);

        let sight = queries
            .get_player_visibility(table.game_id, player_id)
            .unwrap();
        assert_eq!(sight.state_of(settler.position), Some(CellVisibility::Active));
    }
    assert!(engine.dead_letters().is_empty());
}

#[tokio::test]
async fn test_read_models_are_rebuilt_from_history() {
    // Arrange
    let repo: Arc<dyn EventRepository> = Arc::new(InMemoryEventRepository::new());
    let first = start_engine(Arc::clone(&repo));
    let table = seat_two_players(&first).await;
    first.wait_until_idle().await;
    drop(first);

    // Act
    let restarted = start_engine(repo);
    let replayed = restarted.catch_up().await.unwrap();

    // Assert
    assert!(replayed >= 2);
    let game = restarted.queries().get_game_view(table.game_id).unwrap();
    assert_eq!(game.players.len(), 2);
    assert!(restarted.queries().get_map_view(table.game_id).is_ok());
}
