//! Command dispatch with single-writer guarantees.
//!
//! Every command names the stream it writes to. The dispatcher holds an
//! async lock per stream for the whole load, decide, append, publish
//! cycle, so two commands for the same aggregate never interleave inside
//! this process and their events are published in sequence order.
//! The optimistic version check in the store still guards against other
//! processes; a `ConcurrencyConflict` is retried against fresh state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use hexrealm_core::clock::Clock;
use hexrealm_core::command::Command;
use hexrealm_core::error::DomainError;
use hexrealm_core::repository::{EventRepository, StoredEvent};
use hexrealm_game::domain::map::MapGenerationPolicy;
use tracing::{info, warn};
use uuid::Uuid;

use crate::command::GameCommand;

type StreamLock = Arc<tokio::sync::Mutex<()>>;

/// Receives the events of every handled command. Called with the stream
/// lock held, so it must not block.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, events: &[StoredEvent]);
}

/// Routes commands to their context handlers.
pub struct CommandDispatcher {
    repo: Arc<dyn EventRepository>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    map_policy: MapGenerationPolicy,
    max_attempts: u32,
    locks: Mutex<HashMap<Uuid, StreamLock>>,
}

impl std::fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("map_policy", &self.map_policy)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl CommandDispatcher {
    #[must_use]
    pub fn new(
        repo: Arc<dyn EventRepository>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        map_policy: MapGenerationPolicy,
        max_attempts: u32,
    ) -> Self {
        Self {
            repo,
            publisher,
            clock,
            map_policy,
            max_attempts: max_attempts.max(1),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The store commands are appended to.
    #[must_use]
    pub fn repository(&self) -> &Arc<dyn EventRepository> {
        &self.repo
    }

    /// Executes `command`, publishes the events it appended and returns
    /// them. An empty vector means the command was an idempotent no-op.
    ///
    /// # Errors
    ///
    /// Returns the handler's error. A concurrency conflict is surfaced
    /// only after the configured number of attempts.
    pub async fn dispatch(&self, command: &GameCommand) -> Result<Vec<StoredEvent>, DomainError> {
        let stream = command.target_stream();
        let lock = self.acquire(stream);
        let result = {
            let _guard = lock.lock().await;
            let result = self.dispatch_locked(command, stream).await;
            if let Ok(events) = &result {
                self.publisher.publish(events);
            }
            result
        };
        self.release(stream, &lock);
        result
    }

    async fn dispatch_locked(
        &self,
        command: &GameCommand,
        stream: Uuid,
    ) -> Result<Vec<StoredEvent>, DomainError> {
        let mut attempt = 1;
        loop {
            match self.handle(command).await {
                Ok(events) => {
                    info!(
                        command_type = command.command_type(),
                        correlation_id = %command.correlation_id(),
                        stream = %stream,
                        events = events.len(),
                        "command handled"
                    );
                    return Ok(events);
                }
                Err(err @ DomainError::ConcurrencyConflict { .. }) if attempt < self.max_attempts => {
                    warn!(
                        command_type = command.command_type(),
                        stream = %stream,
                        attempt,
                        error = %err,
                        "concurrency conflict, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn handle(&self, command: &GameCommand) -> Result<Vec<StoredEvent>, DomainError> {
        use hexrealm_city::application::command_handlers as city;
        use hexrealm_diplomacy::application::command_handlers as diplomacy;
        use hexrealm_game::application::command_handlers as game;
        use hexrealm_technology::application::command_handlers as technology;
        use hexrealm_unit::application::command_handlers as unit;
        use hexrealm_visibility::application::command_handlers as visibility;

        let clock = self.clock.as_ref();
        let repo = self.repo.as_ref();
        match command {
            GameCommand::CreateGame(c) => game::handle_create_game(c, clock, repo).await,
            GameCommand::JoinGame(c) => game::handle_join_game(c, clock, repo).await,
            GameCommand::StartGame(c) => game::handle_start_game(c, clock, repo).await,
            GameCommand::EndTurn(c) => game::handle_end_turn(c, clock, repo).await,
            GameCommand::GenerateMap(c) => {
                game::handle_generate_map(c, &self.map_policy, clock, repo).await
            }
            GameCommand::CreatePlayer(c) => game::handle_create_player(c, clock, repo).await,
            GameCommand::FoundCity(c) => city::handle_found_city(c, clock, repo).await,
            GameCommand::CreateUnit(c) => unit::handle_create_unit(c, clock, repo).await,
            GameCommand::MoveUnit(c) => unit::handle_move_unit(c, clock, repo).await,
            GameCommand::AttackUnit(c) => unit::handle_attack_unit(c, clock, repo).await,
            GameCommand::DestroyUnit(c) => unit::handle_destroy_unit(c, clock, repo).await,
            GameCommand::CreateTechnologyTree(c) => {
                technology::handle_create_technology_tree(c, clock, repo).await
            }
            GameCommand::GrantSciencePoints(c) => {
                technology::handle_grant_science_points(c, clock, repo).await
            }
            GameCommand::DiscoverTechnology(c) => {
                technology::handle_discover_technology(c, clock, repo).await
            }
            GameCommand::ProposeDiplomacy(c) => {
                diplomacy::handle_propose_diplomacy(c, clock, repo).await
            }
            GameCommand::AcceptDiplomacy(c) => {
                diplomacy::handle_accept_diplomacy(c, clock, repo).await
            }
            GameCommand::DeclineDiplomacy(c) => {
                diplomacy::handle_decline_diplomacy(c, clock, repo).await
            }
            GameCommand::EndDiplomacy(c) => diplomacy::handle_end_diplomacy(c, clock, repo).await,
            GameCommand::UpdateVisibility(c) => {
                visibility::handle_update_visibility(c, clock, repo).await
            }
        }
    }

    fn acquire(&self, stream: Uuid) -> StreamLock {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(stream).or_default())
    }

    // Drops the stream's lock once no other command holds or awaits it.
    fn release(&self, stream: Uuid, lock: &StreamLock) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if Arc::strong_count(lock) == 2 {
            locks.remove(&stream);
        }
    }

    #[cfg(test)]
    fn tracked_streams(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexrealm_core::ids::{GameId, PlayerId, UserId};
    use hexrealm_core::timestamp::Timestamp;
    use hexrealm_event_store::InMemoryEventRepository;
    use hexrealm_game::domain::commands::{CreateGame, JoinGame};
    use hexrealm_test_support::{
        ConflictingEventRepository, FixedClock, RecordingEventRepository, fixed_now,
    };

    #[derive(Default)]
    struct RecordingPublisher {
        published: Mutex<Vec<StoredEvent>>,
    }

    impl RecordingPublisher {
        fn sequence_numbers(&self) -> Vec<i64> {
            self.published
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.sequence_number)
                .collect()
        }
    }

    impl EventPublisher for RecordingPublisher {
        fn publish(&self, events: &[StoredEvent]) {
            self.published.lock().unwrap().extend_from_slice(events);
        }
    }

    fn dispatcher(repo: Arc<dyn EventRepository>, max_attempts: u32) -> CommandDispatcher {
        dispatcher_publishing_to(repo, Arc::new(RecordingPublisher::default()), max_attempts)
    }

    fn dispatcher_publishing_to(
        repo: Arc<dyn EventRepository>,
        publisher: Arc<RecordingPublisher>,
        max_attempts: u32,
    ) -> CommandDispatcher {
        CommandDispatcher::new(
            repo,
            publisher,
            Arc::new(FixedClock::default()),
            MapGenerationPolicy::default(),
            max_attempts,
        )
    }

    fn create_game(game_id: GameId) -> GameCommand {
        GameCommand::from(CreateGame {
            correlation_id: Uuid::new_v4(),
            game_id,
            player_id: PlayerId::generate(),
            user_id: UserId::generate(),
            name: "Dawn of Rivers".to_owned(),
            created_at: Timestamp::from(fixed_now()),
        })
    }

    #[tokio::test]
    async fn test_conflict_is_retried_against_fresh_state() {
        // Arrange
        let repo = Arc::new(ConflictingEventRepository::new(2));
        let dispatcher = dispatcher(repo.clone(), 3);

        // Act
        let events = dispatcher
            .dispatch(&create_game(GameId::generate()))
            .await
            .unwrap();

        // Assert
        assert_eq!(events.len(), 1);
        assert_eq!(repo.append_attempts(), 3);
    }

    #[tokio::test]
    async fn test_conflict_is_surfaced_after_last_attempt() {
        let repo = Arc::new(ConflictingEventRepository::new(5));
        let dispatcher = dispatcher(repo.clone(), 2);

        let result = dispatcher.dispatch(&create_game(GameId::generate())).await;

        assert!(matches!(
            result,
            Err(DomainError::ConcurrencyConflict { .. })
        ));
        assert_eq!(repo.append_attempts(), 2);
    }

    #[tokio::test]
    async fn test_rule_violation_is_not_retried() {
        // Arrange
        let repo = Arc::new(RecordingEventRepository::new(Vec::new()));
        let dispatcher = dispatcher(repo.clone(), 3);
        let join = GameCommand::from(JoinGame {
            correlation_id: Uuid::new_v4(),
            game_id: GameId::generate(),
            player_id: PlayerId::generate(),
            user_id: UserId::generate(),
            joined_at: Timestamp::from(fixed_now()),
        });

        // Act
        let result = dispatcher.dispatch(&join).await;

        // Assert
        assert!(matches!(result, Err(DomainError::AggregateNotFound(_))));
        assert!(repo.appended_events().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_commands_on_one_stream_are_serialized() {
        // Arrange
        let repo: Arc<dyn EventRepository> = Arc::new(InMemoryEventRepository::new());
        let publisher = Arc::new(RecordingPublisher::default());
        let dispatcher = Arc::new(dispatcher_publishing_to(
            repo.clone(),
            Arc::clone(&publisher),
            1,
        ));
        let game_id = GameId::generate();
        dispatcher.dispatch(&create_game(game_id)).await.unwrap();

        // Act
        let joins: Vec<_> = (0..3)
            .map(|_| {
                let dispatcher = Arc::clone(&dispatcher);
                tokio::spawn(async move {
                    let join = GameCommand::from(JoinGame {
                        correlation_id: Uuid::new_v4(),
                        game_id,
                        player_id: PlayerId::generate(),
                        user_id: UserId::generate(),
                        joined_at: Timestamp::from(fixed_now()),
                    });
                    dispatcher.dispatch(&join).await
                })
            })
            .collect();
        for join in joins {
            join.await.unwrap().unwrap();
        }

        // Assert
        let stream = repo.load_events(game_id.as_uuid()).await.unwrap();
        let sequence: Vec<i64> = stream.iter().map(|e| e.sequence_number).collect();
        assert_eq!(sequence, vec![1, 2, 3, 4]);
        assert_eq!(publisher.sequence_numbers(), vec![1, 2, 3, 4]);
        assert_eq!(dispatcher.tracked_streams(), 0);
    }
}
