//! The running engine: dispatcher, event bus and reaction worker.
//!
//! Two background tasks share the work. The event processor applies
//! each published event to the read models and asks the reactions for
//! follow-up commands; the reaction worker executes those commands in
//! order, retrying transient failures with backoff. Whatever it cannot
//! execute ends up in the dead-letter list.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use hexrealm_core::clock::Clock;
use hexrealm_core::command::Command;
use hexrealm_core::error::DomainError;
use hexrealm_core::repository::{EventRepository, StoredEvent};
use hexrealm_core::rng::DeterministicRng;
use tokio::sync::Notify;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::command::GameCommand;
use crate::config::EngineConfig;
use crate::dispatcher::{CommandDispatcher, EventPublisher};
use crate::query_service::QueryService;
use crate::reactions::Reactions;
use crate::read_models::ReadModels;

/// A reaction command that was given up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLetter {
    pub command_type: &'static str,
    pub target_stream: Uuid,
    /// Correlation id of the event that triggered the command.
    pub correlation_id: Uuid,
    pub attempts: u32,
    pub error: String,
}

// Events and reaction commands published but not fully processed yet.
#[derive(Debug, Default)]
struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

impl InFlight {
    fn begin(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    fn finish(&self) {
        if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }

    async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.count.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

#[derive(Debug, Clone)]
struct EventBus {
    events: UnboundedSender<StoredEvent>,
    in_flight: Arc<InFlight>,
}

impl EventPublisher for EventBus {
    fn publish(&self, events: &[StoredEvent]) {
        for event in events {
            self.in_flight.begin();
            if self.events.send(event.clone()).is_err() {
                self.in_flight.finish();
                warn!(event_id = %event.event_id, "event processor stopped, event not published");
            }
        }
    }
}

/// Entry point for commands and queries.
pub struct Engine {
    dispatcher: Arc<CommandDispatcher>,
    read_models: Arc<ReadModels>,
    queries: QueryService,
    in_flight: Arc<InFlight>,
    dead_letters: Arc<Mutex<Vec<DeadLetter>>>,
    clock: Arc<dyn Clock>,
    tasks: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("dispatcher", &self.dispatcher)
            .field("in_flight", &self.in_flight.count.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Builds the read models and spawns the background tasks on the
    /// current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `config` is inconsistent.
    pub fn start(
        repo: Arc<dyn EventRepository>,
        clock: Arc<dyn Clock>,
        rng: Box<dyn DeterministicRng>,
        config: EngineConfig,
    ) -> Result<Self, DomainError> {
        config.validate()?;
        let (events_tx, events_rx) = unbounded_channel();
        let (commands_tx, commands_rx) = unbounded_channel();
        let bus = EventBus {
            events: events_tx,
            in_flight: Arc::new(InFlight::default()),
        };

        let dispatcher = Arc::new(CommandDispatcher::new(
            repo,
            Arc::new(bus.clone()),
            Arc::clone(&clock),
            config.map_policy(),
            config.max_command_attempts,
        ));
        let read_models = Arc::new(ReadModels::new());
        let reactions = Reactions::new(Arc::clone(&read_models), Arc::clone(&clock), rng, &config);
        let dead_letters = Arc::new(Mutex::new(Vec::new()));

        let processor = tokio::spawn(process_events(
            events_rx,
            Arc::clone(&read_models),
            reactions,
            commands_tx,
            Arc::clone(&bus.in_flight),
        ));
        let worker = tokio::spawn(run_reactions(
            commands_rx,
            ReactionWorker {
                dispatcher: Arc::clone(&dispatcher),
                in_flight: Arc::clone(&bus.in_flight),
                dead_letters: Arc::clone(&dead_letters),
                max_attempts: config.reaction_max_attempts,
                backoff: config.reaction_backoff,
            },
        ));

        Ok(Self {
            dispatcher,
            queries: QueryService::new(Arc::clone(&read_models)),
            read_models,
            in_flight: bus.in_flight,
            dead_letters,
            clock,
            tasks: vec![processor, worker],
        })
    }

    /// Executes a command and publishes its events. Returns the appended
    /// events; empty when the command changed nothing.
    ///
    /// The command runs on its own task, so dropping the returned future
    /// never leaves appended events unpublished.
    ///
    /// # Errors
    ///
    /// Returns whatever the handler rejected the command with, or
    /// `DomainError::InvariantViolation` if the command task panicked.
    pub async fn execute(
        &self,
        command: impl Into<GameCommand>,
    ) -> Result<Vec<StoredEvent>, DomainError> {
        dispatch_detached(&self.dispatcher, command.into()).await
    }

    /// Rebuilds the read models from the full event history. Reactions are
    /// not replayed; their commands are already in the store.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the history cannot be loaded.
    pub async fn catch_up(&self) -> Result<usize, DomainError> {
        let events = self.dispatcher.repository().load_all_events().await?;
        for event in &events {
            self.read_models.apply(event);
        }
        info!(events = events.len(), "read models caught up");
        Ok(events.len())
    }

    /// Resolves once every published event and every reaction it caused
    /// has been processed.
    pub async fn wait_until_idle(&self) {
        self.in_flight.wait_idle().await;
    }

    /// Reaction commands that were given up on, oldest first.
    #[must_use]
    pub fn dead_letters(&self) -> Vec<DeadLetter> {
        self.dead_letters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn queries(&self) -> &QueryService {
        &self.queries
    }

    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

// Runs one dispatch on its own task. A panicking handler surfaces as an
// invariant violation instead of taking the caller down with it.
async fn dispatch_detached(
    dispatcher: &Arc<CommandDispatcher>,
    command: GameCommand,
) -> Result<Vec<StoredEvent>, DomainError> {
    let dispatcher = Arc::clone(dispatcher);
    tokio::spawn(async move { dispatcher.dispatch(&command).await })
        .await
        .unwrap_or_else(|e| {
            Err(DomainError::InvariantViolation(format!(
                "command task failed: {e}"
            )))
        })
}

async fn process_events(
    mut events: UnboundedReceiver<StoredEvent>,
    read_models: Arc<ReadModels>,
    reactions: Reactions,
    commands: UnboundedSender<GameCommand>,
    in_flight: Arc<InFlight>,
) {
    while let Some(event) = events.recv().await {
        read_models.apply(&event);
        match reactions.react(&event) {
            Ok(follow_ups) => {
                for command in follow_ups {
                    in_flight.begin();
                    if commands.send(command).is_err() {
                        in_flight.finish();
                        warn!(event_id = %event.event_id, "reaction worker stopped");
                    }
                }
            }
            Err(err) => error!(
                event_type = %event.event_type,
                event_id = %event.event_id,
                error = %err,
                "reaction could not read event"
            ),
        }
        in_flight.finish();
    }
}

struct ReactionWorker {
    dispatcher: Arc<CommandDispatcher>,
    in_flight: Arc<InFlight>,
    dead_letters: Arc<Mutex<Vec<DeadLetter>>>,
    max_attempts: u32,
    backoff: Duration,
}

impl ReactionWorker {
    async fn execute(&self, command: &GameCommand) {
        let mut attempt = 1;
        loop {
            match dispatch_detached(&self.dispatcher, command.clone()).await {
                Ok(_) => return,
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    let delay = self
                        .backoff
                        .saturating_mul(2_u32.saturating_pow(attempt - 1));
                    warn!(
                        command_type = command.command_type(),
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "reaction command failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    error!(
                        command_type = command.command_type(),
                        correlation_id = %command.correlation_id(),
                        stream = %command.target_stream(),
                        attempts = attempt,
                        error = %err,
                        "reaction command dead-lettered"
                    );
                    self.dead_letters
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(DeadLetter {
                            command_type: command.command_type(),
                            target_stream: command.target_stream(),
                            correlation_id: command.correlation_id(),
                            attempts: attempt,
                            error: err.to_string(),
                        });
                    return;
                }
            }
        }
    }
}

async fn run_reactions(mut commands: UnboundedReceiver<GameCommand>, worker: ReactionWorker) {
    while let Some(command) = commands.recv().await {
        worker.execute(&command).await;
        worker.in_flight.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexrealm_city::domain::commands::FoundCity;
    use hexrealm_core::ids::{CityId, GameId, PlayerId, UnitId};
    use hexrealm_core::terrain::Terrain;
    use hexrealm_core::timestamp::Timestamp;
    use hexrealm_event_store::InMemoryEventRepository;
    use hexrealm_test_support::{FixedClock, MockRng, fixed_now, position};

    fn engine(repo: Arc<dyn EventRepository>) -> Engine {
        Engine::start(
            repo,
            Arc::new(FixedClock::default()),
            Box::new(MockRng),
            EngineConfig {
                reaction_backoff: Duration::from_millis(1),
                ..EngineConfig::default()
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_rejected_reaction_becomes_a_dead_letter() {
        // Arrange
        let engine = engine(Arc::new(InMemoryEventRepository::new()));
        // The caller vouches for a unit the store has never seen.
        let ghost = UnitId::generate();
        let owner_id = PlayerId::generate();
        let found = FoundCity {
            correlation_id: Uuid::new_v4(),
            city_id: CityId::generate(),
            owner_id,
            game_id: GameId::generate(),
            unit_id: ghost,
            founding_unit_owner: Some(owner_id),
            name: "Ashford".to_owned(),
            position: position(2, 2),
            terrain: Terrain::Plains,
            existing_city_positions: Vec::new(),
            founded_at: Timestamp::from(fixed_now()),
        };

        // Act
        engine.execute(found).await.unwrap();
        engine.wait_until_idle().await;

        // Assert
        let dead_letters = engine.dead_letters();
        assert_eq!(dead_letters.len(), 1);
        assert_eq!(dead_letters[0].command_type, "unit.destroy_unit");
        assert_eq!(dead_letters[0].target_stream, ghost.as_uuid());
        assert_eq!(dead_letters[0].attempts, 1);
    }

    #[tokio::test]
    async fn test_wait_until_idle_returns_at_once_without_work() {
        let engine = engine(Arc::new(InMemoryEventRepository::new()));

        engine.wait_until_idle().await;

        assert!(engine.dead_letters().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let result = Engine::start(
            Arc::new(InMemoryEventRepository::new()),
            Arc::new(FixedClock::default()),
            Box::new(MockRng),
            EngineConfig {
                max_command_attempts: 0,
                ..EngineConfig::default()
            },
        );

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
