//! Cross-aggregate workflows.
//!
//! A reaction reads one stored event and answers with the commands that
//! must follow it. Reactions never touch aggregates; the commands go
//! through the same dispatcher as everything else. Every command issued
//! here is idempotent, so a redelivered event does no harm.

use std::sync::{Arc, Mutex, PoisonError};

use hexrealm_city::domain::events::{CITY_FOUNDED_EVENT_TYPE, CityEventKind};
use hexrealm_core::clock::Clock;
use hexrealm_core::error::DomainError;
use hexrealm_core::ids::{GameId, PlayerId, UnitId, UserId, derived_id};
use hexrealm_core::repository::StoredEvent;
use hexrealm_core::rng::DeterministicRng;
use hexrealm_core::unit_type::UnitType;
use hexrealm_game::domain::commands::{CreatePlayer, GenerateMap};
use hexrealm_game::domain::events::{
    GAME_CREATED_EVENT_TYPE, GAME_STARTED_EVENT_TYPE, GameEventKind, GameWasCreated,
    GameWasStarted, PLAYER_JOINED_EVENT_TYPE,
};
use hexrealm_game::domain::map::{MapGenerator, starting_positions};
use hexrealm_technology::domain::commands::CreateTechnologyTree;
use hexrealm_unit::domain::commands::{CreateUnit, DestroyUnit};
use hexrealm_unit::domain::events::{
    UNIT_CREATED_EVENT_TYPE, UNIT_DESTROYED_EVENT_TYPE, UNIT_MOVED_EVENT_TYPE, UnitEventKind,
};
use hexrealm_visibility::domain::commands::{CitySight, UnitSight, UpdateVisibility};
use uuid::Uuid;

use crate::command::GameCommand;
use crate::config::EngineConfig;
use crate::read_models::ReadModels;

/// Identifier of a player's initial unit of `unit_type` in a game. Stable
/// across retries so a repeated spawn finds the unit already created.
#[must_use]
pub fn starting_unit_id(game_id: GameId, player_id: PlayerId, unit_type: UnitType) -> UnitId {
    UnitId::from_uuid(derived_id(
        game_id.as_uuid(),
        &format!("{player_id}/{}", unit_type.as_str()),
    ))
}

/// Turns stored events into follow-up commands.
pub struct Reactions {
    read_models: Arc<ReadModels>,
    clock: Arc<dyn Clock>,
    rng: Mutex<Box<dyn DeterministicRng>>,
    map_width: u32,
    map_height: u32,
}

impl std::fmt::Debug for Reactions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reactions")
            .field("map_width", &self.map_width)
            .field("map_height", &self.map_height)
            .finish_non_exhaustive()
    }
}

impl Reactions {
    #[must_use]
    pub fn new(
        read_models: Arc<ReadModels>,
        clock: Arc<dyn Clock>,
        rng: Box<dyn DeterministicRng>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            read_models,
            clock,
            rng: Mutex::new(rng),
            map_width: config.map_width,
            map_height: config.map_height,
        }
    }

    /// Commands that must follow `event`. Most events need none.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the payload cannot be decoded.
    pub fn react(&self, event: &StoredEvent) -> Result<Vec<GameCommand>, DomainError> {
        let correlation_id = event.correlation_id;
        match event.event_type.as_str() {
            GAME_CREATED_EVENT_TYPE | PLAYER_JOINED_EVENT_TYPE | GAME_STARTED_EVENT_TYPE => {
                Ok(match event.decode::<GameEventKind>()? {
                    GameEventKind::GameWasCreated(created) => {
                        self.on_game_created(&created, correlation_id)
                    }
                    GameEventKind::PlayerWasJoined(joined) => vec![
                        self.create_player(
                            joined.player_id,
                            joined.game_id,
                            joined.user_id,
                            correlation_id,
                        ),
                        self.create_tree(joined.player_id, joined.game_id, correlation_id),
                    ],
                    GameEventKind::GameWasStarted(started) => {
                        self.on_game_started(&started, correlation_id)
                    }
                    _ => Vec::new(),
                })
            }
            CITY_FOUNDED_EVENT_TYPE => {
                let CityEventKind::CityWasFounded(founded) = event.decode::<CityEventKind>()?;
                Ok(vec![
                    GameCommand::from(DestroyUnit {
                        correlation_id,
                        unit_id: founded.unit_id,
                        destroyed_at: self.clock.timestamp(),
                    }),
                    self.update_visibility(founded.game_id, founded.owner_id, correlation_id),
                ])
            }
            UNIT_CREATED_EVENT_TYPE | UNIT_MOVED_EVENT_TYPE | UNIT_DESTROYED_EVENT_TYPE => {
                let owner = match event.decode::<UnitEventKind>()? {
                    UnitEventKind::UnitWasCreated(e) => Some((e.game_id, e.owner_id)),
                    UnitEventKind::UnitWasMoved(e) => Some((e.game_id, e.owner_id)),
                    UnitEventKind::UnitWasDestroyed(e) => Some((e.game_id, e.owner_id)),
                    UnitEventKind::UnitWasAttacked(_) => None,
                };
                Ok(owner
                    .map(|(game_id, owner_id)| {
                        self.update_visibility(game_id, owner_id, correlation_id)
                    })
                    .into_iter()
                    .collect())
            }
            _ => Ok(Vec::new()),
        }
    }

    fn on_game_created(&self, created: &GameWasCreated, correlation_id: Uuid) -> Vec<GameCommand> {
        let tiles = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            MapGenerator::generate(self.map_width, self.map_height, &mut **rng)
        };
        vec![
            self.create_player(
                created.player_id,
                created.game_id,
                created.user_id,
                correlation_id,
            ),
            GameCommand::from(GenerateMap {
                correlation_id,
                game_id: created.game_id,
                width: self.map_width,
                height: self.map_height,
                tiles,
                generated_at: self.clock.timestamp(),
            }),
            self.create_tree(created.player_id, created.game_id, correlation_id),
        ]
    }

    fn on_game_started(&self, started: &GameWasStarted, correlation_id: Uuid) -> Vec<GameCommand> {
        let game_id = started.game_id;
        let (width, height) = self
            .read_models
            .maps
            .get(game_id)
            .map_or((self.map_width, self.map_height), |m| (m.width, m.height));
        let starts = starting_positions(width, height, started.player_ids.len(), |p| {
            self.read_models.maps.terrain_at(game_id, p)
        });
        let created_at = self.clock.timestamp();

        started
            .player_ids
            .iter()
            .zip(starts)
            .flat_map(|(player_id, start)| {
                [
                    (UnitType::Warrior, start.warrior),
                    (UnitType::Settler, start.settler),
                ]
                .map(|(unit_type, position)| {
                    GameCommand::from(CreateUnit {
                        correlation_id,
                        unit_id: starting_unit_id(game_id, *player_id, unit_type),
                        owner_id: *player_id,
                        game_id,
                        unit_type,
                        position,
                        created_at,
                    })
                })
            })
            .collect()
    }

    fn create_player(
        &self,
        player_id: PlayerId,
        game_id: GameId,
        user_id: UserId,
        correlation_id: Uuid,
    ) -> GameCommand {
        GameCommand::from(CreatePlayer {
            correlation_id,
            player_id,
            game_id,
            user_id,
            created_at: self.clock.timestamp(),
        })
    }

    fn create_tree(
        &self,
        player_id: PlayerId,
        game_id: GameId,
        correlation_id: Uuid,
    ) -> GameCommand {
        GameCommand::from(CreateTechnologyTree {
            correlation_id,
            player_id,
            game_id,
            initial_science_points: 0,
            created_at: self.clock.timestamp(),
        })
    }

    // Sight comes from the owner's living units and cities in that game,
    // as currently projected.
    fn update_visibility(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        correlation_id: Uuid,
    ) -> GameCommand {
        let units = self
            .read_models
            .units
            .by_player(player_id)
            .into_iter()
            .filter(|u| u.game_id == game_id && !u.is_dead)
            .map(|u| UnitSight {
                position: u.position,
                unit_type: u.unit_type,
            })
            .collect();
        let cities = self
            .read_models
            .cities
            .by_player(player_id)
            .into_iter()
            .filter(|c| c.game_id == game_id)
            .map(|c| CitySight {
                position: c.position,
                level: c.level,
            })
            .collect();
        GameCommand::from(UpdateVisibility {
            correlation_id,
            game_id,
            player_id,
            units,
            cities,
            updated_at: self.clock.timestamp(),
        })
    }
}
