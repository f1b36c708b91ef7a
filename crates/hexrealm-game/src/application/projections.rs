//! Read models for the Game context.

use std::collections::HashMap;
use std::sync::RwLock;

use hexrealm_core::error::DomainError;
use hexrealm_core::ids::{GameId, PlayerId, UserId};
use hexrealm_core::position::Position;
use hexrealm_core::projection::{Checkpoints, Projection, read_view, write_view};
use hexrealm_core::repository::StoredEvent;
use hexrealm_core::terrain::Terrain;
use hexrealm_core::timestamp::Timestamp;
use serde::Serialize;

use crate::domain::aggregates::{GameStatus, Seat};
use crate::domain::events::{
    GAME_CREATED_EVENT_TYPE, GAME_STARTED_EVENT_TYPE, GameEventKind, MAP_GENERATED_EVENT_TYPE,
    PLAYER_CREATED_EVENT_TYPE, PLAYER_JOINED_EVENT_TYPE, PlayerEventKind, TURN_ENDED_EVENT_TYPE,
};
use crate::domain::map::MapTile;

/// Read-only view of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    /// The game identifier.
    pub game_id: GameId,
    /// Display name.
    pub name: String,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Seats in turn order.
    pub players: Vec<Seat>,
    /// Player whose turn it is, once started.
    pub active_player: Option<PlayerId>,
    /// Current turn number (0 before start).
    pub current_turn: u32,
    /// Creation time.
    pub created_at: Timestamp,
    /// Start time, once started.
    pub started_at: Option<Timestamp>,
}

#[derive(Debug, Default)]
struct GameTable {
    games: HashMap<GameId, GameView>,
    checkpoints: Checkpoints,
}

/// Projection of game lobby and turn state.
#[derive(Debug, Default)]
pub struct GameProjection {
    table: RwLock<GameTable>,
}

impl GameProjection {
    /// Creates an empty projection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, game_id: GameId) -> Option<GameView> {
        read_view(&self.table).games.get(&game_id).cloned()
    }

    /// Games the user holds a seat in, oldest first.
    #[must_use]
    pub fn by_user(&self, user_id: UserId) -> Vec<GameView> {
        self.select(|g| g.players.iter().any(|s| s.user_id == user_id))
    }

    /// All games, oldest first.
    #[must_use]
    pub fn all(&self) -> Vec<GameView> {
        self.select(|_| true)
    }

    fn select(&self, filter: impl Fn(&GameView) -> bool) -> Vec<GameView> {
        let table = read_view(&self.table);
        let mut games: Vec<GameView> = table.games.values().filter(|g| filter(g)).cloned().collect();
        games.sort_by_key(|g| (g.created_at, g.game_id));
        games
    }
}

impl Projection for GameProjection {
    fn name(&self) -> &'static str {
        "games"
    }

    fn event_types(&self) -> &'static [&'static str] {
        &[
            GAME_CREATED_EVENT_TYPE,
            PLAYER_JOINED_EVENT_TYPE,
            GAME_STARTED_EVENT_TYPE,
            TURN_ENDED_EVENT_TYPE,
        ]
    }

    fn apply(&self, event: &StoredEvent) -> Result<(), DomainError> {
        let kind: GameEventKind = event.decode()?;
        let mut table = write_view(&self.table);
        if !table.checkpoints.is_new(event) {
            return Ok(());
        }
        match kind {
            GameEventKind::GameWasCreated(created) => {
                table.games.insert(
                    created.game_id,
                    GameView {
                        game_id: created.game_id,
                        name: created.name,
                        status: GameStatus::WaitingForPlayers,
                        players: vec![Seat {
                            player_id: created.player_id,
                            user_id: created.user_id,
                        }],
                        active_player: None,
                        current_turn: 0,
                        created_at: created.created_at,
                        started_at: None,
                    },
                );
            }
            GameEventKind::PlayerWasJoined(joined) => {
                if let Some(game) = table.games.get_mut(&joined.game_id) {
                    game.players.push(Seat {
                        player_id: joined.player_id,
                        user_id: joined.user_id,
                    });
                }
            }
            GameEventKind::GameWasStarted(started) => {
                if let Some(game) = table.games.get_mut(&started.game_id) {
                    game.status = GameStatus::InProgress;
                    game.started_at = Some(started.started_at);
                    game.active_player = started.player_ids.first().copied();
                    game.current_turn = 1;
                }
            }
            GameEventKind::PlayerEndedTurn(ended) => {
                if let Some(game) = table.games.get_mut(&ended.game_id) {
                    game.active_player = Some(ended.next_player_id);
                    game.current_turn = ended.turn;
                }
            }
            GameEventKind::MapWasGenerated(_) => {}
        }
        table.checkpoints.record(event);
        Ok(())
    }
}

/// Read-only view of a player record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    /// The player identifier.
    pub player_id: PlayerId,
    /// Game the player belongs to.
    pub game_id: GameId,
    /// Owning user.
    pub user_id: UserId,
}

#[derive(Debug, Default)]
struct PlayerTable {
    players: HashMap<PlayerId, PlayerView>,
    checkpoints: Checkpoints,
}

/// Projection of player records.
#[derive(Debug, Default)]
pub struct PlayerProjection {
    table: RwLock<PlayerTable>,
}

impl PlayerProjection {
    /// Creates an empty projection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, player_id: PlayerId) -> Option<PlayerView> {
        read_view(&self.table).players.get(&player_id).copied()
    }

    #[must_use]
    pub fn by_game(&self, game_id: GameId) -> Vec<PlayerView> {
        let mut players: Vec<PlayerView> = read_view(&self.table)
            .players
            .values()
            .filter(|p| p.game_id == game_id)
            .copied()
            .collect();
        players.sort_by_key(|p| p.player_id);
        players
    }
}

impl Projection for PlayerProjection {
    fn name(&self) -> &'static str {
        "players"
    }

    fn event_types(&self) -> &'static [&'static str] {
        &[PLAYER_CREATED_EVENT_TYPE]
    }

    fn apply(&self, event: &StoredEvent) -> Result<(), DomainError> {
        let PlayerEventKind::PlayerWasCreated(created) = event.decode::<PlayerEventKind>()?;
        let mut table = write_view(&self.table);
        if !table.checkpoints.is_new(event) {
            return Ok(());
        }
        table.players.insert(
            created.player_id,
            PlayerView {
                player_id: created.player_id,
                game_id: created.game_id,
                user_id: created.user_id,
            },
        );
        table.checkpoints.record(event);
        Ok(())
    }
}

/// Read-only view of a game's map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapView {
    /// The game identifier.
    pub game_id: GameId,
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Tiles, row-major.
    pub tiles: Vec<MapTile>,
}

impl MapView {
    /// Terrain at `position`, if it is on the map.
    #[must_use]
    pub fn terrain_at(&self, position: Position) -> Option<Terrain> {
        let x = usize::try_from(position.x()).ok()?;
        let y = usize::try_from(position.y()).ok()?;
        let width = self.width as usize;
        if x >= width {
            return None;
        }
        self.tiles
            .get(y.checked_mul(width)?.checked_add(x)?)
            .map(|t| t.terrain)
    }
}

#[derive(Debug, Default)]
struct MapTable {
    maps: HashMap<GameId, MapView>,
    checkpoints: Checkpoints,
}

/// Projection of generated maps.
#[derive(Debug, Default)]
pub struct MapProjection {
    table: RwLock<MapTable>,
}

impl MapProjection {
    /// Creates an empty projection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, game_id: GameId) -> Option<MapView> {
        read_view(&self.table).maps.get(&game_id).cloned()
    }

    #[must_use]
    pub fn terrain_at(&self, game_id: GameId, position: Position) -> Option<Terrain> {
        read_view(&self.table)
            .maps
            .get(&game_id)
            .and_then(|m| m.terrain_at(position))
    }
}

impl Projection for MapProjection {
    fn name(&self) -> &'static str {
        "maps"
    }

    fn event_types(&self) -> &'static [&'static str] {
        &[MAP_GENERATED_EVENT_TYPE]
    }

    fn apply(&self, event: &StoredEvent) -> Result<(), DomainError> {
        let GameEventKind::MapWasGenerated(map) = event.decode::<GameEventKind>()? else {
            return Ok(());
        };
        let mut table = write_view(&self.table);
        if !table.checkpoints.is_new(event) {
            return Ok(());
        }
        table.maps.insert(
            map.game_id,
            MapView {
                game_id: map.game_id,
                width: map.width,
                height: map.height,
                tiles: map.tiles,
            },
        );
        table.checkpoints.record(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{GameWasCreated, MapWasGenerated, PlayerWasJoined};
    use crate::domain::map::MapGenerator;
    use hexrealm_test_support::{MockRng, fixed_now, position, stored_event};

    fn created(game_id: GameId, user_id: UserId) -> GameEventKind {
        GameEventKind::GameWasCreated(GameWasCreated {
            game_id,
            name: "Test Game".to_owned(),
            player_id: PlayerId::generate(),
            user_id,
            created_at: Timestamp::from(fixed_now()),
        })
    }

    #[test]
    fn test_redelivered_join_is_applied_once() {
        // Arrange
        let projection = GameProjection::new();
        let game_id = GameId::generate();
        let stream = game_id.as_uuid();
        let joined = GameEventKind::PlayerWasJoined(PlayerWasJoined {
            game_id,
            player_id: PlayerId::generate(),
            user_id: UserId::generate(),
            joined_at: Timestamp::from(fixed_now()),
        });
        let join_event = stored_event(stream, 2, PLAYER_JOINED_EVENT_TYPE, &joined);

        // Act
        projection
            .apply(&stored_event(stream, 1, GAME_CREATED_EVENT_TYPE, &created(game_id, UserId::generate())))
            .unwrap();
        projection.apply(&join_event).unwrap();
        projection.apply(&join_event).unwrap();

        // Assert
        assert_eq!(projection.get(game_id).unwrap().players.len(), 2);
    }

    #[test]
    fn test_by_user_lists_only_games_with_a_seat() {
        // Arrange
        let projection = GameProjection::new();
        let user = UserId::generate();
        let mine = GameId::generate();
        let other = GameId::generate();
        projection
            .apply(&stored_event(mine.as_uuid(), 1, GAME_CREATED_EVENT_TYPE, &created(mine, user)))
            .unwrap();
        projection
            .apply(&stored_event(
                other.as_uuid(),
                1,
                GAME_CREATED_EVENT_TYPE,
                &created(other, UserId::generate()),
            ))
            .unwrap();

        // Act
        let games = projection.by_user(user);

        // Assert
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].game_id, mine);
        assert_eq!(projection.all().len(), 2);
    }

    #[test]
    fn test_map_projection_answers_terrain_lookups() {
        // Arrange
        let projection = MapProjection::new();
        let game_id = GameId::generate();
        let generated = GameEventKind::MapWasGenerated(MapWasGenerated {
            game_id,
            width: 5,
            height: 5,
            tiles: MapGenerator::generate(5, 5, &mut MockRng),
            generated_at: Timestamp::from(fixed_now()),
        });

        // Act
        projection
            .apply(&stored_event(game_id.as_uuid(), 2, MAP_GENERATED_EVENT_TYPE, &generated))
            .unwrap();

        // Assert
        assert_eq!(projection.terrain_at(game_id, position(4, 4)), Some(Terrain::Plains));
        assert_eq!(projection.terrain_at(game_id, position(5, 0)), None);
        assert_eq!(projection.terrain_at(GameId::generate(), position(0, 0)), None);
    }
}
