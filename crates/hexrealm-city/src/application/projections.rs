//! City registry read model.

use std::collections::HashMap;
use std::sync::RwLock;

use hexrealm_core::error::DomainError;
use hexrealm_core::ids::{CityId, GameId, PlayerId, UnitId};
use hexrealm_core::position::Position;
use hexrealm_core::projection::{Checkpoints, Projection, read_view, write_view};
use hexrealm_core::repository::StoredEvent;
use hexrealm_core::timestamp::Timestamp;
use serde::Serialize;

use crate::domain::events::{CITY_FOUNDED_EVENT_TYPE, CityEventKind};

/// Read-only view of a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityView {
    /// The city identifier.
    pub city_id: CityId,
    /// Owning player.
    pub owner_id: PlayerId,
    /// Game the city belongs to.
    pub game_id: GameId,
    /// Unit that founded the city.
    pub founded_by: UnitId,
    /// City name.
    pub name: String,
    /// City location.
    pub position: Position,
    /// City level.
    pub level: u32,
    /// Founding time.
    pub founded_at: Timestamp,
}

#[derive(Debug, Default)]
struct CityTable {
    cities: HashMap<CityId, CityView>,
    checkpoints: Checkpoints,
}

/// Projection of every founded city.
#[derive(Debug, Default)]
pub struct CityProjection {
    table: RwLock<CityTable>,
}

impl CityProjection {
    /// Creates an empty projection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, city_id: CityId) -> Option<CityView> {
        read_view(&self.table).cities.get(&city_id).cloned()
    }

    #[must_use]
    pub fn by_game(&self, game_id: GameId) -> Vec<CityView> {
        self.select(|c| c.game_id == game_id)
    }

    #[must_use]
    pub fn by_player(&self, owner_id: PlayerId) -> Vec<CityView> {
        self.select(|c| c.owner_id == owner_id)
    }

    fn select(&self, filter: impl Fn(&CityView) -> bool) -> Vec<CityView> {
        let mut cities: Vec<CityView> = read_view(&self.table)
            .cities
            .values()
            .filter(|c| filter(c))
            .cloned()
            .collect();
        cities.sort_by_key(|c| (c.founded_at, c.city_id));
        cities
    }
}

impl Projection for CityProjection {
    fn name(&self) -> &'static str {
        "cities"
    }

    fn event_types(&self) -> &'static [&'static str] {
        &[CITY_FOUNDED_EVENT_TYPE]
    }

    fn apply(&self, event: &StoredEvent) -> Result<(), DomainError> {
        let CityEventKind::CityWasFounded(founded) = event.decode::<CityEventKind>()?;
        let mut table = write_view(&self.table);
        if !table.checkpoints.is_new(event) {
            return Ok(());
        }
        table.cities.insert(
            founded.city_id,
            CityView {
                city_id: founded.city_id,
                owner_id: founded.owner_id,
                game_id: founded.game_id,
                founded_by: founded.unit_id,
                name: founded.name,
                position: founded.position,
                level: founded.level,
                founded_at: founded.founded_at,
            },
        );
        table.checkpoints.record(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::CityWasFounded;
    use hexrealm_test_support::{fixed_now, position, stored_event};

    fn founded(game_id: GameId, owner_id: PlayerId, at: Position) -> (CityId, StoredEvent) {
        let city_id = CityId::generate();
        let kind = CityEventKind::CityWasFounded(CityWasFounded {
            city_id,
            owner_id,
            game_id,
            unit_id: UnitId::generate(),
            name: "Harbor".to_owned(),
            position: at,
            level: 1,
            founded_at: Timestamp::from(fixed_now()),
        });
        (
            city_id,
            stored_event(city_id.as_uuid(), 1, CITY_FOUNDED_EVENT_TYPE, &kind),
        )
    }

    #[test]
    fn test_cities_are_listed_by_game_and_player() {
        // Arrange
        let projection = CityProjection::new();
        let game = GameId::generate();
        let (alice, bob) = (PlayerId::generate(), PlayerId::generate());
        for (owner, at) in [(alice, position(1, 1)), (alice, position(5, 5)), (bob, position(8, 8))] {
            projection.apply(&founded(game, owner, at).1).unwrap();
        }
        projection
            .apply(&founded(GameId::generate(), bob, position(2, 2)).1)
            .unwrap();

        // Act / Assert
        assert_eq!(projection.by_game(game).len(), 3);
        assert_eq!(projection.by_player(alice).len(), 2);
        assert_eq!(projection.by_player(bob).len(), 2);
    }

    #[test]
    fn test_redelivery_does_not_duplicate() {
        let projection = CityProjection::new();
        let game = GameId::generate();
        let (city_id, event) = founded(game, PlayerId::generate(), position(4, 4));

        projection.apply(&event).unwrap();
        projection.apply(&event).unwrap();

        assert_eq!(projection.by_game(game).len(), 1);
        assert_eq!(projection.get(city_id).unwrap().level, 1);
    }
}
