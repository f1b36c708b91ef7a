//! Every read model of the engine and the table routing events to them.

use std::collections::HashMap;
use std::sync::Arc;

use hexrealm_city::application::projections::CityProjection;
use hexrealm_core::projection::Projection;
use hexrealm_core::repository::StoredEvent;
use hexrealm_diplomacy::application::projections::DiplomacyProjection;
use hexrealm_game::application::projections::{GameProjection, MapProjection, PlayerProjection};
use hexrealm_technology::application::projections::TechnologyProjection;
use hexrealm_unit::application::projections::UnitProjection;
use hexrealm_visibility::application::projections::VisibilityProjection;
use tracing::error;

/// The projections, plus a routing table from event type to the
/// projections subscribed to it.
pub struct ReadModels {
    pub games: Arc<GameProjection>,
    pub players: Arc<PlayerProjection>,
    pub maps: Arc<MapProjection>,
    pub cities: Arc<CityProjection>,
    pub units: Arc<UnitProjection>,
    pub technology: Arc<TechnologyProjection>,
    pub diplomacy: Arc<DiplomacyProjection>,
    pub visibility: Arc<VisibilityProjection>,
    routes: HashMap<&'static str, Vec<Arc<dyn Projection>>>,
}

impl std::fmt::Debug for ReadModels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut routed: Vec<&&str> = self.routes.keys().collect();
        routed.sort();
        f.debug_struct("ReadModels")
            .field("routed_event_types", &routed)
            .finish_non_exhaustive()
    }
}

impl Default for ReadModels {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadModels {
    /// Creates empty projections and builds the routing table once.
    #[must_use]
    pub fn new() -> Self {
        let games = Arc::new(GameProjection::new());
        let players = Arc::new(PlayerProjection::new());
        let maps = Arc::new(MapProjection::new());
        let cities = Arc::new(CityProjection::new());
        let units = Arc::new(UnitProjection::new());
        let technology = Arc::new(TechnologyProjection::new());
        let diplomacy = Arc::new(DiplomacyProjection::new());
        let visibility = Arc::new(VisibilityProjection::new());

        let subscribers: [Arc<dyn Projection>; 8] = [
            games.clone(),
            players.clone(),
            maps.clone(),
            cities.clone(),
            units.clone(),
            technology.clone(),
            diplomacy.clone(),
            visibility.clone(),
        ];
        let mut routes: HashMap<&'static str, Vec<Arc<dyn Projection>>> = HashMap::new();
        for projection in subscribers {
            for event_type in projection.event_types() {
                routes
                    .entry(*event_type)
                    .or_default()
                    .push(Arc::clone(&projection));
            }
        }

        Self {
            games,
            players,
            maps,
            cities,
            units,
            technology,
            diplomacy,
            visibility,
            routes,
        }
    }

    /// Projections subscribed to `event_type`.
    #[must_use]
    pub fn subscribers(&self, event_type: &str) -> &[Arc<dyn Projection>] {
        self.routes
            .get(event_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Applies `event` to every subscribed projection. A projection that
    /// fails is logged and skipped; the others still see the event.
    pub fn apply(&self, event: &StoredEvent) {
        for projection in self.subscribers(&event.event_type) {
            if let Err(err) = projection.apply(event) {
                error!(
                    projection = projection.name(),
                    event_type = %event.event_type,
                    event_id = %event.event_id,
                    error = %err,
                    "projection failed to apply event"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexrealm_core::ids::{CityId, GameId, PlayerId, UnitId};
    use hexrealm_core::timestamp::Timestamp;
    use hexrealm_city::domain::events::{CITY_FOUNDED_EVENT_TYPE, CityEventKind, CityWasFounded};
    use hexrealm_test_support::{fixed_now, position, stored_event};
    use hexrealm_unit::domain::events::UNIT_MOVED_EVENT_TYPE;

    #[test]
    fn test_every_event_type_is_routed() {
        let read_models = ReadModels::new();

        assert_eq!(read_models.subscribers(UNIT_MOVED_EVENT_TYPE).len(), 1);
        assert_eq!(read_models.subscribers(CITY_FOUNDED_EVENT_TYPE).len(), 1);
        assert!(read_models.subscribers("unknown.event").is_empty());
    }

    #[test]
    fn test_redelivered_event_is_applied_once() {
        // Arrange
        let read_models = ReadModels::new();
        let city_id = CityId::generate();
        let game_id = GameId::generate();
        let event = stored_event(
            city_id.as_uuid(),
            1,
            CITY_FOUNDED_EVENT_TYPE,
            &CityEventKind::CityWasFounded(CityWasFounded {
                city_id,
                owner_id: PlayerId::generate(),
                game_id,
                unit_id: UnitId::generate(),
                name: "Ashford".to_owned(),
                position: position(3, 3),
                level: 1,
                founded_at: Timestamp::from(fixed_now()),
            }),
        );

        // Act
        read_models.apply(&event);
        read_models.apply(&event);

        // Assert
        assert_eq!(read_models.cities.by_game(game_id).len(), 1);
    }

    #[test]
    fn test_undecodable_payload_is_skipped() {
        let read_models = ReadModels::new();
        let mut event = stored_event(
            CityId::generate().as_uuid(),
            1,
            CITY_FOUNDED_EVENT_TYPE,
            &serde_json::json!({}),
        );
        event.payload = serde_json::json!({ "Nonsense": {} });

        read_models.apply(&event);

        assert!(read_models.cities.by_game(GameId::generate()).is_empty());
    }
}
