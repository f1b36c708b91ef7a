//! Aggregate roots for the City context.

use hexrealm_core::aggregate::AggregateRoot;
use hexrealm_core::clock::Clock;
use hexrealm_core::error::DomainError;
use hexrealm_core::event::EventMetadata;
use hexrealm_core::ids::{CityId, GameId, PlayerId, UnitId};
use hexrealm_core::position::Position;
use hexrealm_core::terrain::Terrain;
use hexrealm_core::timestamp::Timestamp;
use uuid::Uuid;

use super::errors::CityRuleError;
use super::events::{CITY_FOUNDED_EVENT_TYPE, CityEvent, CityEventKind, CityWasFounded};
use super::policies::CityFoundingPolicy;

/// Level of every newly founded city.
pub const FOUNDING_LEVEL: u32 = 1;

/// Everything a city is founded with.
#[derive(Debug, Clone)]
pub struct CityCharter {
    /// Owning player.
    pub owner_id: PlayerId,
    /// Game the city belongs to.
    pub game_id: GameId,
    /// Unit founding the city.
    pub unit_id: UnitId,
    /// Owner of `unit_id` if it is a living unit of this game.
    pub founding_unit_owner: Option<PlayerId>,
    /// City name.
    pub name: String,
    /// Requested location.
    pub position: Position,
    /// Caller-set founding time.
    pub founded_at: Timestamp,
}

/// The aggregate root for a city.
#[derive(Debug)]
pub struct City {
    /// Aggregate identifier.
    pub id: CityId,
    /// Current version (event count).
    pub(crate) version: i64,
    pub(crate) owner_id: Option<PlayerId>,
    pub(crate) game_id: Option<GameId>,
    pub(crate) name: String,
    pub(crate) position: Option<Position>,
    pub(crate) level: u32,
    uncommitted_events: Vec<CityEvent>,
}

impl City {
    /// Creates an empty city aggregate ready for replay.
    #[must_use]
    pub fn new(id: CityId) -> Self {
        Self {
            id,
            version: 0,
            owner_id: None,
            game_id: None,
            name: String::new(),
            position: None,
            level: 0,
            uncommitted_events: Vec::new(),
        }
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Founds the city at level 1.
    ///
    /// # Errors
    ///
    /// Returns `CityAlreadyExists`, `InvalidFoundingUnit`, `InvalidTerrain` or
    /// `PositionOccupied`.
    #[allow(clippy::cast_possible_wrap)]
    pub fn found(
        &mut self,
        charter: CityCharter,
        terrain: Terrain,
        existing_city_positions: &[Position],
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.exists() {
            return Err(CityRuleError::CityAlreadyExists(self.id).into());
        }
        if charter.founding_unit_owner != Some(charter.owner_id) {
            return Err(CityRuleError::InvalidFoundingUnit(charter.unit_id).into());
        }
        CityFoundingPolicy::validate_city_founding(
            charter.position,
            terrain,
            existing_city_positions,
        )?;

        let metadata = EventMetadata::new(
            CITY_FOUNDED_EVENT_TYPE,
            self.id.as_uuid(),
            self.version + self.uncommitted_events.len() as i64 + 1,
            correlation_id,
            clock.now(),
        );
        let kind = CityEventKind::CityWasFounded(CityWasFounded {
            city_id: self.id,
            owner_id: charter.owner_id,
            game_id: charter.game_id,
            unit_id: charter.unit_id,
            name: charter.name,
            position: charter.position,
            level: FOUNDING_LEVEL,
            founded_at: charter.founded_at,
        });
        self.uncommitted_events.push(CityEvent { metadata, kind });
        Ok(())
    }
}

impl AggregateRoot for City {
    type Event = CityEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id.as_uuid()
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            CityEventKind::CityWasFounded(payload) => {
                self.owner_id = Some(payload.owner_id);
                self.game_id = Some(payload.game_id);
                self.name.clone_from(&payload.name);
                self.position = Some(payload.position);
                self.level = payload.level;
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
    use hexrealm_test_support::{FixedClock, fixed_now, position};

    fn charter(at: Position) -> CityCharter {
        let owner_id = PlayerId::generate();
        CityCharter {
            owner_id,
            game_id: GameId::generate(),
            unit_id: UnitId::generate(),
            founding_unit_owner: Some(owner_id),
            name: "Rivertown".to_owned(),
            position: at,
            founded_at: Timestamp::from(fixed_now()),
        }
    }

    #[test]
    fn test_found_on_valid_terrain_emits_exactly_one_event_with_command_data() {
        for terrain in [Terrain::Plains, Terrain::Forest, Terrain::Desert] {
            // Arrange
            let city_id = CityId::generate();
            let mut city = City::new(city_id);
            let charter = charter(position(3, 4));
            let owner = charter.owner_id;

            // Act
            city.found(charter, terrain, &[position(0, 0)], Uuid::new_v4(), &FixedClock::default())
                .unwrap();

            // Assert
            let events = city.uncommitted_events();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].event_type(), CITY_FOUNDED_EVENT_TYPE);
            let CityEventKind::CityWasFounded(founded) = &events[0].kind;
            assert_eq!(founded.city_id, city_id);
            assert_eq!(founded.owner_id, owner);
            assert_eq!(founded.name, "Rivertown");
            assert_eq!(founded.position, position(3, 4));
            assert_eq!(founded.level, 1);
        }
    }

    #[test]
    fn test_found_on_invalid_terrain_emits_nothing() {
        for terrain in [Terrain::Mountain, Terrain::Water, Terrain::Swamp] {
            let mut city = City::new(CityId::generate());

            let result = city.found(
                charter(position(1, 1)),
                terrain,
                &[],
                Uuid::new_v4(),
                &FixedClock::default(),
            );

            match result.unwrap_err() {
                DomainError::RuleViolation(v) => assert_eq!(v.code, "invalid_terrain"),
                other => panic!("expected RuleViolation, got {other:?}"),
            }
            assert!(city.uncommitted_events().is_empty());
        }
    }

    #[test]
    fn test_found_on_occupied_position_is_rejected() {
        let mut city = City::new(CityId::generate());

        let result = city.found(
            charter(position(2, 2)),
            Terrain::Plains,
            &[position(2, 2)],
            Uuid::new_v4(),
            &FixedClock::default(),
        );

        match result.unwrap_err() {
            DomainError::RuleViolation(v) => assert_eq!(v.code, "position_occupied"),
            other => panic!("expected RuleViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_found_with_someone_elses_or_missing_unit_is_rejected() {
        for founding_unit_owner in [Some(PlayerId::generate()), None] {
            // Arrange
            let mut city = City::new(CityId::generate());
            let charter = CityCharter {
                founding_unit_owner,
                ..charter(position(2, 2))
            };

            // Act
            let result = city.found(
                charter,
                Terrain::Plains,
                &[],
                Uuid::new_v4(),
                &FixedClock::default(),
            );

            // Assert
            match result.unwrap_err() {
                DomainError::RuleViolation(v) => assert_eq!(v.code, "invalid_founding_unit"),
                other => panic!("expected RuleViolation, got {other:?}"),
            }
            assert!(city.uncommitted_events().is_empty());
        }
    }

    #[test]
    fn test_replay_rebuilds_founded_city() {
        // Arrange
        let mut source = City::new(CityId::generate());
        source
            .found(charter(position(5, 5)), Terrain::Forest, &[], Uuid::new_v4(), &FixedClock::default())
            .unwrap();
        let history = source.uncommitted_events().to_vec();

        // Act
        let mut replayed = City::new(source.id);
        for event in &history {
            replayed.apply(event);
        }

        // Assert
        assert_eq!(replayed.version(), 1);
        assert_eq!(replayed.level(), 1);
        assert_eq!(replayed.position(), Some(position(5, 5)));
    }
}
