//! Command handlers for the City context.

use hexrealm_core::aggregate::AggregateRoot;
use hexrealm_core::clock::Clock;
use hexrealm_core::error::DomainError;
use hexrealm_core::ids::CityId;
use hexrealm_core::repository::{EventRepository, StoredEvent, append_uncommitted};

use crate::domain::aggregates::{City, CityCharter};
use crate::domain::commands::FoundCity;
use crate::domain::events::CityEvent;

const NAME_MAX_CHARS: usize = 50;

/// Reconstitutes a `City` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(city_id: CityId, events: &[StoredEvent]) -> Result<City, DomainError> {
    let mut city = City::new(city_id);
    for stored in events {
        city.apply(&CityEvent {
            metadata: stored.metadata(),
            kind: stored.decode()?,
        });
    }
    Ok(city)
}

/// Handles `FoundCity`.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank or overlong name and a
/// rule violation when `CityFoundingPolicy` refuses the site.
pub async fn handle_found_city(
    command: &FoundCity,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let name = command.name.trim();
    if name.is_empty() || name.chars().count() > NAME_MAX_CHARS {
        return Err(DomainError::Validation(format!(
            "city name must be between 1 and {NAME_MAX_CHARS} characters"
        )));
    }

    let existing_events = repo.load_events(command.city_id.as_uuid()).await?;
    let mut city = reconstitute(command.city_id, &existing_events)?;
    city.found(
        CityCharter {
            owner_id: command.owner_id,
            game_id: command.game_id,
            unit_id: command.unit_id,
            founding_unit_owner: command.founding_unit_owner,
            name: name.to_owned(),
            position: command.position,
            founded_at: command.founded_at,
        },
        command.terrain,
        &command.existing_city_positions,
        command.correlation_id,
        clock,
    )?;

    append_uncommitted(&city, repo).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexrealm_core::ids::{GameId, PlayerId, UnitId};
    use hexrealm_core::terrain::Terrain;
    use hexrealm_core::timestamp::Timestamp;
    use hexrealm_event_store::InMemoryEventRepository;
    use hexrealm_test_support::{FixedClock, RecordingEventRepository, fixed_now, position};
    use uuid::Uuid;

    use crate::domain::events::CITY_FOUNDED_EVENT_TYPE;

    fn command(terrain: Terrain) -> FoundCity {
        let owner_id = PlayerId::generate();
        FoundCity {
            correlation_id: Uuid::new_v4(),
            city_id: CityId::generate(),
            owner_id,
            game_id: GameId::generate(),
            unit_id: UnitId::generate(),
            founding_unit_owner: Some(owner_id),
            name: "  Rivertown ".to_owned(),
            position: position(3, 3),
            terrain,
            existing_city_positions: Vec::new(),
            founded_at: Timestamp::from(fixed_now()),
        }
    }

    #[tokio::test]
    async fn test_handle_found_city_persists_city_founded() {
        // Arrange
        let repo = RecordingEventRepository::new(Vec::new());
        let command = command(Terrain::Desert);

        // Act
        let events = handle_found_city(&command, &FixedClock::default(), &repo)
            .await
            .unwrap();

        // Assert
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, CITY_FOUNDED_EVENT_TYPE);
        assert_eq!(events[0].payload["CityWasFounded"]["name"], "Rivertown");
        assert_eq!(repo.appended_events()[0].0, command.city_id.as_uuid());
    }

    #[tokio::test]
    async fn test_handle_found_city_twice_is_rejected() {
        // Arrange
        let repo = InMemoryEventRepository::new();
        let command = command(Terrain::Plains);
        handle_found_city(&command, &FixedClock::default(), &repo)
            .await
            .unwrap();

        // Act
        let result = handle_found_city(&command, &FixedClock::default(), &repo).await;

        // Assert
        match result.unwrap_err() {
            DomainError::RuleViolation(v) => assert_eq!(v.code, "city_already_exists"),
            other => panic!("expected RuleViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_found_city_on_water_appends_nothing() {
        let repo = RecordingEventRepository::new(Vec::new());

        let result = handle_found_city(&command(Terrain::Water), &FixedClock::default(), &repo).await;

        assert!(result.is_err());
        assert!(repo.appended_events().is_empty());
    }

    #[tokio::test]
    async fn test_handle_found_city_rejects_blank_name() {
        let mut command = command(Terrain::Plains);
        command.name = "   ".to_owned();

        let result = handle_found_city(
            &command,
            &FixedClock::default(),
            &RecordingEventRepository::new(Vec::new()),
        )
        .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
