//! Command handlers for the Visibility context.

use hexrealm_core::aggregate::AggregateRoot;
use hexrealm_core::clock::Clock;
use hexrealm_core::error::DomainError;
use hexrealm_core::ids::{GameId, PlayerId};
use hexrealm_core::repository::{EventRepository, StoredEvent, append_uncommitted};
use tracing::debug;

use crate::domain::aggregates::PlayerVisibility;
use crate::domain::commands::UpdateVisibility;
use crate::domain::events::VisibilityEvent;

/// Reconstitutes a `PlayerVisibility` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    game_id: GameId,
    player_id: PlayerId,
    events: &[StoredEvent],
) -> Result<PlayerVisibility, DomainError> {
    let mut visibility = PlayerVisibility::new(game_id, player_id);
    for stored in events {
        visibility.apply(&VisibilityEvent {
            metadata: stored.metadata(),
            kind: stored.decode()?,
        });
    }
    Ok(visibility)
}

/// Handles `UpdateVisibility`. Returns no events when nothing changed.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn handle_update_visibility(
    command: &UpdateVisibility,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let stream = PlayerVisibility::stream_id(command.game_id, command.player_id);
    let events = repo.load_events(stream).await?;
    let mut visibility = reconstitute(command.game_id, command.player_id, &events)?;
    visibility.update(
        &command.units,
        &command.cities,
        command.updated_at,
        command.correlation_id,
        clock,
    );
    if visibility.uncommitted_events().is_empty() {
        debug!(
            game_id = %command.game_id,
            player_id = %command.player_id,
            "visibility unchanged"
        );
    }
    append_uncommitted(&visibility, repo).await
}
