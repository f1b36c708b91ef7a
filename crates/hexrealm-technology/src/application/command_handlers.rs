//! Command handlers for the Technology context.

use hexrealm_core::aggregate::AggregateRoot;
use hexrealm_core::clock::Clock;
use hexrealm_core::error::DomainError;
use hexrealm_core::ids::PlayerId;
use hexrealm_core::repository::{EventRepository, StoredEvent, append_uncommitted};
use tracing::debug;

use crate::domain::aggregates::TechnologyTree;
use crate::domain::catalog::find_technology;
use crate::domain::commands::{CreateTechnologyTree, DiscoverTechnology, GrantSciencePoints};
use crate::domain::events::TechnologyEvent;

/// Reconstitutes a `TechnologyTree` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    player_id: PlayerId,
    events: &[StoredEvent],
) -> Result<TechnologyTree, DomainError> {
    let mut tree = TechnologyTree::new(player_id);
    for stored in events {
        tree.apply(&TechnologyEvent {
            metadata: stored.metadata(),
            kind: stored.decode()?,
        });
    }
    Ok(tree)
}

async fn load_tree(
    player_id: PlayerId,
    repo: &dyn EventRepository,
) -> Result<TechnologyTree, DomainError> {
    let events = repo
        .load_events(TechnologyTree::stream_id(player_id))
        .await?;
    reconstitute(player_id, &events)
}

/// Handles `CreateTechnologyTree`. Returns no events if the tree exists.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn handle_create_technology_tree(
    command: &CreateTechnologyTree,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let mut tree = load_tree(command.player_id, repo).await?;
    tree.create(
        command.game_id,
        command.initial_science_points,
        command.created_at,
        command.correlation_id,
        clock,
    );
    if tree.uncommitted_events().is_empty() {
        debug!(player_id = %command.player_id, "technology tree already exists, skipping create");
    }
    append_uncommitted(&tree, repo).await
}

/// Handles `GrantSciencePoints`.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the player has no tree and
/// `DomainError::Validation` for a zero amount.
pub async fn handle_grant_science_points(
    command: &GrantSciencePoints,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let mut tree = load_tree(command.player_id, repo).await?;
    tree.grant_science_points(
        command.amount,
        command.granted_at,
        command.correlation_id,
        clock,
    )?;
    append_uncommitted(&tree, repo).await
}

/// Handles `DiscoverTechnology`.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown technology or a
/// missing tree, and a rule violation when discovery is not allowed.
pub async fn handle_discover_technology(
    command: &DiscoverTechnology,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let technology = find_technology(command.technology_id)
        .ok_or(DomainError::AggregateNotFound(command.technology_id.as_uuid()))?;
    let mut tree = load_tree(command.player_id, repo).await?;
    tree.discover(
        technology,
        command.discovered_at,
        command.correlation_id,
        clock,
    )?;
    append_uncommitted(&tree, repo).await
}
