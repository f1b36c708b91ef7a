//! Command handlers for the Unit context.

use hexrealm_core::aggregate::AggregateRoot;
use hexrealm_core::clock::Clock;
use hexrealm_core::error::DomainError;
use hexrealm_core::ids::UnitId;
use hexrealm_core::repository::{EventRepository, StoredEvent, append_uncommitted};
use tracing::debug;

use crate::domain::aggregates::Unit;
use crate::domain::commands::{AttackUnit, CreateUnit, DestroyUnit, MoveUnit};
use crate::domain::events::UnitEvent;

/// Reconstitutes a `Unit` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(unit_id: UnitId, events: &[StoredEvent]) -> Result<Unit, DomainError> {
    let mut unit = Unit::new(unit_id);
    for stored in events {
        unit.apply(&UnitEvent {
            metadata: stored.metadata(),
            kind: stored.decode()?,
        });
    }
    Ok(unit)
}

async fn load_existing_unit(
    unit_id: UnitId,
    repo: &dyn EventRepository,
) -> Result<Unit, DomainError> {
    let events = repo.load_events(unit_id.as_uuid()).await?;
    if events.is_empty() {
        return Err(DomainError::AggregateNotFound(unit_id.as_uuid()));
    }
    reconstitute(unit_id, &events)
}

/// Handles `CreateUnit`. Returns no events if the unit already exists.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn handle_create_unit(
    command: &CreateUnit,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let events = repo.load_events(command.unit_id.as_uuid()).await?;
    let mut unit = reconstitute(command.unit_id, &events)?;
    unit.create(
        command.owner_id,
        command.game_id,
        command.unit_type,
        command.position,
        command.created_at,
        command.correlation_id,
        clock,
    );
    if unit.uncommitted_events().is_empty() {
        debug!(unit_id = %command.unit_id, "unit already exists, skipping create");
    }
    append_uncommitted(&unit, repo).await
}

/// Handles `MoveUnit`.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown unit and a rule
/// violation when the move is not allowed.
pub async fn handle_move_unit(
    command: &MoveUnit,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let mut unit = load_existing_unit(command.unit_id, repo).await?;
    unit.move_to(
        command.to,
        &command.occupied_positions,
        command.moved_at,
        command.correlation_id,
        clock,
    )?;
    append_uncommitted(&unit, repo).await
}

/// Handles `AttackUnit`. The attacker's stream is only read; every event
/// lands on the target's stream.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if either unit is unknown and a
/// rule violation when the strike is not allowed.
pub async fn handle_attack_unit(
    command: &AttackUnit,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let attacker = load_existing_unit(command.attacker_id, repo)
        .await?
        .as_attacker()?;
    let mut target = load_existing_unit(command.target_id, repo).await?;
    target.receive_attack(
        &attacker,
        command.attacked_at,
        command.correlation_id,
        clock,
    )?;
    append_uncommitted(&target, repo).await
}

/// Handles `DestroyUnit`. Returns no events if the unit is already dead.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown unit.
pub async fn handle_destroy_unit(
    command: &DestroyUnit,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let mut unit = load_existing_unit(command.unit_id, repo).await?;
    unit.destroy(command.destroyed_at, command.correlation_id, clock)?;
    if unit.uncommitted_events().is_empty() {
        debug!(unit_id = %command.unit_id, "unit already dead, skipping destroy");
    }
    append_uncommitted(&unit, repo).await
}
