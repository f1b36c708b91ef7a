//! Command handlers for the Diplomacy context.

use hexrealm_core::aggregate::AggregateRoot;
use hexrealm_core::clock::Clock;
use hexrealm_core::error::DomainError;
use hexrealm_core::ids::DiplomacyId;
use hexrealm_core::repository::{EventRepository, StoredEvent, append_uncommitted};

use crate::domain::aggregates::{DiplomacyAgreement, Parties};
use crate::domain::commands::{AcceptDiplomacy, DeclineDiplomacy, EndDiplomacy, ProposeDiplomacy};
use crate::domain::events::DiplomacyEvent;

/// Reconstitutes a `DiplomacyAgreement` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    diplomacy_id: DiplomacyId,
    events: &[StoredEvent],
) -> Result<DiplomacyAgreement, DomainError> {
    let mut agreement = DiplomacyAgreement::new(diplomacy_id);
    for stored in events {
        agreement.apply(&DiplomacyEvent {
            metadata: stored.metadata(),
            kind: stored.decode()?,
        });
    }
    Ok(agreement)
}

async fn load_agreement(
    diplomacy_id: DiplomacyId,
    repo: &dyn EventRepository,
) -> Result<DiplomacyAgreement, DomainError> {
    let events = repo.load_events(diplomacy_id.as_uuid()).await?;
    reconstitute(diplomacy_id, &events)
}

/// Handles `ProposeDiplomacy`.
///
/// # Errors
///
/// Returns a rule violation for a self-proposal or a reused agreement id.
pub async fn handle_propose_diplomacy(
    command: &ProposeDiplomacy,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let mut agreement = load_agreement(command.diplomacy_id, repo).await?;
    agreement.propose(
        command.game_id,
        Parties {
            initiator_id: command.initiator_id,
            target_id: command.target_id,
        },
        command.agreement_type,
        command.proposed_at,
        command.correlation_id,
        clock,
    )?;
    append_uncommitted(&agreement, repo).await
}

/// Handles `AcceptDiplomacy`.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown agreement and a
/// rule violation for a wrong status or actor.
pub async fn handle_accept_diplomacy(
    command: &AcceptDiplomacy,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let mut agreement = load_agreement(command.diplomacy_id, repo).await?;
    agreement.accept(
        command.actor_id,
        command.accepted_at,
        command.correlation_id,
        clock,
    )?;
    append_uncommitted(&agreement, repo).await
}

/// Handles `DeclineDiplomacy`.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown agreement and a
/// rule violation for a wrong status or actor.
pub async fn handle_decline_diplomacy(
    command: &DeclineDiplomacy,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let mut agreement = load_agreement(command.diplomacy_id, repo).await?;
    agreement.decline(
        command.actor_id,
        command.declined_at,
        command.correlation_id,
        clock,
    )?;
    append_uncommitted(&agreement, repo).await
}

/// Handles `EndDiplomacy`.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown agreement and a
/// rule violation for a wrong status or actor.
pub async fn handle_end_diplomacy(
    command: &EndDiplomacy,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let mut agreement = load_agreement(command.diplomacy_id, repo).await?;
    agreement.end(
        command.actor_id,
        command.ended_at,
        command.correlation_id,
        clock,
    )?;
    append_uncommitted(&agreement, repo).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexrealm_core::ids::{GameId, PlayerId};
    use hexrealm_core::timestamp::Timestamp;
    use hexrealm_event_store::InMemoryEventRepository;
    use hexrealm_test_support::{EmptyEventRepository, FixedClock, fixed_now};
    use uuid::Uuid;

    use crate::domain::aggregates::AgreementType;
    use crate::domain::events::{DIPLOMACY_ACCEPTED_EVENT_TYPE, DIPLOMACY_PROPOSED_EVENT_TYPE};

    fn at() -> Timestamp {
        Timestamp::from(fixed_now())
    }

    fn propose(initiator_id: PlayerId, target_id: PlayerId) -> ProposeDiplomacy {
        ProposeDiplomacy {
            correlation_id: Uuid::new_v4(),
            diplomacy_id: DiplomacyId::generate(),
            game_id: GameId::generate(),
            initiator_id,
            target_id,
            agreement_type: AgreementType::NonAggressionPact,
            proposed_at: at(),
        }
    }

    #[tokio::test]
    async fn test_propose_then_accept() {
        // Arrange
        let repo = InMemoryEventRepository::new();
        let clock = FixedClock::default();
        let (a, b) = (PlayerId::generate(), PlayerId::generate());
        let proposal = propose(a, b);

        // Act
        let proposed = handle_propose_diplomacy(&proposal, &clock, &repo)
            .await
            .unwrap();
        let accepted = handle_accept_diplomacy(
            &AcceptDiplomacy {
                correlation_id: Uuid::new_v4(),
                diplomacy_id: proposal.diplomacy_id,
                actor_id: b,
                accepted_at: at(),
            },
            &clock,
            &repo,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(proposed[0].event_type, DIPLOMACY_PROPOSED_EVENT_TYPE);
        assert_eq!(
            proposed[0].payload["DiplomacyProposed"]["agreement_type"],
            "NON_AGGRESSION_PACT"
        );
        assert_eq!(accepted[0].event_type, DIPLOMACY_ACCEPTED_EVENT_TYPE);
        assert_eq!(accepted[0].sequence_number, 2);
    }

    #[tokio::test]
    async fn test_reusing_an_agreement_id_is_rejected() {
        let repo = InMemoryEventRepository::new();
        let proposal = propose(PlayerId::generate(), PlayerId::generate());
        handle_propose_diplomacy(&proposal, &FixedClock::default(), &repo)
            .await
            .unwrap();

        let result = handle_propose_diplomacy(&proposal, &FixedClock::default(), &repo).await;

        match result.unwrap_err() {
            DomainError::RuleViolation(v) => assert_eq!(v.code, "agreement_already_exists"),
            other => panic!("expected RuleViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_end_unknown_agreement_is_not_found() {
        let diplomacy_id = DiplomacyId::generate();

        let result = handle_end_diplomacy(
            &EndDiplomacy {
                correlation_id: Uuid::new_v4(),
                diplomacy_id,
                actor_id: PlayerId::generate(),
                ended_at: at(),
            },
            &FixedClock::default(),
            &EmptyEventRepository,
        )
        .await;

        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, diplomacy_id.as_uuid()),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }
}
