//! Domain events for the Diplomacy context.

use hexrealm_core::event::{DomainEvent, EventMetadata};
use hexrealm_core::ids::{DiplomacyId, GameId, PlayerId};
use hexrealm_core::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

use super::aggregates::AgreementType;

/// Event type tag for [`DiplomacyProposed`].
pub const DIPLOMACY_PROPOSED_EVENT_TYPE: &str = "diplomacy.proposed";
/// Event type tag for [`DiplomacyAccepted`].
pub const DIPLOMACY_ACCEPTED_EVENT_TYPE: &str = "diplomacy.accepted";
/// Event type tag for [`DiplomacyDeclined`].
pub const DIPLOMACY_DECLINED_EVENT_TYPE: &str = "diplomacy.declined";
/// Event type tag for [`DiplomacyEnded`].
pub const DIPLOMACY_ENDED_EVENT_TYPE: &str = "diplomacy.ended";

/// Emitted when one player offers an agreement to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiplomacyProposed {
    /// The agreement identifier.
    pub diplomacy_id: DiplomacyId,
    /// Game both players are seated in.
    pub game_id: GameId,
    /// Proposing player.
    pub initiator_id: PlayerId,
    /// Player asked to respond.
    pub target_id: PlayerId,
    /// Kind of agreement.
    pub agreement_type: AgreementType,
    /// Caller-set time.
    pub proposed_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiplomacyAccepted {
    pub diplomacy_id: DiplomacyId,
    pub game_id: GameId,
    pub accepted_by: PlayerId,
    pub accepted_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiplomacyDeclined {
    pub diplomacy_id: DiplomacyId,
    pub game_id: GameId,
    pub declined_by: PlayerId,
    pub declined_at: Timestamp,
}

/// Emitted when either party ends an agreement in force.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiplomacyEnded {
    pub diplomacy_id: DiplomacyId,
    pub game_id: GameId,
    pub ended_by: PlayerId,
    pub ended_at: Timestamp,
}

/// Event payload variants for the Diplomacy context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiplomacyEventKind {
    /// An agreement has been proposed.
    DiplomacyProposed(DiplomacyProposed),
    /// An agreement has been accepted.
    DiplomacyAccepted(DiplomacyAccepted),
    /// An agreement has been declined.
    DiplomacyDeclined(DiplomacyDeclined),
    /// An agreement has been ended.
    DiplomacyEnded(DiplomacyEnded),
}

impl DiplomacyEventKind {
    /// Routing tag of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::DiplomacyProposed(_) => DIPLOMACY_PROPOSED_EVENT_TYPE,
            Self::DiplomacyAccepted(_) => DIPLOMACY_ACCEPTED_EVENT_TYPE,
            Self::DiplomacyDeclined(_) => DIPLOMACY_DECLINED_EVENT_TYPE,
            Self::DiplomacyEnded(_) => DIPLOMACY_ENDED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Diplomacy context.
#[derive(Debug, Clone)]
pub struct DiplomacyEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: DiplomacyEventKind,
}

impl DomainEvent for DiplomacyEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("DiplomacyEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
