//! Diplomacy read model.

use std::collections::HashMap;
use std::sync::RwLock;

use hexrealm_core::error::DomainError;
use hexrealm_core::ids::{DiplomacyId, GameId, PlayerId};
use hexrealm_core::projection::{Checkpoints, Projection, read_view, write_view};
use hexrealm_core::repository::StoredEvent;
use hexrealm_core::timestamp::Timestamp;
use serde::Serialize;

use crate::domain::aggregates::{AgreementType, DiplomacyStatus};
use crate::domain::events::{
    DIPLOMACY_ACCEPTED_EVENT_TYPE, DIPLOMACY_DECLINED_EVENT_TYPE, DIPLOMACY_ENDED_EVENT_TYPE,
    DIPLOMACY_PROPOSED_EVENT_TYPE, DiplomacyEventKind,
};

/// Read-only view of an agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiplomacyView {
    pub diplomacy_id: DiplomacyId,
    pub game_id: GameId,
    pub initiator_id: PlayerId,
    pub target_id: PlayerId,
    pub agreement_type: AgreementType,
    pub status: DiplomacyStatus,
    pub proposed_at: Timestamp,
    pub accepted_at: Option<Timestamp>,
    pub declined_at: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
}

impl DiplomacyView {
    /// `true` if the agreement is between `a` and `b`, in either direction.
    #[must_use]
    pub fn is_between(&self, a: PlayerId, b: PlayerId) -> bool {
        (self.initiator_id == a && self.target_id == b)
            || (self.initiator_id == b && self.target_id == a)
    }
}

#[derive(Debug, Default)]
struct DiplomacyTable {
    /// Agreements with the order they were first projected in.
    agreements: HashMap<DiplomacyId, (u64, DiplomacyView)>,
    next_order: u64,
    checkpoints: Checkpoints,
}

/// Projection of every agreement.
#[derive(Debug, Default)]
pub struct DiplomacyProjection {
    table: RwLock<DiplomacyTable>,
}

impl DiplomacyProjection {
    /// Creates an empty projection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, diplomacy_id: DiplomacyId) -> Option<DiplomacyView> {
        read_view(&self.table)
            .agreements
            .get(&diplomacy_id)
            .map(|(_, view)| view.clone())
    }

    /// Agreements of a game in proposal order.
    #[must_use]
    pub fn by_game(&self, game_id: GameId) -> Vec<DiplomacyView> {
        let table = read_view(&self.table);
        let mut rows: Vec<&(u64, DiplomacyView)> = table
            .agreements
            .values()
            .filter(|(_, view)| view.game_id == game_id)
            .collect();
        rows.sort_by_key(|(order, _)| *order);
        rows.into_iter().map(|(_, view)| view.clone()).collect()
    }

    /// Most recently proposed agreement between two players of a game.
    #[must_use]
    pub fn latest_between(&self, game_id: GameId, a: PlayerId, b: PlayerId) -> Option<DiplomacyView> {
        self.by_game(game_id)
            .into_iter()
            .rev()
            .find(|view| view.is_between(a, b))
    }
}

impl Projection for DiplomacyProjection {
    fn name(&self) -> &'static str {
        "diplomacy"
    }

    fn event_types(&self) -> &'static [&'static str] {
        &[
            DIPLOMACY_PROPOSED_EVENT_TYPE,
            DIPLOMACY_ACCEPTED_EVENT_TYPE,
            DIPLOMACY_DECLINED_EVENT_TYPE,
            DIPLOMACY_ENDED_EVENT_TYPE,
        ]
    }

    fn apply(&self, event: &StoredEvent) -> Result<(), DomainError> {
        let kind = event.decode::<DiplomacyEventKind>()?;
        let mut table = write_view(&self.table);
        if !table.checkpoints.is_new(event) {
            return Ok(());
        }
        match kind {
            DiplomacyEventKind::DiplomacyProposed(proposed) => {
                let order = table.next_order;
                table.next_order += 1;
                table.agreements.insert(
                    proposed.diplomacy_id,
                    (
                        order,
                        DiplomacyView {
                            diplomacy_id: proposed.diplomacy_id,
                            game_id: proposed.game_id,
                            initiator_id: proposed.initiator_id,
                            target_id: proposed.target_id,
                            agreement_type: proposed.agreement_type,
                            status: DiplomacyStatus::Proposed,
                            proposed_at: proposed.proposed_at,
                            accepted_at: None,
                            declined_at: None,
                            ended_at: None,
                        },
                    ),
                );
            }
            DiplomacyEventKind::DiplomacyAccepted(accepted) => {
                if let Some((_, view)) = table.agreements.get_mut(&accepted.diplomacy_id) {
                    view.status = DiplomacyStatus::Accepted;
                    view.accepted_at = Some(accepted.accepted_at);
                }
            }
            DiplomacyEventKind::DiplomacyDeclined(declined) => {
                if let Some((_, view)) = table.agreements.get_mut(&declined.diplomacy_id) {
                    view.status = DiplomacyStatus::Declined;
                    view.declined_at = Some(declined.declined_at);
                }
            }
            DiplomacyEventKind::DiplomacyEnded(ended) => {
                if let Some((_, view)) = table.agreements.get_mut(&ended.diplomacy_id) {
                    view.status = DiplomacyStatus::Ended;
                    view.ended_at = Some(ended.ended_at);
                }
            }
        }
        table.checkpoints.record(event);
        Ok(())
    }
}
