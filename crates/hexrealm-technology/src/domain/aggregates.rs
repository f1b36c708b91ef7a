//! Aggregate roots for the Technology context.

use hexrealm_core::aggregate::AggregateRoot;
use hexrealm_core::clock::Clock;
use hexrealm_core::error::DomainError;
use hexrealm_core::event::EventMetadata;
use hexrealm_core::ids::{GameId, PlayerId, TechnologyId, derived_id};
use hexrealm_core::timestamp::Timestamp;
use uuid::Uuid;

use super::catalog::Technology;
use super::events::{
    SciencePointsWereGranted, TechnologyEvent, TechnologyEventKind, TechnologyTreeWasCreated,
    TechnologyWasDiscovered,
};
use super::policies::TechnologyManagementService;

/// A player's research progress.
///
/// Keyed by player, stored on a stream derived from the player id so it
/// never collides with the player's own stream.
#[derive(Debug)]
pub struct TechnologyTree {
    /// Owning player.
    pub player_id: PlayerId,
    /// Current version (event count).
    pub(crate) version: i64,
    pub(crate) game_id: Option<GameId>,
    pub(crate) unlocked: Vec<TechnologyId>,
    pub(crate) science_points: u32,
    uncommitted_events: Vec<TechnologyEvent>,
}

impl TechnologyTree {
    /// Stream identifier of a player's research tree.
    #[must_use]
    pub fn stream_id(player_id: PlayerId) -> Uuid {
        derived_id(player_id.as_uuid(), "technology-tree")
    }

    /// Creates an empty tree ready for replay.
    #[must_use]
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            version: 0,
            game_id: None,
            unlocked: Vec::new(),
            science_points: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// Discovered technologies in discovery order.
    #[must_use]
    pub fn unlocked(&self) -> &[TechnologyId] {
        &self.unlocked
    }

    #[must_use]
    pub fn science_points(&self) -> u32 {
        self.science_points
    }

    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn record(&mut self, kind: TechnologyEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let metadata = EventMetadata::new(
            kind.event_type(),
            Self::stream_id(self.player_id),
            self.next_sequence_number(),
            correlation_id,
            clock.now(),
        );
        self.uncommitted_events.push(TechnologyEvent { metadata, kind });
    }

    fn ensure_exists(&self) -> Result<(), DomainError> {
        if self.exists() {
            Ok(())
        } else {
            Err(DomainError::AggregateNotFound(self.player_id.as_uuid()))
        }
    }

    /// Opens the tree. Does nothing if it already exists.
    pub fn create(
        &mut self,
        game_id: GameId,
        initial_science_points: u32,
        created_at: Timestamp,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) {
        if self.exists() || !self.uncommitted_events.is_empty() {
            return;
        }
        let kind = TechnologyEventKind::TechnologyTreeWasCreated(TechnologyTreeWasCreated {
            player_id: self.player_id,
            game_id,
            initial_science_points,
            created_at,
        });
        self.record(kind, correlation_id, clock);
    }

    /// Credits science points.
    ///
    /// # Errors
    ///
    /// Returns `AggregateNotFound` for a missing tree and `Validation` for a
    /// zero amount.
    pub fn grant_science_points(
        &mut self,
        amount: u32,
        granted_at: Timestamp,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_exists()?;
        if amount == 0 {
            return Err(DomainError::Validation(
                "science points granted must be positive".to_owned(),
            ));
        }
        let kind = TechnologyEventKind::SciencePointsWereGranted(SciencePointsWereGranted {
            player_id: self.player_id,
            amount,
            granted_at,
        });
        self.record(kind, correlation_id, clock);
        Ok(())
    }

    /// Researches `technology`, paying its cost.
    ///
    /// # Errors
    ///
    /// Returns `AggregateNotFound` for a missing tree, or the first rule
    /// from `TechnologyManagementService::validate_discovery` that fails.
    pub fn discover(
        &mut self,
        technology: &Technology,
        discovered_at: Timestamp,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_exists()?;
        TechnologyManagementService::validate_discovery(
            technology,
            &self.unlocked,
            self.science_points,
        )?;
        let kind = TechnologyEventKind::TechnologyWasDiscovered(TechnologyWasDiscovered {
            player_id: self.player_id,
            technology_id: technology.id,
            cost: technology.cost,
            discovered_at,
        });
        self.record(kind, correlation_id, clock);
        Ok(())
    }
}

impl AggregateRoot for TechnologyTree {
    type Event = TechnologyEvent;

    fn aggregate_id(&self) -> Uuid {
        Self::stream_id(self.player_id)
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            TechnologyEventKind::TechnologyTreeWasCreated(payload) => {
                self.game_id = Some(payload.game_id);
                self.science_points = payload.initial_science_points;
            }
            TechnologyEventKind::SciencePointsWereGranted(payload) => {
                self.science_points = self.science_points.saturating_add(payload.amount);
            }
            TechnologyEventKind::TechnologyWasDiscovered(payload) => {
                self.science_points = self.science_points.saturating_sub(payload.cost);
                if !self.unlocked.contains(&payload.technology_id) {
                    self.unlocked.push(payload.technology_id);
                }
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
    use crate::domain::catalog::{find_technology, technology_id};
    use hexrealm_test_support::{FixedClock, fixed_now};

    fn at() -> Timestamp {
        Timestamp::from(fixed_now())
    }

    fn tech(slug: &str) -> &'static Technology {
        find_technology(technology_id(slug)).unwrap()
    }

    fn commit(tree: &mut TechnologyTree) -> Vec<TechnologyEvent> {
        let events = tree.uncommitted_events().to_vec();
        tree.clear_uncommitted_events();
        for event in &events {
            tree.apply(event);
        }
        events
    }

    fn opened(points: u32) -> TechnologyTree {
        let mut tree = TechnologyTree::new(PlayerId::generate());
        tree.create(GameId::generate(), points, at(), Uuid::new_v4(), &FixedClock::default());
        commit(&mut tree);
        tree
    }

    #[test]
    fn test_tree_stream_differs_from_player_stream() {
        let player_id = PlayerId::generate();

        let tree = TechnologyTree::new(player_id);

        assert_ne!(tree.aggregate_id(), player_id.as_uuid());
        assert_eq!(tree.aggregate_id(), TechnologyTree::stream_id(player_id));
    }

    #[test]
    fn test_create_is_idempotent() {
        let mut tree = opened(0);

        tree.create(GameId::generate(), 50, at(), Uuid::new_v4(), &FixedClock::default());

        assert!(tree.uncommitted_events().is_empty());
        assert_eq!(tree.science_points(), 0);
    }

    #[test]
    fn test_discovery_debits_cost_and_records_order() {
        // Arrange
        let mut tree = opened(0);
        let clock = FixedClock::default();
        tree.grant_science_points(40, at(), Uuid::new_v4(), &clock).unwrap();
        commit(&mut tree);

        // Act
        tree.discover(tech("agriculture"), at(), Uuid::new_v4(), &clock).unwrap();
        commit(&mut tree);
        tree.discover(tech("writing"), at(), Uuid::new_v4(), &clock).unwrap();
        let events = commit(&mut tree);

        // Assert
        assert_eq!(tree.science_points(), 10);
        assert_eq!(
            tree.unlocked(),
            &[technology_id("agriculture"), technology_id("writing")]
        );
        assert_eq!(events[0].metadata.sequence_number, 4);
    }

    #[test]
    fn test_discovery_without_points_is_refused() {
        let mut tree = opened(9);

        let result = tree.discover(tech("agriculture"), at(), Uuid::new_v4(), &FixedClock::default());

        match result.unwrap_err() {
            DomainError::RuleViolation(v) => assert_eq!(v.code, "insufficient_resources"),
            other => panic!("expected RuleViolation, got {other:?}"),
        }
        assert!(tree.uncommitted_events().is_empty());
    }

    #[test]
    fn test_granting_into_a_missing_tree_is_not_found() {
        let player_id = PlayerId::generate();
        let mut tree = TechnologyTree::new(player_id);

        let result = tree.grant_science_points(5, at(), Uuid::new_v4(), &FixedClock::default());

        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, player_id.as_uuid()),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }
}
