//! Aggregate roots for the Unit context.

use hexrealm_core::aggregate::AggregateRoot;
use hexrealm_core::clock::Clock;
use hexrealm_core::error::DomainError;
use hexrealm_core::event::EventMetadata;
use hexrealm_core::health::Health;
use hexrealm_core::ids::{GameId, PlayerId, UnitId};
use hexrealm_core::position::Position;
use hexrealm_core::timestamp::Timestamp;
use hexrealm_core::unit_type::UnitType;
use uuid::Uuid;

use super::combat::{Attacker, damage, hex_steps};
use super::errors::UnitRuleError;
use super::events::{
    UnitEvent, UnitEventKind, UnitWasAttacked, UnitWasCreated, UnitWasDestroyed, UnitWasMoved,
};

/// State fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Enlistment {
    pub owner_id: PlayerId,
    pub game_id: GameId,
    pub unit_type: UnitType,
}

/// The aggregate root for a unit.
#[derive(Debug)]
pub struct Unit {
    /// Aggregate identifier.
    pub id: UnitId,
    /// Current version (event count).
    pub(crate) version: i64,
    pub(crate) enlistment: Option<Enlistment>,
    pub(crate) position: Option<Position>,
    pub(crate) health: Option<Health>,
    pub(crate) is_dead: bool,
    uncommitted_events: Vec<UnitEvent>,
}

impl Unit {
    /// Creates an empty unit aggregate ready for replay.
    #[must_use]
    pub fn new(id: UnitId) -> Self {
        Self {
            id,
            version: 0,
            enlistment: None,
            position: None,
            health: None,
            is_dead: false,
            uncommitted_events: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    #[must_use]
    pub fn health(&self) -> Option<Health> {
        self.health
    }

    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn record(&mut self, kind: UnitEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let metadata = EventMetadata::new(
            kind.event_type(),
            self.id.as_uuid(),
            self.next_sequence_number(),
            correlation_id,
            clock.now(),
        );
        self.uncommitted_events.push(UnitEvent { metadata, kind });
    }

    fn living(&self) -> Result<(Enlistment, Position), DomainError> {
        if self.is_dead {
            return Err(UnitRuleError::UnitIsDead(self.id).into());
        }
        match (self.enlistment, self.position) {
            (Some(enlistment), Some(position)) => Ok((enlistment, position)),
            _ => Err(DomainError::AggregateNotFound(self.id.as_uuid())),
        }
    }

    /// Creates the unit at full health. Does nothing if it already exists.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &mut self,
        owner_id: PlayerId,
        game_id: GameId,
        unit_type: UnitType,
        position: Position,
        created_at: Timestamp,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) {
        if self.exists() || !self.uncommitted_events.is_empty() {
            return;
        }
        let kind = UnitEventKind::UnitWasCreated(UnitWasCreated {
            unit_id: self.id,
            owner_id,
            game_id,
            unit_type,
            position,
            health: Health::full(unit_type.stats().max_health),
            created_at,
        });
        self.record(kind, correlation_id, clock);
    }

    /// Moves the unit within its movement range.
    ///
    /// # Errors
    ///
    /// Returns `UnitIsDead`, `AlreadyAtPosition`, `OutOfMovementRange` or
    /// `PositionOccupied`.
    pub fn move_to(
        &mut self,
        to: Position,
        occupied_positions: &[Position],
        moved_at: Timestamp,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let (enlistment, from) = self.living()?;
        if from == to {
            return Err(UnitRuleError::AlreadyAtPosition(to).into());
        }
        let distance = hex_steps(from, to);
        let range = enlistment.unit_type.stats().movement_range;
        if distance > range {
            return Err(UnitRuleError::OutOfMovementRange { distance, range }.into());
        }
        if occupied_positions.contains(&to) {
            return Err(UnitRuleError::PositionOccupied(to).into());
        }
        let kind = UnitEventKind::UnitWasMoved(UnitWasMoved {
            unit_id: self.id,
            owner_id: enlistment.owner_id,
            game_id: enlistment.game_id,
            from,
            to,
            moved_at,
        });
        self.record(kind, correlation_id, clock);
        Ok(())
    }

    /// Describes this unit as an attacker.
    ///
    /// # Errors
    ///
    /// Returns `UnitIsDead` or `AggregateNotFound`.
    pub fn as_attacker(&self) -> Result<Attacker, DomainError> {
        let (enlistment, position) = self.living()?;
        Ok(Attacker {
            unit_id: self.id,
            owner_id: enlistment.owner_id,
            game_id: enlistment.game_id,
            unit_type: enlistment.unit_type,
            position,
        })
    }

    /// Resolves a strike against this unit. A lethal strike also records
    /// the unit's destruction.
    ///
    /// # Errors
    ///
    /// Returns `UnitIsDead`, `FriendlyFire`, `OutOfAttackRange`, or
    /// `Validation` when the units are in different games.
    pub fn receive_attack(
        &mut self,
        attacker: &Attacker,
        attacked_at: Timestamp,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let (enlistment, position) = self.living()?;
        if attacker.game_id != enlistment.game_id {
            return Err(DomainError::Validation(format!(
                "unit {} and unit {} are not in the same game",
                attacker.unit_id, self.id
            )));
        }
        if attacker.unit_id == self.id || attacker.owner_id == enlistment.owner_id {
            return Err(UnitRuleError::FriendlyFire.into());
        }
        let distance = hex_steps(attacker.position, position);
        let range = attacker.unit_type.attack_range();
        if distance > range {
            return Err(UnitRuleError::OutOfAttackRange { distance, range }.into());
        }

        let dealt = damage(attacker.unit_type, enlistment.unit_type);
        let remaining = self
            .health
            .unwrap_or_else(|| Health::full(enlistment.unit_type.stats().max_health))
            .take_damage(dealt);
        let was_destroyed = remaining.is_depleted();
        self.record(
            UnitEventKind::UnitWasAttacked(UnitWasAttacked {
                unit_id: self.id,
                attacker_id: attacker.unit_id,
                damage: dealt,
                remaining_health: remaining.current(),
                was_destroyed,
                attacked_at,
            }),
            correlation_id,
            clock,
        );
        if was_destroyed {
            self.record(
                UnitEventKind::UnitWasDestroyed(UnitWasDestroyed {
                    unit_id: self.id,
                    owner_id: enlistment.owner_id,
                    game_id: enlistment.game_id,
                    destroyed_at: attacked_at,
                }),
                correlation_id,
                clock,
            );
        }
        Ok(())
    }

    /// Marks the unit dead. Does nothing if it already is.
    ///
    /// # Errors
    ///
    /// Returns `AggregateNotFound` if the unit was never created.
    pub fn destroy(
        &mut self,
        destroyed_at: Timestamp,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.is_dead {
            return Ok(());
        }
        let Some(enlistment) = self.enlistment else {
            return Err(DomainError::AggregateNotFound(self.id.as_uuid()));
        };
        let kind = UnitEventKind::UnitWasDestroyed(UnitWasDestroyed {
            unit_id: self.id,
            owner_id: enlistment.owner_id,
            game_id: enlistment.game_id,
            destroyed_at,
        });
        self.record(kind, correlation_id, clock);
        Ok(())
    }
}

impl AggregateRoot for Unit {
    type Event = UnitEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id.as_uuid()
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            UnitEventKind::UnitWasCreated(payload) => {
                self.enlistment = Some(Enlistment {
                    owner_id: payload.owner_id,
                    game_id: payload.game_id,
                    unit_type: payload.unit_type,
                });
                self.position = Some(payload.position);
                self.health = Some(payload.health);
            }
            UnitEventKind::UnitWasMoved(payload) => {
                self.position = Some(payload.to);
            }
            UnitEventKind::UnitWasAttacked(payload) => {
                if let Some(health) = self.health {
                    let lost = health.current().saturating_sub(payload.remaining_health);
                    self.health = Some(health.take_damage(lost));
                }
                if payload.was_destroyed {
                    self.is_dead = true;
                }
            }
            UnitEventKind::UnitWasDestroyed(_) => {
                self.is_dead = true;
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
