//! Read-model projection abstraction.
//!
//! A projection folds events of the types it subscribes to into its own
//! storage. Delivery is at-least-once, so every projection keeps a
//! per-stream checkpoint and ignores events it has already applied.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::error::DomainError;
use crate::repository::StoredEvent;

/// A consumer that builds one read model from the event stream.
pub trait Projection: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Event types this projection consumes. Read once when the engine
    /// builds its routing table.
    fn event_types(&self) -> &'static [&'static str];

    /// Applies one event as a single atomic update of the read model.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the payload cannot be decoded.
    fn apply(&self, event: &StoredEvent) -> Result<(), DomainError>;
}

/// Last applied sequence number per aggregate stream.
#[derive(Debug, Default)]
pub struct Checkpoints {
    last_applied: HashMap<Uuid, i64>,
}

impl Checkpoints {
    /// Returns `true` if `event` is newer than anything applied for its stream.
    #[must_use]
    pub fn is_new(&self, event: &StoredEvent) -> bool {
        self.last_applied
            .get(&event.aggregate_id)
            .is_none_or(|last| event.sequence_number > *last)
    }

    /// Records `event` as applied.
    pub fn record(&mut self, event: &StoredEvent) {
        self.last_applied
            .insert(event.aggregate_id, event.sequence_number);
    }
}

/// Acquires a read guard, recovering the data if a writer panicked.
pub fn read_view<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

/// Acquires a write guard, recovering the data if a writer panicked.
pub fn write_view<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
