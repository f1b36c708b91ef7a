//! In-process implementation of the `EventRepository` trait.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use hexrealm_core::error::DomainError;
use hexrealm_core::repository::{EventRepository, StoredEvent};

#[derive(Debug, Default)]
struct Inner {
    streams: HashMap<Uuid, Vec<StoredEvent>>,
    log: Vec<StoredEvent>,
}

/// Event repository holding every stream in memory.
///
/// Used when no database is configured and throughout the test suites.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    inner: Mutex<Inner>,
}

impl InMemoryEventRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events across all streams.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .log
            .len()
    }

    /// Returns `true` if nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.streams.get(&aggregate_id).cloned().unwrap_or_default())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let stream = inner.streams.entry(aggregate_id).or_default();

        #[allow(clippy::cast_possible_wrap)]
        let actual = stream.len() as i64;
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        stream.extend_from_slice(events);
        inner.log.extend_from_slice(events);
        Ok(())
    }

    async fn load_all_events(&self) -> Result<Vec<StoredEvent>, DomainError> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.log.clone())
    }
}
