//! `PostgreSQL` implementation of the `EventRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use hexrealm_core::error::DomainError;
use hexrealm_core::repository::{EventRepository, StoredEvent};

use crate::schema::CREATE_EVENTS_TABLE;

const UNIQUE_VIOLATION: &str = "23505";

const SELECT_COLUMNS: &str = "event_id, aggregate_id, event_type, payload, sequence_number, \
     correlation_id, causation_id, occurred_at";

/// PostgreSQL-backed event repository.
#[derive(Debug, Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    /// Creates a new `PgEventRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `domain_events` table and its indexes if missing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the DDL fails.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::raw_sql(CREATE_EVENTS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(infrastructure)?;
        Ok(())
    }
}

fn infrastructure(err: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("event store: {err}"))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}

fn row_to_stored_event(row: &PgRow) -> Result<StoredEvent, DomainError> {
    Ok(StoredEvent {
        event_id: row.try_get::<Uuid, _>("event_id").map_err(infrastructure)?,
        aggregate_id: row
            .try_get::<Uuid, _>("aggregate_id")
            .map_err(infrastructure)?,
        event_type: row
            .try_get::<String, _>("event_type")
            .map_err(infrastructure)?,
        payload: row
            .try_get::<serde_json::Value, _>("payload")
            .map_err(infrastructure)?,
        sequence_number: row
            .try_get::<i64, _>("sequence_number")
            .map_err(infrastructure)?,
        correlation_id: row
            .try_get::<Uuid, _>("correlation_id")
            .map_err(infrastructure)?,
        causation_id: row
            .try_get::<Uuid, _>("causation_id")
            .map_err(infrastructure)?,
        occurred_at: row
            .try_get::<DateTime<Utc>, _>("occurred_at")
            .map_err(infrastructure)?,
    })
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM domain_events \
             WHERE aggregate_id = $1 ORDER BY sequence_number ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(aggregate_id)
            .fetch_all(&self.pool)
            .await
            .map_err(infrastructure)?;
        rows.iter().map(row_to_stored_event).collect()
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        let actual: i64 = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT MAX(sequence_number) FROM domain_events WHERE aggregate_id = $1",
        )
        .bind(aggregate_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(infrastructure)?
        .unwrap_or(0);

        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        for event in events {
            let inserted = sqlx::query(
                "INSERT INTO domain_events \
                 (event_id, aggregate_id, event_type, payload, sequence_number, \
                  correlation_id, causation_id, occurred_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(event.event_id)
            .bind(event.aggregate_id)
            .bind(&event.event_type)
            .bind(&event.payload)
            .bind(event.sequence_number)
            .bind(event.correlation_id)
            .bind(event.causation_id)
            .bind(event.occurred_at)
            .execute(&mut *tx)
            .await;

            if let Err(err) = inserted {
                // A concurrent writer committed the same sequence number first.
                if is_unique_violation(&err) {
                    return Err(DomainError::ConcurrencyConflict {
                        aggregate_id,
                        expected: expected_version,
                        actual: event.sequence_number,
                    });
                }
                return Err(infrastructure(err));
            }
        }

        tx.commit().await.map_err(infrastructure)?;
        debug!(%aggregate_id, count = events.len(), "appended events");
        Ok(())
    }

    async fn load_all_events(&self) -> Result<Vec<StoredEvent>, DomainError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM domain_events ORDER BY global_position ASC");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(infrastructure)?;
        rows.iter().map(row_to_stored_event).collect()
    }
}
