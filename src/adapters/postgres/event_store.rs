//! PostgreSQL implementation of EventStore.
//!
//! One row per domain event in `domain_events`. Status transitions are
//! guarded by `status = 'pending'` so a late or repeated verdict never
//! overwrites a terminal row.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    DomainError, ErrorCode, EventEnvelope, EventId, EventMetadata, Timestamp,
};
use crate::ports::{EventStatus, EventStore, StoredEvent};

/// PostgreSQL implementation of EventStore.
#[derive(Clone)]
pub struct PostgresEventStore {
    pool: PgPool,
}

impl PostgresEventStore {
    /// Creates a new PostgresEventStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT event_id, event_type, aggregate_id, aggregate_type, occurred_at,
           payload, metadata, status, created_at, processed_at, result
    FROM domain_events
"#;

#[async_trait]
impl EventStore for PostgresEventStore {
    async fn insert_pending(&self, event: &StoredEvent) -> Result<(), DomainError> {
        let metadata = serde_json::to_value(&event.event.metadata)?;

        sqlx::query(
            r#"
            INSERT INTO domain_events (
                event_id, event_type, aggregate_id, aggregate_type, occurred_at,
                payload, metadata, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(event.id().as_str())
        .bind(&event.event.event_type)
        .bind(&event.event.aggregate_id)
        .bind(&event.event.aggregate_type)
        .bind(event.event.occurred_at.as_datetime())
        .bind(&event.event.payload)
        .bind(metadata)
        .bind(event.status.as_str())
        .bind(event.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert domain event", e))?;

        Ok(())
    }

    async fn update_status(
        &self,
        id: &EventId,
        status: EventStatus,
        processed_at: Timestamp,
        result: Option<&str>,
    ) -> Result<(), DomainError> {
        let outcome = sqlx::query(
            r#"
            UPDATE domain_events SET
                status = $2,
                processed_at = $3,
                result = $4
            WHERE event_id = $1 AND status = 'pending'
            "#,
        )
        .bind(id.as_str())
        .bind(status.as_str())
        .bind(processed_at.as_datetime())
        .bind(result)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update domain event status", e))?;

        if outcome.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::EventNotFound,
                format!("Pending event not found: {}", id),
            ));
        }

        Ok(())
    }

    async fn find_pending(&self) -> Result<Vec<StoredEvent>, DomainError> {
        let rows = sqlx::query(&format!(
            "{} WHERE status = 'pending' ORDER BY created_at ASC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch pending events", e))?;

        rows.into_iter().map(row_to_stored_event).collect()
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<StoredEvent>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE event_id = $1", SELECT_COLUMNS))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch domain event", e))?;

        row.map(row_to_stored_event).transpose()
    }

    async fn find_by_status(
        &self,
        status: EventStatus,
        limit: u32,
    ) -> Result<Vec<StoredEvent>, DomainError> {
        let rows = sqlx::query(&format!(
            "{} WHERE status = $1 ORDER BY created_at ASC LIMIT $2",
            SELECT_COLUMNS
        ))
        .bind(status.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch events by status", e))?;

        rows.into_iter().map(row_to_stored_event).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn column<'r, T>(row: &'r sqlx::postgres::PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::database(&format!("Failed to get {}", name), e))
}

fn row_to_stored_event(row: sqlx::postgres::PgRow) -> Result<StoredEvent, DomainError> {
    let metadata: serde_json::Value = column(&row, "metadata")?;
    let metadata: EventMetadata = serde_json::from_value(metadata)?;
    let status: String = column(&row, "status")?;
    let occurred_at: chrono::DateTime<chrono::Utc> = column(&row, "occurred_at")?;
    let created_at: chrono::DateTime<chrono::Utc> = column(&row, "created_at")?;
    let processed_at: Option<chrono::DateTime<chrono::Utc>> = column(&row, "processed_at")?;
    let event_id: String = column(&row, "event_id")?;

    let event = EventEnvelope {
        event_id: EventId::from_string(event_id),
        event_type: column(&row, "event_type")?,
        aggregate_id: column(&row, "aggregate_id")?,
        aggregate_type: column(&row, "aggregate_type")?,
        occurred_at: Timestamp::from_datetime(occurred_at),
        payload: column(&row, "payload")?,
        metadata,
    };

    Ok(StoredEvent {
        event,
        status: status.parse()?,
        created_at: Timestamp::from_datetime(created_at),
        processed_at: processed_at.map(Timestamp::from_datetime),
        result: column(&row, "result")?,
    })
}
