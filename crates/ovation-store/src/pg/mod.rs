//! PostgreSQL implementation of the event store
//!
//! A single append-only table; `seq` is a BIGSERIAL so append order is
//! assigned by the database and concurrent appends from unrelated rooms
//! never contend on anything but the sequence.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use ovation_core::{
    DomainError, EventStore, NewReaction, ReactionEvent, Recipient, RoomId, StoreResult,
};

use crate::models::ReactionRow;

/// Embedded migrations for the `reactions` table
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Run pending migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Convert a SQLx error into the domain's store error
fn map_db_error(e: sqlx::Error) -> DomainError {
    DomainError::StoreUnavailable(e.to_string())
}

/// PostgreSQL implementation of [`EventStore`]
#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    /// Create a new PgEventStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    #[instrument(skip(self, reaction), fields(room_id = %reaction.room_id))]
    async fn append(&self, reaction: NewReaction) -> StoreResult<ReactionEvent> {
        let row = sqlx::query_as::<_, ReactionRow>(
            r#"
            INSERT INTO reactions (event_id, room_id, kind, recipient_name, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING seq, event_id, room_id, kind, recipient_name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(reaction.room_id.as_str())
        .bind(reaction.kind.as_str())
        .bind(reaction.recipient.as_ref().map(Recipient::as_str))
        .bind(reaction.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        ReactionEvent::try_from(row)
    }

    #[instrument(skip(self))]
    async fn list_by_room(
        &self,
        room_id: &RoomId,
        since: Option<u64>,
    ) -> StoreResult<Vec<ReactionEvent>> {
        let rows = sqlx::query_as::<_, ReactionRow>(
            r#"
            SELECT seq, event_id, room_id, kind, recipient_name, created_at
            FROM reactions
            WHERE room_id = $1 AND seq > $2
            ORDER BY seq
            "#,
        )
        .bind(room_id.as_str())
        .bind(since.unwrap_or(0) as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(ReactionEvent::try_from).collect()
    }
}
