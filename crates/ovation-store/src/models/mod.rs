//! Reaction database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use ovation_core::{DomainError, ReactionEvent, Recipient, RoomId};

/// Database model for the `reactions` table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionRow {
    pub seq: i64,
    pub event_id: Uuid,
    pub room_id: String,
    pub kind: String,
    pub recipient_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReactionRow> for ReactionEvent {
    type Error = DomainError;

    fn try_from(row: ReactionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            seq: row.seq as u64,
            event_id: row.event_id,
            room_id: RoomId::parse(&row.room_id)?,
            kind: row.kind.parse()?,
            recipient: Recipient::normalize(row.recipient_name.as_deref())?,
            created_at: row.created_at,
        })
    }
}
