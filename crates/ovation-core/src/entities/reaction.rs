//! Reaction event - a single append-only interaction record
//!
//! Events are immutable once written: there are no update or delete
//! operations anywhere in the system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::value_objects::{Recipient, RoomId};

/// Kind of reaction a client can send
///
/// Only claps exist today; the discriminator is stored with every event so
/// adding a kind never requires a schema change. Kinds do not partition
/// aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    #[default]
    Clap,
}

impl ReactionKind {
    /// Stable storage representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clap => "clap",
        }
    }
}

impl std::fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clap" => Ok(Self::Clap),
            other => Err(DomainError::UnknownReactionKind(other.to_string())),
        }
    }
}

/// A reaction event as recorded by the event store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionEvent {
    /// Store-assigned append cursor, strictly increasing per room
    pub seq: u64,
    /// Opaque unique id
    pub event_id: Uuid,
    pub room_id: RoomId,
    pub kind: ReactionKind,
    /// Absent means the reaction counts toward the room total only
    pub recipient: Option<Recipient>,
    pub created_at: DateTime<Utc>,
}

impl ReactionEvent {
    /// Check whether the reaction is addressed to a named recipient
    #[inline]
    pub fn is_addressed(&self) -> bool {
        self.recipient.is_some()
    }
}

/// A reaction that has not yet been appended to the store
///
/// The store assigns `seq` and `event_id` on append.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReaction {
    pub room_id: RoomId,
    pub kind: ReactionKind,
    pub recipient: Option<Recipient>,
    pub created_at: DateTime<Utc>,
}

impl NewReaction {
    /// Create a new reaction stamped with the current time
    pub fn new(room_id: RoomId, kind: ReactionKind, recipient: Option<Recipient>) -> Self {
        Self {
            room_id,
            kind,
            recipient,
            created_at: Utc::now(),
        }
    }
}
