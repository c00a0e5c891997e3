//! Store port - the interface the engine requires from durable storage
//!
//! The domain layer defines what it needs; the infrastructure layer
//! provides the implementation. Any append-only log, table, or file that
//! can append and scan in order satisfies this trait.

use async_trait::async_trait;

use crate::entities::{NewReaction, ReactionEvent};
use crate::error::DomainError;
use crate::value_objects::RoomId;

/// Result type for store operations
pub type StoreResult<T> = Result<T, DomainError>;

/// Append-only event store, the source of truth for every room
///
/// `append` must be safe under concurrent calls from any mix of rooms and
/// clients: no event may be lost or silently merged. There are no update
/// or delete operations.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Durably append one reaction, assigning its cursor and id
    ///
    /// Fails with [`DomainError::StoreUnavailable`] when the backend cannot
    /// accept the write; the caller retries the whole submit, the engine
    /// never counts speculatively.
    async fn append(&self, reaction: NewReaction) -> StoreResult<ReactionEvent>;

    /// Scan a room's events in append order, resumable from a cursor
    ///
    /// `since` is exclusive: only events with `seq > since` are returned.
    async fn list_by_room(
        &self,
        room_id: &RoomId,
        since: Option<u64>,
    ) -> StoreResult<Vec<ReactionEvent>>;
}
