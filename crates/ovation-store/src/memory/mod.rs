//! In-memory implementation of the event store
//!
//! Backs tests and database-less single-node deployments. Counts survive
//! only as long as the process; the interface contract (cursor assignment,
//! per-room append order, outage signalling) matches the durable backend.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use uuid::Uuid;

use ovation_core::{DomainError, EventStore, NewReaction, ReactionEvent, RoomId, StoreResult};

/// In-memory append-only log, keyed by room
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    rooms: RwLock<HashMap<RoomId, Vec<ReactionEvent>>>,
    next_seq: AtomicU64,
    unavailable: AtomicBool,
}

impl MemoryEventStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the simulated outage used by failure-path tests
    ///
    /// While unavailable, both `append` and `list_by_room` fail with
    /// `StoreUnavailable`, mirroring a dead database.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Total number of events across all rooms
    pub fn event_count(&self) -> usize {
        self.rooms.read().values().map(Vec::len).sum()
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::StoreUnavailable(
                "memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn append(&self, reaction: NewReaction) -> StoreResult<ReactionEvent> {
        self.check_available()?;

        let mut rooms = self.rooms.write();
        // Cursor assignment happens under the write lock so a room's log
        // is always in seq order.
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let event = ReactionEvent {
            seq,
            event_id: Uuid::new_v4(),
            room_id: reaction.room_id.clone(),
            kind: reaction.kind,
            recipient: reaction.recipient,
            created_at: reaction.created_at,
        };

        rooms.entry(reaction.room_id).or_default().push(event.clone());
        Ok(event)
    }

    async fn list_by_room(
        &self,
        room_id: &RoomId,
        since: Option<u64>,
    ) -> StoreResult<Vec<ReactionEvent>> {
        self.check_available()?;

        let since = since.unwrap_or(0);
        let rooms = self.rooms.read();
        Ok(rooms
            .get(room_id)
            .map(|events| {
                events
                    .iter()
                    .filter(|e| e.seq > since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
