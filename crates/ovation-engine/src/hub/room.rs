//! Per-room state
//!
//! One `RoomState` per room, guarded by the hub's per-room mutex. Holds the
//! in-memory aggregate and the set of subscriber delivery queues.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use uuid::Uuid;

use ovation_core::{AggregateDelta, RoomAggregate, RoomId};

/// In-memory state for one room
pub(crate) struct RoomState {
    pub(crate) aggregate: RoomAggregate,
    /// True once the aggregate has been rebuilt from the store
    pub(crate) hydrated: bool,
    pub(crate) subscribers: HashMap<Uuid, mpsc::Sender<AggregateDelta>>,
    last_activity: Instant,
}

impl RoomState {
    pub(crate) fn new() -> Self {
        Self {
            aggregate: RoomAggregate::new(),
            hydrated: false,
            subscribers: HashMap::new(),
            last_activity: Instant::now(),
        }
    }

    /// Record activity (an event or a membership change)
    pub(crate) fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// How long the room has been without activity
    pub(crate) fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }

    /// Deliver a delta to every subscriber queue
    ///
    /// Delivery is `try_send` per queue: a full queue means that subscriber
    /// is too slow to keep its stream consistent, so it is dropped and must
    /// rejoin for a fresh snapshot. One slow subscriber never blocks the
    /// rest. Returns the number of successful deliveries.
    pub(crate) fn fan_out(&mut self, room_id: &RoomId, delta: &AggregateDelta) -> usize {
        self.subscribers.retain(|id, tx| match tx.try_send(delta.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(
                    room_id = %room_id,
                    subscriber = %id,
                    "subscriber queue overflow, dropping stream"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(
                    room_id = %room_id,
                    subscriber = %id,
                    "subscriber gone, removing"
                );
                false
            }
        });

        // Survivors are exactly the queues that accepted the delta
        self.subscribers.len()
    }
}
