//! Subscriber-side types
//!
//! A `Subscription` is the receiving half of one subscriber's bounded
//! delivery queue, paired with the opaque handle used to leave.

use tokio::sync::mpsc;
use uuid::Uuid;

use ovation_core::{AggregateDelta, RoomId};

/// Opaque handle identifying one subscriber of one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberHandle {
    room_id: RoomId,
    id: Uuid,
}

impl SubscriberHandle {
    pub(crate) fn new(room_id: RoomId, id: Uuid) -> Self {
        Self { room_id, id }
    }

    /// The room this subscriber belongs to
    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// The subscriber's unique id
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// A live subscription to one room's delta stream
///
/// Deltas arrive in room apply order. When `recv` returns `None` the
/// stream has ended for good - the subscriber left, the process is
/// shutting down, or the queue overflowed and the hub dropped it. The
/// only way back to a consistent view is a fresh `join`.
pub struct Subscription {
    handle: SubscriberHandle,
    rx: mpsc::Receiver<AggregateDelta>,
}

impl Subscription {
    pub(crate) fn new(handle: SubscriberHandle, rx: mpsc::Receiver<AggregateDelta>) -> Self {
        Self { handle, rx }
    }

    /// The handle used to `leave` this subscription
    #[must_use]
    pub fn handle(&self) -> &SubscriberHandle {
        &self.handle
    }

    /// The room this subscription belongs to
    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        self.handle.room_id()
    }

    /// Receive the next delta, in apply order
    pub async fn recv(&mut self) -> Option<AggregateDelta> {
        self.rx.recv().await
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("handle", &self.handle)
            .finish()
    }
}
