//! Room hub
//!
//! Owns every room's in-memory state and subscriber set. The hub is the
//! single write path: `submit` appends to the event store, folds the event
//! into the room aggregate, and fans the resulting delta out to all
//! subscribers - all under the room's lock, so a `join` can never observe
//! (or miss) a half-applied event.

mod room;
mod subscription;

pub use subscription::{SubscriberHandle, Subscription};

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex, OwnedMutexGuard};
use uuid::Uuid;

use ovation_core::{
    AggregateDelta, EventStore, NewReaction, ReactionEvent, ReactionKind, Recipient,
    RoomAggregate, RoomId, RoomSnapshot, StoreResult,
};

use room::RoomState;

/// Hub tuning knobs
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Bounded queue length per subscriber; a subscriber that falls this
    /// far behind is dropped and must rejoin
    pub subscriber_buffer: usize,
    /// Rooms with no subscribers and no activity for this long are
    /// evicted; `None` disables eviction
    pub idle_ttl: Option<Duration>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            subscriber_buffer: 100,
            idle_ttl: Some(Duration::from_secs(900)),
        }
    }
}

/// Result of a successful submit
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// The durably recorded event
    pub event: ReactionEvent,
    /// The delta that was fanned out for it
    pub delta: AggregateDelta,
}

/// Per-room aggregation and fan-out hub
///
/// Rooms are created lazily on first touch and rehydrated from the event
/// store, so "unknown room" is never an error and eviction never loses
/// counts.
pub struct RoomHub {
    rooms: DashMap<RoomId, Arc<Mutex<RoomState>>>,
    store: Arc<dyn EventStore>,
    config: HubConfig,
}

impl RoomHub {
    /// Create a hub with default tuning
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self::with_config(store, HubConfig::default())
    }

    /// Create a hub with explicit tuning
    pub fn with_config(store: Arc<dyn EventStore>, config: HubConfig) -> Self {
        Self {
            rooms: DashMap::new(),
            store,
            config,
        }
    }

    /// Create a hub wrapped in Arc
    pub fn new_shared(store: Arc<dyn EventStore>, config: HubConfig) -> Arc<Self> {
        Arc::new(Self::with_config(store, config))
    }

    /// Record one reaction: durable append, fold, fan-out
    ///
    /// The append happens before any in-memory change; if the store
    /// rejects the write nothing is counted and the caller retries the
    /// whole submit.
    pub async fn submit(
        &self,
        room_id: RoomId,
        kind: ReactionKind,
        recipient: Option<Recipient>,
    ) -> StoreResult<SubmitOutcome> {
        let reaction = NewReaction::new(room_id.clone(), kind, recipient);
        let event = self.store.append(reaction).await?;

        let mut state = self.lock_room(&room_id).await;
        self.hydrate(&room_id, &mut state).await?;

        let delta = if event.seq > state.aggregate.last_seq() {
            state.aggregate.apply(&event)
        } else {
            // The hydration replay already folded this event; only the
            // fan-out is still owed.
            state.aggregate.delta_for(&event)
        };
        state.touch();

        let delivered = state.fan_out(&room_id, &delta);
        tracing::trace!(
            room_id = %room_id,
            seq = delta.seq,
            total = delta.total,
            delivered = delivered,
            "delta published"
        );

        Ok(SubmitOutcome { event, delta })
    }

    /// Join a room: take a snapshot and register for subsequent deltas
    ///
    /// Snapshot and registration happen under the same room lock, so no
    /// event can arrive between them: nothing in the snapshot is ever
    /// re-delivered as a delta and nothing after it is missed.
    pub async fn join(&self, room_id: RoomId) -> StoreResult<(RoomSnapshot, Subscription)> {
        let mut state = self.lock_room(&room_id).await;
        self.hydrate(&room_id, &mut state).await?;

        let snapshot = state.aggregate.snapshot();
        let (tx, rx) = mpsc::channel(self.config.subscriber_buffer);
        let id = Uuid::new_v4();
        state.subscribers.insert(id, tx);
        state.touch();

        tracing::debug!(
            room_id = %room_id,
            subscriber = %id,
            total = snapshot.total,
            "subscriber joined"
        );

        Ok((
            snapshot,
            Subscription::new(SubscriberHandle::new(room_id, id), rx),
        ))
    }

    /// Current aggregate for a room, without subscribing
    pub async fn snapshot(&self, room_id: &RoomId) -> StoreResult<RoomSnapshot> {
        let mut state = self.lock_room(room_id).await;
        self.hydrate(room_id, &mut state).await?;
        Ok(state.aggregate.snapshot())
    }

    /// Deregister a subscriber; idempotent, including after eviction
    pub async fn leave(&self, handle: &SubscriberHandle) {
        let Some(cell) = self
            .rooms
            .get(handle.room_id())
            .map(|entry| entry.value().clone())
        else {
            return;
        };

        let mut state = cell.lock_owned().await;
        if state.subscribers.remove(&handle.id()).is_some() {
            state.touch();
            tracing::debug!(
                room_id = %handle.room_id(),
                subscriber = %handle.id(),
                "subscriber left"
            );
        }
    }

    /// Evict rooms with no subscribers and no recent activity
    ///
    /// Evicted rooms rehydrate lazily from the store on the next touch, so
    /// this only trades memory for a rebuild. Returns the number of rooms
    /// removed.
    pub async fn evict_idle(&self) -> usize {
        let Some(ttl) = self.config.idle_ttl else {
            return 0;
        };

        let candidates: Vec<(RoomId, Arc<Mutex<RoomState>>)> = self
            .rooms
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut evicted = 0;
        for (room_id, cell) in candidates {
            // A room we cannot lock right now is in use, not idle.
            let Ok(state) = cell.clone().try_lock_owned() else {
                continue;
            };
            if state.subscribers.is_empty() && state.idle_for() >= ttl {
                // Still holding the lock, so no join/submit can slip in
                // before the entry disappears.
                self.rooms
                    .remove_if(&room_id, |_, value| Arc::ptr_eq(value, &cell));
                evicted += 1;
                tracing::debug!(room_id = %room_id, "idle room evicted");
            }
        }

        if evicted > 0 {
            tracing::info!(count = evicted, "evicted idle rooms");
        }
        evicted
    }

    /// Number of rooms currently held in memory
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Number of live subscribers in a room
    pub async fn subscriber_count(&self, room_id: &RoomId) -> usize {
        match self.rooms.get(room_id).map(|entry| entry.value().clone()) {
            Some(cell) => cell.lock_owned().await.subscribers.len(),
            None => 0,
        }
    }

    /// Lock a room's state, creating the room lazily
    ///
    /// Re-checks the registry after acquiring the lock: the entry may have
    /// been evicted while we waited, in which case the orphaned state must
    /// not be used (a later touch would recreate the room without it).
    async fn lock_room(&self, room_id: &RoomId) -> OwnedMutexGuard<RoomState> {
        loop {
            let cell = self
                .rooms
                .entry(room_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(RoomState::new())))
                .clone();
            let guard = cell.clone().lock_owned().await;

            let still_current = self
                .rooms
                .get(room_id)
                .is_some_and(|entry| Arc::ptr_eq(entry.value(), &cell));
            if still_current {
                return guard;
            }
            // Evicted between lookup and lock; retry with a fresh entry.
        }
    }

    /// Rebuild the aggregate from the store on first touch
    ///
    /// The replay is the correctness reference: after hydration the
    /// in-memory state equals a from-scratch fold of the room's log, and
    /// the `seq` cursor guards against folding a replayed event twice.
    async fn hydrate(&self, room_id: &RoomId, state: &mut RoomState) -> StoreResult<()> {
        if state.hydrated {
            return Ok(());
        }

        let events = self.store.list_by_room(room_id, None).await?;
        state.aggregate = RoomAggregate::rebuild(&events);
        state.hydrated = true;

        tracing::debug!(
            room_id = %room_id,
            events = events.len(),
            total = state.aggregate.total(),
            "room hydrated from store"
        );
        Ok(())
    }
}

impl std::fmt::Debug for RoomHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomHub")
            .field("rooms", &self.rooms.len())
            .field("config", &self.config)
            .finish()
    }
}
