//! In-memory fold of a room's event log
//!
//! `RoomAggregate` maintains the total reaction count and per-recipient
//! counts for one room. `rebuild` (seed zero, fold every event) is the
//! correctness reference; `apply` is the O(1) incremental path and must
//! always be equivalent to a full rebuild.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entities::ReactionEvent;

/// A recipient and its current count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientCount {
    pub name: String,
    pub count: u64,
}

/// Minimal incremental change produced by folding one event
///
/// `recipient` carries the single affected recipient's new count, so
/// fan-out never re-sends the whole aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateDelta {
    /// Cursor of the event that produced this delta
    pub seq: u64,
    /// Room total after the event
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<RecipientCount>,
}

/// Full point-in-time aggregate, used as the baseline on join
///
/// `entries` is in first-seen order so a consumer patching deltas into its
/// own view ranks ties exactly like a fresh rebuild would.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    /// Cursor of the last event folded into this snapshot
    pub seq: u64,
    pub total: u64,
    pub entries: Vec<RecipientCount>,
}

impl RoomSnapshot {
    /// Recipients sorted by count descending, ties in first-seen order
    #[must_use]
    pub fn ranking(&self) -> Vec<RecipientCount> {
        rank(&self.entries)
    }
}

/// Stable sort by count descending; ties keep their relative (first-seen)
/// order, so equal counts never reorder between recomputations.
pub(crate) fn rank(entries: &[RecipientCount]) -> Vec<RecipientCount> {
    let mut ranked = entries.to_vec();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

/// Per-room in-memory aggregate state
#[derive(Debug, Clone, Default)]
pub struct RoomAggregate {
    total: u64,
    unaddressed: u64,
    last_seq: u64,
    /// First-seen order; never reordered
    entries: Vec<RecipientCount>,
    index: HashMap<String, usize>,
}

impl RoomAggregate {
    /// Create an empty aggregate
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed zero and fold every event in order
    pub fn rebuild<'a>(events: impl IntoIterator<Item = &'a ReactionEvent>) -> Self {
        let mut aggregate = Self::new();
        for event in events {
            aggregate.apply(event);
        }
        aggregate
    }

    /// Fold one new event and return the minimal delta for fan-out
    pub fn apply(&mut self, event: &ReactionEvent) -> AggregateDelta {
        debug_assert!(
            event.seq > self.last_seq,
            "events must be folded in append order"
        );

        self.total += 1;
        self.last_seq = event.seq;

        let recipient = match &event.recipient {
            Some(name) => {
                let count = match self.index.get(name.as_str()) {
                    Some(&i) => {
                        self.entries[i].count += 1;
                        self.entries[i].count
                    }
                    None => {
                        self.index.insert(name.as_str().to_string(), self.entries.len());
                        self.entries.push(RecipientCount {
                            name: name.as_str().to_string(),
                            count: 1,
                        });
                        1
                    }
                };
                Some(RecipientCount {
                    name: name.as_str().to_string(),
                    count,
                })
            }
            None => {
                self.unaddressed += 1;
                None
            }
        };

        AggregateDelta {
            seq: event.seq,
            total: self.total,
            recipient,
        }
    }

    /// Delta describing an event that is already folded into this state
    ///
    /// Used when a just-appended event was picked up by a concurrent
    /// hydration replay; the counts are current, only the delta is owed.
    pub fn delta_for(&self, event: &ReactionEvent) -> AggregateDelta {
        AggregateDelta {
            seq: event.seq,
            total: self.total,
            recipient: event.recipient.as_ref().map(|name| RecipientCount {
                name: name.as_str().to_string(),
                count: self.recipient_count(name.as_str()),
            }),
        }
    }

    /// Full point-in-time snapshot
    #[must_use]
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            seq: self.last_seq,
            total: self.total,
            entries: self.entries.clone(),
        }
    }

    /// Recipients sorted by count descending, ties in first-seen order
    #[must_use]
    pub fn ranking(&self) -> Vec<RecipientCount> {
        rank(&self.entries)
    }

    /// Total number of reactions in the room
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of reactions with no recipient
    #[must_use]
    pub fn unaddressed(&self) -> u64 {
        self.unaddressed
    }

    /// Cursor of the last folded event
    #[must_use]
    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    /// Current count for a recipient (zero if never seen)
    #[must_use]
    pub fn recipient_count(&self, name: &str) -> u64 {
        self.index.get(name).map_or(0, |&i| self.entries[i].count)
    }

    /// True if no event has ever been folded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{NewReaction, ReactionKind};
    use crate::value_objects::{Recipient, RoomId};
    use uuid::Uuid;

    fn event(seq: u64, recipient: Option<&str>) -> ReactionEvent {
        let reaction = NewReaction::new(
            RoomId::parse("r").unwrap(),
            ReactionKind::Clap,
            recipient.map(|n| Recipient::normalize(Some(n)).unwrap().unwrap()),
        );
        ReactionEvent {
            seq,
            event_id: Uuid::new_v4(),
            room_id: reaction.room_id,
            kind: reaction.kind,
            recipient: reaction.recipient,
            created_at: reaction.created_at,
        }
    }

    fn consistent(aggregate: &RoomAggregate) -> bool {
        let addressed: u64 = aggregate.ranking().iter().map(|e| e.count).sum();
        aggregate.total() == addressed + aggregate.unaddressed()
    }

    #[test]
    fn test_unaddressed_events_count_total_only() {
        let mut aggregate = RoomAggregate::new();
        for seq in 1..=3 {
            aggregate.apply(&event(seq, None));
        }
        assert_eq!(aggregate.total(), 3);
        assert!(aggregate.ranking().is_empty());
        assert!(consistent(&aggregate));
    }

    #[test]
    fn test_ranking_orders_by_count() {
        let mut aggregate = RoomAggregate::new();
        aggregate.apply(&event(1, Some("Alice")));
        aggregate.apply(&event(2, Some("Bob")));
        aggregate.apply(&event(3, Some("Alice")));

        let ranking = aggregate.ranking();
        assert_eq!(ranking.len(), 2);
        assert_eq!((ranking[0].name.as_str(), ranking[0].count), ("Alice", 2));
        assert_eq!((ranking[1].name.as_str(), ranking[1].count), ("Bob", 1));
        assert!(consistent(&aggregate));
    }

    #[test]
    fn test_ranking_ties_keep_first_seen_order() {
        let mut aggregate = RoomAggregate::new();
        let mut seq = 0;
        // Carl and Dana each reach 4, Carl first
        for _ in 0..4 {
            seq += 1;
            aggregate.apply(&event(seq, Some("Carl")));
            seq += 1;
            aggregate.apply(&event(seq, Some("Dana")));
        }

        for _ in 0..3 {
            let ranking = aggregate.ranking();
            assert_eq!(ranking[0].name, "Carl");
            assert_eq!(ranking[1].name, "Dana");
            assert_eq!(ranking[0].count, 4);
            assert_eq!(ranking[1].count, 4);
        }
    }

    #[test]
    fn test_delta_carries_single_recipient() {
        let mut aggregate = RoomAggregate::new();
        aggregate.apply(&event(1, Some("Alice")));
        let delta = aggregate.apply(&event(2, Some("Alice")));

        assert_eq!(delta.total, 2);
        assert_eq!(delta.seq, 2);
        let recipient = delta.recipient.unwrap();
        assert_eq!(recipient.name, "Alice");
        assert_eq!(recipient.count, 2);

        let delta = aggregate.apply(&event(3, None));
        assert_eq!(delta.total, 3);
        assert!(delta.recipient.is_none());
    }

    #[test]
    fn test_incremental_equals_rebuild() {
        let events: Vec<ReactionEvent> = vec![
            event(1, Some("Alice")),
            event(2, None),
            event(3, Some("Bob")),
            event(4, Some("Alice")),
            event(5, None),
        ];

        let mut incremental = RoomAggregate::new();
        for e in &events {
            incremental.apply(e);
        }
        let rebuilt = RoomAggregate::rebuild(&events);

        assert_eq!(incremental.total(), rebuilt.total());
        assert_eq!(incremental.unaddressed(), rebuilt.unaddressed());
        assert_eq!(incremental.last_seq(), rebuilt.last_seq());
        assert_eq!(incremental.ranking(), rebuilt.ranking());
    }

    #[test]
    fn test_delta_for_already_folded_event() {
        let events = vec![event(1, Some("Alice")), event(2, Some("Alice"))];
        let aggregate = RoomAggregate::rebuild(&events);

        let delta = aggregate.delta_for(&events[1]);
        assert_eq!(delta.seq, 2);
        assert_eq!(delta.total, 2);
        assert_eq!(delta.recipient.unwrap().count, 2);
    }

    #[test]
    fn test_snapshot_entries_keep_first_seen_order() {
        let mut aggregate = RoomAggregate::new();
        aggregate.apply(&event(1, Some("Bob")));
        aggregate.apply(&event(2, Some("Alice")));
        aggregate.apply(&event(3, Some("Alice")));

        let snapshot = aggregate.snapshot();
        assert_eq!(snapshot.seq, 3);
        assert_eq!(snapshot.total, 3);
        // entries stay in first-seen order even though Alice outranks Bob
        assert_eq!(snapshot.entries[0].name, "Bob");
        assert_eq!(snapshot.entries[1].name, "Alice");
        // ranking sorts by count
        assert_eq!(snapshot.ranking()[0].name, "Alice");
    }
}
