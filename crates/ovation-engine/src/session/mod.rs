//! Per-session view of a room
//!
//! Each consumer session holds one `SessionView`: seeded from the join
//! snapshot and patched by deltas. On reconnect the session rejoins and
//! the view is replaced wholesale by the new snapshot - local state is
//! never merged with a prior partial state, which rules out drift between
//! what the session shows and what a fresh join would show.

use std::collections::HashMap;

use ovation_core::{AggregateDelta, RecipientCount, RoomSnapshot};

/// Replaceable per-session aggregate view
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    seq: u64,
    total: u64,
    /// First-seen order, mirroring the aggregate's entries
    entries: Vec<RecipientCount>,
    index: HashMap<String, usize>,
}

impl SessionView {
    /// Build a view from a join snapshot, discarding any previous state
    #[must_use]
    pub fn from_snapshot(snapshot: &RoomSnapshot) -> Self {
        let index = snapshot
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.name.clone(), i))
            .collect();
        Self {
            seq: snapshot.seq,
            total: snapshot.total,
            entries: snapshot.entries.clone(),
            index,
        }
    }

    /// Patch one delta into the view
    ///
    /// Deltas at or before the view's cursor are ignored; the snapshot
    /// already contained them.
    pub fn apply(&mut self, delta: &AggregateDelta) {
        if delta.seq <= self.seq {
            return;
        }
        self.seq = delta.seq;
        self.total = delta.total;

        if let Some(recipient) = &delta.recipient {
            match self.index.get(recipient.name.as_str()) {
                Some(&i) => self.entries[i].count = recipient.count,
                None => {
                    self.index.insert(recipient.name.clone(), self.entries.len());
                    self.entries.push(recipient.clone());
                }
            }
        }
    }

    /// Current total
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Cursor of the last observed event
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Recipients sorted by count descending, ties in first-seen order
    #[must_use]
    pub fn ranking(&self) -> Vec<RecipientCount> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }
}
