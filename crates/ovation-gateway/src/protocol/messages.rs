//! Live stream frame format
//!
//! A session receives one `snapshot` frame on join, then one `update`
//! frame per reaction. Both carry the full `{total, ranking}` view so the
//! presentation layer can render without keeping its own fold.

use serde::{Deserialize, Serialize};

use ovation_core::{RecipientCount, RoomSnapshot};
use ovation_engine::SessionView;

/// Close code telling the client its stream lagged and it must rejoin
/// for a fresh snapshot
pub const RESYNC_CLOSE_CODE: u16 = 4000;

/// A frame on the live stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveFrame {
    /// Full baseline state, sent once per join
    Snapshot {
        seq: u64,
        total: u64,
        ranking: Vec<RecipientCount>,
    },
    /// State after one more reaction
    Update {
        seq: u64,
        total: u64,
        ranking: Vec<RecipientCount>,
    },
}

impl LiveFrame {
    /// Build the initial frame from a join snapshot
    #[must_use]
    pub fn snapshot(snapshot: &RoomSnapshot) -> Self {
        Self::Snapshot {
            seq: snapshot.seq,
            total: snapshot.total,
            ranking: snapshot.ranking(),
        }
    }

    /// Build an update frame from the session's patched view
    #[must_use]
    pub fn update(view: &SessionView) -> Self {
        Self::Update {
            seq: view.seq(),
            total: view.total(),
            ranking: view.ranking(),
        }
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from a JSON string
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
