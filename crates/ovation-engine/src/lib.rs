//! # ovation-engine
//!
//! The real-time aggregation and fan-out engine: folds the reaction log
//! into per-room aggregates and pushes incremental deltas to every live
//! subscriber of a room.
//!
//! All operations on one room (`submit`'s fold, `join`'s
//! snapshot-then-register, fan-out, `leave`) are serialized behind that
//! room's lock; independent rooms run fully in parallel.

pub mod hub;
pub mod session;

// Re-export commonly used types at crate root
pub use hub::{HubConfig, RoomHub, SubmitOutcome, SubscriberHandle, Subscription};
pub use session::SessionView;
