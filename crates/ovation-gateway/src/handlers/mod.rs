//! HTTP handlers for the REST side of the gateway

mod reactions;
mod rooms;

pub use reactions::{submit_reaction, SubmitReactionRequest, SubmitReactionResponse};
pub use rooms::{get_room_snapshot, RoomSnapshotResponse};
