//! Room snapshot reads
//!
//! GET /rooms/{room_id}

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use ovation_core::{RecipientCount, RoomId};

use crate::response::ApiResult;
use crate::server::GatewayState;

/// Point-in-time room state
#[derive(Debug, Serialize)]
pub struct RoomSnapshotResponse {
    pub room_id: String,
    pub seq: u64,
    pub total: u64,
    pub ranking: Vec<RecipientCount>,
}

/// Read a room's current aggregate without subscribing
///
/// Unknown rooms are not an error; they are simply empty.
pub async fn get_room_snapshot(
    State(state): State<GatewayState>,
    Path(room_id): Path<String>,
) -> ApiResult<Json<RoomSnapshotResponse>> {
    let room_id = RoomId::parse(&room_id)?;
    let snapshot = state.hub().snapshot(&room_id).await?;

    Ok(Json(RoomSnapshotResponse {
        room_id: room_id.into_inner(),
        seq: snapshot.seq,
        total: snapshot.total,
        ranking: snapshot.ranking(),
    }))
}
