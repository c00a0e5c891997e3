//! Reaction submission
//!
//! POST /rooms/{room_id}/reactions

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use ovation_core::{ReactionKind, Recipient, RoomId};

use crate::response::ApiResult;
use crate::server::GatewayState;

/// Request body for submitting one reaction
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitReactionRequest {
    /// Who the reaction is addressed to; blank means the room total only
    #[validate(length(max = 64, message = "recipient name too long"))]
    pub recipient_name: Option<String>,
    #[serde(default)]
    pub kind: ReactionKind,
}

/// Receipt for an accepted reaction
#[derive(Debug, Serialize)]
pub struct SubmitReactionResponse {
    pub event_id: Uuid,
    pub seq: u64,
    pub total: u64,
}

/// Submit a reaction to a room
///
/// Returns 202 once the event is durably appended and fanned out; 503 if
/// the event store rejects the write (retry the whole submit).
pub async fn submit_reaction(
    State(state): State<GatewayState>,
    Path(room_id): Path<String>,
    Json(body): Json<SubmitReactionRequest>,
) -> ApiResult<(StatusCode, Json<SubmitReactionResponse>)> {
    body.validate()?;

    let room_id = RoomId::parse(&room_id)?;
    let recipient = Recipient::normalize(body.recipient_name.as_deref())?;

    let outcome = state.hub().submit(room_id, body.kind, recipient).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitReactionResponse {
            event_id: outcome.event.event_id,
            seq: outcome.delta.seq,
            total: outcome.delta.total,
        }),
    ))
}
