//! WebSocket live stream handler
//!
//! One socket per room session: join the hub, send the snapshot frame,
//! then forward one update frame per delta until either side disconnects.

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::{IntoResponse, Response},
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};

use ovation_core::RoomId;
use ovation_engine::SessionView;

use crate::protocol::{LiveFrame, RESYNC_CLOSE_CODE};
use crate::response::ApiError;
use crate::server::GatewayState;

/// WebSocket close code for a join that failed server-side
const JOIN_FAILED_CLOSE_CODE: u16 = 1011;

/// Upgrade handler for GET /rooms/{room_id}/live
pub async fn live_handler(
    State(state): State<GatewayState>,
    Path(room_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    // Reject malformed room ids before upgrading
    match RoomId::parse(&room_id) {
        Ok(room_id) => ws
            .on_upgrade(move |socket| handle_socket(state, room_id, socket))
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Drive one live session from join to disconnect
async fn handle_socket(state: GatewayState, room_id: RoomId, socket: WebSocket) {
    let (snapshot, mut subscription) = match state.hub().join(room_id.clone()).await {
        Ok(joined) => joined,
        Err(e) => {
            tracing::warn!(room_id = %room_id, error = %e, "join failed");
            let mut socket = socket;
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: JOIN_FAILED_CLOSE_CODE,
                    reason: "join failed".into(),
                })))
                .await;
            return;
        }
    };

    let handle = subscription.handle().clone();
    // The session's replaceable state: seeded by this join's snapshot,
    // patched by deltas, discarded wholesale when the session ends
    let mut view = SessionView::from_snapshot(&snapshot);

    let (mut ws_sink, mut ws_stream) = socket.split();

    if send_frame(&mut ws_sink, &LiveFrame::snapshot(&snapshot))
        .await
        .is_err()
    {
        state.hub().leave(&handle).await;
        return;
    }

    tracing::debug!(room_id = %room_id, total = snapshot.total, "live session started");

    let mut lagged = false;
    loop {
        tokio::select! {
            delta = subscription.recv() => {
                match delta {
                    Some(delta) => {
                        view.apply(&delta);
                        if send_frame(&mut ws_sink, &LiveFrame::update(&view)).await.is_err() {
                            break;
                        }
                    }
                    // The hub closed our queue: we lagged (or the process
                    // is shutting down). The view may have gaps now, so
                    // the only consistent continuation is a fresh join.
                    None => {
                        lagged = true;
                        break;
                    }
                }
            }
            incoming = ws_stream.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(room_id = %room_id, "client closed live session");
                        break;
                    }
                    Some(Ok(_)) => {
                        // The live stream is one-way; pings are answered by
                        // axum, anything else is ignored
                    }
                    Some(Err(e)) => {
                        tracing::debug!(room_id = %room_id, error = %e, "websocket error");
                        break;
                    }
                }
            }
        }
    }

    if lagged {
        let _ = ws_sink
            .send(Message::Close(Some(CloseFrame {
                code: RESYNC_CLOSE_CODE,
                reason: "resync required".into(),
            })))
            .await;
    }

    state.hub().leave(&handle).await;
    tracing::debug!(room_id = %room_id, "live session ended");
}

/// Serialize and send one frame
async fn send_frame(
    sink: &mut SplitSink<WebSocket, Message>,
    frame: &LiveFrame,
) -> Result<(), axum::Error> {
    let json = frame.to_json().map_err(axum::Error::new)?;
    sink.send(Message::Text(json)).await
}
