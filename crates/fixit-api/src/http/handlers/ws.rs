//! WebSocket handler for the realtime chat channel.
//!
//! The `/ws` endpoint upgrades an HTTP connection to a WebSocket. Each
//! connection gets:
//!
//! - **A reader loop** (this task): feeds every text frame to the
//!   [`ChatDispatcher`](fixit_core::relay::ChatDispatcher) and queues error
//!   replies on the channel's own outbox.
//! - **A writer task**: drains the outbox (relayed messages and error replies)
//!   into the socket, so a slow client never blocks the sender of a message.
//!
//! When the client disconnects or the server shuts down, the channel is closed
//! and every registry entry pointing at it is removed.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use fixit_core::relay::ChannelHandle;
use fixit_types::frame::OutboundFrame;

use crate::state::AppState;

/// Upgrade an HTTP request to a chat channel.
///
/// This is mounted at `/ws` in the router.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state))
}

async fn handle_ws_connection(socket: WebSocket, state: AppState) {
    let (ws_sender, mut ws_receiver) = socket.split();

    let (handle, outbox) = ChannelHandle::channel(state.config.relay_buffer);
    let dispatcher = state.dispatcher.clone();
    let mut session = dispatcher.open(handle.clone());
    let connection_id = session.id();

    let writer = tokio::spawn(drain_outbox(outbox, ws_sender));

    loop {
        tokio::select! {
            _ = state.shutdown.cancelled() => {
                tracing::debug!(%connection_id, "server shutting down, closing channel");
                break;
            }

            msg_result = ws_receiver.next() => {
                match msg_result {
                    Some(Ok(Message::Text(text))) => {
                        let outcome = dispatcher.handle_text(&mut session, text.as_str()).await;
                        outcome.send_reply(&handle);
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(%connection_id, "WebSocket receive error: {err}");
                        break;
                    }
                    // Binary frames are not part of the protocol; ping/pong is handled by axum.
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    dispatcher.close(&mut session);

    // The writer finishes once every sender of this outbox is gone.
    drop(session);
    drop(handle);
    if let Err(err) = writer.await {
        tracing::warn!(%connection_id, "WebSocket writer task failed: {err}");
    }
}

/// Forward queued frames to the client until the outbox closes or the socket fails.
async fn drain_outbox(
    mut outbox: mpsc::Receiver<OutboundFrame>,
    mut ws_sender: SplitSink<WebSocket, Message>,
) {
    while let Some(frame) = outbox.recv().await {
        let json = match serde_json::to_string(&frame) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!("Failed to serialize outbound frame: {err}");
                continue;
            }
        };
        if ws_sender.send(Message::Text(json.into())).await.is_err() {
            // Client disconnected; later relays report WriteFailed.
            return;
        }
    }
    let _ = ws_sender.close().await;
}
