/**
 * Per-connection Reader and Writer
 *
 * Every upgraded socket is split into two halves driven by two tasks:
 *
 * - the writer drains the connection's outbound queue and writes each event
 *   as a JSON text frame. When the hub closes the queue it sends a close
 *   frame and exits. A failed write also ends it. It never unregisters.
 * - the reader decodes one JSON text frame at a time and turns
 *   `typing_start` / `typing_stop` into a `user_typing` broadcast. Any other
 *   kind is ignored. A decode failure, a close frame, or a transport error
 *   ends it, and it then unregisters the connection.
 *
 * Both halves are generic over `Stream`/`Sink` so they can be driven by a
 * plain `Vec` or iterator in tests.
 */

use std::fmt::Display;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;

use super::hub::{ConnectionId, Hub};
use crate::shared::{EventKind, SharedError, WsEvent};

/// Drive one upgraded socket until both halves finish
pub async fn serve_connection(socket: WebSocket, hub: Hub, user_id: String) {
    let (connection, queue) = hub.open_connection(user_id.clone());
    let connection_id = connection.id;
    hub.register(connection);

    let (sink, stream) = socket.split();
    let writer = tokio::spawn(write_events(sink, queue, connection_id));

    read_events(stream, &hub, connection_id, &user_id).await;

    // The hub closes the queue once it processes the unregister, which
    // lets the writer flush and exit on its own.
    if let Err(err) = writer.await {
        tracing::warn!(connection_id = %connection_id, error = %err, "[Realtime] Writer task failed");
    }

    tracing::info!(connection_id = %connection_id, user_id = %user_id, "[Realtime] Connection closed");
}

/// Writer half: queue -> socket
pub async fn write_events<S>(
    mut sink: S,
    mut queue: mpsc::Receiver<WsEvent>,
    connection_id: ConnectionId,
) where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    while let Some(event) = queue.recv().await {
        let text = match event.to_json() {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(connection_id = %connection_id, error = %err, "[Realtime] Failed to encode event");
                continue;
            }
        };

        if let Err(err) = sink.send(Message::Text(text.into())).await {
            tracing::debug!(connection_id = %connection_id, error = %err, "[Realtime] Write failed");
            return;
        }
    }

    if let Err(err) = sink.send(Message::Close(None)).await {
        tracing::debug!(connection_id = %connection_id, error = %err, "[Realtime] Failed to send close frame");
    }
    tracing::debug!(connection_id = %connection_id, "[Realtime] Queue closed, writer stopped");
}

/// Reader half: socket -> hub
pub async fn read_events<S, E>(
    mut stream: S,
    hub: &Hub,
    connection_id: ConnectionId,
    user_id: &str,
) where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    while let Some(frame) = stream.next().await {
        let decoded = match frame {
            Ok(Message::Text(text)) => decode_event(text.as_str().as_bytes()),
            Ok(Message::Binary(bytes)) => decode_event(&bytes),
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
            Ok(Message::Close(frame)) => {
                tracing::debug!(connection_id = %connection_id, reason = ?frame, "[Realtime] Client initiated close");
                break;
            }
            Err(err) => {
                tracing::debug!(connection_id = %connection_id, error = %err, "[Realtime] Read failed");
                break;
            }
        };

        let event = match decoded {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(connection_id = %connection_id, error = %err, "[Realtime] Malformed frame");
                break;
            }
        };

        if let Some(typing) = typing_indicator(&event, user_id) {
            hub.broadcast(typing);
        }
    }

    hub.unregister(connection_id);
}

/// Decode one inbound data frame
pub fn decode_event(bytes: &[u8]) -> Result<WsEvent, SharedError> {
    serde_json::from_slice(bytes).map_err(|err| SharedError::event(format!("malformed frame: {}", err)))
}

/// Map an inbound event to the `user_typing` broadcast it triggers, if any
pub fn typing_indicator(event: &WsEvent, user_id: &str) -> Option<WsEvent> {
    let typing = match event.kind {
        EventKind::TypingStart => true,
        EventKind::TypingStop => false,
        _ => return None,
    };
    let conversation_id = event
        .payload
        .get("conversationId")
        .and_then(|v| v.as_str());
    Some(WsEvent::user_typing(user_id, typing, conversation_id))
}
