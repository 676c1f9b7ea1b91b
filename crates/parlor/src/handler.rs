//! Per-connection handler: WebSocket upgrade, outbound pump, and
//! inbound routing.
//!
//! Each accepted connection gets its own Tokio task running this
//! handler. The socket is split: a writer task drains the connection's
//! event channel into the sink, while this task reads frames, decodes
//! them, and routes them through the registry. The same event channel
//! is what the room actor holds, so broadcasts and direct replies
//! share one ordered path to the client.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parlor_protocol::{ClientEvent, Codec, ConnectionId, ServerEvent};
use parlor_room::EventSender;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::ParlorError;
use crate::server::ServerState;

/// Handles a single connection from TCP accept to close.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    conn: ConnectionId,
    state: Arc<ServerState>,
) -> Result<(), ParlorError> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (mut sink, mut frames) = ws.split();

    // The outbound channel. The sender side goes to the room actor on
    // join; the writer task below owns the receiver.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<ServerEvent>();

    let codec = state.codec;
    let writer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let bytes = match codec.encode(&event) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!(%conn, error = %e, "failed to encode event");
                    continue;
                }
            };
            if sink.send(Message::Binary(bytes.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.send(Message::Close(None)).await;
    });

    while let Some(msg) = frames.next().await {
        let data = match msg {
            Ok(Message::Binary(data)) => data.to_vec(),
            Ok(Message::Text(text)) => text.as_bytes().to_vec(),
            Ok(Message::Close(_)) => break,
            Ok(_) => continue, // ping/pong/frame
            Err(e) => {
                tracing::debug!(%conn, error = %e, "recv error");
                break;
            }
        };

        let event: ClientEvent = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%conn, error = %e, "failed to decode event");
                send_error(&event_tx, "malformed event");
                continue;
            }
        };

        dispatch(conn, event, &event_tx, &state).await;
    }

    // Leaving the room (and destroying it if emptied) happens before
    // the channel closes, so remaining members still get the
    // disconnect broadcasts.
    state.registry.disconnect(conn).await;
    drop(event_tx);
    let _ = writer.await;

    tracing::info!(%conn, "connection closed");
    Ok(())
}

/// Routes one decoded event: room management through the registry,
/// everything else to the connection's room.
async fn dispatch(
    conn: ConnectionId,
    event: ClientEvent,
    event_tx: &EventSender,
    state: &Arc<ServerState>,
) {
    let result = match event {
        ClientEvent::CreateRoom { room_id, password } => {
            state
                .registry
                .create_room(conn, room_id, password, event_tx.clone())
                .await
        }
        ClientEvent::JoinRoom { room_id, password } => {
            state
                .registry
                .join_room(conn, room_id, password, event_tx.clone())
                .await
        }
        other => state.registry.route(conn, other).await,
    };

    if let Err(e) = result {
        tracing::debug!(%conn, error = %e, "event rejected");
        send_error(event_tx, &e.to_string());
    }
}

/// Queues an `err` event for this connection. Silently drops if the
/// writer is gone.
fn send_error(event_tx: &EventSender, message: &str) {
    let _ = event_tx.send(ServerEvent::Error {
        message: message.to_string(),
    });
}
