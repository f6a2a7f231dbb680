use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{ClientMessage, ConnectionId, NotificationDispatcher, QueueError, QueueEvent};

/// Serve one WebSocket connection until the client goes away.
///
/// Outbound events flow dispatcher -> mpsc -> writer task -> socket; inbound
/// frames are parsed as `ClientMessage`s on this task.
pub async fn handle_socket(socket: WebSocket, dispatcher: Arc<NotificationDispatcher>, capacity: usize) {
    let connection_id: ConnectionId = Uuid::new_v4();
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = NotificationDispatcher::channel(capacity);

    dispatcher.register(connection_id, tx.clone()).await;
    info!("Client connected: {}", connection_id);

    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to encode event for {}: {}", connection_id, e);
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                if let Some(reply) = handle_client_message(&dispatcher, connection_id, text.as_str()).await {
                    if tx.try_send(reply).is_err() {
                        warn!("Could not queue reply for {}", connection_id);
                    }
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("WebSocket error on {}: {}", connection_id, e);
                break;
            }
        }
    }

    dispatcher.disconnect(connection_id).await;
    writer.abort();
    info!("Client disconnected: {}", connection_id);
}

/// Apply one client frame. Returns a reply for the client when the frame
/// could not be honoured.
pub async fn handle_client_message(
    dispatcher: &NotificationDispatcher,
    connection_id: ConnectionId,
    text: &str,
) -> Option<QueueEvent> {
    match apply_client_message(dispatcher, connection_id, text).await {
        Ok(()) => None,
        Err(e) => {
            debug!("Rejected frame from {}: {}", connection_id, e);
            Some(QueueEvent::error(e.to_string()))
        }
    }
}

async fn apply_client_message(
    dispatcher: &NotificationDispatcher,
    connection_id: ConnectionId,
    text: &str,
) -> Result<(), QueueError> {
    let message = serde_json::from_str::<ClientMessage>(text)
        .map_err(|e| QueueError::InvalidMessage(e.to_string()))?;

    match message {
        ClientMessage::SubscribeToQueue(raw_id) => {
            let appointment_id = Uuid::parse_str(raw_id.trim())
                .map_err(|_| QueueError::InvalidMessage(format!("invalid appointment id {}", raw_id)))?;

            dispatcher.subscribe(connection_id, appointment_id).await
        }
        ClientMessage::UnsubscribeFromQueue => {
            dispatcher.unsubscribe(connection_id).await;
            Ok(())
        }
    }
}
