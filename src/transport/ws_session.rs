use crate::app::AppState;
use crate::game::session::Session;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

pub async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(state.config.outbound_queue_capacity);
    let session_id = Uuid::new_v4().to_string();
    tracing::info!(session_id, "client connected");

    let mut session = Session::new(
        session_id.clone(),
        Arc::clone(&state.registry),
        Arc::clone(&state.world),
        outbound_tx,
        state.config.heartbeat_interval,
    );

    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = outbound_rx.recv().await {
            if sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            next = receiver.next() => {
                let message = match next {
                    Some(Ok(message)) => message,
                    Some(Err(error)) => {
                        tracing::debug!(session_id, ?error, "websocket read failed");
                        break;
                    }
                    None => break,
                };
                match message {
                    Message::Text(text) => session.handle_raw(text.as_bytes()).await,
                    Message::Binary(data) => session.handle_raw(&data).await,
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            _ = &mut send_task => {
                tracing::debug!(session_id, "websocket write failed");
                break;
            }
        }
    }

    session.close();
    send_task.abort();
    tracing::info!(session_id, "client disconnected");
}
