//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, header::AUTHORIZATION},
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{Connection, Handshake},
    ui::state::AppState,
};

/// Upper bound for flushing the auth error before the socket is dropped
const REJECT_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// `auth.token`
    pub token: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let handshake = Handshake {
        auth_token: query.token,
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    };
    ws.on_upgrade(move |socket| handle_socket(socket, state, handshake))
}

/// Spawns a task that drains the connection's channel into the WebSocket sink.
///
/// When every sender is dropped (the registry unregistered the connection),
/// the remaining frames are flushed and a Close frame is sent.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                return;
            }
        }
        let _ = sender.send(Message::Close(None)).await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, handshake: Handshake) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    let mut connection = Connection::new();
    state.registry.register_client(*connection.id(), tx).await;
    let mut send_task = pusher_loop(rx, sender);
    tracing::info!("Connection {} opened", connection.id());

    if state
        .authenticate_connection_usecase
        .execute(&mut connection, &handshake)
        .await
        .is_err()
    {
        // Dropping the registry's sender lets the pusher flush the error frame and close
        state
            .disconnect_connection_usecase
            .execute(&mut connection)
            .await;
        if tokio::time::timeout(REJECT_FLUSH_TIMEOUT, &mut send_task)
            .await
            .is_err()
        {
            send_task.abort();
        }
        return;
    }

    loop {
        tokio::select! {
            msg = receiver.next() => {
                let msg = match msg {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        tracing::debug!("WebSocket error on {}: {}", connection.id(), e);
                        break;
                    }
                    None => break,
                };

                match msg {
                    Message::Text(text) => {
                        let Some(reply) = state.dispatcher.dispatch(&connection, &text).await else {
                            continue;
                        };
                        if let Err(e) = state.registry.push_to(connection.id(), &reply).await {
                            tracing::debug!("Reply to {} not delivered: {}", connection.id(), e);
                        }
                    }
                    Message::Close(_) => {
                        tracing::info!("Connection {} requested close", connection.id());
                        break;
                    }
                    // Ping/pong is handled automatically by the WebSocket protocol
                    _ => {}
                }
            }
            _ = &mut send_task => break,
        }
    }

    state
        .disconnect_connection_usecase
        .execute(&mut connection)
        .await;
    send_task.abort();
}
