//! services/api/src/web/ws_handler.rs
//!
//! The entry point and control loop for the precheck countdown WebSocket.
//! Button presses arrive as client messages; a spawned task pushes the
//! countdown once a second for as long as the socket stays open.

use crate::web::{
    countdown_task::{countdown_process, forward_to_socket},
    precheck::ALREADY_ENTERED_MESSAGE,
    protocol::{ClientMessage, ServerMessage},
    state::SessionHandle,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        WebSocketUpgrade,
    },
    response::Response,
    Extension,
};
use chrono::Utc;
use futures::stream::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const OUTBOUND_BUFFER: usize = 16;

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn countdown_ws_handler(
    ws: WebSocketUpgrade,
    Extension(session): Extension<SessionHandle>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, session))
}

async fn handle_socket(socket: WebSocket, session: SessionHandle) {
    let session_id = session.lock().await.session_id;
    info!("Countdown WebSocket opened for session {}", session_id);

    let (sink, mut receiver) = socket.split();
    let (outbound, outbound_rx) = mpsc::channel::<ServerMessage>(OUTBOUND_BUFFER);
    let writer_handle = tokio::spawn(forward_to_socket(sink, outbound_rx));

    let token = CancellationToken::new();
    let countdown_handle = tokio::spawn(countdown_process(
        session.clone(),
        outbound.clone(),
        token.clone(),
    ));

    // --- Main Message Loop ---
    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(text.as_str()) {
                Ok(ClientMessage::StartExercise) => {
                    info!("StartExercise received for session {}", session_id);
                    let started = session.lock().await.precheck.start_exercise(Utc::now());
                    if !started {
                        let err = ServerMessage::Error {
                            message: ALREADY_ENTERED_MESSAGE.to_string(),
                        };
                        if outbound.send(err).await.is_err() {
                            break;
                        }
                    }
                }
                Ok(ClientMessage::SkipAndEnter) => {
                    info!("SkipAndEnter received for session {}", session_id);
                    session.lock().await.precheck.skip();
                }
                Err(e) => {
                    warn!("Failed to deserialize client message: {}", e);
                    let err = ServerMessage::Error {
                        message: format!("Unrecognised message: {}", e),
                    };
                    if outbound.send(err).await.is_err() {
                        break;
                    }
                }
            },
            Message::Close(_) => {
                info!("Client sent close message.");
                break;
            }
            _ => {}
        }
    }

    // --- Cleanup ---
    token.cancel();
    if let Err(e) = countdown_handle.await {
        warn!("Countdown task ended abnormally: {}", e);
    }
    drop(outbound);
    if let Err(e) = writer_handle.await {
        warn!("Socket writer ended abnormally: {}", e);
    }
    info!("Countdown WebSocket closed for session {}", session_id);
}
