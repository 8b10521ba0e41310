//! services/api/src/web/countdown_task.rs
//!
//! This module contains the asynchronous "worker" functions behind the
//! countdown WebSocket: the per-connection countdown loop and the writer that
//! forwards its messages to the socket.

use crate::web::{protocol::ServerMessage, state::SessionHandle};
use axum::extract::ws::{Message, WebSocket};
use biofortune_core::precheck::{Countdown, EXERCISE_COMPLETE_MESSAGE};
use futures::{stream::SplitSink, SinkExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Maps an evaluated countdown to the message pushed to the browser.
pub fn tick_message(countdown: Countdown) -> ServerMessage {
    match countdown {
        Countdown::NotStarted => ServerMessage::AwaitingEntryChoice,
        Countdown::Running {
            progress,
            remaining_secs,
        } => ServerMessage::Tick {
            progress,
            remaining_secs,
        },
        Countdown::Entered => ServerMessage::Entered {
            message: EXERCISE_COMPLETE_MESSAGE.to_string(),
        },
    }
}

/// Drains `outbound` into the socket until either side goes away.
pub async fn forward_to_socket(
    mut sink: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<ServerMessage>,
) {
    while let Some(msg) = outbound.recv().await {
        let json = match serde_json::to_string(&msg) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize server message: {}", e);
                continue;
            }
        };
        if sink.send(Message::Text(json.into())).await.is_err() {
            info!("Socket closed; dropping outbound countdown messages.");
            break;
        }
    }
    let _ = sink.close().await;
}

/// The countdown loop for one connection.
///
/// Every tick re-reads the wall clock through `Precheck::evaluate`, so a
/// restart from any source (this socket or the REST routes) is picked up on
/// the next tick. Running ticks are always sent; the idle and entered states
/// only when they change. The loop lives until the token is cancelled or the
/// outbound channel closes.
pub async fn countdown_process(
    session: SessionHandle,
    outbound: mpsc::Sender<ServerMessage>,
    cancellation_token: CancellationToken,
) {
    info!("Countdown process started.");
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_sent: Option<ServerMessage> = None;

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => {
                info!("Countdown process cancelled.");
                return;
            }
            _ = interval.tick() => {}
        }

        let countdown = session.lock().await.precheck.evaluate(chrono::Utc::now());
        let msg = tick_message(countdown);

        let is_tick = matches!(msg, ServerMessage::Tick { .. });
        if is_tick || last_sent.as_ref() != Some(&msg) {
            if outbound.send(msg.clone()).await.is_err() {
                info!("Outbound channel closed. Ending countdown task.");
                return;
            }
            if countdown == Countdown::Entered {
                info!("Countdown finished; gate is open.");
            }
        }
        last_sent = Some(msg);
    }
}
