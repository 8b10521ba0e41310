//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the browser client and the API server
//! for the precheck countdown.

use serde::{Deserialize, Serialize};

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// The "Start 30s exercise" button. Restarts a running countdown.
    StartExercise,

    /// The "Skip and Enter" button.
    SkipAndEnter,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The gate is closed and no exercise is running.
    AwaitingEntryChoice,

    /// Sent about once a second while the exercise runs.
    Tick { progress: f32, remaining_secs: i64 },

    /// The gate is open. Sent once each time the gate opens.
    Entered { message: String },

    /// Reports a problem with a client message.
    Error { message: String },
}
