//! services/api/src/web/middleware.rs
//!
//! Session and precheck-gate middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Extension,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::web::state::{AppState, SessionHandle};

pub const SESSION_COOKIE: &str = "session";

pub const GATE_CLOSED_MESSAGE: &str =
    "Finish or skip the eye exercise on the precheck screen first.";

/// Reads the session id from the `session=` cookie, if present and well-formed.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| c.trim().strip_prefix("session="))
        .and_then(|id| Uuid::parse_str(id).ok())
}

/// Middleware that resolves the session cookie to a live session.
///
/// If valid, inserts the `SessionHandle` into request extensions for handlers to use.
/// If invalid, unknown or missing, returns 401 Unauthorized.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let session_id = session_id_from_headers(req.headers()).ok_or((
        StatusCode::UNAUTHORIZED,
        "No session found. Start one with POST /sessions.".to_string(),
    ))?;

    let session = state.sessions.get(session_id).await.ok_or_else(|| {
        warn!("Request for unknown session {}", session_id);
        (StatusCode::UNAUTHORIZED, "Session has ended.".to_string())
    })?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

/// Middleware that keeps the main screen closed until the precheck gate opens.
///
/// The countdown is re-evaluated here, so a finished exercise opens the gate
/// even if no tick reached the session in the meantime.
pub async fn require_entry(
    Extension(session): Extension<SessionHandle>,
    req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let entered = {
        let mut session = session.lock().await;
        session.precheck.evaluate(Utc::now());
        session.precheck.is_entered()
    };

    if !entered {
        return Err((StatusCode::FORBIDDEN, GATE_CLOSED_MESSAGE.to_string()));
    }
    Ok(next.run(req).await)
}
