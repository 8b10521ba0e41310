//! services/api/src/web/sessions.rs
//!
//! Session lifecycle endpoints: start a session and end it.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::web::{
    middleware::{session_id_from_headers, SESSION_COOKIE},
    state::AppState,
    views::SessionCreated,
};

/// POST /sessions - Start a new session
#[utoipa::path(
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session started; the `session` cookie is set", body = SessionCreated)
    )
)]
pub async fn create_session_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session_id = state.sessions.create().await;

    let cookie = format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/",
        SESSION_COOKIE, session_id
    );

    (
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(SessionCreated { session_id }),
    )
}

/// DELETE /sessions - End the current session and discard its state
#[utoipa::path(
    delete,
    path = "/sessions",
    responses(
        (status = 200, description = "Session ended"),
        (status = 401, description = "No active session")
    )
)]
pub async fn end_session_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_id = session_id_from_headers(&headers)
        .ok_or((StatusCode::UNAUTHORIZED, "No session found".to_string()))?;

    if !state.sessions.end(session_id).await {
        return Err((StatusCode::UNAUTHORIZED, "No session found".to_string()));
    }

    let cookie = format!(
        "{}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE
    );
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)]))
}
