//! services/api/src/web/precheck.rs
//!
//! Handlers for the precheck screen: mood buttons, the eye exercise, and
//! "Skip and Enter".

use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use biofortune_core::domain::MoodLabel;
use chrono::Utc;
use tracing::info;

use crate::web::{
    state::SessionHandle,
    views::{MoodRequest, MoodSaved, MoodView, PrecheckScreen},
};

pub const ALREADY_ENTERED_MESSAGE: &str =
    "Already entered. Use the Eye Exercises link to return to the precheck screen.";

/// Evaluates the countdown and renders the screen under one lock.
async fn render_screen(session: &SessionHandle) -> PrecheckScreen {
    let mut session = session.lock().await;
    let countdown = session.precheck.evaluate(Utc::now());
    PrecheckScreen::render(&session.precheck, countdown)
}

/// GET /precheck - Current precheck screen, with the countdown re-evaluated
#[utoipa::path(
    get,
    path = "/precheck",
    responses(
        (status = 200, description = "Precheck screen", body = PrecheckScreen),
        (status = 401, description = "No active session")
    )
)]
pub async fn get_precheck_handler(
    Extension(session): Extension<SessionHandle>,
) -> Json<PrecheckScreen> {
    Json(render_screen(&session).await)
}

/// POST /precheck/mood - Record how the user feels right now
#[utoipa::path(
    post,
    path = "/precheck/mood",
    request_body = MoodRequest,
    responses(
        (status = 200, description = "Mood saved", body = MoodSaved),
        (status = 400, description = "Unknown mood"),
        (status = 401, description = "No active session")
    )
)]
pub async fn record_mood_handler(
    Extension(session): Extension<SessionHandle>,
    Json(req): Json<MoodRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mood = req
        .mood
        .parse::<MoodLabel>()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let entry = session.lock().await.precheck.record_mood(mood, Utc::now());
    info!("Saved mood: {}", mood);

    Ok(Json(MoodSaved {
        message: format!("Saved mood: {}", mood),
        entry: MoodView::from(&entry),
    }))
}

/// POST /precheck/exercise - Start the 30 second eye exercise
#[utoipa::path(
    post,
    path = "/precheck/exercise",
    responses(
        (status = 200, description = "Exercise started", body = PrecheckScreen),
        (status = 401, description = "No active session"),
        (status = 409, description = "Already entered; reopen via /main/eye-exercises first")
    )
)]
pub async fn start_exercise_handler(
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<PrecheckScreen>, (StatusCode, String)> {
    {
        let mut session = session.lock().await;
        if !session.precheck.start_exercise(Utc::now()) {
            return Err((StatusCode::CONFLICT, ALREADY_ENTERED_MESSAGE.to_string()));
        }
        info!("Eye exercise started for session {}", session.session_id);
    }
    Ok(Json(render_screen(&session).await))
}

/// POST /precheck/skip - Skip the exercise and enter the main screen
#[utoipa::path(
    post,
    path = "/precheck/skip",
    responses(
        (status = 200, description = "Gate opened", body = PrecheckScreen),
        (status = 401, description = "No active session")
    )
)]
pub async fn skip_handler(Extension(session): Extension<SessionHandle>) -> Json<PrecheckScreen> {
    session.lock().await.precheck.skip();
    Json(render_screen(&session).await)
}
