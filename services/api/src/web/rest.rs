//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the main screen and the master
//! definition for the OpenAPI specification.

use crate::web::{
    precheck, sessions,
    state::{AppState, SessionHandle},
    views::{
        AiSuggestionView, CountdownView, MainScreenView, MoodLog, MoodOption, MoodRequest,
        MoodSaved, MoodView, PrecheckScreen, RemedyCard, RemedyView, SessionCreated,
        SuggestionStatus, SymptomRequest,
    },
};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};
use biofortune_core::catalog::remedy_for_keyword;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        sessions::create_session_handler,
        sessions::end_session_handler,
        precheck::get_precheck_handler,
        precheck::record_mood_handler,
        precheck::start_exercise_handler,
        precheck::skip_handler,
        main_screen_handler,
        find_remedy_handler,
        ask_ai_handler,
        eye_exercises_handler,
        mood_log_handler,
        remedy_image_handler,
    ),
    components(
        schemas(
            SessionCreated, SymptomRequest, MoodRequest, MoodOption, MoodView, MoodSaved,
            MoodLog, CountdownView, PrecheckScreen, MainScreenView, RemedyCard,
            SuggestionStatus, AiSuggestionView, RemedyView
        )
    ),
    tags(
        (name = "BioFortune API", description = "Mood check-in, eye-exercise gate and herbal remedy lookup.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Main Screen Handlers
//=========================================================================================

/// GET /main - Tip of the day and quick links
#[utoipa::path(
    get,
    path = "/main",
    responses(
        (status = 200, description = "Main screen", body = MainScreenView),
        (status = 403, description = "Precheck not completed")
    )
)]
pub async fn main_screen_handler(State(state): State<Arc<AppState>>) -> Json<MainScreenView> {
    Json(MainScreenView::new(state.main_screen.ai().is_enabled()))
}

/// POST /remedies/find - Look the symptom up locally, asking the AI on a miss
#[utoipa::path(
    post,
    path = "/remedies/find",
    request_body = SymptomRequest,
    responses(
        (status = 200, description = "Result to render", body = RemedyView),
        (status = 403, description = "Precheck not completed")
    )
)]
pub async fn find_remedy_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SymptomRequest>,
) -> Json<RemedyView> {
    let result = state.main_screen.find_remedy(&req.symptom).await;
    Json(result.into())
}

/// POST /remedies/ask-ai - Ask the AI directly, skipping the local catalog
#[utoipa::path(
    post,
    path = "/remedies/ask-ai",
    request_body = SymptomRequest,
    responses(
        (status = 200, description = "Result to render", body = RemedyView),
        (status = 403, description = "Precheck not completed")
    )
)]
pub async fn ask_ai_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SymptomRequest>,
) -> Json<RemedyView> {
    let result = state.main_screen.ask_ai(&req.symptom).await;
    Json(result.into())
}

/// POST /main/eye-exercises - Quick link back to the precheck screen
#[utoipa::path(
    post,
    path = "/main/eye-exercises",
    responses(
        (status = 200, description = "Gate closed again; precheck screen", body = PrecheckScreen),
        (status = 403, description = "Precheck not completed")
    )
)]
pub async fn eye_exercises_handler(
    Extension(session): Extension<SessionHandle>,
) -> Json<PrecheckScreen> {
    let mut session = session.lock().await;
    session.precheck.reopen();
    info!("Session {} returned to the precheck screen.", session.session_id);
    let countdown = session.precheck.evaluate(Utc::now());
    Json(PrecheckScreen::render(&session.precheck, countdown))
}

/// GET /moods - The session's full mood log, oldest first
#[utoipa::path(
    get,
    path = "/moods",
    responses(
        (status = 200, description = "Mood log", body = MoodLog),
        (status = 403, description = "Precheck not completed")
    )
)]
pub async fn mood_log_handler(Extension(session): Extension<SessionHandle>) -> Json<MoodLog> {
    let session = session.lock().await;
    Json(MoodLog {
        moods: session
            .precheck
            .mood_history()
            .iter()
            .map(MoodView::from)
            .collect(),
    })
}

/// GET /images/{keyword} - Picture of the remedy for a catalog keyword
#[utoipa::path(
    get,
    path = "/images/{keyword}",
    params(
        ("keyword" = String, Path, description = "Catalog keyword, e.g. `headache`.")
    ),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 404, description = "Unknown keyword or image unavailable")
    )
)]
pub async fn remedy_image_handler(
    State(state): State<Arc<AppState>>,
    Path(keyword): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let image_ref = remedy_for_keyword(&keyword)
        .and_then(|remedy| remedy.image_ref)
        .ok_or((StatusCode::NOT_FOUND, "No image for this remedy".to_string()))?;

    let image = state.main_screen.images().load(image_ref).await.ok_or_else(|| {
        warn!("Image {} for '{}' is unavailable.", image_ref, keyword);
        (StatusCode::NOT_FOUND, "Image unavailable".to_string())
    })?;

    Ok((
        [(header::CONTENT_TYPE, image.content_type)],
        bytes::Bytes::from(image.bytes),
    ))
}
