//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{FsHttpImageLoader, GeminiTextAdapter},
    config::Config,
    error::ApiError,
    web::{build_router, rest::ApiDoc, state::AppState},
};
use axum::http::{
    header::{ACCEPT, CONTENT_TYPE, COOKIE},
    HeaderValue, Method,
};
use axum::Router;
use biofortune_core::ports::TextGenerationService;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const SESSION_SWEEP_PERIOD: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    let generator: Option<Arc<dyn TextGenerationService>> = match &config.gemini_api_key {
        Some(key) => {
            info!("Gemini configured with model {}.", config.gemini_model);
            let adapter: Arc<dyn TextGenerationService> = Arc::new(GeminiTextAdapter::from_key(
                key,
                &config.gemini_api_base,
                config.gemini_model.clone(),
            ));
            Some(adapter)
        }
        None => {
            warn!("GEMINI_API_KEY not set; AI suggestions are disabled.");
            None
        }
    };
    let images = Arc::new(FsHttpImageLoader::new(config.images_dir.clone()));

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(&config, generator, images));
    let _sweeper = app_state.sessions.spawn_sweeper(SESSION_SWEEP_PERIOD);

    let cors_origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!(
            "Invalid CORS origin '{}': {}",
            config.cors_origin, e
        ))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT, COOKIE]);

    // --- 4. Create the Web Router ---
    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(build_router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
