pub mod countdown_task;
pub mod middleware;
pub mod precheck;
pub mod protocol;
pub mod rest;
pub mod sessions;
pub mod state;
pub mod views;
pub mod ws_handler;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use middleware::{require_entry, require_session};
pub use state::AppState;
pub use ws_handler::countdown_ws_handler;

/// Builds the full API router: public routes, precheck routes (session
/// required) and main-screen routes (session required and gate open).
pub fn build_router(app_state: Arc<AppState>) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route(
            "/sessions",
            post(sessions::create_session_handler).delete(sessions::end_session_handler),
        )
        .route("/images/{keyword}", get(rest::remedy_image_handler));

    // Precheck screen (session required)
    let precheck_routes = Router::new()
        .route("/precheck", get(precheck::get_precheck_handler))
        .route("/precheck/mood", post(precheck::record_mood_handler))
        .route("/precheck/exercise", post(precheck::start_exercise_handler))
        .route("/precheck/skip", post(precheck::skip_handler))
        .route("/precheck/countdown", get(countdown_ws_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_session,
        ));

    // Main screen (session required, precheck gate open).
    // Layers run last-added first, so the session is resolved before the gate check.
    let main_routes = Router::new()
        .route("/main", get(rest::main_screen_handler))
        .route("/main/eye-exercises", post(rest::eye_exercises_handler))
        .route("/moods", get(rest::mood_log_handler))
        .route("/remedies/find", post(rest::find_remedy_handler))
        .route("/remedies/ask-ai", post(rest::ask_ai_handler))
        .layer(axum_middleware::from_fn(require_entry))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(precheck_routes)
        .merge(main_routes)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, Response, StatusCode};
    use biofortune_core::{
        ai_fallback::AI_DISABLED_MESSAGE,
        domain::LoadedImage,
        ports::{ImageLoader, PortResult, TextGenerationService},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use tower::ServiceExt;

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerationService for EchoGenerator {
        async fn generate(&self, prompt: &str) -> PortResult<String> {
            Ok(format!("echo: {}", prompt.len()))
        }
    }

    /// Serves a PNG for `peppermint.jpg` only.
    struct PeppermintOnly;

    #[async_trait]
    impl ImageLoader for PeppermintOnly {
        async fn load(&self, image_ref: &str) -> Option<LoadedImage> {
            (image_ref == "peppermint.jpg").then(|| LoadedImage {
                bytes: vec![0x89, b'P', b'N', b'G'],
                content_type: "image/png",
            })
        }
    }

    fn test_config() -> Config {
        Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            log_level: tracing::Level::INFO,
            cors_origin: "http://localhost:3000".to_string(),
            gemini_api_key: None,
            gemini_api_base: "http://127.0.0.1:1".to_string(),
            gemini_model: "gemini-2.5-flash-lite".to_string(),
            images_dir: PathBuf::from("."),
            session_idle_timeout: chrono::Duration::minutes(30),
        }
    }

    fn test_state(generator: Option<Arc<dyn TextGenerationService>>) -> Arc<AppState> {
        Arc::new(AppState::new(&test_config(), generator, Arc::new(PeppermintOnly)))
    }

    fn test_router(generator: Option<Arc<dyn TextGenerationService>>) -> Router {
        build_router(test_state(generator))
    }

    fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, c);
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: Response<Body>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Starts a session and returns the cookie to send back.
    async fn start_session(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(request("POST", "/sessions", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
        app.clone().oneshot(req).await.unwrap()
    }

    #[tokio::test]
    async fn routes_require_a_session() {
        let app = test_router(None);

        let response = send(&app, request("GET", "/precheck", None, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let stale = format!("session={}", uuid::Uuid::new_v4());
        let response = send(&app, request("GET", "/main", Some(&stale), None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn main_screen_is_closed_until_skip() {
        let app = test_router(None);
        let cookie = start_session(&app).await;
        let find = json!({"symptom": "I have a headache"});

        let response = send(&app, request("POST", "/remedies/find", Some(&cookie), Some(find.clone()))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = send(&app, request("POST", "/precheck/skip", Some(&cookie), None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["entered"], true);

        let response = send(&app, request("POST", "/remedies/find", Some(&cookie), Some(find))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let view = body_json(response).await;
        assert_eq!(view["kind"], "found");
        assert_eq!(view["remedy"]["english_name"], "Peppermint");
        assert_eq!(view["remedy"]["image_url"], "/images/headache");
    }

    #[tokio::test]
    async fn running_exercise_keeps_the_gate_closed() {
        let app = test_router(None);
        let cookie = start_session(&app).await;

        let response = send(&app, request("POST", "/precheck/exercise", Some(&cookie), None)).await;
        let screen = body_json(response).await;
        assert_eq!(screen["entered"], false);
        assert_eq!(screen["countdown"]["state"], "running");
        assert_eq!(screen["countdown"]["remaining_secs"], 30);

        let response = send(&app, request("GET", "/main", Some(&cookie), None)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn starting_the_exercise_after_entry_is_a_conflict() {
        let app = test_router(None);
        let cookie = start_session(&app).await;
        send(&app, request("POST", "/precheck/skip", Some(&cookie), None)).await;

        let response = send(&app, request("POST", "/precheck/exercise", Some(&cookie), None)).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = send(&app, request("GET", "/main", Some(&cookie), None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        send(&app, request("POST", "/main/eye-exercises", Some(&cookie), None)).await;
        let response = send(&app, request("POST", "/precheck/exercise", Some(&cookie), None)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn critical_and_unmatched_symptoms_render_their_views() {
        let app = test_router(None);
        let cookie = start_session(&app).await;
        send(&app, request("POST", "/precheck/skip", Some(&cookie), None)).await;

        let response = send(
            &app,
            request("POST", "/remedies/find", Some(&cookie), Some(json!({"symptom": "sudden chest pain and can't breathe"}))),
        )
        .await;
        assert_eq!(body_json(response).await["kind"], "critical");

        let response = send(
            &app,
            request("POST", "/remedies/find", Some(&cookie), Some(json!({"symptom": "feeling weird"}))),
        )
        .await;
        let view = body_json(response).await;
        assert_eq!(view["kind"], "not_found");
        assert_eq!(view["suggestion"]["status"], "disabled");
        assert_eq!(view["suggestion"]["text"], AI_DISABLED_MESSAGE);

        let response = send(
            &app,
            request("POST", "/remedies/find", Some(&cookie), Some(json!({"symptom": ""}))),
        )
        .await;
        let view = body_json(response).await;
        assert_eq!(view["kind"], "prompt");
        assert_eq!(view["message"], "Please enter a symptom to search.");
    }

    #[tokio::test]
    async fn ask_ai_uses_the_generator_even_for_catalog_symptoms() {
        let generator: Arc<dyn TextGenerationService> = Arc::new(EchoGenerator);
        let app = test_router(Some(generator));
        let cookie = start_session(&app).await;
        send(&app, request("POST", "/precheck/skip", Some(&cookie), None)).await;

        let response = send(
            &app,
            request("POST", "/remedies/ask-ai", Some(&cookie), Some(json!({"symptom": "headache"}))),
        )
        .await;
        let view = body_json(response).await;
        assert_eq!(view["kind"], "ai_suggestion");
        assert_eq!(view["suggestion"]["status"], "generated");
        assert!(view["suggestion"]["text"].as_str().unwrap().starts_with("echo: "));

        let response = send(&app, request("GET", "/main", Some(&cookie), None)).await;
        assert_eq!(body_json(response).await["ai_enabled"], true);
    }

    #[tokio::test]
    async fn moods_survive_returning_to_eye_exercises() {
        let app = test_router(None);
        let cookie = start_session(&app).await;

        for mood in ["happy", "sad"] {
            let response = send(
                &app,
                request("POST", "/precheck/mood", Some(&cookie), Some(json!({"mood": mood}))),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_json(response).await["message"], format!("Saved mood: {}", mood));
        }
        let response = send(
            &app,
            request("POST", "/precheck/mood", Some(&cookie), Some(json!({"mood": "sleepy"}))),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        send(&app, request("POST", "/precheck/skip", Some(&cookie), None)).await;
        let response = send(&app, request("GET", "/moods", Some(&cookie), None)).await;
        let log = body_json(response).await;
        let moods: Vec<_> = log["moods"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["mood"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(moods, vec!["happy", "sad"]);

        let response = send(&app, request("POST", "/main/eye-exercises", Some(&cookie), None)).await;
        let screen = body_json(response).await;
        assert_eq!(screen["entered"], false);
        assert_eq!(screen["recent_moods"].as_array().unwrap().len(), 2);

        let response = send(&app, request("GET", "/moods", Some(&cookie), None)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn remedy_images_are_served_or_missing() {
        let app = test_router(None);

        let response = send(&app, request("GET", "/images/headache", None, None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");

        let response = send(&app, request("GET", "/images/stress", None, None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, request("GET", "/images/hiccups", None, None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn ending_a_session_discards_it() {
        let app = test_router(None);
        let cookie = start_session(&app).await;

        let response = send(&app, request("DELETE", "/sessions", Some(&cookie), None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, request("GET", "/precheck", Some(&cookie), None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = send(&app, request("DELETE", "/sessions", Some(&cookie), None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    mod countdown_socket {
        use super::*;
        use futures::{SinkExt, StreamExt};
        use std::net::SocketAddr;
        use std::time::Duration;
        use tokio_tungstenite::{
            connect_async,
            tungstenite::{client::IntoClientRequest, http::HeaderValue, Message},
            MaybeTlsStream, WebSocketStream,
        };

        type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

        async fn serve(app: Router) -> SocketAddr {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
            addr
        }

        async fn connect(addr: SocketAddr, cookie: &str) -> Socket {
            let mut request = format!("ws://{}/precheck/countdown", addr)
                .into_client_request()
                .unwrap();
            request
                .headers_mut()
                .insert("cookie", HeaderValue::from_str(cookie).unwrap());
            let (socket, _) = connect_async(request).await.unwrap();
            socket
        }

        async fn next_json(socket: &mut Socket) -> Value {
            loop {
                let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
                    .await
                    .expect("timed out waiting for a countdown frame")
                    .expect("socket closed")
                    .unwrap();
                if let Message::Text(text) = frame {
                    return serde_json::from_str(&text).unwrap();
                }
            }
        }

        /// Reads frames until one of the given `type` arrives.
        async fn next_of_type(socket: &mut Socket, kind: &str) -> Value {
            loop {
                let msg = next_json(socket).await;
                if msg["type"] == kind {
                    return msg;
                }
            }
        }

        async fn push(socket: &mut Socket, msg: Value) {
            socket.send(Message::Text(msg.to_string())).await.unwrap();
        }

        #[tokio::test]
        async fn socket_keeps_ticking_across_reopen_and_rest_restart() {
            let state = test_state(None);
            let app = build_router(state.clone());
            let session_id = state.sessions.create().await;
            let cookie = format!("session={}", session_id);
            let addr = serve(app.clone()).await;

            let mut socket = connect(addr, &cookie).await;
            assert_eq!(next_json(&mut socket).await["type"], "awaiting_entry_choice");

            push(&mut socket, json!({"type": "start_exercise"})).await;
            let tick = next_of_type(&mut socket, "tick").await;
            assert!(tick["remaining_secs"].as_i64().unwrap() >= 29);

            push(&mut socket, json!({"type": "skip_and_enter"})).await;
            let entered = next_of_type(&mut socket, "entered").await;
            assert_eq!(entered["message"], "Great! You're ready. Entering the app...");

            push(&mut socket, json!({"type": "start_exercise"})).await;
            assert_eq!(next_json(&mut socket).await["type"], "error");

            // Return via the quick link and restart over REST; the open socket resumes ticking.
            let response = send(&app, request("POST", "/main/eye-exercises", Some(&cookie), None)).await;
            assert_eq!(response.status(), StatusCode::OK);
            let response = send(&app, request("POST", "/precheck/exercise", Some(&cookie), None)).await;
            assert_eq!(response.status(), StatusCode::OK);

            let tick = next_of_type(&mut socket, "tick").await;
            assert!(tick["remaining_secs"].as_i64().unwrap() >= 29);

            socket.close(None).await.unwrap();
        }

        #[tokio::test]
        async fn socket_requires_a_session() {
            let addr = serve(test_router(None)).await;
            let request = format!("ws://{}/precheck/countdown", addr)
                .into_client_request()
                .unwrap();
            assert!(connect_async(request).await.is_err());
        }
    }
}
