//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development. The Gemini key may also come from a
//! secret store: a file named `GEMINI_API_KEY` inside `SECRETS_DIR`.

use chrono::Duration;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::Level;

pub const GEMINI_KEY_NAME: &str = "GEMINI_API_KEY";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub cors_origin: String,
    /// `None` disables AI suggestions.
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub gemini_model: String,
    pub images_dir: PathBuf,
    /// Sessions unused for longer than this are discarded.
    pub session_idle_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = std::env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        // --- Load the Gemini credential (optional) ---
        let secrets_dir = std::env::var("SECRETS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/run/secrets"));
        let gemini_api_key =
            resolve_api_key(&secrets_dir, std::env::var(GEMINI_KEY_NAME).ok());

        // --- Load Adapter-specific Settings ---
        let gemini_api_base = std::env::var("GEMINI_API_BASE").unwrap_or_else(|_| {
            "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
        });
        let gemini_model = std::env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| "gemini-2.5-flash-lite".to_string());
        let images_dir = std::env::var("IMAGES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./assets/images"));

        // --- Load Session Settings ---
        let idle_minutes_str =
            std::env::var("SESSION_IDLE_MINUTES").unwrap_or_else(|_| "30".to_string());
        let session_idle_timeout = parse_idle_minutes(&idle_minutes_str)?;

        Ok(Self {
            bind_address,
            log_level,
            cors_origin,
            gemini_api_key,
            gemini_api_base,
            gemini_model,
            images_dir,
            session_idle_timeout,
        })
    }
}

/// Parses a positive whole number of minutes.
fn parse_idle_minutes(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(minutes) if minutes > 0 => Ok(Duration::minutes(i64::from(minutes))),
        _ => Err(ConfigError::InvalidValue(
            "SESSION_IDLE_MINUTES".to_string(),
            format!("'{}' is not a positive number of minutes", value),
        )),
    }
}

/// Picks the Gemini key: the secret store first, then the environment value.
/// Blank values count as absent.
pub fn resolve_api_key(secrets_dir: &Path, env_value: Option<String>) -> Option<String> {
    let from_secrets = std::fs::read_to_string(secrets_dir.join(GEMINI_KEY_NAME)).ok();
    from_secrets
        .into_iter()
        .chain(env_value)
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}
