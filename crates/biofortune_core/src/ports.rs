//! crates/biofortune_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like HTTP clients or LLM APIs.

use async_trait::async_trait;

use crate::domain::LoadedImage;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, API).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("{0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Sends one prompt to the text-generation model and returns its reply verbatim.
    async fn generate(&self, prompt: &str) -> PortResult<String>;
}

#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Loads an image from a local reference or a remote URL.
    ///
    /// Any fetch or decode failure yields `None`; callers render without an image.
    async fn load(&self, image_ref: &str) -> Option<LoadedImage>;
}
