//! services/api/src/adapters/gemini_llm.rs
//!
//! This module contains the adapter for the remedy-suggestion LLM.
//! It implements the `TextGenerationService` port from the `core` crate by
//! talking to Gemini through its OpenAI-compatible chat completions endpoint.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use biofortune_core::ports::{PortError, PortResult, TextGenerationService};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TextGenerationService` using a Gemini model.
#[derive(Clone)]
pub struct GeminiTextAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl GeminiTextAdapter {
    /// Creates a new `GeminiTextAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Builds the adapter from a key and the OpenAI-compatible base URL.
    pub fn from_key(api_key: &str, api_base: &str, model: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        Self::new(Client::with_config(config), model)
    }
}

//=========================================================================================
// `TextGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextGenerationService for GeminiTextAdapter {
    /// Sends the prompt as a single user message and returns the first choice's text.
    async fn generate(&self, prompt: &str) -> PortResult<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage::from(prompt),
            )])
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        if let Some(choice) = response.choices.into_iter().next() {
            if let Some(content) = choice.message.content {
                Ok(content)
            } else {
                Err(PortError::Unexpected(
                    "Gemini response contained no text content.".to_string(),
                ))
            }
        } else {
            Err(PortError::Unexpected(
                "Gemini returned no choices in its response.".to_string(),
            ))
        }
    }
}
