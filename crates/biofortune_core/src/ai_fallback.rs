//! crates/biofortune_core/src/ai_fallback.rs
//!
//! Wraps the text-generation port with the fixed herbal-assistant prompt.
//! When no credential was configured the generator is absent and the wrapper
//! answers with a fixed message instead of calling out.

use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::ports::TextGenerationService;

pub const AI_DISABLED_MESSAGE: &str =
    "AI not configured. Add GEMINI_API_KEY to secrets to enable AI suggestions.";

const PROMPT_TEMPLATE: &str = r#"
You are a friendly Nepali herbal medicine assistant. The user reports: "{symptom}".
Give a short recommendation with:
- Herb name (English and Nepali)
- Simple dosage / how to use
- Pros and cons (2-3 each)
- When to see a doctor (if any)
Keep it concise (max ~180 words).
"#;

/// Builds the prompt for one symptom. The text is embedded as-is.
pub fn build_prompt(symptom: &str) -> String {
    PROMPT_TEMPLATE.replace("{symptom}", symptom)
}

/// What the AI fallback produced for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    /// No credential is configured; no request was made.
    Disabled,
    /// The model's reply, verbatim.
    Generated(String),
    /// The request failed; holds the error description.
    Failed(String),
}

impl Suggestion {
    pub fn into_text(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suggestion::Disabled => f.write_str(AI_DISABLED_MESSAGE),
            Suggestion::Generated(text) => f.write_str(text),
            Suggestion::Failed(description) => write!(f, "⚠️ AI Error: {}", description),
        }
    }
}

#[derive(Clone, Default)]
pub struct AiFallback {
    generator: Option<Arc<dyn TextGenerationService>>,
}

impl AiFallback {
    pub fn new(generator: Option<Arc<dyn TextGenerationService>>) -> Self {
        Self { generator }
    }

    pub fn disabled() -> Self {
        Self { generator: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Issues exactly one generation request for `symptom`.
    pub async fn suggest(&self, symptom: &str) -> Suggestion {
        let Some(generator) = &self.generator else {
            return Suggestion::Disabled;
        };

        info!("Requesting AI remedy suggestion.");
        match generator.generate(&build_prompt(symptom)).await {
            Ok(text) => Suggestion::Generated(text),
            Err(e) => {
                warn!("AI suggestion failed: {}", e);
                Suggestion::Failed(e.to_string())
            }
        }
    }
}
