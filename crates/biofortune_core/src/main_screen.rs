//! crates/biofortune_core/src/main_screen.rs
//!
//! The main screen's two actions: "Find Remedy" (catalog first, AI on a miss)
//! and "Ask AI only".

use std::sync::Arc;
use tracing::info;

use crate::ai_fallback::{AiFallback, Suggestion};
use crate::domain::RemedyRecord;
use crate::ports::ImageLoader;
use crate::resolver::{resolve, Outcome};

pub const FIND_PROMPT_MESSAGE: &str = "Please enter a symptom to search.";
pub const ASK_AI_PROMPT_MESSAGE: &str = "Please enter symptoms first.";
pub const LOCAL_MISS_NOTICE: &str =
    "Not found in local database — fetching an AI suggestion...";
pub const TIP_OF_THE_DAY: &str =
    "Drink warm water first thing in the morning to support digestion.";

/// What "Find Remedy" produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FindResult {
    /// The input was empty; nothing was invoked.
    PromptForInput(&'static str),
    /// Blocking warning, not a recommendation.
    Critical(String),
    Found {
        keyword: &'static str,
        remedy: &'static RemedyRecord,
        /// Whether the remedy's image could be loaded.
        image_available: bool,
    },
    /// Local miss followed by an AI suggestion.
    NotFound {
        notice: &'static str,
        suggestion: Suggestion,
    },
}

/// What "Ask AI only" produced.
#[derive(Debug, Clone, PartialEq)]
pub enum AskAiResult {
    PromptForInput(&'static str),
    Suggested(Suggestion),
}

#[derive(Clone)]
pub struct MainScreen {
    ai: AiFallback,
    images: Arc<dyn ImageLoader>,
}

impl MainScreen {
    pub fn new(ai: AiFallback, images: Arc<dyn ImageLoader>) -> Self {
        Self { ai, images }
    }

    pub fn ai(&self) -> &AiFallback {
        &self.ai
    }

    pub fn images(&self) -> &Arc<dyn ImageLoader> {
        &self.images
    }

    pub async fn find_remedy(&self, input: &str) -> FindResult {
        if input.trim().is_empty() {
            return FindResult::PromptForInput(FIND_PROMPT_MESSAGE);
        }

        match resolve(input) {
            Outcome::Critical { message } => {
                info!("Critical symptom detected.");
                FindResult::Critical(message)
            }
            Outcome::Found { keyword, remedy } => {
                info!("Catalog match on keyword '{}'.", keyword);
                let image_available = match remedy.image_ref {
                    Some(image_ref) => self.images.load(image_ref).await.is_some(),
                    None => false,
                };
                FindResult::Found {
                    keyword,
                    remedy,
                    image_available,
                }
            }
            Outcome::NotFound => {
                info!("No catalog match; falling back to AI.");
                FindResult::NotFound {
                    notice: LOCAL_MISS_NOTICE,
                    suggestion: self.ai.suggest(input).await,
                }
            }
        }
    }

    pub async fn ask_ai(&self, input: &str) -> AskAiResult {
        if input.trim().is_empty() {
            return AskAiResult::PromptForInput(ASK_AI_PROMPT_MESSAGE);
        }
        AskAiResult::Suggested(self.ai.suggest(input).await)
    }
}
