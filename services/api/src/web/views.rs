//! services/api/src/web/views.rs
//!
//! JSON payloads exchanged with the browser. Each "view" tells the front-end
//! what to draw; layout and styling stay on the client.

use biofortune_core::{
    ai_fallback::Suggestion,
    domain::{MoodEntry, MoodLabel},
    main_screen::{AskAiResult, FindResult, TIP_OF_THE_DAY},
    precheck::{Countdown, Precheck, EXERCISE_COMPLETE_MESSAGE, EXERCISE_INSTRUCTIONS},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// How many moods the precheck screen lists.
pub const RECENT_MOOD_COUNT: usize = 6;

pub const AI_SUGGESTION_TITLE: &str = "🤖 AI Suggested Remedy";

//=========================================================================================
// Request Payloads
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SymptomRequest {
    /// Free-text description of how the user feels.
    #[serde(default)]
    pub symptom: String,
}

#[derive(Deserialize, ToSchema)]
pub struct MoodRequest {
    /// One of `joyful`, `happy`, `neutral`, `sad`, `angry`.
    pub mood: String,
}

//=========================================================================================
// Session Views
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

//=========================================================================================
// Precheck Views
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct MoodOption {
    pub mood: String,
    pub emoji: String,
    pub label: String,
}

impl From<MoodLabel> for MoodOption {
    fn from(mood: MoodLabel) -> Self {
        let name = mood.as_str();
        let mut label = name[..1].to_uppercase();
        label.push_str(&name[1..]);
        Self {
            mood: name.to_string(),
            emoji: mood.emoji().to_string(),
            label,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MoodView {
    pub mood: String,
    pub emoji: String,
    pub recorded_at: DateTime<Utc>,
    /// `recorded_at` formatted as `%Y-%m-%d %H:%M:%S`.
    pub display_time: String,
}

impl From<&MoodEntry> for MoodView {
    fn from(entry: &MoodEntry) -> Self {
        Self {
            mood: entry.mood.as_str().to_string(),
            emoji: entry.mood.emoji().to_string(),
            recorded_at: entry.recorded_at,
            display_time: entry.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MoodSaved {
    pub message: String,
    pub entry: MoodView,
}

#[derive(Serialize, ToSchema)]
pub struct MoodLog {
    pub moods: Vec<MoodView>,
}

#[derive(Serialize, Debug, PartialEq, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CountdownView {
    NotStarted,
    Running { progress: f32, remaining_secs: i64 },
    Entered { message: String },
}

impl From<Countdown> for CountdownView {
    fn from(countdown: Countdown) -> Self {
        match countdown {
            Countdown::NotStarted => CountdownView::NotStarted,
            Countdown::Running {
                progress,
                remaining_secs,
            } => CountdownView::Running {
                progress,
                remaining_secs,
            },
            Countdown::Entered => CountdownView::Entered {
                message: EXERCISE_COMPLETE_MESSAGE.to_string(),
            },
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PrecheckScreen {
    pub entered: bool,
    pub moods: Vec<MoodOption>,
    pub selected_mood: Option<String>,
    pub exercise_instructions: String,
    pub countdown: CountdownView,
    pub recent_moods: Vec<MoodView>,
}

impl PrecheckScreen {
    /// Renders the precheck screen from a freshly evaluated countdown.
    pub fn render(precheck: &Precheck, countdown: Countdown) -> Self {
        Self {
            entered: precheck.is_entered(),
            moods: MoodLabel::ALL.into_iter().map(MoodOption::from).collect(),
            selected_mood: precheck.selected_mood().map(|m| m.as_str().to_string()),
            exercise_instructions: EXERCISE_INSTRUCTIONS.to_string(),
            countdown: countdown.into(),
            recent_moods: precheck
                .recent_moods(RECENT_MOOD_COUNT)
                .iter()
                .map(MoodView::from)
                .collect(),
        }
    }
}

//=========================================================================================
// Main Screen Views
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct MainScreenView {
    pub tip_of_the_day: String,
    pub quick_links: Vec<String>,
    pub ai_enabled: bool,
}

impl MainScreenView {
    pub fn new(ai_enabled: bool) -> Self {
        Self {
            tip_of_the_day: TIP_OF_THE_DAY.to_string(),
            quick_links: vec!["Eye Exercises".to_string(), "Mood Log".to_string()],
            ai_enabled,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct RemedyCard {
    pub keyword: String,
    pub english_name: String,
    pub local_name: String,
    /// Present only when the image could be loaded.
    pub image_url: Option<String>,
    pub usage_instructions: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

#[derive(Serialize, Debug, PartialEq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    Generated,
    Failed,
    Disabled,
}

/// An informational, non-authoritative AI answer.
#[derive(Serialize, ToSchema)]
pub struct AiSuggestionView {
    pub title: String,
    pub status: SuggestionStatus,
    pub text: String,
}

impl From<Suggestion> for AiSuggestionView {
    fn from(suggestion: Suggestion) -> Self {
        let status = match &suggestion {
            Suggestion::Generated(_) => SuggestionStatus::Generated,
            Suggestion::Failed(_) => SuggestionStatus::Failed,
            Suggestion::Disabled => SuggestionStatus::Disabled,
        };
        Self {
            title: AI_SUGGESTION_TITLE.to_string(),
            status,
            text: suggestion.into_text(),
        }
    }
}

/// The result area of the main screen.
#[derive(Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RemedyView {
    /// Input was empty.
    Prompt { message: String },
    /// Blocking warning: see a doctor.
    Critical { message: String },
    Found { remedy: RemedyCard },
    /// Local miss, with the AI's suggestion.
    NotFound {
        notice: String,
        suggestion: AiSuggestionView,
    },
    AiSuggestion { suggestion: AiSuggestionView },
}

impl From<FindResult> for RemedyView {
    fn from(result: FindResult) -> Self {
        match result {
            FindResult::PromptForInput(message) => RemedyView::Prompt {
                message: message.to_string(),
            },
            FindResult::Critical(message) => RemedyView::Critical {
                message: format!("⚠️ {}", message),
            },
            FindResult::Found {
                keyword,
                remedy,
                image_available,
            } => RemedyView::Found {
                remedy: RemedyCard {
                    keyword: keyword.to_string(),
                    english_name: remedy.english_name.to_string(),
                    local_name: remedy.local_name.to_string(),
                    image_url: image_available.then(|| image_url(keyword)),
                    usage_instructions: remedy.usage_instructions.to_string(),
                    pros: remedy.pros.iter().map(|s| s.to_string()).collect(),
                    cons: remedy.cons.iter().map(|s| s.to_string()).collect(),
                },
            },
            FindResult::NotFound { notice, suggestion } => RemedyView::NotFound {
                notice: notice.to_string(),
                suggestion: suggestion.into(),
            },
        }
    }
}

impl From<AskAiResult> for RemedyView {
    fn from(result: AskAiResult) -> Self {
        match result {
            AskAiResult::PromptForInput(message) => RemedyView::Prompt {
                message: message.to_string(),
            },
            AskAiResult::Suggested(suggestion) => RemedyView::AiSuggestion {
                suggestion: suggestion.into(),
            },
        }
    }
}

/// Path under which the remedy image for `keyword` is served.
pub fn image_url(keyword: &str) -> String {
    format!("/images/{}", keyword.replace(' ', "%20"))
}
