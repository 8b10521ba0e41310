//! crates/biofortune_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any web framework or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// One herbal remedy from the local catalog.
///
/// Records are static data compiled into the binary; they are never created
/// or mutated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemedyRecord {
    pub english_name: &'static str,
    /// Display name in Nepali.
    pub local_name: &'static str,
    /// Local file name or remote URL of a picture of the herb.
    pub image_ref: Option<&'static str>,
    pub usage_instructions: &'static str,
    pub pros: &'static [&'static str],
    pub cons: &'static [&'static str],
}

impl RemedyRecord {
    /// Every field except `image_ref` must be non-empty.
    pub fn is_well_formed(&self) -> bool {
        !self.english_name.is_empty()
            && !self.local_name.is_empty()
            && !self.usage_instructions.is_empty()
            && !self.pros.is_empty()
            && !self.cons.is_empty()
            && self.pros.iter().chain(self.cons.iter()).all(|s| !s.is_empty())
    }
}

/// The fixed set of moods a user can report on the precheck screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoodLabel {
    Joyful,
    Happy,
    Neutral,
    Sad,
    Angry,
}

impl MoodLabel {
    /// All moods, in the order the buttons are shown.
    pub const ALL: [MoodLabel; 5] = [
        MoodLabel::Joyful,
        MoodLabel::Happy,
        MoodLabel::Neutral,
        MoodLabel::Sad,
        MoodLabel::Angry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::Joyful => "joyful",
            MoodLabel::Happy => "happy",
            MoodLabel::Neutral => "neutral",
            MoodLabel::Sad => "sad",
            MoodLabel::Angry => "angry",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            MoodLabel::Joyful => "😄",
            MoodLabel::Happy => "🙂",
            MoodLabel::Neutral => "😐",
            MoodLabel::Sad => "😔",
            MoodLabel::Angry => "😡",
        }
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown mood: {0}")]
pub struct UnknownMood(pub String);

impl FromStr for MoodLabel {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        MoodLabel::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| UnknownMood(s.to_string()))
    }
}

/// A single mood report, stamped with the time the button was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodEntry {
    pub recorded_at: DateTime<Utc>,
    pub mood: MoodLabel,
}

/// Image bytes produced by an `ImageLoader`, with the sniffed content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}
