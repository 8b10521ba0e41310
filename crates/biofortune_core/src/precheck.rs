//! crates/biofortune_core/src/precheck.rs
//!
//! The precheck gate: mood capture plus an optional timed eye exercise that
//! must finish (or be skipped) before the main screen opens.
//!
//! The countdown never keeps its own counter. Every call to `evaluate`
//! recomputes the elapsed time from the supplied wall-clock reading, so late
//! or irregular ticks cannot drift the timer.

use crate::domain::{MoodEntry, MoodLabel};
use chrono::{DateTime, Utc};

/// Length of the eye exercise.
pub const EXERCISE_SECONDS: i64 = 30;

pub const EXERCISE_INSTRUCTIONS: &str = "Instructions: 1) Close eyes and gently rub palms. 2) Look at a distant object for 20 seconds. 3) Blink slowly for 10 seconds.";

pub const EXERCISE_COMPLETE_MESSAGE: &str = "Great! You're ready. Entering the app...";

/// Where the user stands relative to the main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    AwaitingEntryChoice,
    ExerciseRunning { started_at: DateTime<Utc> },
    Entered,
}

/// A snapshot of the countdown, produced by `Precheck::evaluate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Countdown {
    /// No exercise is running and the gate is still closed.
    NotStarted,
    Running {
        /// Fraction of the exercise done, in `[0, 1]`.
        progress: f32,
        remaining_secs: i64,
    },
    /// The gate is open, either because the countdown ran out or the user skipped.
    Entered,
}

/// Per-session precheck state.
#[derive(Debug, Clone)]
pub struct Precheck {
    gate: Gate,
    mood_history: Vec<MoodEntry>,
    selected_mood: Option<MoodLabel>,
}

impl Default for Precheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Precheck {
    pub fn new() -> Self {
        Self {
            gate: Gate::AwaitingEntryChoice,
            mood_history: Vec::new(),
            selected_mood: None,
        }
    }

    pub fn gate(&self) -> Gate {
        self.gate
    }

    pub fn is_entered(&self) -> bool {
        self.gate == Gate::Entered
    }

    pub fn selected_mood(&self) -> Option<MoodLabel> {
        self.selected_mood
    }

    /// Full mood history, oldest first.
    pub fn mood_history(&self) -> &[MoodEntry] {
        &self.mood_history
    }

    /// The last `count` moods, oldest first.
    pub fn recent_moods(&self, count: usize) -> &[MoodEntry] {
        let start = self.mood_history.len().saturating_sub(count);
        &self.mood_history[start..]
    }

    /// Appends a mood report. The gate is not affected.
    pub fn record_mood(&mut self, mood: MoodLabel, at: DateTime<Utc>) -> MoodEntry {
        let entry = MoodEntry {
            recorded_at: at,
            mood,
        };
        self.mood_history.push(entry);
        self.selected_mood = Some(mood);
        entry
    }

    /// Starts (or restarts) the eye exercise at `now`.
    ///
    /// Returns `false` and leaves the gate open when the user has already
    /// entered; only `reopen` closes an open gate.
    pub fn start_exercise(&mut self, now: DateTime<Utc>) -> bool {
        if self.evaluate(now) == Countdown::Entered {
            return false;
        }
        self.gate = Gate::ExerciseRunning { started_at: now };
        true
    }

    pub fn skip(&mut self) {
        self.gate = Gate::Entered;
    }

    /// Closes the gate again without touching the mood history.
    pub fn reopen(&mut self) {
        self.gate = Gate::AwaitingEntryChoice;
    }

    /// Re-evaluates the countdown against `now`, opening the gate once the
    /// full exercise time has elapsed.
    pub fn evaluate(&mut self, now: DateTime<Utc>) -> Countdown {
        match self.gate {
            Gate::AwaitingEntryChoice => Countdown::NotStarted,
            Gate::Entered => Countdown::Entered,
            Gate::ExerciseRunning { started_at } => {
                let elapsed = (now - started_at).num_seconds().max(0);
                let remaining_secs = (EXERCISE_SECONDS - elapsed).max(0);
                if remaining_secs == 0 {
                    self.gate = Gate::Entered;
                    return Countdown::Entered;
                }
                let progress = (elapsed as f32 / EXERCISE_SECONDS as f32).min(1.0);
                Countdown::Running {
                    progress,
                    remaining_secs,
                }
            }
        }
    }
}
