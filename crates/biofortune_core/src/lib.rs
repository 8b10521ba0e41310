pub mod ai_fallback;
pub mod catalog;
pub mod domain;
pub mod main_screen;
pub mod ports;
pub mod precheck;
pub mod resolver;

pub use ai_fallback::{AiFallback, Suggestion, AI_DISABLED_MESSAGE};
pub use domain::{LoadedImage, MoodEntry, MoodLabel, RemedyRecord, UnknownMood};
pub use main_screen::{AskAiResult, FindResult, MainScreen};
pub use ports::{ImageLoader, PortError, PortResult, TextGenerationService};
pub use precheck::{Countdown, Gate, Precheck};
pub use resolver::{resolve, Outcome};
