pub mod gemini_llm;
pub mod images;

pub use gemini_llm::GeminiTextAdapter;
pub use images::FsHttpImageLoader;
