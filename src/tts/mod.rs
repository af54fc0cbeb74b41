pub mod openai;
pub mod storage;
pub mod synthesizer;

pub use openai::OpenAiSpeech;
pub use storage::{AudioStore, sanitize_stem};
pub use synthesizer::{MockSpeechSynthesizer, SpeechSynthesizer};
