pub mod generator;
pub mod openai;

pub use generator::{ChatMessage, MockTextGenerator, Role, TextGenerator};
pub use openai::OpenAiChat;
