//! Default configuration constants for vocards.
//!
//! Shared by the config structs, the CLI and the service clients so the same
//! value never has to be spelled twice.

/// Language of the vocabulary list. Selects `prompts/<language>/prompt.txt`.
pub const LANGUAGE: &str = "russian";

/// Vocabulary input file, one `translated - original` pair per line.
pub const VOCAB_FILE: &str = "vocab.txt";

/// Directory holding one prompt subdirectory per language.
pub const PROMPTS_DIR: &str = "prompts";

/// Name of the instruction file inside a language's prompt directory.
pub const PROMPT_FILE_NAME: &str = "prompt.txt";

/// Directory the synthesized mp3 files are written to.
pub const AUDIO_DIR: &str = "audio";

/// Extension appended to every stored audio artifact.
pub const AUDIO_EXTENSION: &str = "mp3";

/// Base URL of the OpenAI-compatible API.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat model used for card enrichment.
pub const CHAT_MODEL: &str = "gpt-4o-mini";

/// Sampling temperature for card enrichment.
///
/// Low so that the structured reply stays stable between runs.
pub const TEMPERATURE: f64 = 0.3;

/// Speech model used for audio synthesis.
pub const TTS_MODEL: &str = "gpt-4o-mini-tts";

/// Voice used for audio synthesis.
pub const TTS_VOICE: &str = "sage";

/// Per-request timeout for every remote call, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// AnkiConnect endpoint.
pub const ANKI_URL: &str = "http://127.0.0.1:8765";

/// AnkiConnect API version spoken by the client.
pub const ANKI_API_VERSION: u32 = 6;

/// Deck new notes are added to.
pub const DECK_NAME: &str = "Russisch::chati-test";

/// Anki note type used for new notes.
pub const NOTE_MODEL: &str = "Basic";

/// Tag attached to every created note.
pub const NOTE_TAG: &str = "auto";

/// Default number of concurrent workers per pipeline stage.
pub const CONCURRENCY: usize = 3;

/// Environment variable holding the OpenAI API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
