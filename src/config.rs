use crate::defaults;
use crate::error::{Result, VocardsError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub openai: OpenAiConfig,
    pub anki: AnkiConfig,
    pub pipeline: PipelineSettings,
}

/// Vocabulary and prompt locations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    pub vocab_file: PathBuf,
    /// Explicit prompt file. When unset, `prompts/<language>/prompt.txt` is used.
    pub prompt_file: Option<PathBuf>,
    pub language: String,
}

/// OpenAI-compatible completion and speech settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub chat_model: String,
    pub temperature: f64,
    pub tts_model: String,
    pub voice: String,
    /// Per-request timeout, humantime format (e.g. "60s", "2m").
    pub timeout: String,
    /// Never read from the config file; only populated from the environment.
    #[serde(skip)]
    pub api_key: Option<String>,
}

/// AnkiConnect settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnkiConfig {
    pub url: String,
    pub deck: String,
    pub note_model: String,
    pub tags: Vec<String>,
}

/// Worker pool sizes and artifact storage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineSettings {
    /// Worker count applied to every stage without an explicit override.
    pub concurrency: usize,
    pub enrich_workers: Option<usize>,
    pub speech_workers: Option<usize>,
    pub delivery_workers: Option<usize>,
    pub audio_dir: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            vocab_file: PathBuf::from(defaults::VOCAB_FILE),
            prompt_file: None,
            language: defaults::LANGUAGE.to_string(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::OPENAI_BASE_URL.to_string(),
            chat_model: defaults::CHAT_MODEL.to_string(),
            temperature: defaults::TEMPERATURE,
            tts_model: defaults::TTS_MODEL.to_string(),
            voice: defaults::TTS_VOICE.to_string(),
            timeout: format!("{}s", defaults::REQUEST_TIMEOUT_SECS),
            api_key: None,
        }
    }
}

impl Default for AnkiConfig {
    fn default() -> Self {
        Self {
            url: defaults::ANKI_URL.to_string(),
            deck: defaults::DECK_NAME.to_string(),
            note_model: defaults::NOTE_MODEL.to_string(),
            tags: vec![defaults::NOTE_TAG.to_string()],
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            concurrency: defaults::CONCURRENCY,
            enrich_workers: None,
            speech_workers: None,
            delivery_workers: None,
            audio_dir: PathBuf::from(defaults::AUDIO_DIR),
        }
    }
}

impl InputConfig {
    /// Resolved instruction file for the enrichment stage.
    pub fn prompt_path(&self) -> PathBuf {
        self.prompt_file.clone().unwrap_or_else(|| {
            PathBuf::from(defaults::PROMPTS_DIR)
                .join(&self.language)
                .join(defaults::PROMPT_FILE_NAME)
        })
    }
}

impl OpenAiConfig {
    /// Parsed request timeout.
    pub fn timeout(&self) -> Result<Duration> {
        let raw = self.timeout.trim();
        if let Ok(secs) = raw.parse::<u64>() {
            return Ok(Duration::from_secs(secs));
        }
        humantime::parse_duration(raw).map_err(|e| VocardsError::ConfigInvalidValue {
            key: "openai.timeout".to_string(),
            message: e.to_string(),
        })
    }

    /// The API key, or [`VocardsError::MissingApiKey`] when the environment had none.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(VocardsError::MissingApiKey)
    }
}

impl PipelineSettings {
    pub fn enrich_workers(&self) -> usize {
        self.enrich_workers.unwrap_or(self.concurrency)
    }

    pub fn speech_workers(&self) -> usize {
        self.speech_workers.unwrap_or(self.concurrency)
    }

    pub fn delivery_workers(&self) -> usize {
        self.delivery_workers.unwrap_or(self.concurrency)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file doesn't exist
    ///
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(VocardsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(VocardsError::Config(e)) => Err(VocardsError::ConfigParse {
                message: format!("{}: {}", path.display(), e),
            }),
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - OPENAI_API_KEY → openai.api_key
    /// - VOCARDS_DECK → anki.deck
    /// - VOCARDS_OPENAI_BASE_URL → openai.base_url
    /// - VOCARDS_ANKI_URL → anki.url
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(defaults::API_KEY_ENV)
            && !key.is_empty()
        {
            self.openai.api_key = Some(key);
        }

        if let Ok(deck) = std::env::var("VOCARDS_DECK")
            && !deck.is_empty()
        {
            self.anki.deck = deck;
        }

        if let Ok(url) = std::env::var("VOCARDS_OPENAI_BASE_URL")
            && !url.is_empty()
        {
            self.openai.base_url = url;
        }

        if let Ok(url) = std::env::var("VOCARDS_ANKI_URL")
            && !url.is_empty()
        {
            self.anki.url = url;
        }

        self
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let workers = [
            ("pipeline.enrich_workers", self.pipeline.enrich_workers()),
            ("pipeline.speech_workers", self.pipeline.speech_workers()),
            ("pipeline.delivery_workers", self.pipeline.delivery_workers()),
        ];
        for (key, count) in workers {
            if count == 0 {
                return Err(invalid(key, "must be at least 1"));
            }
        }

        if self.anki.deck.trim().is_empty() {
            return Err(invalid("anki.deck", "must not be empty"));
        }
        if self.anki.note_model.trim().is_empty() {
            return Err(invalid("anki.note_model", "must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.openai.temperature) {
            return Err(invalid("openai.temperature", "must be between 0.0 and 2.0"));
        }
        self.openai.timeout()?;

        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/vocards/config.toml on Linux, or a path relative to
    /// the working directory when no config directory can be determined.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocards")
            .join("config.toml")
    }

    /// Render the configuration as TOML (the API key is never included).
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| VocardsError::Other(e.to_string()))
    }
}

fn invalid(key: &str, message: &str) -> VocardsError {
    VocardsError::ConfigInvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}
