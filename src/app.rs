//! Card-making application entry point.
//!
//! Wires configuration, service clients and stations together:
//! vocabulary file → enrich → speech → delivery

use crate::anki::connect::AnkiConnect;
use crate::anki::note::NoteTemplate;
use crate::anki::store::NoteStore;
use crate::config::Config;
use crate::error::{Result, VocardsError};
use crate::http::build_client;
use crate::llm::generator::TextGenerator;
use crate::llm::openai::OpenAiChat;
use crate::pipeline::orchestrator::{Pipeline, PipelineConfig, PipelineReport};
use crate::pipeline::{DeliveryStation, EnrichStation, SpeechStation};
use crate::tts::openai::OpenAiSpeech;
use crate::tts::storage::AudioStore;
use crate::tts::synthesizer::SpeechSynthesizer;
use crate::vocab::{parse_vocab, read_vocab_file};
use std::path::Path;
use std::sync::Arc;

/// Remote services the stations call.
#[derive(Clone)]
pub struct Services {
    pub generator: Arc<dyn TextGenerator>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub store: Arc<dyn NoteStore>,
}

impl Services {
    /// Builds the OpenAI and AnkiConnect clients, sharing one connection pool.
    ///
    /// Fails with [`VocardsError::MissingApiKey`] when no key was provided.
    pub fn connect(config: &Config) -> Result<Self> {
        let api_key = config.openai.require_api_key()?;
        let http = build_client(config.openai.timeout()?)?;

        let generator = OpenAiChat::new(
            http.clone(),
            &config.openai.base_url,
            api_key,
            &config.openai.chat_model,
            config.openai.temperature,
        );
        let synthesizer = OpenAiSpeech::new(
            http.clone(),
            &config.openai.base_url,
            api_key,
            &config.openai.tts_model,
            &config.openai.voice,
        );
        let store = AnkiConnect::new(http, &config.anki.url);

        Ok(Self {
            generator: Arc::new(generator),
            synthesizer: Arc::new(synthesizer),
            store: Arc::new(store),
        })
    }
}

/// Reads the enrichment instructions.
pub fn read_prompt(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) if !text.trim().is_empty() => Ok(text),
        Ok(_) => Err(VocardsError::ConfigInvalidValue {
            key: "input.prompt_file".to_string(),
            message: format!("{} is empty", path.display()),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(VocardsError::PromptNotFound {
            path: path.display().to_string(),
        }),
        Err(e) => Err(VocardsError::Io(e)),
    }
}

/// Run the whole batch against the real services.
pub async fn run(config: &Config) -> Result<PipelineReport> {
    let services = Services::connect(config)?;
    run_with_services(config, services).await
}

/// Run the whole batch against the given services.
///
/// Everything that can fail at startup (configuration, prompt, vocabulary,
/// audio directory) is checked before the first item is seeded. After that,
/// failures only ever drop single items.
pub async fn run_with_services(config: &Config, services: Services) -> Result<PipelineReport> {
    config.validate()?;

    let prompt_path = config.input.prompt_path();
    let instructions = read_prompt(&prompt_path)?;
    tracing::debug!(prompt = %prompt_path.display(), "Loaded instructions");

    let vocab = read_vocab_file(&config.input.vocab_file)?;
    let pairs: Vec<_> = parse_vocab(&vocab).collect();
    tracing::debug!(
        file = %config.input.vocab_file.display(),
        records = pairs.len(),
        "Loaded vocabulary"
    );

    let audio = AudioStore::new(&config.pipeline.audio_dir);
    audio.ensure_dir()?;

    let template = NoteTemplate::new(
        &config.anki.deck,
        &config.anki.note_model,
        config.anki.tags.clone(),
    );

    let enrich = Arc::new(EnrichStation::new(services.generator, instructions));
    let speech = Arc::new(SpeechStation::new(services.synthesizer, audio));
    let delivery = Arc::new(DeliveryStation::new(services.store, template));

    let report = Pipeline::new(PipelineConfig::from_settings(&config.pipeline))
        .run(pairs, enrich, speech, delivery)
        .await;

    Ok(report)
}
