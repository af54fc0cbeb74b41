//! Whole-pipeline tests against the in-crate mock services.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;
use vocards::anki::MockNoteStore;
use vocards::app::{Services, run_with_services};
use vocards::config::Config;
use vocards::error::VocardsError;
use vocards::llm::MockTextGenerator;
use vocards::tts::MockSpeechSynthesizer;

const LONG: Duration = Duration::from_secs(30);

fn card_json(front: &str, back: &str, pure: &str) -> String {
    serde_json::json!({ "front": front, "back": back, "pure": pure }).to_string()
}

/// Config pointing every file at `dir`.
fn config_in(dir: &Path, vocab: &str, workers: usize) -> Config {
    std::fs::write(dir.join("vocab.txt"), vocab).unwrap();
    std::fs::write(dir.join("prompt.txt"), "Reply with JSON.").unwrap();

    let mut config = Config::default();
    config.input.vocab_file = dir.join("vocab.txt");
    config.input.prompt_file = Some(dir.join("prompt.txt"));
    config.pipeline.audio_dir = dir.join("audio");
    config.pipeline.concurrency = workers;
    config.anki.deck = "Russisch::Test".to_string();
    config
}

/// `n` lines `w0 - m0`, `w1 - m1`, ... and a generator answering all of them.
fn numbered(n: usize) -> (String, MockTextGenerator) {
    let mut vocab = String::new();
    let mut generator = MockTextGenerator::new();
    for i in 0..n {
        vocab.push_str(&format!("w{i} - m{i}\n"));
        generator = generator.with_reply(
            &format!("w{i} –"),
            &card_json(&format!("m{i}"), &format!("w{i}"), &format!("w{i}")),
        );
    }
    (vocab, generator)
}

fn services(
    generator: MockTextGenerator,
    synthesizer: MockSpeechSynthesizer,
    store: &Arc<MockNoteStore>,
) -> Services {
    Services {
        generator: Arc::new(generator),
        synthesizer: Arc::new(synthesizer),
        store: store.clone(),
    }
}

#[tokio::test]
async fn two_records_become_two_voiced_notes() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path(), "кот - cat\nсобака - dog\n", 3);
    let generator = MockTextGenerator::new()
        .with_reply("кот", &card_json("cat", "ко́т\nм. р.", "кот"))
        .with_reply("собака", &card_json("dog", "соба́ка\nж. р.", "собака"));
    let store = Arc::new(MockNoteStore::new());

    let report = timeout(
        LONG,
        run_with_services(
            &config,
            services(generator, MockSpeechSynthesizer::new(), &store),
        ),
    )
    .await
    .expect("pipeline should finish")
    .unwrap();

    assert_eq!(report.seeded, 2);
    assert_eq!(report.delivered(), 2);
    assert_eq!(report.dropped(), 0);

    let audio_dir = dir.path().join("audio");
    assert!(audio_dir.join("кот.mp3").is_file());
    assert!(audio_dir.join("собака.mp3").is_file());

    let mut notes = store.notes();
    notes.sort_by(|a, b| a.fields.front.cmp(&b.fields.front));
    assert_eq!(notes.len(), 2);

    assert_eq!(notes[0].deck_name, "Russisch::Test");
    assert_eq!(notes[0].model_name, "Basic");
    assert_eq!(notes[0].fields.front, "cat");
    assert_eq!(notes[0].fields.back, "ко́т<br>м. р.");
    assert_eq!(notes[0].audio[0].filename, "кот.mp3");
    assert_eq!(notes[0].audio[0].fields, vec!["Back"]);
    assert_eq!(notes[0].tags, vec!["auto"]);

    assert_eq!(notes[1].fields.front, "dog");
    assert_eq!(notes[1].audio[0].filename, "собака.mp3");
}

#[tokio::test]
async fn delivered_audio_is_the_synthesized_audio() {
    let dir = TempDir::new().unwrap();
    let (vocab, generator) = numbered(4);
    let config = config_in(dir.path(), &vocab, 2);
    let store = Arc::new(MockNoteStore::new());

    timeout(
        LONG,
        run_with_services(
            &config,
            services(generator, MockSpeechSynthesizer::new(), &store),
        ),
    )
    .await
    .expect("pipeline should finish")
    .unwrap();

    let notes = store.notes();
    assert_eq!(notes.len(), 4);
    for note in notes {
        // The mock speaks the phrase back as its own bytes.
        let spoken = note.fields.back.clone();
        let attached = STANDARD.decode(&note.audio[0].data).unwrap();
        assert_eq!(attached, spoken.as_bytes());

        let on_disk = dir.path().join("audio").join(&note.audio[0].filename);
        let on_disk = std::fs::read(on_disk).unwrap();
        assert_eq!(on_disk, attached);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn every_pool_size_drains_every_queue() {
    const K: usize = 25;

    for workers in [1, 3, K] {
        let dir = TempDir::new().unwrap();
        let (vocab, generator) = numbered(K);
        let config = config_in(dir.path(), &vocab, workers);
        let store = Arc::new(MockNoteStore::new());

        let report = timeout(
            LONG,
            run_with_services(
                &config,
                services(generator, MockSpeechSynthesizer::new(), &store),
            ),
        )
        .await
        .unwrap_or_else(|_| panic!("pipeline with {workers} worker(s) should finish"))
        .unwrap();

        for stage in [report.enrich, report.speech, report.delivery] {
            assert_eq!(stage.received, K as u64, "workers = {workers}");
            assert_eq!(stage.done, stage.received, "workers = {workers}");
            assert_eq!(stage.completed + stage.failed, stage.done);
        }
        assert_eq!(store.notes().len(), K, "workers = {workers}");
    }
}

#[tokio::test]
async fn one_failing_item_does_not_stop_the_others() {
    let dir = TempDir::new().unwrap();
    let (vocab, generator) = numbered(5);
    let config = config_in(dir.path(), &vocab, 2);
    let store = Arc::new(MockNoteStore::new());

    let report = timeout(
        LONG,
        run_with_services(
            &config,
            services(generator.failing_on("w2"), MockSpeechSynthesizer::new(), &store),
        ),
    )
    .await
    .expect("pipeline should finish despite a failure")
    .unwrap();

    assert_eq!(report.enrich.failed, 1);
    assert_eq!(report.delivered(), 4);

    let fronts: Vec<String> = store.notes().into_iter().map(|n| n.fields.front).collect();
    assert_eq!(fronts.len(), 4);
    assert!(!fronts.contains(&"m2".to_string()));
    assert!(!dir.path().join("audio").join("w2.mp3").exists());
}

#[tokio::test]
async fn failures_at_every_stage_are_isolated() {
    let dir = TempDir::new().unwrap();
    let (vocab, generator) = numbered(6);
    let config = config_in(dir.path(), &vocab, 3);
    let store = Arc::new(MockNoteStore::new().rejecting("m4"));

    let report = timeout(
        LONG,
        run_with_services(
            &config,
            services(
                generator.failing_on("w0"),
                MockSpeechSynthesizer::new().failing_on("w2"),
                &store,
            ),
        ),
    )
    .await
    .expect("pipeline should finish")
    .unwrap();

    assert_eq!(report.enrich.failed, 1);
    assert_eq!(report.speech.failed, 1);
    assert_eq!(report.delivery.failed, 1);
    assert_eq!(report.delivered(), 3);
    assert_eq!(report.dropped(), 3);
}

#[tokio::test]
async fn malformed_lines_are_skipped() {
    let dir = TempDir::new().unwrap();
    let config = config_in(
        dir.path(),
        "кот - cat\n\nno separator here\n   \n – orphan\n",
        1,
    );
    let generator =
        MockTextGenerator::new().with_default_reply(&card_json("cat", "кот", "кот"));
    let store = Arc::new(MockNoteStore::new());

    let report = run_with_services(
        &config,
        services(generator, MockSpeechSynthesizer::new(), &store),
    )
    .await
    .unwrap();

    assert_eq!(report.seeded, 1);
    assert_eq!(report.delivered(), 1);
}

#[tokio::test]
async fn empty_vocabulary_finishes_without_calls() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path(), "", 3);
    let generator = Arc::new(MockTextGenerator::new());
    let store = Arc::new(MockNoteStore::new());

    let report = timeout(
        LONG,
        run_with_services(
            &config,
            Services {
                generator: generator.clone(),
                synthesizer: Arc::new(MockSpeechSynthesizer::new()),
                store: store.clone(),
            },
        ),
    )
    .await
    .expect("empty run should finish")
    .unwrap();

    assert_eq!(report.seeded, 0);
    assert!(generator.calls().is_empty());
    assert!(store.notes().is_empty());
}

#[tokio::test]
async fn missing_vocabulary_fails_at_startup() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path(), "кот - cat\n", 1);
    config.input.vocab_file = dir.path().join("missing.txt");
    let generator = Arc::new(MockTextGenerator::new());
    let store = Arc::new(MockNoteStore::new());

    let err = run_with_services(
        &config,
        Services {
            generator: generator.clone(),
            synthesizer: Arc::new(MockSpeechSynthesizer::new()),
            store,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, VocardsError::InputNotFound { .. }));
    assert!(generator.calls().is_empty());
}

#[tokio::test]
async fn missing_prompt_fails_at_startup() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path(), "кот - cat\n", 1);
    config.input.prompt_file = Some(dir.path().join("missing-prompt.txt"));
    let store = Arc::new(MockNoteStore::new());

    let err = run_with_services(
        &config,
        services(
            MockTextGenerator::new(),
            MockSpeechSynthesizer::new(),
            &store,
        ),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, VocardsError::PromptNotFound { .. }));
}

#[tokio::test]
async fn zero_workers_rejected_at_startup() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path(), "кот - cat\n", 0);
    let store = Arc::new(MockNoteStore::new());

    let err = run_with_services(
        &config,
        services(
            MockTextGenerator::new(),
            MockSpeechSynthesizer::new(),
            &store,
        ),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, VocardsError::ConfigInvalidValue { .. }));
}
