use std::cell::Cell;
use std::fs;
use std::path::Path;

use vocab_audio::backends::SpeechBackend;
use vocab_audio::error::{PlaybackError, SynthesisError};
use vocab_audio::player::{AudioOutput, Silent};
use vocab_audio::synthesizer::synthesize_all;
use vocab_audio::{Category, Settings, VocabularyDocument, VocabularyEntry};

mockall::mock! {
    pub SpeechBackend {}
    impl SpeechBackend for SpeechBackend {
        fn synthesize(&self, text: &str, language: &str, slow: bool) -> Result<Vec<u8>, SynthesisError>;
        fn id(&self) -> &'static str;
        fn extension(&self) -> &'static str;
    }
}

fn mock_backend() -> MockSpeechBackend {
    let mut backend = MockSpeechBackend::new();
    backend.expect_id().return_const("mock");
    backend.expect_extension().return_const("mp3");
    backend
}

fn settings_in(root: &Path) -> Settings {
    Settings {
        staging_root: root.join("tts_output"),
        request_delay_ms: 0,
        ..Settings::default()
    }
}

fn category(name: &str, words: &[&str]) -> Category {
    Category {
        name: name.to_string(),
        words: words.iter().map(|w| VocabularyEntry::new(w)).collect(),
        ..Category::default()
    }
}

#[test]
fn test_failed_word_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    let doc = VocabularyDocument {
        categories: vec![
            category("Fruits", &["Apple", "Banana"]),
            category("Body Parts", &["Left hand"]),
        ],
        ..VocabularyDocument::default()
    };

    let mut backend = mock_backend();
    backend
        .expect_synthesize()
        .with(
            mockall::predicate::always(),
            mockall::predicate::eq("en"),
            mockall::predicate::eq(false),
        )
        .times(3)
        .returning(|text, _, _| {
            if text == "Banana" {
                Err(SynthesisError::Status { status: 500 })
            } else {
                Ok(format!("audio:{}", text).into_bytes())
            }
        });

    let report = synthesize_all(&doc, &backend, &Silent, &settings).unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(report.processed, 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);

    let staging = &settings.staging_root;
    assert_eq!(fs::read(staging.join("fruits/Apple.mp3")).unwrap(), b"audio:Apple");
    assert!(!staging.join("fruits/Banana.mp3").exists());
    assert_eq!(
        fs::read(staging.join("body_parts/Left_hand.mp3")).unwrap(),
        b"audio:Left hand"
    );
}

#[test]
fn test_blank_words_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    let doc = VocabularyDocument {
        categories: vec![category("Colors", &["Red", "  ", ""])],
        ..VocabularyDocument::default()
    };

    let mut backend = mock_backend();
    backend
        .expect_synthesize()
        .with(
            mockall::predicate::eq("Red"),
            mockall::predicate::always(),
            mockall::predicate::always(),
        )
        .times(1)
        .returning(|_, _, _| Ok(b"red".to_vec()));

    let report = synthesize_all(&doc, &backend, &Silent, &settings).unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped, 2);
    let files: Vec<_> = fs::read_dir(settings.staging_root.join("colors")).unwrap().collect();
    assert_eq!(files.len(), 1);
}

#[test]
fn test_language_and_speed_come_from_settings() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        tts_language: "he".to_string(),
        tts_slow: true,
        ..settings_in(dir.path())
    };
    let doc = VocabularyDocument {
        categories: vec![category("Family", &["Mother"])],
        ..VocabularyDocument::default()
    };

    let mut backend = mock_backend();
    backend
        .expect_synthesize()
        .with(
            mockall::predicate::eq("Mother"),
            mockall::predicate::eq("he"),
            mockall::predicate::eq(true),
        )
        .times(1)
        .returning(|_, _, _| Ok(b"ima".to_vec()));

    synthesize_all(&doc, &backend, &Silent, &settings).unwrap();
}

struct BrokenSpeaker {
    calls: Cell<usize>,
}

impl AudioOutput for BrokenSpeaker {
    fn play_blocking(&self, _path: &Path) -> Result<(), PlaybackError> {
        self.calls.set(self.calls.get() + 1);
        Err(PlaybackError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "no sound card",
        )))
    }
}

#[test]
fn test_playback_failure_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        verify_playback: true,
        ..settings_in(dir.path())
    };
    let doc = VocabularyDocument {
        categories: vec![category("Toys", &["Ball", "Doll"])],
        ..VocabularyDocument::default()
    };

    let mut backend = mock_backend();
    backend
        .expect_synthesize()
        .times(2)
        .returning(|text, _, _| Ok(text.as_bytes().to_vec()));
    let speaker = BrokenSpeaker { calls: Cell::new(0) };

    let report = synthesize_all(&doc, &backend, &speaker, &settings).unwrap();

    assert_eq!(report.succeeded, 2);
    assert_eq!(speaker.calls.get(), 2);
}

#[test]
fn test_empty_audio_is_kept_but_not_played() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        verify_playback: true,
        ..settings_in(dir.path())
    };
    let doc = VocabularyDocument {
        categories: vec![category("Weather", &["Rain"])],
        ..VocabularyDocument::default()
    };

    let mut backend = mock_backend();
    backend.expect_synthesize().returning(|_, _, _| Ok(Vec::new()));
    let speaker = BrokenSpeaker { calls: Cell::new(0) };

    let report = synthesize_all(&doc, &backend, &speaker, &settings).unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(speaker.calls.get(), 0);
    assert!(settings.staging_root.join("weather/Rain.mp3").is_file());
}
