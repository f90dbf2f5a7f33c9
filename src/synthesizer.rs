use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::backends::SpeechBackend;
use crate::config_loader::Settings;
use crate::error::{Error, Result, SynthesisError};
use crate::player::AudioOutput;
use crate::slug;
use crate::vocabulary::VocabularyDocument;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SynthesisReport {
    pub total: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Synthesize every word of `doc` into `<staging_root>/<category>/<word>.<ext>`.
///
/// A word that fails is logged and the batch moves on; only failing to create
/// the output directories aborts.
pub fn synthesize_all(
    doc: &VocabularyDocument,
    backend: &dyn SpeechBackend,
    player: &dyn AudioOutput,
    settings: &Settings,
) -> Result<SynthesisReport> {
    let root = &settings.staging_root;
    if root.exists() {
        println!("Output directory already exists: {}", root.display());
    } else {
        create_dir(root)?;
        println!("Created output directory: {}", root.display());
    }

    let delay = Duration::from_millis(settings.request_delay_ms);
    let mut report = SynthesisReport {
        total: doc.total_words(),
        ..SynthesisReport::default()
    };

    println!("\nStarting TTS process ({})...", backend.id());

    for category in &doc.categories {
        println!("\nProcessing category: {}", category.name);
        let category_dir = root.join(slug::category_slug(&category.name));
        create_dir(&category_dir)?;

        for word in &category.words {
            if word.english.trim().is_empty() {
                report.skipped += 1;
                continue;
            }

            let path = category_dir.join(slug::audio_file_name(&word.english, backend.extension()));
            match speak_and_save(&word.english, &path, backend, settings) {
                Ok(size) => {
                    report.succeeded += 1;
                    if size == 0 {
                        println!("  -> Warning: File appears empty: {}", path.display());
                    } else {
                        println!("  -> Successfully saved file: {} ({} bytes)", path.display(), size);
                        if settings.verify_playback {
                            if let Err(e) = player.play_blocking(&path) {
                                log::warn!("Could not play audio for verification: {}", e);
                            }
                        }
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    log::error!("Error creating TTS for '{}': {}", word.english, e);
                }
            }

            report.processed += 1;
            println!(
                "Progress: {}/{} words processed ({:.1}%)",
                report.processed,
                report.total,
                percent(report.processed, report.total)
            );

            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }
    }

    println!("\nFinished processing all vocabulary words.");
    Ok(report)
}

fn speak_and_save(
    text: &str,
    path: &Path,
    backend: &dyn SpeechBackend,
    settings: &Settings,
) -> std::result::Result<u64, SynthesisError> {
    println!("Processing: {}", text);
    let audio = backend.synthesize(text, &settings.tts_language, settings.tts_slow)?;
    fs::write(path, &audio)?;
    Ok(fs::metadata(path)?.len())
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::Setup {
        path: path.to_path_buf(),
        source,
    })
}

fn percent(done: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        done as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 4), 25.0);
        assert_eq!(percent(0, 0), 100.0);
    }

    #[test]
    fn test_unwritable_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let settings = Settings {
            staging_root: blocker.join("out"),
            ..Settings::default()
        };
        let doc = VocabularyDocument::default();
        let backend = crate::backends::EspeakBackend::new(1);
        let err = synthesize_all(&doc, &backend, &crate::player::Silent, &settings).unwrap_err();
        assert!(matches!(err, Error::Setup { .. }));
    }
}
