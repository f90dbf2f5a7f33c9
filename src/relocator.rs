use std::fs;
use std::path::Path;

use crate::config_loader::Settings;
use crate::error::{Error, Result};
use crate::pruner;
use crate::slug;
use crate::vocabulary::VocabularyDocument;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: usize,
    pub failed: usize,
    pub categories: Vec<String>,
    pub missing_categories: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AnnotateReport {
    pub annotated: usize,
    /// Words whose relocated audio file does not exist
    pub missing_audio: Vec<String>,
}

/// Copy `<staging>/<category>/*.<ext>` to `<assets>/<category>/` for every
/// category of `doc`. Categories without a staging directory are skipped.
pub fn copy_audio(
    doc: &VocabularyDocument,
    staging: &Path,
    assets: &Path,
    ext: &str,
) -> Result<CopyReport> {
    if !staging.is_dir() {
        return Err(Error::MissingInput {
            what: "staging directory",
            path: staging.to_path_buf(),
        });
    }
    ensure_dir(assets)?;

    let mut report = CopyReport::default();

    for category in &doc.categories {
        let category_slug = slug::category_slug(&category.name);
        let source_dir = staging.join(&category_slug);

        if !source_dir.is_dir() {
            log::warn!(
                "Category folder '{}' not found, skipping.",
                source_dir.display()
            );
            report.missing_categories.push(category_slug);
            continue;
        }

        let target_dir = assets.join(&category_slug);
        ensure_dir(&target_dir)?;

        let mut entries: Vec<_> = fs::read_dir(&source_dir)?
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_file() && pruner::has_extension(p, ext))
            .collect();
        entries.sort();

        for source in entries {
            let Some(stem) = source.file_stem() else {
                continue;
            };
            // `Apple.MP3` lands as `Apple.mp3`, the name the manifest points at
            let mut name = stem.to_os_string();
            name.push(".");
            name.push(ext);
            let target = target_dir.join(name);
            match fs::copy(&source, &target) {
                Ok(_) => {
                    println!("Copied: {} -> {}", source.display(), target.display());
                    report.copied += 1;
                }
                Err(e) => {
                    log::error!("Error copying {}: {}", source.display(), e);
                    report.failed += 1;
                }
            }
        }

        report.categories.push(category_slug);
    }

    println!("\nCopied {} audio files to {}", report.copied, assets.display());
    println!(
        "Processed {} categories: {}",
        report.categories.len(),
        report.categories.join(", ")
    );
    Ok(report)
}

/// Set `soundFile` on every word to `<prefix>/<category>/<word>.<ext>`.
///
/// The path is computed, not discovered. Words whose file is missing under
/// `assets` are reported, and left alone when `require_existing` is set.
pub fn annotate(
    doc: &mut VocabularyDocument,
    prefix: &str,
    ext: &str,
    assets: &Path,
    require_existing: bool,
) -> AnnotateReport {
    let mut report = AnnotateReport::default();

    for category in &mut doc.categories {
        let category_dir = assets.join(slug::category_slug(&category.name));

        for word in &mut category.words {
            let exists = category_dir
                .join(slug::audio_file_name(&word.english, ext))
                .is_file();
            if !exists {
                log::warn!(
                    "No relocated audio for '{}' in {}",
                    word.english,
                    category_dir.display()
                );
                report.missing_audio.push(word.english.clone());
                if require_existing {
                    continue;
                }
            }

            word.sound_file = Some(slug::sound_file_path(prefix, &category.name, &word.english, ext));
            report.annotated += 1;
        }
    }

    report
}

/// Copy the staged audio into the app, then write the annotated manifest.
pub fn relocate(settings: &Settings) -> Result<(CopyReport, AnnotateReport)> {
    let ext = settings.audio_extension();
    let mut doc = VocabularyDocument::load(&settings.vocabulary_path)?;

    println!("Moving audio files to {}...", settings.asset_root.display());
    let copied = copy_audio(&doc, &settings.staging_root, &settings.asset_root, ext)?;

    println!("\nUpdating vocabulary with sound file paths...");
    let annotated = annotate(
        &mut doc,
        &settings.sound_path_prefix,
        ext,
        &settings.asset_root,
        settings.require_copied_audio,
    );
    doc.save(&settings.manifest_path)?;
    println!(
        "Updated vocabulary file with sound paths: {}",
        settings.manifest_path.display()
    );
    if !annotated.missing_audio.is_empty() {
        println!(
            "{} word(s) reference audio that was not copied.",
            annotated.missing_audio.len()
        );
    }

    Ok((copied, annotated))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| Error::Setup {
            path: dir.to_path_buf(),
            source,
        })?;
        println!("Created directory: {}", dir.display());
    }
    Ok(())
}
