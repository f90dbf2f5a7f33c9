//! Wires vocabulary sound files into the screen components.
//!
//! Every screen keeps its words in a hard-coded array of object records. For
//! each vocabulary word with a `soundFile`, every record whose `name` matches
//! the word gets `soundFile: require('<path>')`.

pub mod parser;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config_loader::Settings;
use crate::error::{Error, PatchError, Result};
use crate::vocabulary::{VocabularyDocument, VocabularyEntry};

pub use parser::{DataArray, Field, Record};

/// Value given to an existing `sound` field when `soundFile` is added next to it.
pub const SOUND_PLACEHOLDER: &str = "'word'";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    pub array: String,
    pub records_updated: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub files_updated: usize,
    pub records_updated: usize,
    pub missing_screens: Vec<String>,
}

pub fn require_expr(path: &str) -> String {
    format!("require({})", parser::quote(path))
}

/// Add or replace `soundFile` on every record whose `name` matches a word
/// (case-insensitive). Records are only marked changed when their text
/// actually changes, so a second pass with the same words is a no-op.
///
/// Returns the number of record updates.
pub fn apply_sound_files(array: &mut DataArray, words: &[VocabularyEntry]) -> usize {
    let mut updates = 0;

    for word in words {
        let Some(sound_path) = word.sound_file.as_deref() else {
            continue;
        };
        let wanted = word.english.to_lowercase();
        let expr = require_expr(sound_path);

        for record in &mut array.records {
            let matches = record
                .field("name")
                .and_then(Field::string_value)
                .is_some_and(|name| name.to_lowercase() == wanted);
            if matches && set_sound_file(record, &expr) {
                record.changed = true;
                updates += 1;
                println!("  - Updated sound for '{}'", word.english);
            }
        }
    }

    updates
}

fn set_sound_file(record: &mut Record, expr: &str) -> bool {
    if let Some(idx) = record.position("soundFile") {
        let field = &mut record.fields[idx];
        if field.value == expr {
            return false;
        }
        field.value = expr.to_string();
        return true;
    }

    if let Some(idx) = record.position("sound") {
        record.fields[idx].value = SOUND_PLACEHOLDER.to_string();
        record
            .fields
            .insert(idx + 1, Field::new("soundFile", expr.to_string()));
        return true;
    }

    record.fields.push(Field::new("soundFile", expr.to_string()));
    true
}

/// Patch one screen file in place. The file is only rewritten when a record
/// changed.
pub fn patch_screen(path: &Path, words: &[VocabularyEntry]) -> std::result::Result<PatchOutcome, PatchError> {
    let content = fs::read_to_string(path)?;
    let mut array = parser::parse(&content)?;
    println!("Found data array: {}", array.name);

    let records_updated = apply_sound_files(&mut array, words);
    if array.changed() > 0 {
        write_atomic(path, &array.render_into(&content))?;
    }

    Ok(PatchOutcome {
        array: array.name,
        records_updated,
    })
}

fn write_atomic(path: &Path, content: &str) -> std::result::Result<(), PatchError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path)?;
    Ok(())
}

/// Name fragments tried in order: without spaces, as-is, and without the
/// last character (Animals -> Animal).
fn name_fragments(category: &str) -> Vec<String> {
    let mut fragments = vec![category.replace(' ', ""), category.to_string()];
    let mut chars = category.chars();
    chars.next_back();
    fragments.push(chars.as_str().to_string());
    fragments.retain(|f| !f.is_empty());
    fragments.dedup();
    fragments
}

/// First file in `dir` named `*<fragment>*<suffix>` for the first fragment
/// that has any match.
pub fn find_screen(dir: &Path, category: &str, suffix: &str) -> Option<PathBuf> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .ok()?
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    names.sort();

    name_fragments(category).iter().find_map(|fragment| {
        names
            .iter()
            .find(|name| {
                name.strip_suffix(suffix)
                    .is_some_and(|stem| stem.contains(fragment.as_str()))
            })
            .map(|name| dir.join(name))
    })
}

/// Patch the screen of every category. A screen that cannot be patched is
/// logged and counted as not updated.
pub fn patch_all(doc: &VocabularyDocument, screens_dir: &Path, suffix: &str) -> PatchReport {
    let mut report = PatchReport::default();

    for category in &doc.categories {
        println!("\n===== Processing {} category =====", category.name);

        let Some(screen) = find_screen(screens_dir, &category.name, suffix) else {
            println!("No matching screen found for {} category.", category.name);
            report.missing_screens.push(category.name.clone());
            continue;
        };
        let file_name = screen
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("Found matching screen: {}", file_name);

        match patch_screen(&screen, &category.words) {
            Ok(outcome) if outcome.records_updated > 0 => {
                println!(
                    "Updated {} with {} sound file references.",
                    screen.display(),
                    outcome.records_updated
                );
                report.files_updated += 1;
                report.records_updated += outcome.records_updated;
            }
            Ok(_) => println!("No items were updated in {}.", screen.display()),
            Err(PatchError::NoDataArray) => {
                println!("No data array found in {}, skipping.", screen.display())
            }
            Err(e) => log::error!("Error updating {}: {}", screen.display(), e),
        }
    }

    report
}

/// Load the annotated manifest and patch every screen.
pub fn run(settings: &Settings) -> Result<PatchReport> {
    if !settings.screens_dir.is_dir() {
        return Err(Error::MissingInput {
            what: "screens directory",
            path: settings.screens_dir.clone(),
        });
    }
    let doc = VocabularyDocument::load(&settings.manifest_path)?;
    Ok(patch_all(&doc, &settings.screens_dir, &settings.screen_suffix))
}
