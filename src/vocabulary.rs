use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};

/// One word. Fields the tools don't know about are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub english: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(rename = "soundFile", default, skip_serializing_if = "Option::is_none")]
    pub sound_file: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "category")]
    pub name: String,
    #[serde(default)]
    pub words: Vec<VocabularyEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabularyDocument {
    #[serde(rename = "vocabulary")]
    pub categories: Vec<Category>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VocabularyEntry {
    pub fn new(english: &str) -> Self {
        Self {
            english: english.to_string(),
            ..Self::default()
        }
    }
}

impl VocabularyDocument {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingInput {
                what: "vocabulary file",
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|source| Error::VocabularyFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Overwrite `path` with the whole document.
    ///
    /// The JSON goes to a temporary file next to `path` first and is renamed
    /// into place, so an interrupted write leaves the previous document intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|source| Error::Setup {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(path)?;
        Ok(())
    }

    pub fn total_words(&self) -> usize {
        self.categories.iter().map(|c| c.words.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
