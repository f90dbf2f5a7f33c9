//! vocab-audio - pronunciation audio pipeline for vocabulary-learning apps.
//!
//! Synthesizes speech for every vocabulary word, prunes intermediate audio,
//! relocates the final files into the app's asset tree and wires them into the
//! manifest and the screen components.

pub mod backends;
pub mod config_loader;
pub mod error;
pub mod orchestrator;
pub mod player;
pub mod prompt;
pub mod pruner;
pub mod relocator;
pub mod screen;
pub mod slug;
pub mod synthesizer;
pub mod vocabulary;

pub use config_loader::Settings;
pub use error::{Error, Result};
pub use vocabulary::{Category, VocabularyDocument, VocabularyEntry};
