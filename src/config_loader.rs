use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::backends;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    // Inputs and outputs
    pub vocabulary_path: PathBuf,
    pub manifest_path: PathBuf,
    pub staging_root: PathBuf,
    pub asset_root: PathBuf,
    pub sound_path_prefix: String, // as seen from the screens, e.g. "../assets/sounds"
    pub screens_dir: PathBuf,
    pub screen_suffix: String,
    // TTS settings
    pub tts_backend: String, // "google" or "espeak"
    pub tts_endpoint: String,
    pub tts_language: String,
    pub tts_slow: bool,
    pub tts_timeout_secs: u64,
    pub request_delay_ms: u64,
    pub verify_playback: bool,
    // Housekeeping
    pub prune_extension: String,
    pub require_copied_audio: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vocabulary_path: PathBuf::from("vocabulary.json"),
            manifest_path: PathBuf::from("LearnEng/src/data/vocabulary.json"),
            staging_root: PathBuf::from("management/tts_output"),
            asset_root: PathBuf::from("LearnEng/src/assets/sounds"),
            sound_path_prefix: "../assets/sounds".to_string(),
            screens_dir: PathBuf::from("LearnEng/src/screens"),
            screen_suffix: "Screen.js".to_string(),
            tts_backend: "google".to_string(),
            tts_endpoint: "https://translate.google.com/translate_tts".to_string(),
            tts_language: "en".to_string(),
            tts_slow: false,
            tts_timeout_secs: 10,
            request_delay_ms: 200,
            verify_playback: false,
            prune_extension: "wav".to_string(),
            require_copied_audio: false,
        }
    }
}

impl Settings {
    /// Defaults, then `Vocab.*` in the working directory, then the user config
    /// directory, then `VOCAB_*` environment variables.
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::load(None)
    }

    /// Like [`Settings::new`], with an explicit config file layered on top of
    /// the file sources (it must exist).
    pub fn load(explicit: Option<&Path>) -> Result<Self, config::ConfigError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("vocabulary_path", path_str(&defaults.vocabulary_path))?
            .set_default("manifest_path", path_str(&defaults.manifest_path))?
            .set_default("staging_root", path_str(&defaults.staging_root))?
            .set_default("asset_root", path_str(&defaults.asset_root))?
            .set_default("sound_path_prefix", defaults.sound_path_prefix.clone())?
            .set_default("screens_dir", path_str(&defaults.screens_dir))?
            .set_default("screen_suffix", defaults.screen_suffix.clone())?
            // TTS defaults
            .set_default("tts_backend", defaults.tts_backend.clone())?
            .set_default("tts_endpoint", defaults.tts_endpoint.clone())?
            .set_default("tts_language", defaults.tts_language.clone())?
            .set_default("tts_slow", defaults.tts_slow)?
            .set_default("tts_timeout_secs", defaults.tts_timeout_secs)?
            .set_default("request_delay_ms", defaults.request_delay_ms)?
            .set_default("verify_playback", defaults.verify_playback)?
            .set_default("prune_extension", defaults.prune_extension.clone())?
            .set_default("require_copied_audio", defaults.require_copied_audio)?
            // Merge with local config file (if exists)
            .add_source(File::with_name("Vocab").required(false));

        if let Some(dir) = dirs::config_dir() {
            let user_file = dir.join("vocab-audio").join("Vocab");
            builder = builder.add_source(File::with_name(&path_str(&user_file)).required(false));
        }
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        // Environment variables last (e.g. VOCAB_STAGING_ROOT)
        let builder = builder.add_source(config::Environment::with_prefix("VOCAB"));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if backends::extension_for(&self.tts_backend).is_none() {
            return Err(config::ConfigError::Message(format!(
                "Unknown tts_backend: {}. Available: {}",
                self.tts_backend,
                backends::AVAILABLE.join(", ")
            )));
        }
        if self.tts_language.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "tts_language must not be empty".to_string(),
            ));
        }
        if self.tts_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "tts_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.prune_extension().is_empty() {
            return Err(config::ConfigError::Message(
                "prune_extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Pruning must never touch the final audio of the configured backend.
    pub fn check_prune_extension(&self, ext: &str) -> Result<(), config::ConfigError> {
        let ext = ext.trim_start_matches('.');
        if ext.is_empty() {
            return Err(config::ConfigError::Message(
                "prune extension must not be empty".to_string(),
            ));
        }
        if ext.eq_ignore_ascii_case(self.audio_extension()) {
            return Err(config::ConfigError::Message(format!(
                "pruning '.{}' would delete the final audio of the {} backend",
                ext, self.tts_backend
            )));
        }
        Ok(())
    }

    /// Extension of the final audio files produced by the configured backend.
    pub fn audio_extension(&self) -> &'static str {
        backends::extension_for(&self.tts_backend).unwrap_or("mp3")
    }

    pub fn prune_extension(&self) -> &str {
        self.prune_extension.trim_start_matches('.')
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_load() {
        let settings = Settings::new().expect("Failed to load settings");
        assert!(settings.tts_timeout_secs > 0);
        assert!(!settings.sound_path_prefix.is_empty());
    }

    #[test]
    #[serial]
    fn test_env_overrides_default() {
        std::env::set_var("VOCAB_STAGING_ROOT", "/tmp/staging-override");
        let settings = Settings::new();
        std::env::remove_var("VOCAB_STAGING_ROOT");
        let settings = settings.expect("Failed to load settings");
        assert_eq!(settings.staging_root, PathBuf::from("/tmp/staging-override"));
    }

    #[test]
    #[serial]
    fn test_explicit_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("custom.toml");
        std::fs::write(&file, "screens_dir = \"app/screens\"\ntts_slow = true\n").unwrap();

        let settings = Settings::load(Some(&file)).unwrap();
        assert_eq!(settings.screens_dir, PathBuf::from("app/screens"));
        assert!(settings.tts_slow);
    }

    #[test]
    fn test_validate_rejects_unknown_backend() {
        let settings = Settings {
            tts_backend: "festival".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_prune_extension_protects_final_audio() {
        let settings = Settings {
            tts_backend: "espeak".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_ok());
        assert!(settings.check_prune_extension(".WAV").is_err());
        assert!(settings.check_prune_extension("mp3").is_ok());

        let settings = Settings::default();
        assert!(settings.check_prune_extension("mp3").is_err());
        assert!(settings.check_prune_extension("wav").is_ok());
        assert!(settings.check_prune_extension(".").is_err());
    }

    #[test]
    fn test_audio_extension_follows_backend() {
        let mut settings = Settings::default();
        assert_eq!(settings.audio_extension(), "mp3");
        settings.tts_backend = "espeak".to_string();
        assert_eq!(settings.audio_extension(), "wav");
    }
}
