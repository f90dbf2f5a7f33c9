pub mod espeak;
pub mod google;

use crate::config_loader::Settings;
use crate::error::SynthesisError;

pub use espeak::EspeakBackend;
pub use google::GoogleBackend;

pub const AVAILABLE: &[&str] = &["google", "espeak"];

/// Trait that all speech synthesis backends must implement.
/// This allows us to swap the online Google voice for an offline engine.
pub trait SpeechBackend: Send + Sync {
    /// Returns the encoded audio for `text`
    fn synthesize(&self, text: &str, language: &str, slow: bool)
        -> Result<Vec<u8>, SynthesisError>;

    /// Returns the unique ID of the backend (e.g., "espeak")
    fn id(&self) -> &'static str;

    /// File extension of the audio returned by `synthesize`
    fn extension(&self) -> &'static str;
}

/// Extension of the final audio a backend writes, or `None` for unknown names.
pub fn extension_for(name: &str) -> Option<&'static str> {
    match name {
        "google" => Some(google::EXTENSION),
        "espeak" => Some(espeak::EXTENSION),
        _ => None,
    }
}

pub fn create_backend(settings: &Settings) -> Result<Box<dyn SpeechBackend>, SynthesisError> {
    match settings.tts_backend.as_str() {
        "google" => Ok(Box::new(GoogleBackend::new(
            &settings.tts_endpoint,
            settings.tts_timeout_secs,
        )?)),
        "espeak" => Ok(Box::new(EspeakBackend::new(settings.tts_timeout_secs))),
        other => Err(SynthesisError::Backend {
            backend: "factory",
            message: format!("Unknown TTS backend: {}. Available: {}", other, AVAILABLE.join(", ")),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_known_backends() {
        let mut settings = Settings::default();
        let backend = create_backend(&settings).unwrap();
        assert_eq!(backend.id(), "google");
        assert_eq!(backend.extension(), "mp3");

        settings.tts_backend = "espeak".to_string();
        let backend = create_backend(&settings).unwrap();
        assert_eq!(backend.id(), "espeak");
        assert_eq!(backend.extension(), "wav");
    }

    #[test]
    fn test_unknown_backend() {
        let settings = Settings {
            tts_backend: "sapi".to_string(),
            ..Settings::default()
        };
        assert!(create_backend(&settings).is_err());
        assert_eq!(extension_for("sapi"), None);
    }
}
