use super::SpeechBackend;
use crate::error::SynthesisError;

use std::io::Read;
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

pub const EXTENSION: &str = "wav";

// espeak-ng default is 175 words per minute
const SLOW_WPM: &str = "80";

pub struct EspeakBackend {
    binary: String,
    timeout_secs: u64,
}

impl EspeakBackend {
    pub fn new(timeout_secs: u64) -> Self {
        Self::with_binary("espeak-ng", timeout_secs)
    }

    pub fn with_binary(binary: &str, timeout_secs: u64) -> Self {
        Self {
            binary: binary.to_string(),
            timeout_secs,
        }
    }

    fn command(&self, text: &str, language: &str, slow: bool) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--stdout").arg("-v").arg(language);
        if slow {
            cmd.arg("-s").arg(SLOW_WPM);
        }
        cmd.arg(text);
        cmd
    }
}

impl SpeechBackend for EspeakBackend {
    fn id(&self) -> &'static str {
        "espeak"
    }

    fn extension(&self) -> &'static str {
        EXTENSION
    }

    fn synthesize(&self, text: &str, language: &str, slow: bool) -> Result<Vec<u8>, SynthesisError> {
        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        let mut child = self
            .command(text, language, slow)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain stdout while waiting, a large WAV would otherwise fill the pipe
        let mut stdout = child.stdout.take();
        let reader = std::thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(out) = stdout.as_mut() {
                let _ = out.read_to_end(&mut buf);
            }
            buf
        });

        match child.wait_timeout(Duration::from_secs(self.timeout_secs))? {
            Some(status) => {
                let audio = reader.join().unwrap_or_default();
                if status.success() {
                    Ok(audio)
                } else {
                    let mut err_msg = String::new();
                    if let Some(mut stderr) = child.stderr.take() {
                        let _ = stderr.read_to_string(&mut err_msg);
                    }
                    Err(SynthesisError::Backend {
                        backend: "espeak",
                        message: err_msg.trim().to_string(),
                    })
                }
            }
            None => {
                // Timeout occurred, kill the process
                let _ = child.kill();
                let _ = child.wait();
                Err(SynthesisError::TimedOut(self.timeout_secs))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_arguments() {
        let backend = EspeakBackend::new(5);
        let cmd = backend.command("Apple", "en", true);
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, ["--stdout", "-v", "en", "-s", "80", "Apple"]);

        let cmd = backend.command("Apple", "he", false);
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, ["--stdout", "-v", "he", "Apple"]);
    }

    #[test]
    fn test_missing_binary_is_an_error() {
        let backend = EspeakBackend::with_binary("/nonexistent/espeak-ng", 5);
        assert!(matches!(
            backend.synthesize("Apple", "en", false),
            Err(SynthesisError::Io(_))
        ));
    }

    #[test]
    fn test_blank_text_is_rejected() {
        let backend = EspeakBackend::new(5);
        assert!(matches!(
            backend.synthesize("   ", "en", false),
            Err(SynthesisError::EmptyText)
        ));
    }
}
