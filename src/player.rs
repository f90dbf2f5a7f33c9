use rodio::{Decoder, OutputStream, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::error::PlaybackError;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Something that can play a synthesized file back for manual verification.
pub trait AudioOutput {
    /// Blocks until playback has finished.
    fn play_blocking(&self, path: &Path) -> Result<(), PlaybackError>;
}

/// Plays through the default output device.
pub struct AudioEngine;

impl AudioEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for AudioEngine {
    fn play_blocking(&self, path: &Path) -> Result<(), PlaybackError> {
        // Stream must stay alive until the sink drains
        let (_stream, stream_handle) = OutputStream::try_default()?;
        let sink = Sink::try_new(&stream_handle)?;

        let file = BufReader::new(File::open(path)?);
        let source = Decoder::new(file)?;
        sink.append(source);

        while !sink.empty() {
            thread::sleep(POLL_INTERVAL);
        }
        Ok(())
    }
}

/// Playback disabled.
pub struct Silent;

impl AudioOutput for Silent {
    fn play_blocking(&self, _path: &Path) -> Result<(), PlaybackError> {
        Ok(())
    }
}
