//! Online voice backed by the Google Translate TTS endpoint.
//!
//! The endpoint only accepts short requests, so longer text is sent in
//! whitespace-separated chunks and the MP3 payloads are concatenated. MP3
//! frames are self-delimiting, so the result plays back as one file.

use super::SpeechBackend;
use crate::error::SynthesisError;

use reqwest::blocking::Client;
use std::time::Duration;

pub const EXTENSION: &str = "mp3";

/// Longest text the endpoint accepts in one request.
pub const MAX_CHUNK_CHARS: usize = 100;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) vocab-audio";

pub struct GoogleBackend {
    client: Client,
    endpoint: String,
}

impl GoogleBackend {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    fn fetch_chunk(
        &self,
        chunk: &str,
        idx: usize,
        total: usize,
        language: &str,
        slow: bool,
    ) -> Result<Vec<u8>, SynthesisError> {
        let speed = if slow { "0.24" } else { "1" };
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", language),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
                ("client", "tw-ob"),
                ("ttsspeed", speed),
            ])
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SynthesisError::Status {
                status: status.as_u16(),
            });
        }

        Ok(resp.bytes()?.to_vec())
    }
}

impl SpeechBackend for GoogleBackend {
    fn id(&self) -> &'static str {
        "google"
    }

    fn extension(&self) -> &'static str {
        EXTENSION
    }

    fn synthesize(&self, text: &str, language: &str, slow: bool) -> Result<Vec<u8>, SynthesisError> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            log::debug!("google: chunk {}/{} '{}'", idx + 1, chunks.len(), chunk);
            let bytes = self.fetch_chunk(chunk, idx, chunks.len(), language, slow)?;
            audio.extend_from_slice(&bytes);
        }

        if audio.is_empty() {
            return Err(SynthesisError::EmptyAudio);
        }
        Ok(audio)
    }
}

/// Split `text` at whitespace into chunks of at most `max` characters.
/// A single word longer than `max` is cut at character boundaries.
pub fn split_text(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
