use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{what} not found: {path}")]
    MissingInput { what: &'static str, path: PathBuf },
    #[error("error creating directory {path}: {source}")]
    Setup {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error reading or writing file: {0}")]
    IOFailed(#[from] std::io::Error),
    #[error("error parsing vocabulary file {path}: {source}")]
    VocabularyFailed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("error serializing vocabulary: {0}")]
    SerdeFailed(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    ConfigFailed(#[from] config::ConfigError),
    #[error("error persisting file: {0}")]
    PersistFailed(#[from] tempfile::PersistError),
    #[error("TTS backend unavailable: {0}")]
    BackendFailed(#[from] SynthesisError),
}

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("nothing to synthesize")]
    EmptyText,
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("TTS endpoint answered {status}")]
    Status { status: u16 },
    #[error("TTS endpoint returned no audio")]
    EmptyAudio,
    #[error("{backend} error: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
    #[error("backend timed out after {0}s")]
    TimedOut(u64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    Stream(#[from] rodio::StreamError),
    #[error("failed to create sink: {0}")]
    Sink(#[from] rodio::PlayError),
    #[error("failed to decode: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
    #[error("failed to open audio file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("no data array found")]
    NoDataArray,
    #[error("malformed data array at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: &'static str },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("error persisting file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub type Result<T> = std::result::Result<T, Error>;
