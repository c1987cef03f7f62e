//! Error types for Tubesum.

use thiserror::Error;

/// Library-level error type for Tubesum operations.
#[derive(Error, Debug)]
pub enum TubesumError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid video reference: {0}")]
    InvalidReference(String),

    #[error("Caption track unavailable: {0}")]
    TrackUnavailable(String),

    #[error("Audio download failed: {0}")]
    DownloadFailed(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    /// Both the caption path and the audio path were exhausted.
    #[error("Could not retrieve transcript (subtitles unavailable & audio transcription failed): {captions} | {audio}")]
    TranscriptUnavailable {
        captions: Box<TubesumError>,
        audio: Box<TubesumError>,
    },

    #[error("Could not retrieve valid transcript for this video.")]
    TranscriptTooShort { length: usize },

    #[error("LLM call failed: {0}")]
    LlmCallFailed(String),

    #[error("Video source error: {0}")]
    VideoSource(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Tubesum operations.
pub type Result<T> = std::result::Result<T, TubesumError>;
