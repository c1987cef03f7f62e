//! Audio transcription for Tubesum.
//!
//! The last stage of transcript acquisition: download the audio and turn it
//! into text with whichever backend is configured.
//!
//! # Backends
//!
//! - **Remote**: OpenAI Whisper API, used when `OPENAI_API_KEY` is set.
//! - **Local**: the `whisper` CLI with the `base` model, used when installed.

mod fallback;
mod local;
mod whisper;

pub use fallback::AudioTranscriber;
pub use local::LocalWhisperTranscriber;
pub use whisper::WhisperApiTranscriber;

use crate::config::TranscriptionSettings;
use crate::error::{Result, TubesumError};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

/// Trait for speech-to-text backends.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Transcribe an audio file to plain text.
    async fn transcribe(&self, audio_path: &Path) -> Result<String>;
}

/// The configured transcription backend, first available wins.
pub enum TranscriptionBackend {
    Remote(WhisperApiTranscriber),
    Local(LocalWhisperTranscriber),
}

impl TranscriptionBackend {
    /// Select a backend from settings and the local environment.
    ///
    /// Returns `Ok(None)` when neither backend is usable.
    pub fn detect(settings: &TranscriptionSettings) -> Result<Option<Self>> {
        Self::select(
            settings,
            LocalWhisperTranscriber::is_available(&settings.local_binary),
        )
    }

    fn select(settings: &TranscriptionSettings, local_available: bool) -> Result<Option<Self>> {
        if let Some(key) = settings.openai_api_key.as_deref().filter(|k| !k.is_empty()) {
            info!("Audio transcription backend: OpenAI ({})", settings.remote_model);
            return Ok(Some(TranscriptionBackend::Remote(
                WhisperApiTranscriber::with_model(key, &settings.remote_model)?,
            )));
        }

        if local_available {
            info!(
                "Audio transcription backend: local {} ({})",
                settings.local_binary, settings.local_model
            );
            return Ok(Some(TranscriptionBackend::Local(LocalWhisperTranscriber::new(
                &settings.local_binary,
                &settings.local_model,
            ))));
        }

        Ok(None)
    }
}

#[async_trait]
impl Transcriber for TranscriptionBackend {
    fn name(&self) -> &str {
        match self {
            TranscriptionBackend::Remote(t) => t.name(),
            TranscriptionBackend::Local(t) => t.name(),
        }
    }

    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        match self {
            TranscriptionBackend::Remote(t) => t.transcribe(audio_path).await,
            TranscriptionBackend::Local(t) => t.transcribe(audio_path).await,
        }
    }
}

/// Error for the case where no backend could be selected.
pub fn no_backend_error() -> TubesumError {
    TubesumError::TranscriptionFailed(
        "No OpenAI API key found AND local 'whisper' is not installed. \
         Option 1: set OPENAI_API_KEY. \
         Option 2: install local whisper (free): pip install openai-whisper torch"
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_wins_when_key_set() {
        let settings = TranscriptionSettings {
            openai_api_key: Some("sk-test".to_string()),
            ..Default::default()
        };

        let backend = TranscriptionBackend::select(&settings, true).unwrap();
        assert!(matches!(backend, Some(TranscriptionBackend::Remote(_))));
    }

    #[test]
    fn test_local_when_no_key() {
        let settings = TranscriptionSettings {
            openai_api_key: Some(String::new()),
            ..Default::default()
        };

        let backend = TranscriptionBackend::select(&settings, true).unwrap();
        assert_eq!(backend.map(|b| b.name().to_string()).as_deref(), Some("local-whisper"));
    }

    #[test]
    fn test_none_available() {
        let settings = TranscriptionSettings::default();
        assert!(TranscriptionBackend::select(&settings, false).unwrap().is_none());
    }

    #[test]
    fn test_no_backend_error_names_both_prerequisites() {
        let msg = no_backend_error().to_string();
        assert!(msg.contains("OPENAI_API_KEY"));
        assert!(msg.contains("openai-whisper"));
    }
}
