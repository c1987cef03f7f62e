//! OpenAI Whisper API transcription.

use super::Transcriber;
use crate::error::{Result, TubesumError};
use crate::openai::create_client;
use async_openai::types::{AudioInput, AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Remote transcriber backed by the OpenAI audio API.
pub struct WhisperApiTranscriber {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl WhisperApiTranscriber {
    /// Create a transcriber with the default `whisper-1` model.
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_model(api_key, "whisper-1")
    }

    pub fn with_model(api_key: &str, model: &str) -> Result<Self> {
        Ok(Self {
            client: create_client(api_key, None)?,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl Transcriber for WhisperApiTranscriber {
    fn name(&self) -> &str {
        "openai-whisper"
    }

    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        info!("Using OpenAI API for transcription ({})", self.model);

        let file_bytes = tokio::fs::read(audio_path).await?;

        let request = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(
                audio_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("audio.mp3")
                    .to_string(),
                file_bytes,
            ))
            .model(&self.model)
            .response_format(AudioResponseFormat::Text)
            .build()
            .map_err(|e| {
                TubesumError::TranscriptionFailed(format!("Failed to build request: {}", e))
            })?;

        let response = self
            .client
            .audio()
            .transcribe_raw(request)
            .await
            .map_err(|e| TubesumError::TranscriptionFailed(format!("Whisper API error: {}", e)))?;

        let text = String::from_utf8_lossy(&response).trim().to_string();
        debug!("Transcribed {} characters", text.chars().count());
        Ok(text)
    }
}
