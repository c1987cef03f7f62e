//! Pipeline orchestrator for Tubesum.
//!
//! Coordinates the whole request: metadata, transcript, length check and
//! summary.

use crate::config::Settings;
use crate::error::{Result, TubesumError};
use crate::summary::{ChatBackend, SummaryResult, Summarizer};
use crate::transcript::{ensure_min_length, TranscriptResolver};
use crate::transcription::{AudioTranscriber, Transcriber};
use crate::video_source::{VideoInfo, VideoPlatform, VideoReference, YoutubePlatform};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// Processes videos into structured summaries.
///
/// Holds no per-request state; share it behind an `Arc`.
pub struct VideoProcessor {
    platform: Arc<dyn VideoPlatform>,
    transcripts: TranscriptResolver,
    summarizer: Summarizer,
    min_transcript_chars: usize,
}

impl VideoProcessor {
    /// Create a processor backed by YouTube, the configured transcription
    /// backend and the configured LLM.
    pub fn new(settings: &Settings) -> Result<Self> {
        let platform: Arc<dyn VideoPlatform> = Arc::new(YoutubePlatform::new(settings)?);
        let audio = AudioTranscriber::new(platform.clone(), settings)?;
        let summarizer = Summarizer::new(settings)?;

        Ok(Self::assemble(platform, audio, summarizer, settings))
    }

    /// Create a processor with custom components.
    pub fn with_components(
        settings: &Settings,
        platform: Arc<dyn VideoPlatform>,
        transcriber: Option<Arc<dyn Transcriber>>,
        chat: Arc<dyn ChatBackend>,
    ) -> Self {
        let audio = AudioTranscriber::with_backend(platform.clone(), transcriber, settings.temp_dir());
        let summarizer = Summarizer::with_backend(chat, settings);

        Self::assemble(platform, audio, summarizer, settings)
    }

    fn assemble(
        platform: Arc<dyn VideoPlatform>,
        audio: AudioTranscriber,
        summarizer: Summarizer,
        settings: &Settings,
    ) -> Self {
        Self {
            transcripts: TranscriptResolver::new(platform.clone(), audio, &settings.transcript),
            platform,
            summarizer,
            min_transcript_chars: settings.transcript.min_chars,
        }
    }

    /// Run the full pipeline for one video.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn process_video(&self, url: &str, language: &str) -> Result<ProcessedVideo> {
        let video = VideoReference::parse(url)?;
        info!("Processing video {}", video.id());

        let info = self.platform.fetch_info(&video).await?;
        info!(
            "Video: {}",
            info.title.as_deref().unwrap_or("(untitled)")
        );

        let transcript = self.transcripts.resolve(&video).await?;
        ensure_min_length(&transcript, self.min_transcript_chars)?;

        let summary = self.summarizer.summarize(&transcript, language).await?;
        info!("Summary complete for {}", video.id());

        Ok(ProcessedVideo { info, summary })
    }
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct ProcessedVideo {
    pub info: VideoInfo,
    pub summary: SummaryResult,
}

/// The subset of video metadata returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct VideoInfoPayload {
    pub title: Option<String>,
    pub channel: Option<String>,
    pub duration: Option<u64>,
    pub thumbnail: Option<String>,
}

impl From<&VideoInfo> for VideoInfoPayload {
    fn from(info: &VideoInfo) -> Self {
        Self {
            title: info.title.clone(),
            channel: info.channel.clone(),
            duration: info.duration,
            thumbnail: info.thumbnail.clone(),
        }
    }
}

/// Wire payload for a processing request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProcessOutcome {
    Success {
        video_info: VideoInfoPayload,
        summary: SummaryResult,
    },
    Error {
        message: String,
    },
}

impl ProcessOutcome {
    pub fn from_result(result: Result<ProcessedVideo>) -> Self {
        match result {
            Ok(processed) => ProcessOutcome::Success {
                video_info: VideoInfoPayload::from(&processed.info),
                summary: processed.summary,
            },
            Err(e @ TubesumError::TranscriptTooShort { .. }) => ProcessOutcome::Error {
                message: e.to_string(),
            },
            Err(e) => ProcessOutcome::Error {
                message: format!("Processing failed: {}", e),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProcessOutcome::Success { .. })
    }
}
