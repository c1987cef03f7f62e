//! Mock collaborators shared by unit tests.

use crate::error::{Result, TubesumError};
use crate::summary::{ChatBackend, ChatRequest};
use crate::transcription::Transcriber;
use crate::video_source::{
    CaptionSegment, CaptionTrack, VideoInfo, VideoPlatform, VideoReference,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub fn track(language_code: &str, is_generated: bool) -> CaptionTrack {
    CaptionTrack {
        language_code: language_code.to_string(),
        language: language_code.to_string(),
        is_generated,
        is_translatable: true,
        base_url: format!("https://example.com/timedtext?lang={}", language_code),
        translation_language: None,
    }
}

pub fn segment(text: &str, start: f64) -> CaptionSegment {
    CaptionSegment {
        text: text.to_string(),
        start,
        duration: 1.0,
    }
}

/// In-memory platform. Captions are keyed by `language_code` or
/// `language_code->translation_language`.
#[derive(Default)]
pub struct MockPlatform {
    pub info: VideoInfo,
    pub tracks: Vec<CaptionTrack>,
    pub captions: HashMap<String, Vec<CaptionSegment>>,
    pub fail_listing: bool,
    pub fail_download: bool,
    /// Delay before the audio file is written.
    pub download_delay: Option<std::time::Duration>,
    pub fetched: Mutex<Vec<CaptionTrack>>,
    pub downloads: Mutex<Vec<PathBuf>>,
}

impl MockPlatform {
    pub fn with_tracks(tracks: Vec<CaptionTrack>) -> Self {
        Self {
            tracks,
            ..Default::default()
        }
    }

    pub fn caption(mut self, key: &str, segments: Vec<CaptionSegment>) -> Self {
        self.captions.insert(key.to_string(), segments);
        self
    }

    fn key(track: &CaptionTrack) -> String {
        match &track.translation_language {
            Some(lang) => format!("{}->{}", track.language_code, lang),
            None => track.language_code.clone(),
        }
    }
}

#[async_trait]
impl VideoPlatform for MockPlatform {
    async fn fetch_info(&self, _video: &VideoReference) -> Result<VideoInfo> {
        Ok(self.info.clone())
    }

    async fn list_caption_tracks(&self, _video_id: &str) -> Result<Vec<CaptionTrack>> {
        if self.fail_listing {
            return Err(TubesumError::TrackUnavailable("Transcripts are disabled".into()));
        }
        Ok(self.tracks.clone())
    }

    async fn fetch_captions(&self, track: &CaptionTrack) -> Result<Vec<CaptionSegment>> {
        self.fetched.lock().unwrap().push(track.clone());
        self.captions
            .get(&Self::key(track))
            .cloned()
            .ok_or_else(|| TubesumError::TrackUnavailable(format!("no captions for {}", Self::key(track))))
    }

    async fn download_audio(
        &self,
        _video: &VideoReference,
        output_dir: &Path,
        file_prefix: &str,
    ) -> Result<PathBuf> {
        if self.fail_download {
            return Err(TubesumError::DownloadFailed("Output file not found".into()));
        }
        if let Some(delay) = self.download_delay {
            tokio::time::sleep(delay).await;
        }
        std::fs::create_dir_all(output_dir)?;
        let path = output_dir.join(format!("{}.mp3", file_prefix));
        std::fs::write(&path, b"ID3 fake mp3")?;
        self.downloads.lock().unwrap().push(path.clone());
        Ok(path)
    }
}

/// Transcriber returning a fixed text and recording the files it saw.
pub struct MockTranscriber {
    pub text: String,
    pub fail_with: Option<String>,
    pub calls: Mutex<Vec<PathBuf>>,
}

impl MockTranscriber {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            text: String::new(),
            fail_with: Some(msg.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    fn name(&self) -> &str {
        "mock"
    }

    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        assert!(audio_path.exists(), "audio must exist while transcribing");
        self.calls.lock().unwrap().push(audio_path.to_path_buf());
        match &self.fail_with {
            Some(msg) => Err(TubesumError::TranscriptionFailed(msg.clone())),
            None => Ok(self.text.clone()),
        }
    }
}

/// Chat backend with a canned reply that records requests.
pub struct MockChat {
    pub reply: std::result::Result<String, String>,
    pub requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockChat {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            reply: Err(msg.to_string()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ChatBackend for MockChat {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply
            .clone()
            .map_err(TubesumError::LlmCallFailed)
    }
}
