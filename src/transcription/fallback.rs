//! Audio download + transcription, used when no captions are usable.

use super::{no_backend_error, Transcriber, TranscriptionBackend};
use crate::audio::TempAudioFile;
use crate::config::Settings;
use crate::error::Result;
use crate::video_source::{VideoPlatform, VideoReference};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Downloads a video's audio and transcribes it with the configured backend.
pub struct AudioTranscriber {
    platform: Arc<dyn VideoPlatform>,
    backend: Option<Arc<dyn Transcriber>>,
    temp_dir: PathBuf,
}

impl AudioTranscriber {
    /// Create the fallback, selecting the transcription backend once.
    pub fn new(platform: Arc<dyn VideoPlatform>, settings: &Settings) -> Result<Self> {
        let backend = TranscriptionBackend::detect(&settings.transcription)?
            .map(|b| Arc::new(b) as Arc<dyn Transcriber>);

        if backend.is_none() {
            warn!("No audio transcription backend available; audio fallback will fail");
        }

        Ok(Self::with_backend(platform, backend, settings.temp_dir()))
    }

    /// Create the fallback with an explicit backend.
    pub fn with_backend(
        platform: Arc<dyn VideoPlatform>,
        backend: Option<Arc<dyn Transcriber>>,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            platform,
            backend,
            temp_dir,
        }
    }

    /// Download the audio for `video` and transcribe it.
    ///
    /// The downloaded file is removed on every exit path.
    #[instrument(skip(self), fields(video_id = %video.id()))]
    pub async fn transcribe_audio(&self, video: &VideoReference) -> Result<String> {
        let Some(backend) = &self.backend else {
            return Err(no_backend_error());
        };

        info!("Starting audio download for transcription");

        let temp = TempAudioFile::new(&self.temp_dir);
        let audio_path = self
            .platform
            .download_audio(video, temp.dir(), temp.prefix())
            .await?;

        let text = backend.transcribe(&audio_path).await?;
        info!("{} transcription complete", backend.name());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TubesumError;
    use crate::testing::{MockPlatform, MockTranscriber};

    fn dir_is_empty(dir: &std::path::Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_temp_file_removed_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let platform = Arc::new(MockPlatform::default());
        let transcriber = Arc::new(MockTranscriber::new("spoken words"));

        let fallback = AudioTranscriber::with_backend(
            platform.clone(),
            Some(transcriber.clone()),
            dir.path().to_path_buf(),
        );

        let video = VideoReference::parse("https://youtu.be/dQw4w9WgXcQ").unwrap();
        let text = fallback.transcribe_audio(&video).await.unwrap();

        assert_eq!(text, "spoken words");
        let seen = transcriber.calls.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].starts_with(dir.path()));
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_temp_file_removed_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let platform = Arc::new(MockPlatform::default());
        let transcriber = Arc::new(MockTranscriber::failing("model crashed"));

        let fallback = AudioTranscriber::with_backend(
            platform,
            Some(transcriber),
            dir.path().to_path_buf(),
        );

        let video = VideoReference::parse("https://youtu.be/dQw4w9WgXcQ").unwrap();
        let err = fallback.transcribe_audio(&video).await.unwrap_err();

        assert!(err.to_string().contains("model crashed"));
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_cancelled_request_leaves_temp_dir_empty() {
        let dir = tempfile::tempdir().unwrap();
        let platform = Arc::new(MockPlatform {
            download_delay: Some(std::time::Duration::from_millis(300)),
            ..Default::default()
        });
        let transcriber = Arc::new(MockTranscriber::new("unused"));

        let fallback = AudioTranscriber::with_backend(
            platform.clone(),
            Some(transcriber.clone()),
            dir.path().to_path_buf(),
        );

        let video = VideoReference::parse("dQw4w9WgXcQ").unwrap();
        let cancelled = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            fallback.transcribe_audio(&video),
        )
        .await;
        assert!(cancelled.is_err());

        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        assert!(dir_is_empty(dir.path()));
        assert!(platform.downloads.lock().unwrap().is_empty());
        assert!(transcriber.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_backend() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = AudioTranscriber::with_backend(
            Arc::new(MockPlatform::default()),
            None,
            dir.path().to_path_buf(),
        );

        let video = VideoReference::parse("dQw4w9WgXcQ").unwrap();
        let err = fallback.transcribe_audio(&video).await.unwrap_err();

        assert!(matches!(err, TubesumError::TranscriptionFailed(_)));
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_download_failure() {
        let dir = tempfile::tempdir().unwrap();
        let platform = Arc::new(MockPlatform {
            fail_download: true,
            ..Default::default()
        });
        let transcriber = Arc::new(MockTranscriber::new("unused"));

        let fallback = AudioTranscriber::with_backend(
            platform,
            Some(transcriber.clone()),
            dir.path().to_path_buf(),
        );

        let video = VideoReference::parse("dQw4w9WgXcQ").unwrap();
        let err = fallback.transcribe_audio(&video).await.unwrap_err();

        assert!(matches!(err, TubesumError::DownloadFailed(_)));
        assert!(transcriber.calls.lock().unwrap().is_empty());
    }
}
