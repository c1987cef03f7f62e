//! Transcript resolution.
//!
//! Produces plain transcript text for a video through an ordered chain of
//! sources, stopping at the first one that works:
//!
//! 1. a manually created caption track in a preferred language
//! 2. an auto-generated caption track in a preferred language
//! 3. the first available track, machine translated
//! 4. audio download + speech-to-text

use crate::config::TranscriptSettings;
use crate::error::{Result, TubesumError};
use crate::transcription::AudioTranscriber;
use crate::video_source::{CaptionSegment, CaptionTrack, VideoPlatform, VideoReference};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Resolves transcript text for a video.
pub struct TranscriptResolver {
    platform: Arc<dyn VideoPlatform>,
    audio: AudioTranscriber,
    preferred_languages: Vec<String>,
    translation_language: String,
}

impl TranscriptResolver {
    pub fn new(
        platform: Arc<dyn VideoPlatform>,
        audio: AudioTranscriber,
        settings: &TranscriptSettings,
    ) -> Self {
        Self {
            platform,
            audio,
            preferred_languages: settings.preferred_languages.clone(),
            translation_language: settings.translation_language.clone(),
        }
    }

    /// Resolve the transcript with the configured language preferences.
    pub async fn resolve(&self, video: &VideoReference) -> Result<String> {
        self.resolve_with_languages(video, &self.preferred_languages).await
    }

    /// Resolve the transcript, falling back to audio transcription when no
    /// caption track in `preferred` (or a translation) can be used.
    #[instrument(skip(self, preferred), fields(video_id = %video.id()))]
    pub async fn resolve_with_languages(
        &self,
        video: &VideoReference,
        preferred: &[String],
    ) -> Result<String> {
        let caption_error = match self.from_captions(video, preferred).await {
            Ok(text) => return Ok(text),
            Err(e) => e,
        };

        warn!("Caption transcript unavailable: {}", caption_error);
        info!("Attempting fallback to audio transcription");

        self.audio
            .transcribe_audio(video)
            .await
            .map_err(|audio_error| {
                warn!("Audio transcription failed: {}", audio_error);
                TubesumError::TranscriptUnavailable {
                    captions: Box::new(caption_error),
                    audio: Box::new(audio_error),
                }
            })
    }

    /// Resolve from a raw URL.
    pub async fn resolve_url(&self, url: &str) -> Result<String> {
        let video = VideoReference::parse(url)?;
        self.resolve(&video).await
    }

    async fn from_captions(&self, video: &VideoReference, preferred: &[String]) -> Result<String> {
        let tracks = self.platform.list_caption_tracks(video.id()).await?;
        let track = select_track(&tracks, preferred, &self.translation_language)?;

        match &track.translation_language {
            Some(target) => info!("Translating transcript from {} to {}", track.language_code, target),
            None if track.is_generated => info!("Found generated transcript: {}", track.language_code),
            None => info!("Found manual transcript: {}", track.language_code),
        }

        let segments = self.platform.fetch_captions(&track).await?;
        let text = join_segments(&segments);
        info!("Transcript fetched (length: {})", text.chars().count());
        Ok(text)
    }
}

/// Pick the caption track to use.
///
/// Manual tracks in a preferred language win over generated ones; within a
/// provenance, earlier entries of `preferred` win. Without any match the first
/// enumerated track is translated to `translate_to`.
pub fn select_track(
    tracks: &[CaptionTrack],
    preferred: &[String],
    translate_to: &str,
) -> Result<CaptionTrack> {
    if let Some(track) =
        find_track(tracks, preferred, false).or_else(|| find_track(tracks, preferred, true))
    {
        return Ok(track.clone());
    }

    let first = tracks.first().ok_or_else(|| {
        TubesumError::TrackUnavailable("No caption tracks available".to_string())
    })?;
    first.translate(translate_to)
}

fn find_track<'a>(
    tracks: &'a [CaptionTrack],
    preferred: &[String],
    generated: bool,
) -> Option<&'a CaptionTrack> {
    preferred.iter().find_map(|lang| {
        tracks
            .iter()
            .find(|t| t.is_generated == generated && &t.language_code == lang)
    })
}

/// Join segment text with single spaces, dropping timing.
pub fn join_segments(segments: &[CaptionSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reject transcripts shorter than `min_chars` characters.
pub fn ensure_min_length(text: &str, min_chars: usize) -> Result<()> {
    let length = text.chars().count();
    if length < min_chars {
        return Err(TubesumError::TranscriptTooShort { length });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{segment, track, MockPlatform, MockTranscriber};
    use crate::transcription::Transcriber;

    fn langs(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|s| s.to_string()).collect()
    }

    fn resolver(
        platform: Arc<MockPlatform>,
        backend: Option<Arc<dyn Transcriber>>,
        temp: &std::path::Path,
    ) -> TranscriptResolver {
        let audio = AudioTranscriber::with_backend(platform.clone(), backend, temp.to_path_buf());
        TranscriptResolver::new(platform, audio, &TranscriptSettings::default())
    }

    #[test]
    fn test_manual_beats_generated_listed_first() {
        let tracks = vec![track("en", true), track("en", false)];
        let selected = select_track(&tracks, &langs(&["en"]), "zh-Hans").unwrap();
        assert!(!selected.is_generated);
        assert!(selected.translation_language.is_none());
    }

    #[test]
    fn test_manual_in_any_preferred_language_beats_generated() {
        let tracks = vec![track("zh-Hans", true), track("en", false)];
        let selected = select_track(&tracks, &langs(&["zh-Hans", "en"]), "zh-Hans").unwrap();
        assert_eq!(selected.language_code, "en");
        assert!(!selected.is_generated);
    }

    #[test]
    fn test_preference_order_within_provenance() {
        let tracks = vec![track("en", false), track("zh-TW", false)];
        let selected = select_track(&tracks, &langs(&["zh-Hans", "zh-TW", "en"]), "zh-Hans").unwrap();
        assert_eq!(selected.language_code, "zh-TW");
    }

    #[test]
    fn test_generated_when_no_manual() {
        let tracks = vec![track("fr", false), track("en", true)];
        let selected = select_track(&tracks, &langs(&["en"]), "zh-Hans").unwrap();
        assert_eq!(selected.language_code, "en");
        assert!(selected.is_generated);
    }

    #[test]
    fn test_translate_first_track_when_no_preferred() {
        let tracks = vec![track("de", true), track("fr", false)];
        let selected = select_track(&tracks, &langs(&["zh-Hans", "en"]), "zh-Hans").unwrap();
        assert_eq!(selected.language_code, "de");
        assert_eq!(selected.translation_language.as_deref(), Some("zh-Hans"));
    }

    #[test]
    fn test_no_tracks() {
        let err = select_track(&[], &langs(&["en"]), "zh-Hans").unwrap_err();
        assert!(matches!(err, TubesumError::TrackUnavailable(_)));
    }

    #[test]
    fn test_join_segments() {
        let segments = vec![segment("hello", 0.0), segment("big", 1.0), segment("world", 2.0)];
        assert_eq!(join_segments(&segments), "hello big world");
        assert_eq!(join_segments(&[]), "");
    }

    #[test]
    fn test_min_length_boundary() {
        let short = "a".repeat(49);
        let exact = "a".repeat(50);

        assert!(matches!(
            ensure_min_length(&short, 50),
            Err(TubesumError::TranscriptTooShort { length: 49 })
        ));
        assert!(ensure_min_length(&exact, 50).is_ok());
    }

    #[test]
    fn test_min_length_counts_characters() {
        // 50 CJK characters are 150 bytes but still exactly 50 characters
        let text = "字".repeat(50);
        assert!(ensure_min_length(&text, 50).is_ok());
        assert!(ensure_min_length(&"字".repeat(49), 50).is_err());
    }

    #[tokio::test]
    async fn test_resolve_translates_first_track() {
        let dir = tempfile::tempdir().unwrap();
        let platform = Arc::new(
            MockPlatform::with_tracks(vec![track("de", false), track("fr", false)])
                .caption("de->zh-Hans", vec![segment("你好", 0.0), segment("世界", 1.0)]),
        );

        let text = resolver(platform.clone(), None, dir.path())
            .resolve_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap();

        assert_eq!(text, "你好 世界");
        let fetched = platform.fetched.lock().unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].translation_language.as_deref(), Some("zh-Hans"));
    }

    #[tokio::test]
    async fn test_resolve_with_explicit_languages() {
        let dir = tempfile::tempdir().unwrap();
        let platform = Arc::new(
            MockPlatform::with_tracks(vec![track("en", false), track("ja", false)])
                .caption("ja", vec![segment("こんにちは", 0.0)]),
        );
        let video = VideoReference::parse("dQw4w9WgXcQ").unwrap();

        let text = resolver(platform, None, dir.path())
            .resolve_with_languages(&video, &langs(&["ja"]))
            .await
            .unwrap();

        assert_eq!(text, "こんにちは");
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_audio() {
        let dir = tempfile::tempdir().unwrap();
        let platform = Arc::new(MockPlatform::with_tracks(vec![]));
        let transcriber = Arc::new(MockTranscriber::new("transcribed from audio"));

        let text = resolver(platform.clone(), Some(transcriber.clone()), dir.path())
            .resolve_url("https://youtu.be/dQw4w9WgXcQ")
            .await
            .unwrap();

        assert_eq!(text, "transcribed from audio");
        assert_eq!(transcriber.calls.lock().unwrap().len(), 1);
        assert_eq!(platform.downloads.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back_to_audio() {
        let dir = tempfile::tempdir().unwrap();
        // Track is listed but its captions cannot be fetched
        let platform = Arc::new(MockPlatform::with_tracks(vec![track("en", false)]));
        let transcriber = Arc::new(MockTranscriber::new("from audio"));

        let text = resolver(platform, Some(transcriber), dir.path())
            .resolve_url("dQw4w9WgXcQ")
            .await
            .unwrap();

        assert_eq!(text, "from audio");
    }

    #[tokio::test]
    async fn test_both_paths_exhausted() {
        let dir = tempfile::tempdir().unwrap();
        let platform = Arc::new(MockPlatform {
            fail_listing: true,
            ..Default::default()
        });

        let err = resolver(platform, None, dir.path())
            .resolve_url("https://youtu.be/dQw4w9WgXcQ")
            .await
            .unwrap_err();

        match &err {
            TubesumError::TranscriptUnavailable { captions, audio } => {
                assert!(matches!(**captions, TubesumError::TrackUnavailable(_)));
                assert!(matches!(**audio, TubesumError::TranscriptionFailed(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let msg = err.to_string();
        assert!(msg.contains("Transcripts are disabled"));
        assert!(msg.contains("OPENAI_API_KEY"));
    }

    #[tokio::test]
    async fn test_invalid_url_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let platform = Arc::new(MockPlatform::with_tracks(vec![track("en", false)]));

        let err = resolver(platform.clone(), None, dir.path())
            .resolve_url("https://example.com/not-a-video")
            .await
            .unwrap_err();

        assert!(matches!(err, TubesumError::InvalidReference(_)));
        assert!(platform.fetched.lock().unwrap().is_empty());
        assert!(platform.downloads.lock().unwrap().is_empty());
    }
}
