//! Video platform abstraction for Tubesum.
//!
//! Provides a trait-based interface over the platform the videos come from:
//! metadata, caption tracks and audio download.

mod youtube;

pub use youtube::{parse_caption_tracks, parse_json3_captions, YoutubePlatform};

use crate::error::{Result, TubesumError};
use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// A video URL and the 11-character identifier derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoReference {
    url: String,
    id: String,
}

fn video_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Only YouTube hosts; the ID is exactly 11 characters after `v=` or a known path prefix
        Regex::new(
            r"(?:youtu\.be/|youtube(?:-nocookie)?\.com/(?:(?:embed|shorts|live|v)/|watch\?(?:[^#]*&)?v=))([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)",
        )
        .expect("valid regex")
    })
}

fn bare_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9A-Za-z_-]{11}$").expect("valid regex"))
}

impl VideoReference {
    /// Parse a video URL (or a bare ID) into a reference.
    pub fn parse(input: &str) -> Result<Self> {
        let url = input.trim();

        let id = video_id_regex()
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .or_else(|| bare_id_regex().is_match(url).then(|| url.to_string()))
            .ok_or_else(|| {
                TubesumError::InvalidReference(format!(
                    "Could not extract video ID from URL: {}",
                    input
                ))
            })?;

        Ok(Self {
            url: url.to_string(),
            id,
        })
    }

    /// The URL as given by the caller.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The platform video identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Canonical watch URL for the identifier.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

/// A chapter marker from the video's metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chapter {
    pub title: String,
    pub start_time: f64,
    pub end_time: f64,
}

/// Read-only metadata snapshot of a video.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VideoInfo {
    pub title: Option<String>,
    pub channel: Option<String>,
    /// Duration in seconds.
    pub duration: Option<u64>,
    pub upload_date: Option<NaiveDate>,
    pub thumbnail: Option<String>,
    pub view_count: Option<u64>,
    pub description: Option<String>,
    pub chapters: Vec<Chapter>,
}

/// One language/provenance variant of a video's captions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    /// Language code, e.g. `en` or `zh-Hans`.
    pub language_code: String,
    /// Human readable language name.
    pub language: String,
    /// Auto-generated by speech recognition rather than authored.
    pub is_generated: bool,
    pub is_translatable: bool,
    /// Caption fetch URL.
    pub base_url: String,
    /// Target language when the platform should translate the track.
    pub translation_language: Option<String>,
}

impl CaptionTrack {
    /// A copy of this track that fetches a machine translation into `language_code`.
    pub fn translate(&self, language_code: &str) -> Result<CaptionTrack> {
        if !self.is_translatable {
            return Err(TubesumError::TrackUnavailable(format!(
                "Track '{}' cannot be translated to '{}'",
                self.language_code, language_code
            )));
        }

        Ok(CaptionTrack {
            translation_language: Some(language_code.to_string()),
            ..self.clone()
        })
    }
}

/// A timed piece of caption text.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionSegment {
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
}

/// Capabilities Tubesum needs from a video platform.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Fetch metadata for a video.
    async fn fetch_info(&self, video: &VideoReference) -> Result<VideoInfo>;

    /// List the caption tracks available for a video ID, in platform order.
    async fn list_caption_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>>;

    /// Fetch the timed segments of a caption track.
    async fn fetch_captions(&self, track: &CaptionTrack) -> Result<Vec<CaptionSegment>>;

    /// Download the best audio as MP3 into `output_dir`, naming it after `file_prefix`.
    async fn download_audio(
        &self,
        video: &VideoReference,
        output_dir: &Path,
        file_prefix: &str,
    ) -> Result<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        let cases = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s&list=PL123",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ#comments",
            "https://youtu.be/dQw4w9WgXcQ?si=abcdef",
            "https://youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/live/dQw4w9WgXcQ?feature=share",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ",
            "dQw4w9WgXcQ",
        ];

        for url in cases {
            let video = VideoReference::parse(url).unwrap();
            assert_eq!(video.id(), "dQw4w9WgXcQ", "failed for {}", url);
        }
    }

    #[test]
    fn test_invalid_reference() {
        let cases = [
            "",
            "not a url",
            "https://www.youtube.com/",
            "https://youtu.be/short",
            "https://example.com/not-a-video",
            "https://example.com/watch?v=dQw4w9WgXcQ",
            "https://vimeo.com/channels/staffpicks1",
        ];

        for url in cases {
            let err = VideoReference::parse(url).unwrap_err();
            assert!(matches!(err, TubesumError::InvalidReference(_)), "{}", url);
        }
    }

    #[test]
    fn test_watch_url() {
        let video = VideoReference::parse("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(video.url(), "https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(video.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[test]
    fn test_translate_track() {
        let track = CaptionTrack {
            language_code: "de".to_string(),
            language: "German".to_string(),
            is_generated: false,
            is_translatable: true,
            base_url: "https://example.com/timedtext?v=x".to_string(),
            translation_language: None,
        };

        let translated = track.translate("zh-Hans").unwrap();
        assert_eq!(translated.translation_language.as_deref(), Some("zh-Hans"));
        assert_eq!(translated.language_code, "de");

        let locked = CaptionTrack {
            is_translatable: false,
            ..track
        };
        assert!(matches!(
            locked.translate("zh-Hans"),
            Err(TubesumError::TrackUnavailable(_))
        ));
    }
}
