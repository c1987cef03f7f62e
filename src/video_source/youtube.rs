//! YouTube platform implementation.
//!
//! Metadata and audio go through yt-dlp. Caption tracks are read from the
//! watch page and fetched from the timedtext endpoint in json3 format.

use super::{CaptionSegment, CaptionTrack, Chapter, VideoInfo, VideoPlatform, VideoReference};
use crate::audio;
use crate::config::{CookieSource, PlatformAuth, Settings};
use crate::error::{Result, TubesumError};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Timeout for watch page and caption requests.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// YouTube video platform.
pub struct YoutubePlatform {
    client: reqwest::Client,
    auth: PlatformAuth,
    audio_bitrate: String,
}

impl YoutubePlatform {
    /// Create the platform, resolving cookie authentication once.
    pub fn new(settings: &Settings) -> Result<Self> {
        let auth = CookieSource::resolve(&settings.youtube).into_auth();
        Self::with_auth(settings, auth)
    }

    /// Create the platform with an explicit authentication setup.
    pub fn with_auth(settings: &Settings, auth: PlatformAuth) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(settings.youtube.user_agent.as_str())
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            auth,
            audio_bitrate: settings.transcription.audio_bitrate.clone(),
        })
    }

    /// Fetch metadata using yt-dlp.
    async fn fetch_metadata_ytdlp(&self, url: &str) -> Result<serde_json::Value> {
        let output = tokio::process::Command::new("yt-dlp")
            .args(["--dump-json", "--no-download", "--no-warnings", "--no-playlist"])
            .args(self.auth.args())
            .arg(url)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TubesumError::ToolNotFound("yt-dlp".to_string())
                } else {
                    TubesumError::VideoSource(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TubesumError::VideoSource(format!(
                "Error fetching video info: {}",
                stderr.trim()
            )));
        }

        let json_str = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&json_str).map_err(|e| {
            TubesumError::VideoSource(format!("Failed to parse yt-dlp output: {}", e))
        })
    }
}

#[async_trait]
impl VideoPlatform for YoutubePlatform {
    #[instrument(skip(self), fields(video_id = %video.id()))]
    async fn fetch_info(&self, video: &VideoReference) -> Result<VideoInfo> {
        let json = self.fetch_metadata_ytdlp(video.url()).await?;
        Ok(video_info_from_json(&json))
    }

    #[instrument(skip(self))]
    async fn list_caption_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>> {
        let url = format!("https://www.youtube.com/watch?v={}", video_id);

        let html = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US")
            .send()
            .await?
            .error_for_status()
            .map_err(|e| TubesumError::TrackUnavailable(format!("Watch page request failed: {}", e)))?
            .text()
            .await?;

        let tracks = parse_caption_tracks(&html)?;
        info!("Found {} caption tracks", tracks.len());
        Ok(tracks)
    }

    #[instrument(skip(self, track), fields(language = %track.language_code))]
    async fn fetch_captions(&self, track: &CaptionTrack) -> Result<Vec<CaptionSegment>> {
        let url = caption_url(track)?;
        debug!("Fetching captions from {}", url);

        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| TubesumError::TrackUnavailable(format!("Caption request failed: {}", e)))?
            .text()
            .await?;

        parse_json3_captions(&body)
    }

    async fn download_audio(
        &self,
        video: &VideoReference,
        output_dir: &Path,
        file_prefix: &str,
    ) -> Result<PathBuf> {
        audio::download_audio(
            video.url(),
            output_dir,
            file_prefix,
            &self.audio_bitrate,
            self.auth.args(),
        )
        .await
    }
}

/// Map yt-dlp's `--dump-json` output to a [`VideoInfo`].
fn video_info_from_json(json: &serde_json::Value) -> VideoInfo {
    let text = |key: &str| json[key].as_str().map(|s| s.to_string());

    let upload_date = json["upload_date"]
        .as_str()
        .and_then(|date| chrono::NaiveDate::parse_from_str(date, "%Y%m%d").ok());

    let chapters = json["chapters"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|c| Chapter {
                    title: c["title"].as_str().unwrap_or_default().to_string(),
                    start_time: c["start_time"].as_f64().unwrap_or(0.0),
                    end_time: c["end_time"].as_f64().unwrap_or(0.0),
                })
                .collect()
        })
        .unwrap_or_default();

    VideoInfo {
        title: text("title"),
        channel: text("uploader").or_else(|| text("channel")),
        duration: json["duration"].as_f64().map(|d| d as u64),
        upload_date,
        thumbnail: text("thumbnail"),
        view_count: json["view_count"].as_u64(),
        description: text("description"),
        chapters,
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionsJson {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrackJson>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrackJson {
    base_url: String,
    language_code: String,
    #[serde(default)]
    name: Option<TrackName>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    is_translatable: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackName {
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<TextRun>,
}

#[derive(Deserialize)]
struct TextRun {
    text: String,
}

/// Extract the caption tracks embedded in a watch page.
///
/// A page without a captions block yields an empty list; a bot check or an
/// unplayable video is an error.
pub fn parse_caption_tracks(html: &str) -> Result<Vec<CaptionTrack>> {
    let Some((_, after)) = html.split_once("\"captions\":") else {
        if html.contains("class=\"g-recaptcha\"") {
            return Err(TubesumError::TrackUnavailable(
                "Too many requests, the platform asked for a captcha".to_string(),
            ));
        }
        if !html.contains("\"playabilityStatus\":") {
            return Err(TubesumError::TrackUnavailable(
                "Video is unavailable".to_string(),
            ));
        }
        return Ok(Vec::new());
    };

    let json_str = after
        .split_once(",\"videoDetails")
        .map(|(captions, _)| captions)
        .unwrap_or(after);

    let captions: CaptionsJson = serde_json::from_str(json_str).map_err(|e| {
        TubesumError::TrackUnavailable(format!("Failed to parse caption list: {}", e))
    })?;

    let tracks = captions
        .player_captions_tracklist_renderer
        .map(|r| r.caption_tracks)
        .unwrap_or_default()
        .into_iter()
        .map(|t| {
            let language = t
                .name
                .and_then(|n| n.simple_text.or_else(|| n.runs.into_iter().next().map(|r| r.text)))
                .unwrap_or_else(|| t.language_code.clone());

            CaptionTrack {
                language,
                is_generated: t.kind.as_deref() == Some("asr"),
                is_translatable: t.is_translatable,
                base_url: t.base_url.replace("\\u0026", "&"),
                language_code: t.language_code,
                translation_language: None,
            }
        })
        .collect();

    Ok(tracks)
}

/// Build the json3 fetch URL for a track, with translation if requested.
fn caption_url(track: &CaptionTrack) -> Result<url::Url> {
    let mut url = url::Url::parse(&track.base_url).map_err(|e| {
        TubesumError::TrackUnavailable(format!("Invalid caption URL '{}': {}", track.base_url, e))
    })?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "fmt" && k != "tlang")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut query = url.query_pairs_mut();
        query.clear();
        query.extend_pairs(kept);
        query.append_pair("fmt", "json3");
        if let Some(lang) = &track.translation_language {
            query.append_pair("tlang", lang);
        }
    }

    Ok(url)
}

#[derive(Deserialize)]
struct Json3Response {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    segs: Option<Vec<Json3Seg>>,
}

#[derive(Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Parse a json3 caption document into ordered segments.
pub fn parse_json3_captions(body: &str) -> Result<Vec<CaptionSegment>> {
    if body.trim().is_empty() {
        return Err(TubesumError::TrackUnavailable(
            "Caption response was empty".to_string(),
        ));
    }

    let response: Json3Response = serde_json::from_str(body).map_err(|e| {
        TubesumError::TrackUnavailable(format!("Failed to parse captions: {}", e))
    })?;

    let segments = response
        .events
        .into_iter()
        .filter_map(|event| {
            let raw: String = event.segs?.into_iter().map(|s| s.utf8).collect();
            let text = html_escape::decode_html_entities(&raw)
                .replace('\n', " ")
                .trim()
                .to_string();

            (!text.is_empty()).then(|| CaptionSegment {
                text,
                start: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms as f64 / 1000.0,
            })
        })
        .collect();

    Ok(segments)
}
