//! Configuration settings for Tubesum.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub transcript: TranscriptSettings,
    pub transcription: TranscriptionSettings,
    pub youtube: YoutubeSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for temporary audio files.
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            temp_dir: "/tmp/tubesum".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Summary LLM settings (any OpenAI-compatible chat completions API).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// API key. Overridden by `DEEPSEEK_API_KEY`.
    pub api_key: Option<String>,
    /// Base URL of the API. Overridden by `DEEPSEEK_API_URL`.
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Transcript characters sent to the model; the rest is dropped.
    pub max_transcript_chars: usize,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://api.deepseek.com/v1".to_string(),
            model: "deepseek-chat".to_string(),
            temperature: 0.7,
            max_tokens: 4000,
            max_transcript_chars: 20_000,
        }
    }
}

/// Caption selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Caption languages to look for, most preferred first.
    pub preferred_languages: Vec<String>,
    /// Language the first available track is translated to when none match.
    pub translation_language: String,
    /// Transcripts shorter than this (in characters) are rejected.
    pub min_chars: usize,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            preferred_languages: ["zh-Hans", "zh-CN", "zh-TW", "zh-HK", "en"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            translation_language: "zh-Hans".to_string(),
            min_chars: 50,
        }
    }
}

/// Audio transcription fallback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// OpenAI API key for remote Whisper. Overridden by `OPENAI_API_KEY`.
    pub openai_api_key: Option<String>,
    /// Remote transcription model.
    pub remote_model: String,
    /// Local whisper executable.
    pub local_binary: String,
    /// Local whisper model size.
    pub local_model: String,
    /// MP3 bitrate for downloaded audio.
    pub audio_bitrate: String,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            remote_model: "whisper-1".to_string(),
            local_binary: "whisper".to_string(),
            local_model: "base".to_string(),
            audio_bitrate: "128K".to_string(),
        }
    }
}

/// YouTube-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// Netscape cookie file passed to yt-dlp.
    pub cookie_file: Option<String>,
    /// Raw cookie file content. Overridden by `YOUTUBE_COOKIES_CONTENT`.
    pub cookies_content: Option<String>,
    /// Browser to pull cookies from. Overridden by `YOUTUBE_COOKIES_BROWSER`.
    pub cookies_browser: Option<String>,
    /// User agent for watch page and caption requests.
    pub user_agent: String,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            cookie_file: None,
            cookies_content: None,
            cookies_browser: None,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
}

impl Settings {
    /// Load settings from the default configuration file, then apply the environment.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Settings>(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Overlay values from environment variables.
    ///
    /// Empty values are ignored so an unset-but-exported variable does not
    /// clear a key from the config file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("DEEPSEEK_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = get("DEEPSEEK_API_URL") {
            self.llm.api_base = url;
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.transcription.openai_api_key = Some(key);
        }
        if let Some(content) = get("YOUTUBE_COOKIES_CONTENT") {
            self.youtube.cookies_content = Some(content);
        }
        if let Some(browser) = get("YOUTUBE_COOKIES_BROWSER") {
            self.youtube.cookies_browser = Some(browser);
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::TubesumError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Directory holding the configuration file.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tubesum")
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }
}
