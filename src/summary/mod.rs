//! Structured summaries from an LLM.
//!
//! The model is asked for a JSON object matching [`SummaryResult`]. Replies
//! that fail to parse are not errors; they come back as a degraded summary
//! holding the raw reply text.

mod llm;

pub use llm::{ChatBackend, ChatMessage, ChatRequest, ChatRole, OpenAiChat};

use crate::config::{Prompts, Settings};
use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyPoint {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryChapter {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    pub timestamp: Option<String>,
}

/// Structured summary of a video transcript.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryResult {
    #[serde(deserialize_with = "null_as_default")]
    pub full_summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub key_points: Vec<KeyPoint>,
    #[serde(deserialize_with = "null_as_default")]
    pub chapters: Vec<SummaryChapter>,
    #[serde(deserialize_with = "null_as_default")]
    pub terminology: HashMap<String, String>,
}

/// Models sometimes emit `null` for empty fields; read it as the default.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl SummaryResult {
    /// Summary carrying only the raw reply text.
    pub fn degraded(raw: impl Into<String>) -> Self {
        Self {
            full_summary: raw.into(),
            ..Default::default()
        }
    }
}

/// Requests summaries from a chat backend.
pub struct Summarizer {
    backend: Arc<dyn ChatBackend>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    max_chars: usize,
    prompts: Prompts,
}

impl Summarizer {
    /// Create a summarizer against the configured OpenAI-compatible API.
    pub fn new(settings: &Settings) -> Result<Self> {
        let api_key = match settings.llm.api_key.as_deref() {
            Some(key) => key,
            None => {
                warn!("DEEPSEEK_API_KEY is not set; summary requests will be rejected");
                ""
            }
        };
        let backend = Arc::new(OpenAiChat::new(api_key, &settings.llm.api_base)?);
        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;

        Ok(Self::with_backend(backend, settings).with_prompts(prompts))
    }

    /// Create a summarizer around an existing backend.
    pub fn with_backend(backend: Arc<dyn ChatBackend>, settings: &Settings) -> Self {
        Self {
            backend,
            model: settings.llm.model.clone(),
            temperature: settings.llm.temperature,
            max_tokens: settings.llm.max_tokens,
            max_chars: settings.llm.max_transcript_chars,
            prompts: Prompts::default(),
        }
    }

    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Summarize `transcript` in `language`.
    ///
    /// Fails only when the LLM call itself fails.
    #[instrument(skip(self, transcript), fields(chars = transcript.chars().count()))]
    pub async fn summarize(&self, transcript: &str, language: &str) -> Result<SummaryResult> {
        let request = self.build_request(transcript, language);

        info!("Requesting summary from {}", self.model);
        let reply = self.backend.complete(&request).await?;

        Ok(parse_summary(&reply))
    }

    fn build_request(&self, transcript: &str, language: &str) -> ChatRequest {
        let mut vars = HashMap::new();
        vars.insert("language".to_string(), language.to_string());
        vars.insert(
            "transcript".to_string(),
            truncate_chars(transcript, self.max_chars),
        );

        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(Prompts::render(&self.prompts.summary.system, &vars)),
                ChatMessage::user(Prompts::render(&self.prompts.summary.user, &vars)),
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Keep the first `max_chars` characters, marking the cut with "...".
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Remove a surrounding markdown code fence, if any.
///
/// Only the fence markers are removed; text without a fence is returned
/// untouched, whitespace included.
pub fn strip_code_fence(reply: &str) -> &str {
    let mut content = reply;

    let start = content.trim_start();
    if let Some(rest) = start.strip_prefix("```json") {
        content = rest;
    } else if let Some(rest) = start.strip_prefix("```") {
        content = rest;
    }

    let end = content.trim_end();
    if let Some(rest) = end.strip_suffix("```") {
        content = rest;
    }

    content
}

/// Parse a model reply, falling back to a degraded summary.
pub fn parse_summary(reply: &str) -> SummaryResult {
    let content = strip_code_fence(reply);

    match serde_json::from_str::<SummaryResult>(content) {
        Ok(summary) => summary,
        Err(e) => {
            warn!("Summary reply is not valid JSON ({}); returning raw text", e);
            SummaryResult::degraded(content)
        }
    }
}
