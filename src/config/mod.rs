//! Configuration module for Tubesum.
//!
//! Handles loading application settings, prompt templates and platform cookies.

mod cookies;
mod prompts;
mod settings;

pub use cookies::{CookieSource, PlatformAuth};
pub use prompts::{Prompts, SummaryPrompts};
pub use settings::{
    GeneralSettings, LlmSettings, PromptSettings, ServerSettings, Settings, TranscriptSettings,
    TranscriptionSettings, YoutubeSettings,
};
