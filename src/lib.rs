//! Tubesum - YouTube video summaries
//!
//! Turns a YouTube URL into a structured summary: full text, key points,
//! chapters and terminology.
//!
//! # Overview
//!
//! For each video Tubesum:
//! - Fetches metadata with yt-dlp
//! - Resolves a transcript from caption tracks (manual, generated, then
//!   machine translated)
//! - Falls back to downloading the audio and transcribing it (OpenAI Whisper
//!   API or a local `whisper` install)
//! - Asks an OpenAI-compatible LLM (DeepSeek by default) for a JSON summary
//!
//! # Architecture
//!
//! - `config` - Settings, prompts and cookie resolution
//! - `video_source` - Video references and the platform abstraction (YouTube)
//! - `audio` - Audio download and temp file handling
//! - `transcription` - Speech-to-text backends and the audio fallback
//! - `transcript` - Caption track selection and the fallback chain
//! - `summary` - LLM summary requests and reply parsing
//! - `orchestrator` - Pipeline coordination
//! - `cli` - Command line and HTTP surface
//!
//! # Example
//!
//! ```rust,no_run
//! use tubesum::config::Settings;
//! use tubesum::orchestrator::VideoProcessor;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let processor = VideoProcessor::new(&settings)?;
//!
//!     let processed = processor.process_video("https://youtu.be/dQw4w9WgXcQ", "en").await?;
//!     println!("{}", processed.summary.full_summary);
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod summary;
pub mod transcript;
pub mod transcription;
pub mod video_source;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Result, TubesumError};
