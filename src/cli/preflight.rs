//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{Result, TubesumError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Summarizing a video needs yt-dlp and an LLM key.
    Process,
    /// The server needs the same, but only warns at startup.
    Serve,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Process | Operation::Serve => {
            check_llm_key(settings)?;
            check_tool("yt-dlp")?;
        }
    }
    Ok(())
}

/// Check that an API key for the summary LLM is configured.
pub fn check_llm_key(settings: &Settings) -> Result<()> {
    match settings.llm.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => Ok(()),
        _ => Err(TubesumError::Config(
            "DEEPSEEK_API_KEY not set. Set it with: export DEEPSEEK_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check if an external tool is available.
pub fn check_tool(name: &str) -> Result<()> {
    // ffmpeg/ffprobe use -version (single dash), others use --version
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(TubesumError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(TubesumError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(TubesumError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
