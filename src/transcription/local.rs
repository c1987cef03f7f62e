//! Local transcription with the `whisper` command-line tool.

use super::Transcriber;
use crate::error::{Result, TubesumError};
use async_trait::async_trait;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use tokio::process::Command;
use tracing::{info, instrument};

/// Transcriber that runs a local Whisper model through its CLI.
pub struct LocalWhisperTranscriber {
    binary: String,
    model: String,
}

impl LocalWhisperTranscriber {
    pub fn new(binary: &str, model: &str) -> Self {
        Self {
            binary: binary.to_string(),
            model: model.to_string(),
        }
    }

    /// Check whether the whisper runtime can be launched.
    pub fn is_available(binary: &str) -> bool {
        StdCommand::new(binary)
            .arg("--help")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl Transcriber for LocalWhisperTranscriber {
    fn name(&self) -> &str {
        "local-whisper"
    }

    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        info!("Running local Whisper model ({})... this may take a moment", self.model);

        let output_dir = tempfile::tempdir()?;

        let result = Command::new(&self.binary)
            .arg(audio_path)
            .arg("--model").arg(&self.model)
            .arg("--output_format").arg("txt")
            .arg("--output_dir").arg(output_dir.path())
            .arg("--verbose").arg("False")
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TubesumError::ToolNotFound(self.binary.clone()));
            }
            Err(e) => {
                return Err(TubesumError::TranscriptionFailed(format!(
                    "Local Whisper transcription failed: {e}"
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TubesumError::TranscriptionFailed(format!(
                "Local Whisper transcription failed: {}",
                stderr.trim()
            )));
        }

        // Whisper names its output after the input file
        let stem = audio_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audio");
        let text_path = output_dir.path().join(format!("{}.txt", stem));

        let text = tokio::fs::read_to_string(&text_path).await.map_err(|e| {
            TubesumError::TranscriptionFailed(format!(
                "Whisper output {} not readable: {}",
                text_path.display(),
                e
            ))
        })?;

        info!("Local transcription complete");
        Ok(text.lines().map(str::trim).filter(|l| !l.is_empty()).collect::<Vec<_>>().join(" "))
    }
}
