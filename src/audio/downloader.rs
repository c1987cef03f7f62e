//! Audio download utilities.
//!
//! Downloads the best available audio with yt-dlp and has it transcoded to MP3
//! through yt-dlp's ffmpeg post-processor.

use crate::error::{Result, TubesumError};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, instrument};

const YT_DLP: &str = "yt-dlp";

/// Downloads audio from a URL and saves it as `<output_dir>/<file_prefix>.mp3`.
///
/// `extra_args` are appended to the yt-dlp invocation (cookie options).
pub async fn download_audio(
    url: &str,
    output_dir: &Path,
    file_prefix: &str,
    bitrate: &str,
    extra_args: &[String],
) -> Result<PathBuf> {
    download_audio_with(YT_DLP, url, output_dir, file_prefix, bitrate, extra_args).await
}

/// Same as [`download_audio`] with an explicit downloader executable.
///
/// The child is killed if the returned future is dropped, so a cancelled
/// request cannot leave a file behind after its temp guard has run.
#[instrument(skip(output_dir, extra_args), fields(prefix = %file_prefix))]
pub async fn download_audio_with(
    program: &str,
    url: &str,
    output_dir: &Path,
    file_prefix: &str,
    bitrate: &str,
    extra_args: &[String],
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    info!("Downloading audio from {}", url);

    let template = output_dir.join(format!("{}.%(ext)s", file_prefix));

    let result = Command::new(program)
        .arg("--format").arg("bestaudio/best")
        .arg("--extract-audio")
        .arg("--audio-format").arg("mp3")
        .arg("--audio-quality").arg(bitrate)
        .arg("--output").arg(&template)
        .arg("--no-playlist")
        .arg("--quiet")
        .arg("--no-warnings")
        .args(extra_args)
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(TubesumError::ToolNotFound(program.to_string()));
        }
        Err(e) => {
            return Err(TubesumError::DownloadFailed(format!("{program} execution failed: {e}")));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TubesumError::DownloadFailed(format!("{} failed: {}", program, stderr.trim())));
    }

    let downloaded = find_audio_file(output_dir, file_prefix)?;
    info!("Audio downloaded to {}", downloaded.display());
    Ok(downloaded)
}

/// Locates a downloaded audio file by its name prefix.
pub fn find_audio_file(dir: &Path, file_prefix: &str) -> Result<PathBuf> {
    let preferred = dir.join(format!("{}.mp3", file_prefix));
    if preferred.exists() {
        return Ok(preferred);
    }

    // Fallback: scan directory for matching prefix
    let entries = std::fs::read_dir(dir)
        .map_err(|e| TubesumError::DownloadFailed(format!("Cannot read directory: {e}")))?;

    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(file_prefix) && !name.ends_with(".part") {
            return Ok(entry.path());
        }
    }

    Err(TubesumError::DownloadFailed("Output file not found".into()))
}
