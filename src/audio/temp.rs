//! Scoped ownership of temporary audio files.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Owns every file named `<prefix>*` in a directory for one transcription attempt.
///
/// The prefix carries a random UUID, so concurrent attempts never share files.
/// Dropping the guard removes the owned files; removal errors are logged.
#[derive(Debug)]
pub struct TempAudioFile {
    dir: PathBuf,
    prefix: String,
}

impl TempAudioFile {
    /// Reserve a fresh, collision-free prefix inside `dir`.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            prefix: format!("temp_audio_{}", Uuid::new_v4()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn owned_files(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        entries
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().starts_with(&self.prefix))
            .map(|e| e.path())
            .collect()
    }
}

impl Drop for TempAudioFile {
    fn drop(&mut self) {
        for path in self.owned_files() {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Cleaned up temp file: {}", path.display()),
                Err(e) => warn!("Failed to remove temp file {}: {}", path.display(), e),
            }
        }
    }
}
