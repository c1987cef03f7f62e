//! Audio download and temporary file handling.

mod downloader;
mod temp;

pub use downloader::{download_audio, download_audio_with, find_audio_file};
pub use temp::TempAudioFile;
