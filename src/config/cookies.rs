//! Cookie-based authentication for the video platform.
//!
//! Sources are tried in a fixed order: a cookie file on disk, raw cookie
//! content (written to a temp file), then cookies pulled from a browser.

use super::settings::{Settings, YoutubeSettings};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Where yt-dlp gets its cookies from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieSource {
    /// Existing Netscape cookie file.
    File(PathBuf),
    /// Cookie file content that must be written to disk before use.
    Content(String),
    /// Browser name for `--cookies-from-browser`.
    Browser(String),
    None,
}

impl CookieSource {
    /// Resolve the cookie source from settings and the filesystem.
    pub fn resolve(settings: &YoutubeSettings) -> Self {
        Self::resolve_from(
            &Self::candidate_files(settings),
            settings.cookies_content.as_deref(),
            settings.cookies_browser.as_deref(),
        )
    }

    /// Pick the first available source.
    pub fn resolve_from(
        candidates: &[PathBuf],
        content: Option<&str>,
        browser: Option<&str>,
    ) -> Self {
        if let Some(path) = candidates.iter().find(|p| p.is_file()) {
            return CookieSource::File(path.clone());
        }

        if let Some(content) = content.filter(|c| !c.trim().is_empty()) {
            return CookieSource::Content(content.to_string());
        }

        if let Some(browser) = browser.filter(|b| !b.trim().is_empty()) {
            return CookieSource::Browser(browser.trim().to_string());
        }

        CookieSource::None
    }

    /// Cookie file locations, in lookup order.
    pub fn candidate_files(settings: &YoutubeSettings) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(path) = &settings.cookie_file {
            candidates.push(Settings::expand_path(path));
        }
        candidates.push(PathBuf::from("cookies.txt"));
        candidates.push(Settings::config_dir().join("cookies.txt"));
        candidates
    }

    /// Turn the source into yt-dlp arguments.
    ///
    /// A failure to materialize cookie content is logged and the platform is
    /// used without authentication.
    pub fn into_auth(self) -> PlatformAuth {
        match self {
            CookieSource::File(path) => {
                info!("Using cookie file at {}", path.display());
                PlatformAuth {
                    args: vec!["--cookies".to_string(), path.display().to_string()],
                    _cookie_file: None,
                }
            }
            CookieSource::Content(content) => match write_cookie_file(&content) {
                Ok(file) => {
                    info!("Wrote cookie content to {}", file.path().display());
                    PlatformAuth {
                        args: vec!["--cookies".to_string(), file.path().display().to_string()],
                        _cookie_file: Some(file),
                    }
                }
                Err(e) => {
                    warn!("Failed to create temp cookie file: {}", e);
                    PlatformAuth::none()
                }
            },
            CookieSource::Browser(browser) => {
                info!("Loading cookies from browser '{}'", browser);
                PlatformAuth {
                    args: vec!["--cookies-from-browser".to_string(), browser],
                    _cookie_file: None,
                }
            }
            CookieSource::None => {
                info!(
                    "No cookie file, YOUTUBE_COOKIES_CONTENT or YOUTUBE_COOKIES_BROWSER configured; \
                     'Sign in' errors may need one of them"
                );
                PlatformAuth::none()
            }
        }
    }
}

fn write_cookie_file(content: &str) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("tubesum_cookies_")
        .suffix(".txt")
        .tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Resolved authentication for yt-dlp calls.
///
/// Holds the materialized cookie file, if any, so it lives as long as the extractor.
#[derive(Debug)]
pub struct PlatformAuth {
    args: Vec<String>,
    _cookie_file: Option<NamedTempFile>,
}

impl PlatformAuth {
    pub fn none() -> Self {
        Self {
            args: Vec::new(),
            _cookie_file: None,
        }
    }

    /// Arguments to append to every yt-dlp invocation.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_wins_over_env() {
        let dir = tempfile::tempdir().unwrap();
        let cookie_path = dir.path().join("cookies.txt");
        std::fs::write(&cookie_path, "# Netscape HTTP Cookie File\n").unwrap();

        let missing = dir.path().join("missing.txt");
        let source = CookieSource::resolve_from(
            &[missing, cookie_path.clone()],
            Some("cookie content"),
            Some("firefox"),
        );

        assert_eq!(source, CookieSource::File(cookie_path));
    }

    #[test]
    fn test_content_then_browser() {
        let source = CookieSource::resolve_from(&[], Some("cookie content"), Some("chrome"));
        assert_eq!(source, CookieSource::Content("cookie content".to_string()));

        let source = CookieSource::resolve_from(&[], Some("  "), Some("chrome"));
        assert_eq!(source, CookieSource::Browser("chrome".to_string()));

        let source = CookieSource::resolve_from(&[], None, None);
        assert_eq!(source, CookieSource::None);
    }

    #[test]
    fn test_content_is_materialized() {
        let auth = CookieSource::Content("# Netscape HTTP Cookie File\n".to_string()).into_auth();

        assert_eq!(auth.args()[0], "--cookies");
        let path = PathBuf::from(&auth.args()[1]);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "# Netscape HTTP Cookie File\n"
        );

        drop(auth);
        assert!(!path.exists());
    }

    #[test]
    fn test_browser_args() {
        let auth = CookieSource::Browser("firefox".to_string()).into_auth();
        assert_eq!(
            auth.args().to_vec(),
            vec!["--cookies-from-browser".to_string(), "firefox".to_string()]
        );
        assert!(CookieSource::None.into_auth().args().is_empty());
    }
}
