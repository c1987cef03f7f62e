//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::{CookieSource, Settings};
use crate::summary::truncate_chars;
use console::style;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    /// Downgrade an error to a warning (for optional components).
    fn optional(mut self) -> Self {
        if self.status == CheckStatus::Error {
            self.status = CheckStatus::Warning;
        }
        self
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

fn print_section(title: &str, checks: &[CheckResult]) {
    println!("{}", style(title).bold());
    for check in checks {
        check.print();
    }
    println!();
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Tubesum Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    let tools = vec![
        check_tool("yt-dlp", "yt-dlp --version", install_hint_ytdlp()),
        check_tool("ffmpeg", "ffmpeg -version", install_hint_ffmpeg()),
        check_tool(
            &settings.transcription.local_binary,
            &format!("{} --help", settings.transcription.local_binary),
            "Install with: pip install openai-whisper torch",
        )
        .optional(),
    ];
    print_section("External Tools", &tools);
    checks.extend(tools);

    let api = vec![
        check_api_key(
            "DEEPSEEK_API_KEY",
            settings.llm.api_key.as_deref(),
            "Set with: export DEEPSEEK_API_KEY='sk-...'",
        ),
        check_api_key(
            "OPENAI_API_KEY",
            settings.transcription.openai_api_key.as_deref(),
            "Optional: enables remote audio transcription when captions are missing",
        )
        .optional(),
        CheckResult::ok("LLM endpoint", &settings.llm.api_base),
    ];
    print_section("API Configuration", &api);
    checks.extend(api);

    let platform = vec![check_cookies(&CookieSource::resolve(&settings.youtube))];
    print_section("YouTube Access", &platform);
    checks.extend(platform);

    let config = vec![check_temp_dir(settings), check_config_file()];
    print_section("Configuration", &config);
    checks.extend(config);

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Tubesum.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Tubesum is ready to use.");
    }

    Ok(())
}

/// Check if an external tool is available.
fn check_tool(name: &str, version_cmd: &str, hint: &str) -> CheckResult {
    let parts: Vec<&str> = version_cmd.split_whitespace().collect();
    let Some((cmd, args)) = parts.split_first() else {
        return CheckResult::error(name, "no command given", hint);
    };

    match Command::new(cmd).args(args).output() {
        Ok(output) if output.status.success() => {
            CheckResult::ok(name, &version_line(&String::from_utf8_lossy(&output.stdout)))
        }
        Ok(_) => CheckResult::error(name, "installed but not working", hint),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::error(name, "not found", hint)
        }
        Err(e) => CheckResult::error(name, &format!("error: {}", e), hint),
    }
}

/// Check an API key, showing only a masked form.
fn check_api_key(name: &str, key: Option<&str>, hint: &str) -> CheckResult {
    match key.map(str::trim) {
        Some(key) if key.is_empty() => CheckResult::error(name, "empty", hint),
        Some(key) => CheckResult::ok(name, &format!("configured ({})", mask_key(key))),
        None => CheckResult::error(name, "not set", hint),
    }
}

fn check_cookies(source: &CookieSource) -> CheckResult {
    let hint = "Place cookies.txt next to the binary or set YOUTUBE_COOKIES_CONTENT / YOUTUBE_COOKIES_BROWSER";
    match source {
        CookieSource::File(path) => CheckResult::ok("Cookies", &format!("file {}", path.display())),
        CookieSource::Content(_) => CheckResult::ok("Cookies", "from YOUTUBE_COOKIES_CONTENT"),
        CookieSource::Browser(browser) => CheckResult::ok("Cookies", &format!("from browser {}", browser)),
        CookieSource::None => CheckResult::warning("Cookies", "none (some videos may require sign-in)", hint),
    }
}

fn check_temp_dir(settings: &Settings) -> CheckResult {
    let temp_dir = settings.temp_dir();
    if temp_dir.is_dir() {
        CheckResult::ok("Temp directory", &temp_dir.display().to_string())
    } else {
        CheckResult::warning(
            "Temp directory",
            &format!("{} (will be created)", temp_dir.display()),
            "Directory will be created on first use",
        )
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &config_path.display().to_string())
    } else {
        CheckResult::warning("Config file", "using defaults", "Create with: tubesum config edit")
    }
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// First line of a tool's version output, shortened for display.
fn version_line(stdout: &str) -> String {
    let first = stdout.lines().next().map(str::trim).unwrap_or_default();
    if first.is_empty() {
        return "installed".to_string();
    }
    truncate_chars(first, 50)
}

/// Platform-specific install hint for yt-dlp.
fn install_hint_ytdlp() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp (or your package manager)"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}

/// Platform-specific install hint for ffmpeg.
fn install_hint_ffmpeg() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install ffmpeg"
    } else if cfg!(target_os = "linux") {
        "Install with: sudo apt install ffmpeg (or your package manager)"
    } else {
        "Install from: https://ffmpeg.org/download.html"
    }
}
