//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::PathBuf;

/// Run the config command.
///
/// `config_path` is the `--config` override, if one was given.
pub fn run_config(action: &ConfigAction, config_path: Option<PathBuf>, settings: Settings) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            println!("{}", render_settings(&settings)?);
        }

        ConfigAction::Edit => {
            // Create default config if it doesn't exist
            if !config_path.exists() {
                Settings::default().save_to(&config_path)?;
                Output::info(&format!("Created default config at {}", config_path.display()));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());
            Output::info(&format!("Opening config in {}...", editor));

            match std::process::Command::new(&editor).arg(&config_path).status() {
                Ok(s) if s.success() => Output::success("Config saved."),
                Ok(_) => Output::warning("Editor exited with non-zero status."),
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {}", config_path.display()));
                }
            }
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Serialize settings as TOML with secrets masked.
fn render_settings(settings: &Settings) -> Result<String> {
    let mut shown = settings.clone();
    for secret in [
        &mut shown.llm.api_key,
        &mut shown.transcription.openai_api_key,
        &mut shown.youtube.cookies_content,
    ] {
        if secret.is_some() {
            *secret = Some("********".to_string());
        }
    }

    toml::to_string_pretty(&shown).map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_masks_secrets() {
        let mut settings = Settings::default();
        settings.llm.api_key = Some("sk-secret-deepseek".to_string());
        settings.youtube.cookies_content = Some("# Netscape HTTP Cookie File".to_string());

        let rendered = render_settings(&settings).unwrap();
        assert!(!rendered.contains("sk-secret-deepseek"));
        assert!(!rendered.contains("Netscape"));
        assert!(rendered.contains("deepseek-chat"));
    }
}
