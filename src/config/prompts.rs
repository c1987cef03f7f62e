//! Prompt templates for Tubesum.
//!
//! Prompts can be customized by placing a `summary.toml` file in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub summary: SummaryPrompts,
}

/// Prompts for video summarization.
///
/// `{{language}}` and `{{transcript}}` are substituted at request time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    pub system: String,
    pub user: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an expert video content summarizer. Your task is to analyze the provided video transcript and generate a structured summary in {{language}}.

The output must be a valid JSON object with the following structure:
{
    "full_summary": "A comprehensive summary of the video content (approx. 20% of original length)",
    "key_points": [
        {
            "title": "Key Point Title",
            "content": "Detailed explanation of the key point"
        }
    ],
    "chapters": [
        {
            "title": "Chapter Title",
            "summary": "Summary of this specific section",
            "timestamp": "HH:MM:SS (if available in text, else null)"
        }
    ],
    "terminology": {
        "term1": "Definition/Explanation",
        "term2": "Definition/Explanation"
    }
}

Ensure the summary captures:
1. Core arguments and conclusions
2. Key data and statistics
3. Important examples

Do not include any markdown formatting (like ```json) in the response, just the raw JSON string."#
                .to_string(),

            user: "Here is the video transcript:\n\n{{transcript}}".to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, overriding defaults from an optional custom directory.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }
}
