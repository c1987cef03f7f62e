//! Process command - summarize a single video from the command line.

use crate::cli::output::format_duration;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{ProcessOutcome, VideoProcessor};
use anyhow::Result;

/// Run the pipeline for `url` and print the JSON payload to stdout.
pub async fn run_process(url: &str, language: &str, settings: Settings) -> Result<()> {
    preflight::check(Operation::Process, &settings)?;

    let processor = VideoProcessor::new(&settings)?;

    let spinner = Output::spinner(&format!("Summarizing {}...", url));
    let result = processor.process_video(url, language).await;
    spinner.finish_and_clear();

    if let Ok(processed) = &result {
        let info = &processed.info;
        Output::success(info.title.as_deref().unwrap_or("Summary ready"));
        if let Some(channel) = &info.channel {
            Output::kv("Channel", channel);
        }
        if let Some(duration) = info.duration {
            Output::kv("Duration", &format_duration(duration));
        }
    }

    let outcome = ProcessOutcome::from_result(result);
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if let ProcessOutcome::Error { message } = &outcome {
        anyhow::bail!("{}", message);
    }

    Ok(())
}
