//! CLI module for Tubesum.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Tubesum - YouTube video summaries
///
/// Fetches a video's transcript (captions first, audio transcription as a
/// fallback) and asks an LLM for a structured summary.
#[derive(Parser, Debug)]
#[command(name = "tubesum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to the configured host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Summarize a single video and print the JSON result
    Process {
        /// YouTube URL or video ID
        url: String,

        /// Language the summary is written in
        #[arg(short, long, default_value = "zh-CN")]
        language: String,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_process_defaults() {
        let cli = Cli::parse_from(["tubesum", "process", "dQw4w9WgXcQ"]);
        match cli.command {
            Commands::Process { url, language } => {
                assert_eq!(url, "dQw4w9WgXcQ");
                assert_eq!(language, "zh-CN");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_serve_with_globals() {
        let cli = Cli::parse_from(["tubesum", "-vv", "serve", "--port", "9000"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Serve { host: None, port: Some(9000) }
        ));
    }
}
