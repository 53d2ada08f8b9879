use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ytcap",
    about = "Extract YouTube captions through a caption-extraction backend",
    version,
    long_about = "A CLI client for a YouTube caption-extraction service. Validates the URL locally, \
fetches display metadata from the public oEmbed API, submits the URL to the backend, and offers \
copy-to-clipboard and file download for the extracted captions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress panels and progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Target the local development backend instead of the production endpoint
    #[arg(long, global = true)]
    pub local: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract captions from a YouTube video URL
    Extract {
        /// YouTube video URL (youtube.com/watch or youtu.be forms)
        #[arg(value_name = "URL")]
        url: String,

        /// Write captions to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Copy the extracted captions to the clipboard
        #[arg(short, long)]
        copy: bool,

        /// Save captions as youtube-captions-<video-id>.txt
        #[arg(short, long)]
        download: bool,
    },

    /// Start an interactive extraction session
    Session,

    /// Show or edit client configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}
