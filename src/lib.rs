//! YouTube Caption Client - a Rust CLI client for a caption-extraction service
//!
//! This library drives the extraction workflow: validate a YouTube URL, submit it
//! to the backend extraction endpoint while fetching display metadata from the
//! oEmbed API, and present the result with copy/download actions.

pub mod api;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod output;
pub mod ui;
pub mod utils;
pub mod workflow;
pub mod youtube;

pub use api::{BackendClient, CaptionBackend, CaptionPayload};
pub use cli::{Cli, Commands};
pub use config::Config;
pub use workflow::{Action, Outcome, WorkflowController};
pub use youtube::oembed::{MetadataFetcher, OembedClient, VideoMetadata};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Closed set of failures the extraction workflow can surface to the user.
///
/// Every variant is terminal for the attempt; nothing is retried. `Display`
/// strings are the exact messages shown in the error section.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Please enter a valid YouTube URL")]
    InvalidUrl,

    #[error("Could not extract video ID from URL")]
    NoVideoId,

    #[error("Cannot connect to the API server. Please make sure the backend is running")]
    Connectivity,

    /// Server-reported failure; the backend's `detail` message passes through verbatim.
    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Unexpected(String),
}

impl ExtractionError {
    /// Generic failure with the fallback message when nothing better is known.
    pub fn unexpected(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            Self::Unexpected("An unexpected error occurred".to_string())
        } else {
            Self::Unexpected(message)
        }
    }
}
