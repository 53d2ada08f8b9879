use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

const OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";

/// Best-effort display metadata for a video.
///
/// Independent of caption extraction: it may be absent when captions succeed
/// and present when they fail. oEmbed does not report duration, so it is only
/// filled in when some other source provides it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub author: String,
    pub thumbnail: Option<String>,
    pub duration: Option<u64>,
}

/// Fallback record used when the metadata lookup fails.
pub fn fallback_metadata(video_id: &str) -> VideoMetadata {
    VideoMetadata {
        title: format!("YouTube Video {}", video_id),
        author: "Unknown Channel".to_string(),
        thumbnail: None,
        duration: None,
    }
}

#[derive(Debug, Deserialize)]
struct OembedResponse {
    title: String,
    author_name: String,
    thumbnail_url: Option<String>,
}

/// Fetches display metadata for a video identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Result<VideoMetadata>;
}

/// Metadata client backed by the public YouTube oEmbed API (no API key needed).
pub struct OembedClient {
    http: reqwest::Client,
    endpoint: String,
}

impl OembedClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: OEMBED_ENDPOINT.to_string(),
        }
    }

    fn request_url(&self, video_id: &str) -> String {
        format!(
            "{}?url={}&format=json",
            self.endpoint,
            urlencoding::encode(&crate::youtube::watch_url(video_id))
        )
    }

    async fn fetch_inner(&self, video_id: &str) -> Result<VideoMetadata> {
        let response = self.http.get(self.request_url(video_id)).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("oEmbed request failed: HTTP {}", response.status());
        }

        let body: OembedResponse = response.json().await?;

        Ok(VideoMetadata {
            title: body.title,
            author: body.author_name,
            thumbnail: body.thumbnail_url,
            duration: None,
        })
    }
}

impl Default for OembedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataFetcher for OembedClient {
    /// Fetch metadata, degrading to the local fallback record on any transport
    /// or parse failure. Failures are logged and never surfaced to the user.
    async fn fetch(&self, video_id: &str) -> Result<VideoMetadata> {
        match self.fetch_inner(video_id).await {
            Ok(metadata) => Ok(metadata),
            Err(err) => {
                tracing::warn!("Could not fetch video info for {}: {:#}", video_id, err);
                Ok(fallback_metadata(video_id))
            }
        }
    }
}
