use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ExtractionError;

/// Request body for the backend extraction endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractRequest {
    pub youtube_url: String,
}

/// Successful extraction response: captions and identifier always arrive
/// together in one body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaptionPayload {
    pub captions: String,
    pub video_id: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: Option<String>,
}

/// The backend's single operation: submit a URL, receive captions or a
/// server-reported failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionBackend: Send + Sync {
    async fn extract(&self, youtube_url: &str) -> Result<CaptionPayload, ExtractionError>;
}

/// HTTP client for the caption-extraction backend.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn extract_url(&self) -> String {
        format!("{}/extract", self.base_url)
    }
}

/// Classify a transport failure at the point it occurs, instead of matching
/// on message strings later.
fn classify_transport_error(err: reqwest::Error) -> ExtractionError {
    if err.is_connect() || err.is_timeout() {
        ExtractionError::Connectivity
    } else {
        ExtractionError::unexpected(err.to_string())
    }
}

#[async_trait]
impl CaptionBackend for BackendClient {
    async fn extract(&self, youtube_url: &str) -> Result<CaptionPayload, ExtractionError> {
        tracing::debug!("POST {} for {}", self.extract_url(), youtube_url);

        let response = self
            .http
            .post(self.extract_url())
            .json(&ExtractRequest {
                youtube_url: youtube_url.to_string(),
            })
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();

        if status.is_success() {
            response
                .json::<CaptionPayload>()
                .await
                .map_err(|err| ExtractionError::unexpected(err.to_string()))
        } else {
            let detail = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail)
                .unwrap_or_else(|| "Failed to extract captions".to_string());

            tracing::debug!("Backend returned HTTP {}: {}", status, detail);
            Err(ExtractionError::Server(detail))
        }
    }
}
