//! The extraction workflow: gate the input, run the two network requests,
//! reconcile their outcomes, and drive the presentation seams.

use std::path::PathBuf;

use crate::api::CaptionBackend;
use crate::youtube::oembed::{MetadataFetcher, VideoMetadata};
use crate::{clipboard, output, youtube, ExtractionError};

/// User actions the controller understands. Every UI gesture maps to exactly
/// one of these, keeping the transitions testable without a terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Submit a URL for extraction
    Extract { url: String },
    /// Copy the held captions to the clipboard
    Copy,
    /// Save the held captions to a file
    Download,
    /// Hide all sections and refocus the input; held state survives
    Reset,
}

/// How an action concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed,
    /// The action was a no-op (e.g. copy with nothing held)
    Ignored,
}

/// Session-lifetime state. Captions and video identifier are always written
/// together from one response body; metadata is independent and may be stale
/// or absent regardless of caption success.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub captions: String,
    pub video_id: String,
    pub metadata: Option<VideoMetadata>,
}

/// Presentation seam driven by the controller.
#[cfg_attr(test, mockall::automock)]
pub trait View: Send {
    /// Hide every section so state is visually reset before new data arrives
    fn hide_all(&mut self);
    /// Toggle the busy affordance on the trigger control
    fn set_busy(&mut self, busy: bool);
    fn show_video(&mut self, video_id: &str, metadata: &VideoMetadata);
    fn show_result(&mut self, captions: &str, video_id: &str);
    fn show_error(&mut self, message: &str);
    fn confirm_copied(&mut self);
    fn confirm_downloaded(&mut self);
    fn focus_input(&mut self);
}

/// Drives the extraction workflow against a caption backend, a metadata
/// fetcher, and a view. Owns the session state.
pub struct WorkflowController<B, M, V> {
    backend: B,
    metadata: M,
    view: V,
    state: SessionState,
    download_dir: Option<PathBuf>,
}

impl<B, M, V> WorkflowController<B, M, V>
where
    B: CaptionBackend,
    M: MetadataFetcher,
    V: View,
{
    pub fn new(backend: B, metadata: M, view: V) -> Self {
        Self {
            backend,
            metadata,
            view,
            state: SessionState::default(),
            download_dir: None,
        }
    }

    pub fn with_download_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.download_dir = dir;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Single dispatch entry point mapping user actions to state transitions.
    pub async fn handle(&mut self, action: Action) -> Outcome {
        match action {
            Action::Extract { url } => self.extract(url.trim()).await,
            Action::Copy => self.copy().await,
            Action::Download => self.download(),
            Action::Reset => {
                self.view.hide_all();
                self.view.focus_input();
                Outcome::Completed
            }
        }
    }

    async fn extract(&mut self, url: &str) -> Outcome {
        // Gates fail before the busy state is ever entered
        if url.is_empty() || !youtube::is_valid_youtube_url(url) {
            self.view
                .show_error(&ExtractionError::InvalidUrl.to_string());
            return Outcome::Failed;
        }

        let Some(video_id) = youtube::extract_video_id(url) else {
            self.view
                .show_error(&ExtractionError::NoVideoId.to_string());
            return Outcome::Failed;
        };

        self.view.hide_all();
        self.view.set_busy(true);

        tracing::info!("Extracting captions for video {}", video_id);

        // Both requests are awaited to completion; neither failure cancels the
        // other. No early return below until the busy affordance is cleared.
        let (metadata, captions) = tokio::join!(
            self.metadata.fetch(&video_id),
            self.backend.extract(url)
        );

        match metadata {
            Ok(info) => {
                self.view.show_video(&video_id, &info);
                self.state.metadata = Some(info);
            }
            // Non-fatal: the video panel simply does not appear
            Err(err) => tracing::warn!("Could not fetch video info: {:#}", err),
        }

        let outcome = match captions {
            Ok(payload) => {
                // Captions and identifier always update together
                self.state.captions = payload.captions;
                self.state.video_id = payload.video_id;
                self.view
                    .show_result(&self.state.captions, &self.state.video_id);
                Outcome::Completed
            }
            Err(err) => {
                tracing::debug!("Extraction failed: {}", err);
                self.view.show_error(&err.to_string());
                Outcome::Failed
            }
        };

        self.view.set_busy(false);
        outcome
    }

    async fn copy(&mut self) -> Outcome {
        if self.state.captions.is_empty() {
            return Outcome::Ignored;
        }

        match clipboard::copy(&self.state.captions).await {
            Ok(()) => {
                self.view.confirm_copied();
                Outcome::Completed
            }
            Err(err) => {
                tracing::warn!("Failed to copy captions: {:#}", err);
                self.view.show_error("Failed to copy captions to clipboard");
                Outcome::Failed
            }
        }
    }

    fn download(&mut self) -> Outcome {
        if self.state.captions.is_empty() {
            return Outcome::Ignored;
        }

        match output::save_captions(
            &self.state.captions,
            &self.state.video_id,
            self.download_dir.as_deref(),
        ) {
            Ok(path) => {
                tracing::info!("Captions saved to {}", path.display());
                self.view.confirm_downloaded();
                Outcome::Completed
            }
            Err(err) => {
                tracing::warn!("Failed to save captions: {:#}", err);
                self.view.show_error("Failed to save captions file");
                Outcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CaptionPayload, MockCaptionBackend};
    use crate::youtube::oembed::{fallback_metadata, MockMetadataFetcher};
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn payload(captions: &str, video_id: &str) -> CaptionPayload {
        CaptionPayload {
            captions: captions.to_string(),
            video_id: video_id.to_string(),
        }
    }

    fn metadata_ok(video_id: &str) -> MockMetadataFetcher {
        let meta = fallback_metadata(video_id);
        let mut fetcher = MockMetadataFetcher::new();
        let expected = video_id.to_string();
        fetcher
            .expect_fetch()
            .withf(move |id| id == expected)
            .returning(move |_| Ok(meta.clone()));
        fetcher
    }

    #[tokio::test]
    async fn test_successful_extraction_round_trips_payload() {
        let mut backend = MockCaptionBackend::new();
        backend
            .expect_extract()
            .withf(|url| url == "https://youtu.be/ABC123xyz")
            .returning(|_| Ok(payload("hello", "XYZ")));

        let mut view = MockView::new();
        let mut seq = Sequence::new();
        view.expect_hide_all().times(1).in_sequence(&mut seq).return_const(());
        view.expect_set_busy()
            .with(eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        view.expect_show_video().times(1).return_const(());
        view.expect_show_result()
            .withf(|captions, video_id| captions == "hello" && video_id == "XYZ")
            .times(1)
            .return_const(());
        view.expect_set_busy().with(eq(false)).times(1).return_const(());

        let mut controller =
            WorkflowController::new(backend, metadata_ok("ABC123xyz"), view);

        let outcome = controller
            .handle(Action::Extract {
                url: "https://youtu.be/ABC123xyz".to_string(),
            })
            .await;

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(controller.state().captions, "hello");
        assert_eq!(controller.state().video_id, "XYZ");
    }

    #[tokio::test]
    async fn test_server_detail_passes_through_verbatim() {
        let mut backend = MockCaptionBackend::new();
        backend
            .expect_extract()
            .returning(|_| Err(ExtractionError::Server("quota exceeded".to_string())));

        let mut view = MockView::new();
        view.expect_hide_all().return_const(());
        view.expect_set_busy().return_const(());
        view.expect_show_video().return_const(());
        view.expect_show_error()
            .withf(|message| message == "quota exceeded")
            .times(1)
            .return_const(());

        let mut controller =
            WorkflowController::new(backend, metadata_ok("ABC123xyz"), view);

        let outcome = controller
            .handle(Action::Extract {
                url: "https://youtu.be/ABC123xyz".to_string(),
            })
            .await;

        assert_eq!(outcome, Outcome::Failed);
        assert!(controller.state().captions.is_empty());
    }

    #[tokio::test]
    async fn test_connectivity_failure_regardless_of_metadata() {
        let mut backend = MockCaptionBackend::new();
        backend
            .expect_extract()
            .returning(|_| Err(ExtractionError::Connectivity));

        // Metadata fails too; its failure stays silent
        let mut fetcher = MockMetadataFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Err(anyhow::anyhow!("dns failure")));

        let mut view = MockView::new();
        view.expect_hide_all().return_const(());
        view.expect_set_busy().return_const(());
        view.expect_show_video().times(0);
        view.expect_show_error()
            .withf(|message| message.contains("Cannot connect"))
            .times(1)
            .return_const(());

        let mut controller = WorkflowController::new(backend, fetcher, view);

        let outcome = controller
            .handle(Action::Extract {
                url: "https://youtu.be/ABC123xyz".to_string(),
            })
            .await;

        assert_eq!(outcome, Outcome::Failed);
    }

    #[tokio::test]
    async fn test_invalid_url_never_enters_loading() {
        let mut backend = MockCaptionBackend::new();
        backend.expect_extract().times(0);
        let mut fetcher = MockMetadataFetcher::new();
        fetcher.expect_fetch().times(0);

        let mut view = MockView::new();
        view.expect_hide_all().times(0);
        view.expect_set_busy().times(0);
        view.expect_show_error()
            .withf(|message| message == "Please enter a valid YouTube URL")
            .times(1)
            .return_const(());

        let mut controller = WorkflowController::new(backend, fetcher, view);

        let outcome = controller
            .handle(Action::Extract {
                url: "https://example.com/watch?v=ABC123xyz".to_string(),
            })
            .await;

        assert_eq!(outcome, Outcome::Failed);
    }

    #[tokio::test]
    async fn test_unextractable_id_fails_before_loading() {
        let mut backend = MockCaptionBackend::new();
        backend.expect_extract().times(0);
        let mut fetcher = MockMetadataFetcher::new();
        fetcher.expect_fetch().times(0);

        let mut view = MockView::new();
        view.expect_set_busy().times(0);
        view.expect_show_error()
            .withf(|message| message == "Could not extract video ID from URL")
            .times(1)
            .return_const(());

        let mut controller = WorkflowController::new(backend, fetcher, view);

        let outcome = controller
            .handle(Action::Extract {
                url: "https://youtube.com/watch?foo=bar".to_string(),
            })
            .await;

        assert_eq!(outcome, Outcome::Failed);
    }

    #[tokio::test]
    async fn test_metadata_failure_is_silent_and_result_still_shown() {
        let mut backend = MockCaptionBackend::new();
        backend
            .expect_extract()
            .returning(|_| Ok(payload("hello", "XYZ")));

        let mut fetcher = MockMetadataFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Err(anyhow::anyhow!("oembed down")));

        let mut view = MockView::new();
        view.expect_hide_all().return_const(());
        view.expect_set_busy().return_const(());
        view.expect_show_video().times(0);
        view.expect_show_error().times(0);
        view.expect_show_result().times(1).return_const(());

        let mut controller = WorkflowController::new(backend, fetcher, view);

        let outcome = controller
            .handle(Action::Extract {
                url: "https://youtu.be/ABC123xyz".to_string(),
            })
            .await;

        assert_eq!(outcome, Outcome::Completed);
        assert!(controller.state().metadata.is_none());
    }

    #[tokio::test]
    async fn test_busy_cleared_even_on_failure() {
        let mut backend = MockCaptionBackend::new();
        backend
            .expect_extract()
            .returning(|_| Err(ExtractionError::unexpected("boom")));

        let mut view = MockView::new();
        let mut seq = Sequence::new();
        view.expect_hide_all().times(1).in_sequence(&mut seq).return_const(());
        view.expect_set_busy()
            .with(eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        view.expect_show_video().return_const(());
        view.expect_show_error()
            .withf(|message| message == "boom")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        view.expect_set_busy()
            .with(eq(false))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let mut controller =
            WorkflowController::new(backend, metadata_ok("ABC123xyz"), view);

        controller
            .handle(Action::Extract {
                url: "https://youtu.be/ABC123xyz".to_string(),
            })
            .await;
    }

    #[tokio::test]
    async fn test_copy_with_no_captions_is_noop() {
        let backend = MockCaptionBackend::new();
        let fetcher = MockMetadataFetcher::new();
        // No expectations: any view call would panic
        let view = MockView::new();

        let mut controller = WorkflowController::new(backend, fetcher, view);

        assert_eq!(controller.handle(Action::Copy).await, Outcome::Ignored);
    }

    #[tokio::test]
    async fn test_download_with_no_captions_is_noop() {
        let backend = MockCaptionBackend::new();
        let fetcher = MockMetadataFetcher::new();
        let view = MockView::new();

        let mut controller = WorkflowController::new(backend, fetcher, view);

        assert_eq!(controller.handle(Action::Download).await, Outcome::Ignored);
        // No artifact produced
        assert!(!std::path::Path::new("youtube-captions-unknown.txt").exists());
    }

    #[tokio::test]
    async fn test_download_after_success_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();

        let mut backend = MockCaptionBackend::new();
        backend
            .expect_extract()
            .returning(|_| Ok(payload("hello", "XYZ")));

        let mut view = MockView::new();
        view.expect_hide_all().return_const(());
        view.expect_set_busy().return_const(());
        view.expect_show_video().return_const(());
        view.expect_show_result().return_const(());
        view.expect_confirm_downloaded().times(1).return_const(());

        let mut controller = WorkflowController::new(backend, metadata_ok("ABC123xyz"), view)
            .with_download_dir(Some(dir.path().to_path_buf()));

        controller
            .handle(Action::Extract {
                url: "https://youtu.be/ABC123xyz".to_string(),
            })
            .await;

        assert_eq!(controller.handle(Action::Download).await, Outcome::Completed);

        let saved = dir.path().join("youtube-captions-XYZ.txt");
        assert_eq!(fs_err::read_to_string(&saved).unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_reset_hides_sections_and_keeps_state() {
        let mut backend = MockCaptionBackend::new();
        backend
            .expect_extract()
            .returning(|_| Ok(payload("hello", "XYZ")));

        let mut view = MockView::new();
        view.expect_hide_all().times(2).return_const(());
        view.expect_set_busy().return_const(());
        view.expect_show_video().return_const(());
        view.expect_show_result().return_const(());
        view.expect_focus_input().times(1).return_const(());

        let mut controller =
            WorkflowController::new(backend, metadata_ok("ABC123xyz"), view);

        controller
            .handle(Action::Extract {
                url: "https://youtu.be/ABC123xyz".to_string(),
            })
            .await;

        assert_eq!(controller.handle(Action::Reset).await, Outcome::Completed);
        // Retained for copy/download until overwritten
        assert_eq!(controller.state().captions, "hello");
        assert_eq!(controller.state().video_id, "XYZ");
    }

    #[tokio::test]
    async fn test_input_is_trimmed_before_gating() {
        let mut backend = MockCaptionBackend::new();
        backend
            .expect_extract()
            .withf(|url| url == "https://youtu.be/ABC123xyz")
            .returning(|_| Ok(payload("hello", "XYZ")));

        let mut view = MockView::new();
        view.expect_hide_all().return_const(());
        view.expect_set_busy().return_const(());
        view.expect_show_video().return_const(());
        view.expect_show_result().return_const(());

        let mut controller =
            WorkflowController::new(backend, metadata_ok("ABC123xyz"), view);

        let outcome = controller
            .handle(Action::Extract {
                url: "  https://youtu.be/ABC123xyz  ".to_string(),
            })
            .await;

        assert_eq!(outcome, Outcome::Completed);
    }
}
