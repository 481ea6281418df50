//! Modal description lifecycle
//!
//! One instance per detail modal. The description request waits until the
//! detail image has loaded and the selection has been stable for
//! [`ModalConfig::settle_delay`]; any newer selection cancels the wait and
//! outdates a request already in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use picsum_gallery_provider::{DescriptionSource, Image};

use crate::services::GalleryContext;
use crate::types::{DescriptionPhase, ModalDescriptionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalConfig {
    /// Time the loaded image must stay selected before it is described.
    pub settle_delay: Duration,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Default)]
struct Selection {
    /// Bumped on every reset; tasks carry the value they were started for
    generation: u64,
    image: Option<Image>,
    phase: DescriptionPhase,
    pending: Option<JoinHandle<()>>,
}

impl Selection {
    fn view(&self) -> ModalDescriptionState {
        ModalDescriptionState::from_phase(self.image.as_ref().map(|i| i.id.as_str()), &self.phase)
    }
}

struct Inner {
    source: Arc<dyn DescriptionSource>,
    config: ModalConfig,
    selection: Mutex<Selection>,
    state: watch::Sender<ModalDescriptionState>,
}

impl Inner {
    fn publish(&self, selection: &Selection) {
        self.state.send_replace(selection.view());
    }
}

/// Modal description service
pub struct ModalDescriptionService {
    inner: Arc<Inner>,
}

impl ModalDescriptionService {
    #[must_use]
    pub fn new(ctx: &GalleryContext) -> Self {
        Self::with_config(ctx, ModalConfig::default())
    }

    #[must_use]
    pub fn with_config(ctx: &GalleryContext, config: ModalConfig) -> Self {
        let (state, _) = watch::channel(ModalDescriptionState::default());
        Self {
            inner: Arc::new(Inner {
                source: Arc::clone(&ctx.description_source),
                config,
                selection: Mutex::new(Selection::default()),
                state,
            }),
        }
    }

    /// Show `image`, discarding everything known about the previous one.
    pub async fn open(&self, image: Image) {
        let mut selection = self.inner.selection.lock().await;
        log::debug!("Modal opened for image {}", image.id);
        self.reset(&mut selection, Some(image));
    }

    /// Switch to `image`. Re-selecting the image already shown keeps its state.
    pub async fn select(&self, image: Image) {
        let mut selection = self.inner.selection.lock().await;
        if selection.image.as_ref().is_some_and(|current| current.id == image.id) {
            return;
        }
        log::debug!("Modal switched to image {}", image.id);
        self.reset(&mut selection, Some(image));
    }

    pub async fn close(&self) {
        let mut selection = self.inner.selection.lock().await;
        log::debug!("Modal closed");
        self.reset(&mut selection, None);
    }

    /// The detail image finished loading.
    ///
    /// Schedules the description request after the settle delay, unless the
    /// description source is not configured. Ignored outside the image
    /// loading phase, so repeated load events never cause a second request.
    pub async fn image_loaded(&self) {
        let mut selection = self.inner.selection.lock().await;
        if selection.phase != DescriptionPhase::ImageLoading {
            log::debug!("Ignoring image load event in phase {:?}", selection.phase);
            return;
        }
        selection.phase = DescriptionPhase::ImageReady;
        self.inner.publish(&selection);

        let Some(url) = selection.image.as_ref().map(Image::large_url) else {
            return;
        };
        if !self.inner.source.is_available() {
            log::info!(
                "Description source {} is not configured, skipping description",
                self.inner.source.id()
            );
            return;
        }

        let inner = Arc::clone(&self.inner);
        let generation = selection.generation;
        selection.pending = Some(tokio::spawn(describe(inner, generation, url)));
    }

    /// The detail image could not be loaded; no description will be requested.
    pub async fn image_failed(&self) {
        let mut selection = self.inner.selection.lock().await;
        if selection.phase != DescriptionPhase::ImageLoading {
            return;
        }
        if let Some(image) = &selection.image {
            log::warn!("Detail image {} failed to load", image.id);
        }
        selection.phase = DescriptionPhase::ImageFailed;
        self.inner.publish(&selection);
    }

    pub async fn phase(&self) -> DescriptionPhase {
        self.inner.selection.lock().await.phase.clone()
    }

    pub async fn selected(&self) -> Option<Image> {
        self.inner.selection.lock().await.image.clone()
    }

    /// Latest published view state
    pub fn snapshot(&self) -> ModalDescriptionState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ModalDescriptionState> {
        self.inner.state.subscribe()
    }

    fn reset(&self, selection: &mut Selection, image: Option<Image>) {
        if let Some(pending) = selection.pending.take() {
            pending.abort();
        }
        selection.generation = selection.generation.wrapping_add(1);
        selection.phase = if image.is_some() {
            DescriptionPhase::ImageLoading
        } else {
            DescriptionPhase::Idle
        };
        selection.image = image;
        self.inner.publish(selection);
    }
}

impl Drop for ModalDescriptionService {
    fn drop(&mut self) {
        if let Ok(mut selection) = self.inner.selection.try_lock() {
            if let Some(pending) = selection.pending.take() {
                pending.abort();
            }
        }
    }
}

async fn describe(inner: Arc<Inner>, generation: u64, url: String) {
    tokio::time::sleep(inner.config.settle_delay).await;

    {
        let mut selection = inner.selection.lock().await;
        if selection.generation != generation || selection.phase != DescriptionPhase::ImageReady {
            return;
        }
        selection.phase = DescriptionPhase::DescribePending;
        inner.publish(&selection);
    }

    log::debug!("Requesting description for {url}");
    let result = inner.source.generate_description(&url).await;

    let mut selection = inner.selection.lock().await;
    if selection.generation != generation {
        log::debug!("Discarding description for {url}, selection changed");
        return;
    }
    selection.phase = match result {
        Ok(text) => DescriptionPhase::DescribeSuccess(text),
        Err(error) => {
            if error.is_expected() {
                log::warn!("Description failed: {error} (HTTP {})", error.status);
            } else {
                log::error!("Description failed: {error} (HTTP {})", error.status);
            }
            DescriptionPhase::DescribeFailed(error)
        }
    };
    selection.pending = None;
    inner.publish(&selection);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_context, sample_image};
    use picsum_gallery_provider::HttpError;

    fn service(ctx: &GalleryContext) -> ModalDescriptionService {
        ModalDescriptionService::new(ctx)
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn describes_loaded_image_after_settle_delay() {
        let (ctx, _, descriptions) = create_test_context();
        let modal = service(&ctx);
        let image = sample_image("7");

        modal.open(image.clone()).await;
        assert_eq!(modal.phase().await, DescriptionPhase::ImageLoading);
        modal.image_loaded().await;

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(descriptions.requests().await.is_empty());

        settle().await;
        assert_eq!(descriptions.requests().await, vec![image.large_url()]);

        let state = modal.snapshot();
        assert_eq!(state.image_id.as_deref(), Some("7"));
        assert!(state.image_loaded);
        assert!(!state.is_describing);
        assert_eq!(state.description, format!("description of {}", image.large_url()));
    }

    #[tokio::test(start_paused = true)]
    async fn quick_reselection_never_requests_first_image() {
        let (ctx, _, descriptions) = create_test_context();
        let modal = service(&ctx);
        let first = sample_image("1");
        let second = sample_image("2");

        modal.open(first.clone()).await;
        modal.image_loaded().await;
        tokio::time::sleep(Duration::from_millis(300)).await;

        modal.select(second.clone()).await;
        modal.image_loaded().await;
        settle().await;

        assert_eq!(descriptions.requests().await, vec![second.large_url()]);
        assert_eq!(modal.snapshot().image_id.as_deref(), Some("2"));
    }

    #[tokio::test(start_paused = true)]
    async fn outdated_description_is_never_shown() {
        let (ctx, _, descriptions) = create_test_context();
        descriptions.set_delay(Duration::from_secs(2)).await;
        let modal = service(&ctx);
        let first = sample_image("1");
        let second = sample_image("2");

        modal.open(first.clone()).await;
        modal.image_loaded().await;
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(modal.snapshot().is_describing);

        modal.select(second.clone()).await;
        assert!(!modal.snapshot().is_describing);
        modal.image_loaded().await;
        tokio::time::sleep(Duration::from_secs(3)).await;

        let state = modal.snapshot();
        assert_eq!(state.image_id.as_deref(), Some("2"));
        assert_eq!(state.description, format!("description of {}", second.large_url()));
        assert_eq!(
            descriptions.requests().await,
            vec![first.large_url(), second.large_url()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_image_is_never_described() {
        let (ctx, _, descriptions) = create_test_context();
        let modal = service(&ctx);

        modal.open(sample_image("3")).await;
        modal.image_failed().await;
        modal.image_loaded().await;
        settle().await;

        assert!(descriptions.requests().await.is_empty());
        let state = modal.snapshot();
        assert!(state.image_load_error);
        assert!(!state.image_loaded);
        assert_eq!(modal.phase().await, DescriptionPhase::ImageFailed);
    }

    #[tokio::test(start_paused = true)]
    async fn unconfigured_source_is_never_called() {
        let (ctx, _, descriptions) = create_test_context();
        descriptions.set_available(false);
        let modal = service(&ctx);

        modal.open(sample_image("4")).await;
        modal.image_loaded().await;
        settle().await;

        assert!(descriptions.requests().await.is_empty());
        assert_eq!(modal.phase().await, DescriptionPhase::ImageReady);
        assert!(modal.snapshot().description.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_load_events_request_once() {
        let (ctx, _, descriptions) = create_test_context();
        let modal = service(&ctx);

        modal.open(sample_image("5")).await;
        modal.image_loaded().await;
        modal.image_loaded().await;
        settle().await;
        modal.image_loaded().await;
        settle().await;

        assert_eq!(descriptions.requests().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_reported_without_retry() {
        let (ctx, _, descriptions) = create_test_context();
        descriptions
            .fail_with(HttpError::new("Too many requests. Please wait a moment.", 429))
            .await;
        let modal = service(&ctx);

        modal.open(sample_image("6")).await;
        modal.image_loaded().await;
        settle().await;
        settle().await;

        assert_eq!(descriptions.requests().await.len(), 1);
        let state = modal.snapshot();
        assert!(state.description.is_empty());
        assert_eq!(state.describe_error.map(|e| e.status), Some(429));
    }

    #[tokio::test(start_paused = true)]
    async fn reselecting_same_image_keeps_state() {
        let (ctx, _, descriptions) = create_test_context();
        let modal = service(&ctx);
        let image = sample_image("8");

        modal.open(image.clone()).await;
        modal.image_loaded().await;
        settle().await;
        modal.select(image).await;

        assert!(matches!(
            modal.phase().await,
            DescriptionPhase::DescribeSuccess(_)
        ));
        assert_eq!(descriptions.requests().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn close_cancels_and_clears() {
        let (ctx, _, descriptions) = create_test_context();
        let modal = service(&ctx);

        modal.open(sample_image("9")).await;
        modal.image_loaded().await;
        tokio::time::sleep(Duration::from_millis(200)).await;
        modal.close().await;
        settle().await;

        assert!(descriptions.requests().await.is_empty());
        assert_eq!(modal.phase().await, DescriptionPhase::Idle);
        assert_eq!(modal.snapshot(), ModalDescriptionState::default());
        assert!(modal.selected().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn close_discards_description_already_in_flight() {
        let (ctx, _, descriptions) = create_test_context();
        descriptions.set_delay(Duration::from_secs(2)).await;
        let modal = service(&ctx);
        let image = sample_image("11");

        modal.open(image.clone()).await;
        modal.image_loaded().await;
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(descriptions.requests().await.len(), 1);

        modal.close().await;
        modal.open(image.clone()).await;
        modal.image_loaded().await;

        // The first request would have answered at 2.5s
        tokio::time::sleep(Duration::from_millis(1_950)).await;
        let state = modal.snapshot();
        assert!(state.is_describing);
        assert!(state.description.is_empty());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(
            descriptions.requests().await,
            vec![image.large_url(), image.large_url()]
        );
        assert_eq!(
            modal.snapshot().description,
            format!("description of {}", image.large_url())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn close_without_reopen_stays_idle() {
        let (ctx, _, descriptions) = create_test_context();
        descriptions.set_delay(Duration::from_secs(2)).await;
        let modal = service(&ctx);

        modal.open(sample_image("12")).await;
        modal.image_loaded().await;
        tokio::time::sleep(Duration::from_millis(600)).await;
        modal.close().await;
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(modal.phase().await, DescriptionPhase::Idle);
        assert_eq!(modal.snapshot(), ModalDescriptionState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_selects_of_same_image_reset_once() {
        let (ctx, _, _) = create_test_context();
        let modal = service(&ctx);
        let next = sample_image("14");

        modal.open(sample_image("13")).await;
        modal.image_loaded().await;
        let before = modal.inner.selection.lock().await.generation;

        tokio::join!(modal.select(next.clone()), modal.select(next.clone()));

        let selection = modal.inner.selection.lock().await;
        assert_eq!(selection.generation, before + 1);
        assert_eq!(selection.phase, DescriptionPhase::ImageLoading);
        assert_eq!(selection.image.as_ref().map(|i| i.id.as_str()), Some("14"));
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_pending_then_result() {
        let (ctx, _, descriptions) = create_test_context();
        descriptions.set_delay(Duration::from_millis(100)).await;
        let modal = service(&ctx);
        let mut rx = modal.subscribe();

        modal.open(sample_image("10")).await;
        modal.image_loaded().await;

        let mut saw_pending = false;
        loop {
            rx.changed().await.unwrap();
            let state = rx.borrow_and_update().clone();
            saw_pending |= state.is_describing;
            if !state.description.is_empty() {
                break;
            }
        }
        assert!(saw_pending);
    }
}
