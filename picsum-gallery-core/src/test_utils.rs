//! Test helpers
//!
//! Scripted sources and factory functions for service tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use picsum_gallery_provider::{DescriptionSource, HttpError, Image, ImageSource, ListParams};
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::services::GalleryContext;
use crate::types::PaginationConfig;

// ===== MockImageSource =====

/// Replays queued results in call order; an empty queue yields an empty page.
pub struct MockImageSource {
    responses: RwLock<VecDeque<Result<Vec<Image>, HttpError>>>,
    calls: RwLock<Vec<(ListParams, Instant)>>,
    delay: RwLock<Duration>,
}

impl MockImageSource {
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(VecDeque::new()),
            calls: RwLock::new(Vec::new()),
            delay: RwLock::new(Duration::ZERO),
        }
    }

    pub async fn push_ok(&self, images: Vec<Image>) {
        self.responses.write().await.push_back(Ok(images));
    }

    pub async fn push_err(&self, error: HttpError) {
        self.responses.write().await.push_back(Err(error));
    }

    /// Simulated response latency
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    pub async fn calls(&self) -> Vec<ListParams> {
        self.calls.read().await.iter().map(|(p, _)| *p).collect()
    }

    pub async fn call_times(&self) -> Vec<Instant> {
        self.calls.read().await.iter().map(|(_, t)| *t).collect()
    }
}

#[async_trait]
impl ImageSource for MockImageSource {
    fn id(&self) -> &'static str {
        "mock-images"
    }

    async fn get_images(&self, params: ListParams) -> Result<Vec<Image>, HttpError> {
        self.calls.write().await.push((params, Instant::now()));
        let response = self
            .responses
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()));

        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        response
    }
}

// ===== MockDescriptionSource =====

/// Answers `description of {url}` unless told to fail.
pub struct MockDescriptionSource {
    available: AtomicBool,
    failure: RwLock<Option<HttpError>>,
    requests: RwLock<Vec<String>>,
    delay: RwLock<Duration>,
}

impl MockDescriptionSource {
    pub fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
            failure: RwLock::new(None),
            requests: RwLock::new(Vec::new()),
            delay: RwLock::new(Duration::ZERO),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub async fn fail_with(&self, error: HttpError) {
        *self.failure.write().await = Some(error);
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    pub async fn requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl DescriptionSource for MockDescriptionSource {
    fn id(&self) -> &'static str {
        "mock-descriptions"
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn generate_description(&self, image_url: &str) -> Result<String, HttpError> {
        self.requests.write().await.push(image_url.to_string());

        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match self.failure.read().await.clone() {
            Some(error) => Err(error),
            None => Ok(format!("description of {image_url}")),
        }
    }
}

// ===== Factories =====

pub fn sample_image(id: &str) -> Image {
    Image {
        id: id.to_string(),
        author: format!("Author {id}"),
        width: 5000,
        height: 3333,
        url: format!("https://unsplash.com/photos/{id}"),
        download_url: format!("https://picsum.photos/id/{id}/5000/3333"),
    }
}

/// `count` images with consecutive numeric ids starting at `first`.
pub fn sample_images(first: u32, count: u32) -> Vec<Image> {
    (first..first + count)
        .map(|id| sample_image(&id.to_string()))
        .collect()
}

/// Context over fresh mocks with the default pagination (page 1, 10 per page).
pub fn create_test_context() -> (
    Arc<GalleryContext>,
    Arc<MockImageSource>,
    Arc<MockDescriptionSource>,
) {
    let images = Arc::new(MockImageSource::new());
    let descriptions = Arc::new(MockDescriptionSource::new());
    let ctx = GalleryContext::new(
        Arc::clone(&images) as Arc<dyn ImageSource>,
        Arc::clone(&descriptions) as Arc<dyn DescriptionSource>,
        PaginationConfig::default(),
    )
    .unwrap();
    (Arc::new(ctx), images, descriptions)
}
