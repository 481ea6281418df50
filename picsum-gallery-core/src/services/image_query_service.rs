//! Cached, retrying image listing queries

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use picsum_gallery_provider::{HttpError, HttpUtils, Image, ImageSource, ListParams, RetryPolicy};

use crate::error::CoreResult;
use crate::services::{GalleryContext, PaginationHandle};
use crate::types::{FetchState, PageSnapshot};

type PendingFetch = Shared<BoxFuture<'static, FetchState<Vec<Image>>>>;

/// How long successful pages are trusted and kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Age under which a cached page is served without a request.
    pub stale_time: Duration,
    /// Time since last use after which an entry is dropped.
    pub gc_time: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(5 * 60),
            gc_time: Duration::from_secs(10 * 60),
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    /// Last successful result and when it arrived
    images: Option<(Vec<Image>, Instant)>,
    /// Error of the most recent attempt, cleared by a success
    error: Option<HttpError>,
    last_used: Instant,
}

impl CacheEntry {
    fn new(now: Instant) -> Self {
        Self {
            images: None,
            error: None,
            last_used: now,
        }
    }

    fn is_fresh(&self, policy: &CachePolicy, now: Instant) -> bool {
        self.error.is_none()
            && self
                .images
                .as_ref()
                .is_some_and(|(_, fetched_at)| now.duration_since(*fetched_at) < policy.stale_time)
    }

    fn to_state(&self) -> FetchState<Vec<Image>> {
        match (&self.images, &self.error) {
            (Some((images, _)), None) => FetchState::success(images.clone()),
            (Some((images, _)), Some(error)) => {
                FetchState::stale_with_error(images.clone(), error.clone())
            }
            (None, Some(error)) => FetchState::failure(error.clone()),
            (None, None) => FetchState::loading(),
        }
    }
}

struct InFlight {
    id: u64,
    future: PendingFetch,
}

/// State shared between the service and its fetch tasks.
struct QueryStore {
    cache: RwLock<HashMap<ListParams, CacheEntry>>,
    in_flight: Mutex<HashMap<ListParams, InFlight>>,
    published: watch::Sender<PageSnapshot>,
}

impl QueryStore {
    /// Record the outcome of an attempt for `key`.
    ///
    /// The published snapshot is updated too when it belongs to `key`.
    async fn record(
        &self,
        key: ListParams,
        result: Result<Vec<Image>, HttpError>,
    ) -> FetchState<Vec<Image>> {
        let state = {
            let now = Instant::now();
            let mut cache = self.cache.write().await;
            let entry = cache.entry(key).or_insert_with(|| CacheEntry::new(now));
            entry.last_used = now;

            match result {
                Ok(images) => {
                    log::debug!("Page {} loaded ({} images)", key.page, images.len());
                    entry.images = Some((images, now));
                    entry.error = None;
                }
                Err(error) => {
                    if error.is_expected() {
                        log::warn!("Page {} failed: {error} (HTTP {})", key.page, error.status);
                    } else {
                        log::error!("Page {} failed: {error} (HTTP {})", key.page, error.status);
                    }
                    entry.error = Some(error);
                }
            }
            entry.to_state()
        };

        self.published.send_if_modified(|snapshot| {
            if snapshot.params != key || snapshot.state == state {
                return false;
            }
            snapshot.state = state.clone();
            true
        });
        state
    }

    /// Record the outcome of fetch `id` and release its in-flight slot.
    async fn finish(
        &self,
        key: ListParams,
        id: u64,
        result: Result<Vec<Image>, HttpError>,
    ) -> FetchState<Vec<Image>> {
        let state = self.record(key, result).await;
        let mut in_flight = self.in_flight.lock().await;
        if in_flight.get(&key).is_some_and(|flight| flight.id == id) {
            in_flight.remove(&key);
        }
        state
    }

    fn publish(&self, params: ListParams, state: FetchState<Vec<Image>>) {
        self.published.send_replace(PageSnapshot { params, state });
    }
}

/// Image query service
///
/// Keys results by `(page, limit)`. A fresh page is served from memory, a
/// stale or missing one is fetched with [`RetryPolicy`] backoff; concurrent
/// requests for the same key share one fetch. A fetch runs on its own task,
/// so it completes and fills the cache even if every caller stops waiting.
pub struct ImageQueryService {
    ctx: Arc<GalleryContext>,
    retry: RetryPolicy,
    cache_policy: CachePolicy,
    store: Arc<QueryStore>,
    next_flight_id: AtomicU64,
}

impl ImageQueryService {
    /// Create the service with the default retry and cache policies
    #[must_use]
    pub fn new(ctx: Arc<GalleryContext>) -> Self {
        Self::with_policies(ctx, RetryPolicy::default(), CachePolicy::default())
    }

    #[must_use]
    pub fn with_policies(
        ctx: Arc<GalleryContext>,
        retry: RetryPolicy,
        cache_policy: CachePolicy,
    ) -> Self {
        let initial = PageSnapshot::loading(ListParams::new(
            ctx.pagination().current_page(),
            ctx.page_size(),
        ));
        let (published, _) = watch::channel(initial);
        Self {
            ctx,
            retry,
            cache_policy,
            store: Arc::new(QueryStore {
                cache: RwLock::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
                published,
            }),
            next_flight_id: AtomicU64::new(1),
        }
    }

    /// Current state for a key without any I/O.
    pub async fn state(&self, page: u32, limit: u32) -> FetchState<Vec<Image>> {
        let key = ListParams::new(page, limit);
        let cache = self.store.cache.read().await;
        cache
            .get(&key)
            .map_or_else(FetchState::loading, CacheEntry::to_state)
    }

    /// Fetch a page, serving it from memory while fresh.
    pub async fn fetch(&self, page: u32, limit: u32) -> FetchState<Vec<Image>> {
        let key = ListParams::new(page, limit);
        self.evict_expired().await;

        {
            let now = Instant::now();
            let mut cache = self.store.cache.write().await;
            if let Some(entry) = cache.get_mut(&key) {
                entry.last_used = now;
                if entry.is_fresh(&self.cache_policy, now) {
                    log::debug!("Cache hit for page {page} (limit {limit})");
                    return entry.to_state();
                }
            }
        }

        self.run(key).await
    }

    /// Fetch a page regardless of freshness.
    pub async fn refetch(&self, page: u32, limit: u32) -> FetchState<Vec<Image>> {
        self.run(ListParams::new(page, limit)).await
    }

    /// Convenience wrapper for callers that only want the images.
    pub async fn images(&self, page: u32, limit: u32) -> CoreResult<Vec<Image>> {
        let state = self.fetch(page, limit).await;
        match state.error() {
            Some(error) => Err(error.clone().into()),
            None => Ok(state.into_data()),
        }
    }

    /// Drop entries unused for longer than the retention window.
    pub async fn evict_expired(&self) {
        let now = Instant::now();
        let in_flight = self.store.in_flight.lock().await;
        let mut cache = self.store.cache.write().await;
        let before = cache.len();
        cache.retain(|key, entry| {
            in_flight.contains_key(key)
                || now.duration_since(entry.last_used) < self.cache_policy.gc_time
        });
        let evicted = before - cache.len();
        if evicted > 0 {
            log::debug!("Evicted {evicted} cached page(s)");
        }
    }

    /// Number of keys currently held in memory
    pub async fn cached_len(&self) -> usize {
        self.store.cache.read().await.len()
    }

    /// Number of fetches currently running
    pub async fn in_flight_len(&self) -> usize {
        self.store.in_flight.lock().await.len()
    }

    /// Receiver of the state of the page the pagination handle points at.
    ///
    /// [`follow`](Self::follow) moves it from page to page; any fetch or
    /// refetch of the page it shows updates it as well.
    pub fn subscribe(&self) -> watch::Receiver<PageSnapshot> {
        self.store.published.subscribe()
    }

    /// Load the current page and every page the pagination handle moves to.
    ///
    /// A fetch superseded by a page change still completes and fills the
    /// cache, but its state is not published.
    pub fn follow(self: &Arc<Self>) -> JoinHandle<()> {
        let service = Arc::clone(self);
        let pagination: PaginationHandle = self.ctx.pagination().clone();
        let limit = self.ctx.page_size();

        tokio::spawn(async move {
            let mut rx = pagination.subscribe();
            loop {
                let key = ListParams::new(rx.borrow_and_update().current_page(), limit);
                let snapshot = service.state(key.page, key.limit).await;
                service.store.publish(key, snapshot);

                let worker = Arc::clone(&service);
                let mut fetch =
                    tokio::spawn(async move { worker.fetch(key.page, key.limit).await });

                tokio::select! {
                    result = &mut fetch => {
                        match result {
                            Ok(state) => service.store.publish(key, state),
                            Err(e) => log::error!("Page {} fetch task failed: {e}", key.page),
                        }
                        if rx.changed().await.is_err() {
                            break;
                        }
                    }
                    changed = rx.changed() => {
                        log::debug!("Page {} superseded before it loaded", key.page);
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
            log::debug!("Pagination closed, stopped following");
        })
    }

    /// Join or start the fetch for `key`.
    async fn run(&self, key: ListParams) -> FetchState<Vec<Image>> {
        if let Err(error) = key.validate() {
            log::warn!("Rejected query for page {} (limit {}): {error}", key.page, key.limit);
            return self.store.record(key, Err(error)).await;
        }

        self.join_or_start(key).await.await
    }

    async fn join_or_start(&self, key: ListParams) -> PendingFetch {
        let mut in_flight = self.store.in_flight.lock().await;
        if let Some(flight) = in_flight.get(&key) {
            log::debug!("Joining in-flight fetch for page {}", key.page);
            return flight.future.clone();
        }

        let id = self.next_flight_id.fetch_add(1, Ordering::Relaxed);
        let source: Arc<dyn ImageSource> = Arc::clone(&self.ctx.image_source);
        let policy = self.retry.clone();
        let store = Arc::clone(&self.store);
        let task = tokio::spawn(async move {
            let result = HttpUtils::with_retry(
                &policy,
                source.id(),
                || {
                    let source = Arc::clone(&source);
                    async move { source.get_images(key).await }
                },
                |_, _| {},
            )
            .await;
            store.finish(key, id, result).await
        });

        let store = Arc::clone(&self.store);
        let future = async move {
            match task.await {
                Ok(state) => state,
                Err(e) => {
                    log::error!("Page {} fetch task failed: {e}", key.page);
                    let error = HttpError::transport(format!("Fetch task failed: {e}"));
                    store.finish(key, id, Err(error)).await
                }
            }
        }
        .boxed()
        .shared();

        in_flight.insert(
            key,
            InFlight {
                id,
                future: future.clone(),
            },
        );
        future
    }
}
