//! Cancellable page fetching and the hash-keyed row count.

use derive_getters::Getters;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tallyboard_core::{
    CollectionKind, CollectionRequest, CountRequest, ExpandedRows, Row, RowId, reconcile,
};
use tallyboard_error::TallyboardError;
use tallyboard_interface::CollectionSource;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, instrument, warn};

/// Where the most recent page request stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// Nothing requested yet, or the last request was cancelled
    #[default]
    Idle,
    /// A page request is in flight
    Fetching,
    /// The last request produced rows (possibly none)
    Succeeded,
    /// The last request failed; see [`GridData::error`]
    Failed,
}

/// How one triggered request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Rows were applied
    Succeeded,
    /// Superseded or torn down before its result could be applied
    Aborted,
    /// The transport reported an error, now shown as the grid's error state
    Failed,
    /// Identifier list empty; resolved to no rows without a request
    Skipped,
}

/// Snapshot of everything a grid renders from the fetch side.
#[derive(Debug, Clone, Default, Getters)]
pub struct GridData {
    /// Phase of the most recent request
    phase: FetchPhase,
    /// Rows of the current page, as fetched
    rows: Vec<Row>,
    /// Expanded row identifiers, in expansion order
    expanded: ExpandedRows,
    /// Content hash reported with the current rows
    content_hash: Option<String>,
    /// Total rows for the current content hash, once resolved
    total_rows: u64,
    /// Whether a page request is in flight
    is_loading: bool,
    /// Error from the most recent failed request
    error: Option<TallyboardError>,
    #[getter(skip)]
    pending_counts: usize,
}

impl GridData {
    /// Rows to display: fetched rows with expansion rows spliced in.
    pub fn display_rows(&self) -> Vec<Row> {
        reconcile(&self.rows, &self.expanded)
    }

    /// Whether a row count lookup is in flight.
    pub fn is_counting(&self) -> bool {
        self.pending_counts > 0
    }
}

#[derive(Debug, Default)]
struct CountCache {
    resolved: HashMap<String, u64>,
    requested: HashSet<String>,
}

/// Shared by the controller and the tasks it spawns.
#[derive(Clone)]
struct FetchContext {
    source: Arc<dyn CollectionSource>,
    fetch_url: Arc<str>,
    variant: Option<CollectionKind>,
    data: Arc<watch::Sender<GridData>>,
    generation: Arc<AtomicU64>,
    counts: Arc<Mutex<CountCache>>,
    lifetime: CancellationToken,
    tracker: TaskTracker,
}

/// Issues page requests for one grid instance.
///
/// At most one request is logically current. Triggering a new request
/// cancels the previous one, and a result is applied only while its
/// generation is still the newest, so a late response can never overwrite
/// newer rows. The row count is resolved by a separate task keyed by
/// content hash: a refetch does not cancel it, and it is applied only if its
/// hash still matches the displayed rows. Dropping the controller cancels
/// everything it spawned.
pub struct FetchController {
    ctx: FetchContext,
    ignore_empty_uids: bool,
    in_flight: Option<CancellationToken>,
}

impl FetchController {
    /// Create a controller fetching from `fetch_url`.
    ///
    /// `variant` names the collection for the count endpoint. With
    /// `ignore_empty_uids`, a request whose identifier parameters are all
    /// empty resolves to no rows without touching the transport.
    pub fn new(
        source: Arc<dyn CollectionSource>,
        fetch_url: impl Into<String>,
        variant: Option<CollectionKind>,
        ignore_empty_uids: bool,
    ) -> Self {
        let fetch_url: String = fetch_url.into();
        let (data, _) = watch::channel(GridData::default());
        Self {
            ctx: FetchContext {
                source,
                fetch_url: Arc::from(fetch_url),
                variant,
                data: Arc::new(data),
                generation: Arc::new(AtomicU64::new(0)),
                counts: Arc::new(Mutex::new(CountCache::default())),
                lifetime: CancellationToken::new(),
                tracker: TaskTracker::new(),
            },
            ignore_empty_uids,
            in_flight: None,
        }
    }

    /// Collection endpoint this controller fetches from.
    pub fn fetch_url(&self) -> &str {
        &self.ctx.fetch_url
    }

    /// Start fetching `request`, superseding any request in flight.
    ///
    /// Must be called from within a tokio runtime. The returned handle
    /// resolves to how this particular request ended.
    #[instrument(skip(self, request), fields(url = %self.ctx.fetch_url))]
    pub fn trigger(&mut self, request: CollectionRequest) -> JoinHandle<FetchOutcome> {
        if let Some(previous) = self.in_flight.take() {
            debug!("Cancelling superseded request");
            previous.cancel();
        }
        let generation = self.ctx.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if self.ignore_empty_uids && request.lacks_identifiers() {
            info!("Identifier list is empty, resolving to no rows");
            self.ctx.data.send_modify(|data| {
                data.phase = FetchPhase::Succeeded;
                data.rows.clear();
                data.expanded.clear();
                data.content_hash = None;
                data.total_rows = 0;
                data.is_loading = false;
                data.error = None;
            });
            return self.ctx.tracker.spawn(async { FetchOutcome::Skipped });
        }

        self.ctx.data.send_modify(|data| {
            data.phase = FetchPhase::Fetching;
            data.is_loading = true;
        });

        let token = self.ctx.lifetime.child_token();
        self.in_flight = Some(token.clone());
        let ctx = self.ctx.clone();
        self.ctx
            .tracker
            .spawn(async move { ctx.run(generation, token, request).await })
    }

    /// Cancel the request in flight, keeping the rows already shown.
    #[instrument(skip(self))]
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.ctx.generation.fetch_add(1, Ordering::SeqCst);
        self.ctx.data.send_if_modified(|data| {
            if !data.is_loading {
                return false;
            }
            data.is_loading = false;
            data.phase = FetchPhase::Idle;
            true
        });
    }

    /// Expand or collapse a row; returns whether it is expanded afterwards.
    pub fn toggle_expanded(&self, id: &RowId) -> bool {
        let mut expanded = false;
        self.ctx.data.send_modify(|data| {
            expanded = data.expanded.toggle(id);
        });
        debug!(id = %id, expanded, "Toggled row expansion");
        expanded
    }

    /// Observe every change to the grid data.
    pub fn subscribe(&self) -> watch::Receiver<GridData> {
        self.ctx.data.subscribe()
    }

    /// Copy of the current grid data.
    pub fn snapshot(&self) -> GridData {
        self.ctx.data.borrow().clone()
    }

    /// Wait until every spawned request and count lookup has finished.
    pub async fn settle(&self) {
        self.ctx.tracker.close();
        self.ctx.tracker.wait().await;
        self.ctx.tracker.reopen();
    }
}

impl Drop for FetchController {
    fn drop(&mut self) {
        self.ctx.lifetime.cancel();
        self.ctx.tracker.close();
    }
}

impl FetchContext {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn run(
        self,
        generation: u64,
        token: CancellationToken,
        request: CollectionRequest,
    ) -> FetchOutcome {
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!(generation, "Request aborted");
                return FetchOutcome::Aborted;
            }
            result = self.source.fetch_page(&self.fetch_url, &request) => result,
        };

        match result {
            Ok(page) => {
                let hash = page.total_rows_hash.clone();
                let cached_total = match hash.as_deref() {
                    Some(hash) => self.counts.lock().await.resolved.get(hash).copied(),
                    None => None,
                };
                let applied = self.data.send_if_modified(|data| {
                    if !self.is_current(generation) {
                        return false;
                    }
                    // A total belongs to one hash; never show it for another.
                    if data.content_hash != hash {
                        data.total_rows = cached_total.unwrap_or(0);
                    }
                    data.rows = page.data;
                    data.expanded.clear();
                    data.content_hash = hash.clone();
                    data.phase = FetchPhase::Succeeded;
                    data.is_loading = false;
                    data.error = None;
                    true
                });
                if !applied {
                    debug!(generation, "Discarding stale response");
                    return FetchOutcome::Aborted;
                }
                debug!(generation, hash = ?hash, "Applied page");
                if let Some(hash) = hash.filter(|hash| !hash.is_empty()) {
                    self.spawn_count(hash).await;
                }
                FetchOutcome::Succeeded
            }
            Err(err) => {
                let applied = self.data.send_if_modified(|data| {
                    if !self.is_current(generation) {
                        return false;
                    }
                    data.rows.clear();
                    data.expanded.clear();
                    data.content_hash = None;
                    data.total_rows = 0;
                    data.phase = FetchPhase::Failed;
                    data.is_loading = false;
                    data.error = Some(err.clone());
                    true
                });
                if !applied {
                    debug!(generation, error = %err, "Discarding stale failure");
                    return FetchOutcome::Aborted;
                }
                error!(generation, error = %err, status = ?err.http_status(), "Page request failed");
                FetchOutcome::Failed
            }
        }
    }

    /// Apply a cached count, or start the one lookup allowed for this hash.
    async fn spawn_count(&self, hash: String) {
        {
            let mut counts = self.counts.lock().await;
            if let Some(total) = counts.resolved.get(&hash).copied() {
                debug!(hash = %hash, total, "Row count served from cache");
                self.apply_count(&hash, total);
                return;
            }
            if !counts.requested.insert(hash.clone()) {
                debug!(hash = %hash, "Row count already requested");
                return;
            }
        }

        self.data.send_modify(|data| data.pending_counts += 1);
        let ctx = self.clone();
        self.tracker.spawn(async move { ctx.resolve_count(hash).await });
    }

    async fn resolve_count(self, hash: String) {
        let request = CountRequest::new(self.variant, hash.as_str());
        let result = tokio::select! {
            biased;
            _ = self.lifetime.cancelled() => None,
            result = self.source.fetch_total_rows(&request) => Some(result),
        };

        match result {
            Some(Ok(total)) => {
                self.counts.lock().await.resolved.insert(hash.clone(), total);
                self.apply_count(&hash, total);
            }
            Some(Err(err)) => warn!(hash = %hash, error = %err, "Row count lookup failed"),
            None => debug!(hash = %hash, "Row count lookup cancelled"),
        }

        self.data.send_modify(|data| {
            data.pending_counts = data.pending_counts.saturating_sub(1);
        });
    }

    fn apply_count(&self, hash: &str, total: u64) {
        let applied = self.data.send_if_modified(|data| {
            if data.content_hash.as_deref() != Some(hash) || data.total_rows == total {
                return false;
            }
            data.total_rows = total;
            true
        });
        if applied {
            debug!(hash, total, "Applied row count");
        }
    }
}
