//! The list-load controller.
//!
//! A controller owns one dataset for one screen. `load` fetches it,
//! classifies failures, retries connectivity failures with capped
//! exponential backoff and holds the result for client-side filtering.
//! The published rows are always `filter(all_rows, criteria)`, where
//! `all_rows` only changes on a successful fetch and `criteria` only on
//! an explicit filter change.
//!
//! At most one fetch is in flight per controller. Starting a new load
//! aborts the previous task, and every write a task makes is gated on the
//! generation it was started with, so a late response can never overwrite
//! the state of a newer load.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};

use crate::domain::LoadingState;
use crate::rasp::RaspError;

use super::backoff::RetryPolicy;

/// Where a controller's data comes from and how it is filtered.
pub trait ListSource: Send + Sync + 'static {
    /// One display row.
    type Row: Clone + Send + Sync + 'static;

    /// Client-side filter selection.
    type Criteria: Clone + Default + Send + Sync + 'static;

    /// Fetch and map the full dataset.
    fn fetch(&self) -> impl Future<Output = Result<Vec<Self::Row>, RaspError>> + Send;

    /// Whether a row passes the criteria.
    fn matches(&self, row: &Self::Row, criteria: &Self::Criteria) -> bool;

    /// Message shown when nothing passes the criteria.
    fn empty_message(&self, criteria: &Self::Criteria) -> String;

    /// Message shown for non-retryable failures.
    fn error_message(&self) -> String;

    /// A reason this source cannot be fetched at all, if any.
    fn rejection(&self) -> Option<String> {
        None
    }
}

/// What subscribers observe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot<R> {
    pub state: LoadingState,
    pub rows: Vec<R>,
}

impl<R> Default for Snapshot<R> {
    fn default() -> Self {
        Self {
            state: LoadingState::Idle,
            rows: Vec::new(),
        }
    }
}

/// Handle to a running load.
///
/// Dropping it does not cancel the load.
#[derive(Debug)]
pub struct LoadHandle(Option<JoinHandle<()>>);

impl LoadHandle {
    fn finished() -> Self {
        Self(None)
    }

    /// Wait until the load settles or is cancelled.
    pub async fn wait(self) {
        if let Some(handle) = self.0 {
            // A JoinError here only means the task was aborted by a newer load
            let _ = handle.await;
        }
    }
}

struct Inner<R, C> {
    generation: u64,
    all_rows: Vec<R>,
    criteria: C,
    task: Option<AbortHandle>,
}

pub(crate) struct Shared<S: ListSource> {
    source: S,
    inner: Mutex<Inner<S::Row, S::Criteria>>,
    published: watch::Sender<Snapshot<S::Row>>,
}

impl<S: ListSource> Shared<S> {
    fn lock(&self) -> MutexGuard<'_, Inner<S::Row, S::Criteria>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn filtered(&self, inner: &Inner<S::Row, S::Criteria>) -> Vec<S::Row> {
        inner
            .all_rows
            .iter()
            .filter(|r| self.source.matches(r, &inner.criteria))
            .cloned()
            .collect()
    }

    /// Publish `filter(all_rows, criteria)` with Loaded or Empty.
    fn publish_filtered(&self, inner: &Inner<S::Row, S::Criteria>) {
        let rows = self.filtered(inner);
        let state = if rows.is_empty() {
            LoadingState::Empty(self.source.empty_message(&inner.criteria))
        } else {
            LoadingState::Loaded
        };
        self.published.send_replace(Snapshot { state, rows });
    }

    /// Replace the state, keeping the published rows.
    fn publish_state(&self, state: LoadingState) {
        self.published.send_modify(|snapshot| snapshot.state = state);
    }

    /// Publish `state` if `generation` is still current.
    fn publish_state_if_current(&self, generation: u64, state: LoadingState) -> bool {
        let inner = self.lock();
        if inner.generation != generation {
            return false;
        }
        self.publish_state(state);
        true
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    fn commit(&self, generation: u64, rows: Vec<S::Row>) {
        let mut inner = self.lock();
        if inner.generation != generation {
            debug!(generation, "discarding stale response");
            return;
        }
        inner.all_rows = rows;
        inner.task = None;
        self.publish_filtered(&inner);
    }

    /// Record `criteria`, republishing unless a fetch is still outstanding.
    pub(crate) fn apply_filter(&self, criteria: S::Criteria) {
        let mut inner = self.lock();
        inner.criteria = criteria;
        let state = self.published.borrow().state.clone();
        if !state.is_pending() && state != LoadingState::Idle {
            self.publish_filtered(&inner);
        }
    }

    /// Record a picker query, republishing only over a dataset on screen.
    pub(crate) fn apply_query(&self, criteria: S::Criteria) {
        let mut inner = self.lock();
        inner.criteria = criteria;
        if self.published.borrow().state.shows_dataset() {
            self.publish_filtered(&inner);
        }
    }

    async fn run(self: Arc<Self>, generation: u64, retry: Option<RetryPolicy>) {
        let mut attempt = 0u32;
        loop {
            match self.source.fetch().await {
                Ok(rows) => {
                    info!(rows = rows.len(), "dataset loaded");
                    self.commit(generation, rows);
                    return;
                }
                Err(e) if e.is_connectivity() => {
                    if !self.publish_state_if_current(generation, LoadingState::NoConnectivity) {
                        return;
                    }
                    let Some(policy) = retry else {
                        warn!(error = %e, "no connectivity");
                        return;
                    };
                    let delay = policy.delay(attempt);
                    warn!(error = %e, attempt, delay_ms = delay.as_millis() as u64, "no connectivity, retrying");

                    tokio::time::sleep(delay).await;
                    if !self.is_current(generation) {
                        return;
                    }
                    attempt = attempt.saturating_add(1);
                }
                Err(e) => {
                    warn!(error = %e, "load failed");
                    self.publish_state_if_current(
                        generation,
                        LoadingState::Error(self.source.error_message()),
                    );
                    return;
                }
            }
        }
    }
}

/// Fetch-retry-filter cycle for one screen's dataset.
pub struct ListController<S: ListSource> {
    shared: Arc<Shared<S>>,
    retry: Option<RetryPolicy>,
}

impl<S: ListSource> ListController<S> {
    /// Create a controller that retries connectivity failures with `retry`.
    pub fn new(source: S, retry: RetryPolicy) -> Self {
        Self::with_retry(source, Some(retry))
    }

    /// Create a controller; `None` makes connectivity failures terminal.
    pub fn with_retry(source: S, retry: Option<RetryPolicy>) -> Self {
        let (published, _) = watch::channel(Snapshot::default());
        Self {
            shared: Arc::new(Shared {
                source,
                inner: Mutex::new(Inner {
                    generation: 0,
                    all_rows: Vec::new(),
                    criteria: S::Criteria::default(),
                    task: None,
                }),
                published,
            }),
            retry,
        }
    }

    /// Start loading, cancelling any load already in flight.
    ///
    /// The state is Loading when this returns. Must be called from within a
    /// Tokio runtime.
    pub fn load(&self) -> LoadHandle {
        let generation = {
            let mut inner = self.shared.lock();
            inner.generation += 1;
            if let Some(task) = inner.task.take() {
                task.abort();
            }

            if let Some(reason) = self.shared.source.rejection() {
                self.shared.publish_state(LoadingState::Error(reason));
                return LoadHandle::finished();
            }

            self.shared.publish_state(LoadingState::Loading);
            inner.generation
        };

        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(shared.run(generation, self.retry));

        let mut inner = self.shared.lock();
        if inner.generation != generation {
            // A racing load or cancel moved on before this task was tracked
            handle.abort();
        } else if !handle.is_finished() {
            inner.task = Some(handle.abort_handle());
        }

        LoadHandle(Some(handle))
    }

    /// Stop any in-flight load. The published state is left as it is.
    pub fn cancel(&self) {
        let mut inner = self.shared.lock();
        inner.generation += 1;
        if let Some(task) = inner.task.take() {
            task.abort();
        }
    }

    /// Replace the filter criteria and republish without refetching.
    ///
    /// Before the first load, and while a fetch or retry wait is in flight,
    /// the criteria are only recorded for the next successful load.
    pub fn apply_filter(&self, criteria: S::Criteria) {
        self.shared.apply_filter(criteria);
    }

    /// Current filter criteria.
    pub fn criteria(&self) -> S::Criteria {
        self.shared.lock().criteria.clone()
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<S::Row>> {
        self.shared.published.subscribe()
    }

    /// Current state and rows.
    pub fn snapshot(&self) -> Snapshot<S::Row> {
        self.shared.published.borrow().clone()
    }

    pub fn state(&self) -> LoadingState {
        self.shared.published.borrow().state.clone()
    }

    pub fn source(&self) -> &S {
        &self.shared.source
    }

    pub(crate) fn shared(&self) -> Arc<Shared<S>> {
        Arc::clone(&self.shared)
    }
}

impl<S: ListSource> Drop for ListController<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}
