//! The list/filter/paginate controller.
//!
//! One generic state machine replaces the per-page copies of the same
//! pattern: hold filter state and a page cursor, refetch on every
//! change, and only ever show the response that matches the *latest*
//! dependency state.
//!
//! Filters and cursor form a single composite dependency. Every change
//! bumps a generation counter and issues exactly one fetch; a result
//! commits only if its generation is still current, so a stale request
//! that resolves late is discarded no matter what order responses
//! arrive in. State is published on a `watch` channel -- UIs subscribe,
//! one-shot consumers await [`ListController::settled`].

use std::future::Future;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, warn};

use bandly_api::Error as ApiError;
use bandly_api::types::{ListQuery, Page, PageCursor};

// ── Fetcher seam ─────────────────────────────────────────────────────

/// One resource's list operation, as seen by the controller.
///
/// Implementations are thin adapters over the stateless API modules;
/// see [`listers`](crate::listers). Test code scripts this trait
/// directly.
pub trait ResourceLister: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    fn fetch(
        &self,
        query: ListQuery,
    ) -> impl Future<Output = Result<Page<Self::Item>, ApiError>> + Send;
}

// ── Published state ──────────────────────────────────────────────────

/// Lifecycle phase of the current dependency state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// No fetch issued yet.
    Idle,
    /// A fetch for the current dependencies is in flight.
    Loading,
    /// The latest fetch committed. An empty `items` here is the
    /// distinct "no results" state, not a failure.
    Loaded,
    /// The latest fetch failed; the previous list (if any) is retained.
    Failed,
}

/// Snapshot of controller state, published on every transition.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub phase: LoadPhase,
    /// Most recently committed page. Retained across `Failed` so the UI
    /// can keep showing data beside the error.
    pub list: Option<Arc<Page<T>>>,
    /// Display message for the latest failure.
    pub error: Option<String>,
    /// The dependency state this snapshot belongs to.
    pub query: ListQuery,
}

impl<T> ListState<T> {
    fn idle(query: ListQuery) -> Self {
        Self {
            phase: LoadPhase::Idle,
            list: None,
            error: None,
            query,
        }
    }

    /// Loaded with zero items: offer "clear filters", not "retry".
    pub fn is_empty_result(&self) -> bool {
        self.phase == LoadPhase::Loaded
            && self.list.as_ref().is_some_and(|page| page.is_empty())
    }
}

// ── Controller ───────────────────────────────────────────────────────

/// Generic list controller for one page's resource collection.
///
/// Cheaply cloneable; all clones share the same state. Each page owns
/// its own controller -- filter state is never shared across pages.
pub struct ListController<L: ResourceLister> {
    inner: Arc<ListInner<L>>,
}

impl<L: ResourceLister> Clone for ListController<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ListInner<L: ResourceLister> {
    lister: L,
    /// The composite dependency: filters + cursor.
    deps: Mutex<ListQuery>,
    /// Bumped on every dependency change; identifies the only fetch
    /// allowed to commit.
    generation: AtomicU64,
    state: watch::Sender<ListState<L::Item>>,
}

impl<L: ResourceLister> ListController<L> {
    /// Create an idle controller with default filters.
    pub fn new(lister: L, page_size: u32) -> Self {
        let query = ListQuery {
            filters: bandly_api::types::Filters::new(),
            cursor: PageCursor::new(1, page_size),
        };
        let (state, _) = watch::channel(ListState::idle(query.clone()));

        Self {
            inner: Arc::new(ListInner {
                lister,
                deps: Mutex::new(query),
                generation: AtomicU64::new(0),
                state,
            }),
        }
    }

    // ── State observation ────────────────────────────────────────────

    /// Subscribe to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<ListState<L::Item>> {
        self.inner.state.subscribe()
    }

    /// State transitions as a `Stream`, for `StreamExt` consumers.
    pub fn state_stream(&self) -> WatchStream<ListState<L::Item>> {
        WatchStream::new(self.subscribe())
    }

    /// Current state snapshot.
    pub fn state(&self) -> ListState<L::Item> {
        self.inner.state.borrow().clone()
    }

    /// Current dependency state.
    pub fn query(&self) -> ListQuery {
        self.inner.deps.lock().expect("filter state lock poisoned").clone()
    }

    /// Wait until the controller is not `Loading` and return the state.
    pub async fn settled(&self) -> ListState<L::Item> {
        let mut rx = self.inner.state.subscribe();
        loop {
            let current = rx.borrow_and_update().clone();
            if current.phase != LoadPhase::Loading {
                return current;
            }
            if rx.changed().await.is_err() {
                return current;
            }
        }
    }

    // ── Dependency mutations (each issues exactly one fetch) ─────────

    /// Set or clear a field constraint. Resets the cursor to page 1.
    pub fn set_filter(&self, key: &str, value: &str) {
        self.update(|q| {
            q.filters.set(key, value);
            q.cursor.page = 1;
        });
    }

    /// Set or clear the search term. Resets the cursor to page 1.
    pub fn set_search(&self, term: &str) {
        self.update(|q| {
            q.filters.set_search(term);
            q.cursor.page = 1;
        });
    }

    /// Drop every constraint (the empty-state affordance).
    pub fn clear_filters(&self) {
        self.update(|q| {
            q.filters.clear();
            q.cursor.page = 1;
        });
    }

    /// Move to a page (clamped to >= 1; upper clamp happens on commit).
    pub fn set_page(&self, page: u32) {
        self.update(|q| q.cursor.page = page.max(1));
    }

    pub fn set_page_size(&self, page_size: u32) {
        self.update(|q| {
            q.cursor.page_size = page_size.max(1);
            q.cursor.page = 1;
        });
    }

    /// Apply one composite change to filters and cursor, then fetch
    /// once. This is the batch form of the setters above.
    pub fn update(&self, mutate: impl FnOnce(&mut ListQuery)) {
        {
            let mut deps = self.inner.deps.lock().expect("filter state lock poisoned");
            mutate(&mut deps);
        }
        ListInner::spawn_fetch(&self.inner);
    }

    /// Re-issue the fetch for the current dependencies unchanged.
    /// Used by the retry affordance and by mutation-triggered refresh.
    pub fn refetch(&self) {
        ListInner::spawn_fetch(&self.inner);
    }

    /// Alias for the failure-state affordance.
    pub fn retry(&self) {
        self.refetch();
    }
}

impl<L: ResourceLister> ListInner<L> {
    /// Issue one fetch for the current dependency state.
    ///
    /// Bumps the generation first; whichever task holds the latest
    /// generation at resolution time is the only one allowed to commit.
    fn spawn_fetch(inner: &Arc<Self>) {
        let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = inner
            .deps
            .lock()
            .expect("filter state lock poisoned")
            .clone();

        inner.state.send_modify(|s| {
            s.phase = LoadPhase::Loading;
            s.error = None;
            s.query = query.clone();
        });

        let inner = Arc::clone(inner);
        tokio::spawn(async move {
            let result = inner.lister.fetch(query.clone()).await;

            if inner.generation.load(Ordering::SeqCst) != generation {
                debug!(generation, "discarding stale list response");
                return;
            }

            match result {
                Ok(page) => {
                    let last_valid = page.last_page();
                    let clamp = query.cursor.page > last_valid;

                    inner.state.send_modify(|s| {
                        s.list = Some(Arc::new(page));
                        s.error = None;
                        s.query = query.clone();
                        // A clamped cursor triggers an immediate follow-up
                        // fetch, so stay in Loading until it commits.
                        s.phase = if clamp {
                            LoadPhase::Loading
                        } else {
                            LoadPhase::Loaded
                        };
                    });

                    if clamp {
                        debug!(
                            requested = query.cursor.page,
                            clamped_to = last_valid,
                            "page past end, clamping to last valid page"
                        );
                        inner
                            .deps
                            .lock()
                            .expect("filter state lock poisoned")
                            .cursor
                            .page = last_valid;
                        Self::spawn_fetch(&inner);
                    }
                }
                Err(e) => {
                    warn!(error = %e, "list fetch failed");
                    inner.state.send_modify(|s| {
                        s.phase = LoadPhase::Failed;
                        s.error = Some(e.user_message());
                        s.query = query.clone();
                        // Previous list retained on purpose.
                    });
                }
            }
        });
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// Scripted fetcher: per-query delay and result, with a call counter.
    struct Scripted<F> {
        calls: Arc<AtomicUsize>,
        script: F,
    }

    impl<F> ResourceLister for Scripted<F>
    where
        F: Fn(&ListQuery) -> (Duration, Result<Page<String>, ApiError>) + Send + Sync + 'static,
    {
        type Item = String;

        fn fetch(
            &self,
            query: ListQuery,
        ) -> impl Future<Output = Result<Page<String>, ApiError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (delay, result) = (self.script)(&query);
            async move {
                tokio::time::sleep(delay).await;
                result
            }
        }
    }

    fn page_of(items: &[&str], page: u32, total_pages: u32) -> Page<String> {
        Page {
            items: items.iter().map(|s| (*s).to_owned()).collect(),
            total: u64::from(total_pages) * 20,
            page,
            page_size: 20,
            total_pages,
        }
    }

    fn controller<F>(script: F) -> (ListController<Scripted<F>>, Arc<AtomicUsize>)
    where
        F: Fn(&ListQuery) -> (Duration, Result<Page<String>, ApiError>) + Send + Sync + 'static,
    {
        let calls = Arc::new(AtomicUsize::new(0));
        let lister = Scripted {
            calls: Arc::clone(&calls),
            script,
        };
        (ListController::new(lister, 20), calls)
    }

    fn server_error() -> ApiError {
        ApiError::Server {
            status: 500,
            code: "SERVER".into(),
            message: "backend exploded".into(),
            details: None,
        }
    }

    #[test]
    fn starts_idle_with_defaults() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        rt.block_on(async {
            let (ctrl, calls) = controller(|_| (Duration::ZERO, Ok(page_of(&[], 1, 1))));
            let state = ctrl.state();
            assert_eq!(state.phase, LoadPhase::Idle);
            assert!(state.list.is_none());
            assert_eq!(calls.load(Ordering::SeqCst), 0);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn filter_change_resets_page_to_one() {
        let (ctrl, _) = controller(|q| {
            (
                Duration::from_millis(1),
                Ok(page_of(&["x"], q.cursor.page, 9)),
            )
        });

        ctrl.set_page(5);
        ctrl.settled().await;
        assert_eq!(ctrl.query().cursor.page, 5);

        ctrl.set_filter("skill", "writing");
        assert_eq!(ctrl.query().cursor.page, 1);

        ctrl.set_page(3);
        ctrl.settled().await;
        ctrl.set_search("essay");
        assert_eq!(ctrl.query().cursor.page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn one_fetch_per_dependency_change() {
        let (ctrl, calls) = controller(|q| {
            (
                Duration::from_millis(1),
                Ok(page_of(&["x"], q.cursor.page, 9)),
            )
        });

        ctrl.set_filter("role", "student");
        ctrl.set_search("kim");
        ctrl.set_page(2);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_is_discarded_even_if_it_resolves_last() {
        // The first query is slow, the second fast: the slow one resolves
        // *after* the fast one and must not overwrite it.
        let (ctrl, _) = controller(|q| match q.filters.search() {
            Some("slow") => (Duration::from_millis(100), Ok(page_of(&["SLOW"], 1, 1))),
            _ => (Duration::from_millis(5), Ok(page_of(&["FAST"], 1, 1))),
        });

        ctrl.set_search("slow");
        ctrl.set_search("fast");

        let state = ctrl.settled().await;
        assert_eq!(state.phase, LoadPhase::Loaded);
        assert_eq!(state.list.as_ref().unwrap().items, vec!["FAST".to_owned()]);

        // Let the slow response land and get discarded.
        tokio::time::sleep(Duration::from_millis(500)).await;
        let state = ctrl.state();
        assert_eq!(state.list.as_ref().unwrap().items, vec!["FAST".to_owned()]);
        assert_eq!(state.query.filters.search(), Some("fast"));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_retains_previous_list_and_retry_recovers() {
        let fail = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let fail_flag = Arc::clone(&fail);

        let (ctrl, _) = controller(move |_| {
            if fail_flag.load(Ordering::SeqCst) {
                (Duration::from_millis(1), Err(server_error()))
            } else {
                (Duration::from_millis(1), Ok(page_of(&["kept"], 1, 1)))
            }
        });

        ctrl.refetch();
        let state = ctrl.settled().await;
        assert_eq!(state.phase, LoadPhase::Loaded);

        fail.store(true, Ordering::SeqCst);
        ctrl.refetch();
        let state = ctrl.settled().await;
        assert_eq!(state.phase, LoadPhase::Failed);
        assert_eq!(state.error.as_deref(), Some("backend exploded"));
        // Previous list still visible beside the error.
        assert_eq!(state.list.as_ref().unwrap().items, vec!["kept".to_owned()]);

        fail.store(false, Ordering::SeqCst);
        ctrl.retry();
        let state = ctrl.settled().await;
        assert_eq!(state.phase, LoadPhase::Loaded);
        assert!(state.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_result_is_loaded_not_failed() {
        let (ctrl, _) = controller(|_| (Duration::from_millis(1), Ok(page_of(&[], 1, 1))));

        ctrl.set_search("no such course");
        let state = ctrl.settled().await;

        assert_eq!(state.phase, LoadPhase::Loaded);
        assert!(state.is_empty_result());
        assert!(state.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_filters_resets_everything() {
        let (ctrl, _) = controller(|q| {
            let items: &[&str] = if q.filters.is_empty() { &["all"] } else { &[] };
            (Duration::from_millis(1), Ok(page_of(items, 1, 1)))
        });

        ctrl.set_filter("skill", "reading");
        ctrl.set_search("cambridge");
        let state = ctrl.settled().await;
        assert!(state.is_empty_result());

        ctrl.clear_filters();
        let state = ctrl.settled().await;
        assert!(!state.is_empty_result());
        assert!(ctrl.query().filters.is_empty());
        assert_eq!(ctrl.query().cursor.page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn page_past_end_clamps_to_last_valid_page_and_refetches() {
        // Page 3 no longer exists (e.g. its only item was deleted):
        // the server reports totalPages = 2.
        let (ctrl, calls) = controller(|q| {
            let page = q.cursor.page;
            if page > 2 {
                (Duration::from_millis(1), Ok(page_of(&[], page, 2)))
            } else {
                (Duration::from_millis(1), Ok(page_of(&["tail"], page, 2)))
            }
        });

        ctrl.set_page(3);
        let state = ctrl.settled().await;

        assert_eq!(state.phase, LoadPhase::Loaded);
        assert_eq!(ctrl.query().cursor.page, 2);
        assert_eq!(state.list.as_ref().unwrap().items, vec!["tail".to_owned()]);
        // One fetch for page 3, one follow-up for page 2.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn refetch_keeps_the_dependency_state_unchanged() {
        let (ctrl, calls) = controller(|q| {
            (
                Duration::from_millis(1),
                Ok(page_of(&["a"], q.cursor.page, 5)),
            )
        });

        ctrl.set_filter("status", "published");
        ctrl.settled().await;
        ctrl.set_page(4);
        ctrl.settled().await;
        let before = ctrl.query();
        let calls_before = calls.load(Ordering::SeqCst);

        ctrl.refetch();
        ctrl.settled().await;

        assert_eq!(ctrl.query(), before);
        assert_eq!(calls.load(Ordering::SeqCst), calls_before + 1);
    }
}
