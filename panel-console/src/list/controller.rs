use super::{page_count, PageRequest, PageResult, Resource, ResourceFetcher};
use crate::client::ClientError;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// What happened to a fetch once its response arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the displayed page
    Applied { len: usize, total: u64 },
    /// A newer fetch was issued meanwhile; the response was dropped
    Stale { generation: u64 },
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied { .. })
    }
}

/// Point-in-time copy of a list's state, for rendering
#[derive(Debug, Clone)]
pub struct ListSnapshot<T, F> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub page_count: u32,
    pub filters: F,
    pub loading: bool,
    pub error: Option<String>,
    pub selected: Vec<i64>,
    /// Generation of the fetch whose data is displayed (0 = never loaded)
    pub generation: u64,
}

impl<T, F> ListSnapshot<T, F> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) * u64::from(self.size) < self.total
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

struct ListState<T, F> {
    pagination: PageRequest,
    filters: F,
    result: PageResult<T>,
    loading: bool,
    error: Option<String>,
    selection: BTreeSet<i64>,
    /// Latest generation handed out to a fetch
    issued: u64,
    /// Generation whose response is currently displayed
    applied: u64,
}

/// Controller for one paginated, filterable list.
///
/// Clones share state, so any task holding a clone can navigate or refresh.
/// The state lock is never held across a fetch; each fetch is tagged with a
/// generation and only the most recently issued one may update the list.
pub struct ResourceList<T, F, R> {
    fetcher: Arc<R>,
    initial: PageRequest,
    state: Arc<Mutex<ListState<T, F>>>,
}

impl<T, F, R> Clone for ResourceList<T, F, R> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            initial: self.initial,
            state: Arc::clone(&self.state),
        }
    }
}

impl<T, F, R> ResourceList<T, F, R>
where
    T: Resource + Clone + Send + 'static,
    F: Clone + Send + 'static,
    R: ResourceFetcher<T, F>,
{
    /// Create a list; nothing is fetched until the first `refresh()`
    pub fn new(fetcher: R, initial: PageRequest, filters: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            initial,
            state: Arc::new(Mutex::new(ListState {
                pagination: initial,
                filters,
                result: PageResult::empty(),
                loading: false,
                error: None,
                selection: BTreeSet::new(),
                issued: 0,
                applied: 0,
            })),
        }
    }

    /// Re-fetch the current page with the current filters
    pub async fn refresh(&self) -> Result<FetchOutcome, ClientError> {
        self.fetch_with(|_, _| {}).await
    }

    /// Go back to the initial pagination and re-fetch; filters are kept
    pub async fn reset(&self) -> Result<FetchOutcome, ClientError> {
        let initial = self.initial;
        self.fetch_with(move |pagination, _| *pagination = initial)
            .await
    }

    /// Jump to a page (0 is treated as 1)
    pub async fn set_page(&self, page: u32) -> Result<FetchOutcome, ClientError> {
        self.fetch_with(move |pagination, _| *pagination = pagination.at(page))
            .await
    }

    /// Change the page size; goes back to the first page
    pub async fn set_page_size(&self, size: u32) -> Result<FetchOutcome, ClientError> {
        self.fetch_with(move |pagination, _| *pagination = pagination.resized(size))
            .await
    }

    /// Advance one page, or do nothing when already on the last page
    pub async fn next_page(&self) -> Result<Option<FetchOutcome>, ClientError> {
        let snapshot = self.snapshot_meta().await;
        if !snapshot.has_next {
            return Ok(None);
        }
        self.set_page(snapshot.page + 1).await.map(Some)
    }

    /// Go back one page, or do nothing on the first page
    pub async fn previous_page(&self) -> Result<Option<FetchOutcome>, ClientError> {
        let snapshot = self.snapshot_meta().await;
        if snapshot.page <= 1 {
            return Ok(None);
        }
        self.set_page(snapshot.page - 1).await.map(Some)
    }

    /// Replace the filters and fetch the first page
    pub async fn set_filters(&self, filters: F) -> Result<FetchOutcome, ClientError> {
        self.fetch_with(move |pagination, current| {
            *current = filters;
            *pagination = pagination.at(1);
        })
        .await
    }

    /// Edit the filters in place and fetch the first page
    pub async fn update_filters<U>(&self, update: U) -> Result<FetchOutcome, ClientError>
    where
        U: FnOnce(&mut F) + Send,
    {
        self.fetch_with(move |pagination, filters| {
            update(filters);
            *pagination = pagination.at(1);
        })
        .await
    }

    /// Current filters
    pub async fn filters(&self) -> F {
        self.state.lock().await.filters.clone()
    }

    /// Current pagination
    pub async fn pagination(&self) -> PageRequest {
        self.state.lock().await.pagination
    }

    pub async fn snapshot(&self) -> ListSnapshot<T, F> {
        let state = self.state.lock().await;
        ListSnapshot {
            items: state.result.list.clone(),
            total: state.result.total,
            page: state.pagination.page(),
            size: state.pagination.size(),
            page_count: page_count(state.result.total, state.pagination.size()),
            filters: state.filters.clone(),
            loading: state.loading,
            error: state.error.clone(),
            selected: state.selection.iter().copied().collect(),
            generation: state.applied,
        }
    }

    /// Select a displayed row for a batch action; returns false if it is not on the page
    pub async fn select(&self, id: i64) -> bool {
        let mut state = self.state.lock().await;
        if state.result.list.iter().any(|item| item.id() == id) {
            state.selection.insert(id);
            true
        } else {
            false
        }
    }

    pub async fn deselect(&self, id: i64) {
        self.state.lock().await.selection.remove(&id);
    }

    /// Flip the selection of a displayed row; returns whether it is now selected
    pub async fn toggle_selection(&self, id: i64) -> bool {
        let mut state = self.state.lock().await;
        if state.selection.remove(&id) {
            return false;
        }
        if state.result.list.iter().any(|item| item.id() == id) {
            state.selection.insert(id);
            return true;
        }
        false
    }

    pub async fn select_all_visible(&self) {
        let mut state = self.state.lock().await;
        let ids: Vec<i64> = state.result.list.iter().map(Resource::id).collect();
        state.selection.extend(ids);
    }

    pub async fn clear_selection(&self) {
        self.state.lock().await.selection.clear();
    }

    pub async fn selected_ids(&self) -> Vec<i64> {
        self.state.lock().await.selection.iter().copied().collect()
    }

    async fn snapshot_meta(&self) -> PageMeta {
        let state = self.state.lock().await;
        PageMeta {
            page: state.pagination.page(),
            has_next: u64::from(state.pagination.page()) * u64::from(state.pagination.size())
                < state.result.total,
        }
    }

    async fn fetch_with<M>(&self, mutate: M) -> Result<FetchOutcome, ClientError>
    where
        M: FnOnce(&mut PageRequest, &mut F) + Send,
    {
        let outcome = self.fetch_once(mutate).await?;

        // A page can vanish under us, e.g. after deleting the last row of the
        // last page. Step back to the last page that still exists.
        if outcome.is_applied() {
            if let Some(last) = self.vanished_page().await {
                debug!("Page no longer exists, moving to page {}", last);
                return self
                    .fetch_once(move |pagination, _| *pagination = pagination.at(last))
                    .await;
            }
        }
        Ok(outcome)
    }

    /// The requested pagination and filters are only stored once the fetch
    /// for them succeeds, so the snapshot always describes the displayed page.
    async fn fetch_once<M>(&self, mutate: M) -> Result<FetchOutcome, ClientError>
    where
        M: FnOnce(&mut PageRequest, &mut F) + Send,
    {
        let (generation, page, filters) = {
            let mut state = self.state.lock().await;
            let mut page = state.pagination;
            let mut filters = state.filters.clone();
            mutate(&mut page, &mut filters);
            state.issued += 1;
            state.loading = true;
            (state.issued, page, filters)
        };
        let mut guard = LoadingGuard {
            state: Arc::clone(&self.state),
            generation,
            armed: true,
        };

        debug!(
            "Fetching page {} (size {}), generation {}",
            page.page(),
            page.size(),
            generation
        );
        let result = self.fetcher.fetch(page, filters.clone()).await;

        let mut state = self.state.lock().await;
        guard.armed = false;
        if generation != state.issued {
            debug!(
                "Discarding stale response for generation {} (latest is {})",
                generation, state.issued
            );
            return Ok(FetchOutcome::Stale { generation });
        }
        state.loading = false;

        match result {
            Ok(mut result) => {
                let size = page.size() as usize;
                if result.list.len() > size {
                    warn!(
                        "Backend returned {} items for a page of {}, truncating",
                        result.list.len(),
                        size
                    );
                    result.list.truncate(size);
                }
                let outcome = FetchOutcome::Applied {
                    len: result.list.len(),
                    total: result.total,
                };
                let visible: BTreeSet<i64> = result.list.iter().map(Resource::id).collect();
                state.selection.retain(|id| visible.contains(id));
                state.result = result;
                state.pagination = page;
                state.filters = filters;
                state.error = None;
                state.applied = generation;
                Ok(outcome)
            }
            Err(err) => {
                warn!("Failed to fetch page {}: {}", page.page(), err);
                state.error = Some(err.message());
                Err(err)
            }
        }
    }

    /// Last existing page when the displayed page came back empty past the end
    async fn vanished_page(&self) -> Option<u32> {
        let state = self.state.lock().await;
        let page = state.pagination.page();
        if page <= 1 || !state.result.list.is_empty() || state.result.total == 0 {
            return None;
        }
        let last = page_count(state.result.total, state.pagination.size());
        (last < page).then_some(last)
    }
}

struct PageMeta {
    page: u32,
    has_next: bool,
}

/// Clears the loading flag when a fetch future is dropped before its
/// response arrives, e.g. when the caller times out.
struct LoadingGuard<T: Send + 'static, F: Send + 'static> {
    state: Arc<Mutex<ListState<T, F>>>,
    generation: u64,
    armed: bool,
}

impl<T: Send + 'static, F: Send + 'static> Drop for LoadingGuard<T, F> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        debug!("Fetch for generation {} was cancelled", self.generation);
        let generation = self.generation;
        match self.state.try_lock() {
            Ok(mut state) => {
                if state.issued == generation {
                    state.loading = false;
                }
            }
            Err(_) => {
                if let Ok(handle) = tokio::runtime::Handle::try_current() {
                    let state = Arc::clone(&self.state);
                    handle.spawn(async move {
                        let mut state = state.lock().await;
                        if state.issued == generation {
                            state.loading = false;
                        }
                    });
                }
            }
        }
    }
}
