use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use serde::Serialize;
use shared::{
    domain::{FetchStatus, FilterState, ProductSummary, SortOption},
    protocol::ProductsQuery,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

pub mod api;
pub mod credentials;
pub mod error;
pub mod filter_panel;
pub mod view;

pub use api::{CatalogApi, HttpCatalogApi};
pub use credentials::{
    CredentialStore, FileCredentialStore, MissingCredentialStore, StaticCredentialStore,
};
pub use error::CatalogError;
pub use filter_panel::{FilterPanel, FilterPanelCallbacks};
pub use view::{select_view, CatalogView, SortControl, SortControlCallbacks, ViewKind};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Upper bound on a single product request; expiry settles as failed.
    pub request_timeout: Duration,
    /// `None` issues one refresh per search edit. `Some(window)` waits for the
    /// window to pass without a newer edit before refreshing.
    pub search_debounce: Option<Duration>,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            search_debounce: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Settled(FetchStatus),
    /// A newer refresh was issued while this one was in flight; its response
    /// was dropped.
    Stale {
        request_id: u64,
        latest_request_id: u64,
    },
    /// A newer search edit arrived inside the debounce window.
    Debounced,
}

#[derive(Debug, Clone)]
pub enum CatalogEvent {
    RefreshStarted {
        request_id: u64,
        query: ProductsQuery,
    },
    RefreshSettled {
        request_id: u64,
        status: FetchStatus,
        product_count: usize,
    },
    StaleResponseDiscarded {
        request_id: u64,
        latest_request_id: u64,
    },
    /// Diagnostic detail for logs and subscribers; never shown in a view.
    FetchFailed {
        request_id: u64,
        reason: String,
        /// The API rejected the bearer token; a new one is needed.
        reauth_required: bool,
    },
    FilterRejected {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    pub filters: FilterState,
    pub status: FetchStatus,
    pub products: Vec<ProductSummary>,
    pub latest_request_id: u64,
}

struct ControllerState {
    filters: FilterState,
    status: FetchStatus,
    products: Vec<ProductSummary>,
    latest_request_id: u64,
    search_generation: u64,
}

impl ControllerState {
    fn reset(&mut self) {
        self.filters = FilterState::default();
        self.search_generation += 1;
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            filters: FilterState::default(),
            status: FetchStatus::Pending,
            products: Vec::new(),
            latest_request_id: 0,
            search_generation: 0,
        }
    }
}

/// Owns the filter state and drives the fetch cycle.
///
/// State lives behind a std mutex that is never held across an await, so the
/// synchronous callback contracts can apply edits in call order and only the
/// refresh itself runs on the runtime.
pub struct CatalogController {
    api: Arc<dyn CatalogApi>,
    credentials: Arc<dyn CredentialStore>,
    settings: ControllerSettings,
    inner: Mutex<ControllerState>,
    events: broadcast::Sender<CatalogEvent>,
}

impl CatalogController {
    pub fn new(api: Arc<dyn CatalogApi>, credentials: Arc<dyn CredentialStore>) -> Arc<Self> {
        Self::new_with_settings(api, credentials, ControllerSettings::default())
    }

    pub fn new_with_settings(
        api: Arc<dyn CatalogApi>,
        credentials: Arc<dyn CredentialStore>,
        settings: ControllerSettings,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            api,
            credentials,
            settings,
            inner: Mutex::new(ControllerState::default()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        let state = self.lock_state();
        CatalogSnapshot {
            filters: state.filters.clone(),
            status: state.status,
            products: state.products.clone(),
            latest_request_id: state.latest_request_id,
        }
    }

    pub fn filters(&self) -> FilterState {
        self.lock_state().filters.clone()
    }

    pub fn status(&self) -> FetchStatus {
        self.lock_state().status
    }

    pub fn products(&self) -> Vec<ProductSummary> {
        self.lock_state().products.clone()
    }

    pub fn latest_request_id(&self) -> u64 {
        self.lock_state().latest_request_id
    }

    pub fn view(&self) -> CatalogView {
        CatalogView::from_snapshot(&self.snapshot())
    }

    pub async fn initialize(&self) -> RefreshOutcome {
        {
            let mut state = self.lock_state();
            state.reset();
            state.status = FetchStatus::Pending;
            state.products.clear();
        }
        self.refresh().await
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        let (request_id, query) = {
            let mut state = self.lock_state();
            state.latest_request_id += 1;
            state.status = FetchStatus::Pending;
            (state.latest_request_id, ProductsQuery::from(&state.filters))
        };

        info!(
            request_id,
            sort_by = %query.sort_by,
            category = %query.category,
            title_search = %query.title_search,
            rating = %query.rating,
            "refreshing products"
        );
        self.emit(CatalogEvent::RefreshStarted {
            request_id,
            query: query.clone(),
        });

        let token = self.credentials.bearer_token();
        if token.is_none() {
            debug!(request_id, "no bearer token stored; requesting without credentials");
        }

        let result = match tokio::time::timeout(
            self.settings.request_timeout,
            self.api.fetch_products(&query, token.as_deref()),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(CatalogError::Timeout(self.settings.request_timeout)),
        };

        let (status, product_count, failure) = {
            let mut state = self.lock_state();
            if state.latest_request_id != request_id {
                let latest_request_id = state.latest_request_id;
                drop(state);
                debug!(request_id, latest_request_id, "discarding stale product response");
                self.emit(CatalogEvent::StaleResponseDiscarded {
                    request_id,
                    latest_request_id,
                });
                return RefreshOutcome::Stale {
                    request_id,
                    latest_request_id,
                };
            }

            let failure = match result {
                Ok(records) if records.is_empty() => {
                    state.products.clear();
                    state.status = FetchStatus::Empty;
                    None
                }
                Ok(records) => {
                    state.products = records.into_iter().map(ProductSummary::from).collect();
                    state.status = FetchStatus::Ready;
                    None
                }
                Err(err) => {
                    state.products.clear();
                    state.status = FetchStatus::Failed;
                    Some(err)
                }
            };
            (state.status, state.products.len(), failure)
        };

        if let Some(err) = failure {
            let reauth_required = err.requires_reauth();
            warn!(request_id, reauth_required, %err, "product fetch failed");
            self.emit(CatalogEvent::FetchFailed {
                request_id,
                reason: err.to_string(),
                reauth_required,
            });
        }
        info!(request_id, %status, product_count, "refresh settled");
        self.emit(CatalogEvent::RefreshSettled {
            request_id,
            status,
            product_count,
        });

        RefreshOutcome::Settled(status)
    }

    pub async fn set_sort(&self, option_id: &str) -> Result<RefreshOutcome, CatalogError> {
        self.apply_sort(option_id)?;
        Ok(self.refresh().await)
    }

    pub async fn set_title_search(&self, text: &str) -> RefreshOutcome {
        let generation = self.apply_title_search(text);
        self.refresh_after_search_edit(generation).await
    }

    pub async fn set_category(&self, category_id: &str) -> RefreshOutcome {
        self.apply_category(category_id);
        self.refresh().await
    }

    pub async fn set_rating(&self, rating_id: &str) -> RefreshOutcome {
        self.apply_rating(rating_id);
        self.refresh().await
    }

    pub async fn clear_filters(&self) -> RefreshOutcome {
        self.apply_clear();
        self.refresh().await
    }

    /// Replaces every filter dimension at once without refreshing. Pending
    /// debounced searches are superseded.
    pub fn replace_filters(&self, filters: FilterState) {
        let mut state = self.lock_state();
        state.filters = filters;
        state.search_generation += 1;
    }

    fn apply_sort(&self, option_id: &str) -> Result<(), CatalogError> {
        match option_id.parse::<SortOption>() {
            Ok(sort_option) => {
                self.lock_state().filters.sort_option = sort_option;
                Ok(())
            }
            Err(err) => {
                warn!(option_id, "rejecting unknown sort option");
                self.emit(CatalogEvent::FilterRejected {
                    reason: err.to_string(),
                });
                Err(CatalogError::InvalidSortOption(err.0))
            }
        }
    }

    fn apply_title_search(&self, text: &str) -> u64 {
        let mut state = self.lock_state();
        state.filters.title_search = text.to_string();
        state.search_generation += 1;
        state.search_generation
    }

    fn apply_category(&self, category_id: &str) {
        self.lock_state().filters.category = category_id.to_string();
    }

    fn apply_rating(&self, rating_id: &str) {
        self.lock_state().filters.rating = rating_id.to_string();
    }

    fn apply_clear(&self) {
        self.lock_state().reset();
    }

    async fn refresh_after_search_edit(&self, generation: u64) -> RefreshOutcome {
        if let Some(window) = self.settings.search_debounce {
            tokio::time::sleep(window).await;
            let current = self.lock_state().search_generation;
            if current != generation {
                debug!(generation, current, "search edit superseded during debounce");
                return RefreshOutcome::Debounced;
            }
        }
        self.refresh().await
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: CatalogEvent) {
        let _ = self.events.send(event);
    }
}

/// Edits are applied synchronously in call order; the refresh they trigger is
/// spawned on the current runtime so a new edit never waits for an older
/// request. Must be called from within a tokio runtime.
impl FilterPanelCallbacks for Arc<CatalogController> {
    fn on_search_change(&self, text: &str) {
        let generation = self.apply_title_search(text);
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            controller.refresh_after_search_edit(generation).await;
        });
    }

    fn on_category_change(&self, category_id: &str) {
        self.apply_category(category_id);
        spawn_refresh(self);
    }

    fn on_rating_change(&self, rating_id: &str) {
        self.apply_rating(rating_id);
        spawn_refresh(self);
    }

    fn on_clear_filters(&self) {
        self.apply_clear();
        spawn_refresh(self);
    }
}

impl SortControlCallbacks for Arc<CatalogController> {
    fn on_sort_change(&self, option_id: &str) {
        if self.apply_sort(option_id).is_ok() {
            spawn_refresh(self);
        }
    }
}

fn spawn_refresh(controller: &Arc<CatalogController>) {
    let controller = Arc::clone(controller);
    tokio::spawn(async move {
        controller.refresh().await;
    });
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod api_tests;
