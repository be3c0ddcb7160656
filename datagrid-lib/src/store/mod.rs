//! List-view store
//!
//! [`ListViewStore`] owns the state of one list view: the rows of the current
//! page, the page count, a loading flag and the row selection. It observes
//! the caller's page and locale cells and fetches through a
//! [`ResourceClient`] whenever they change.
//!
//! Every dispatched request gets a token from a per-store counter. A response
//! is only written to the store if its token is still the latest one when it
//! arrives and the store has not been destroyed, so a slow response can
//! never overwrite the result of a newer request.

mod builder;
mod config;
mod request;

pub use builder::*;
pub use config::*;
pub use request::*;

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::Weak;

use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::builder::Missing;
use crate::cell::Cell;
use crate::cell::Subscription;
use crate::client::ResourceClient;
use crate::error::Error;
use crate::metadata::FieldMap;
use crate::metadata::MetadataProvider;
use crate::model::PageResult;
use crate::model::Row;
use crate::model::RowId;
use crate::query::ListQuery;
use crate::selection::Selection;

/// Reactive store behind one list view.
///
/// # Example
///
/// ```ignore
/// use datagrid_lib::{Cell, ListViewConfig, ListViewStore};
///
/// let page = Cell::new(None);
/// let store = ListViewStore::builder("snippets")
///     .config(ListViewConfig::new(page.clone()))
///     .client(client)
///     .metadata(metadata)
///     .build()?;
///
/// page.set(Some(1)); // dispatches GET .../snippets?page=1
/// store.wait_until_idle().await;
///
/// store.select_entire_page();
/// println!("{} rows, {} selected", store.data().len(), store.selections().len());
///
/// store.destroy();
/// ```
pub struct ListViewStore {
    inner: Arc<StoreInner>,
    subscriptions: Mutex<Vec<Subscription>>,
}

struct StoreInner {
    resource_key: String,
    page: Cell<Option<u32>>,
    locale: Option<Cell<Option<String>>>,
    client: Arc<dyn ResourceClient>,
    metadata: Arc<dyn MetadataProvider>,
    runtime: Handle,

    /// Guards token assignment and response application.
    fetch: Mutex<FetchState>,

    loading: Cell<bool>,
    data: Cell<Vec<Row>>,
    page_count: Cell<u32>,
    selections: Cell<Selection>,
    last_error: Cell<Option<String>>,
}

#[derive(Debug, Default)]
struct FetchState {
    /// Token of the most recently dispatched request; 0 before the first one.
    latest: u64,
    destroyed: bool,
}

/// Output cells written while applying a response, notified after unlocking.
#[derive(Default)]
struct Changed {
    loading: bool,
    data: bool,
    page_count: bool,
    last_error: bool,
}

impl ListViewStore {
    /// Creates a new builder for a list of `resource_key`.
    pub fn builder(
        resource_key: impl Into<String>,
    ) -> ListViewStoreBuilder<Missing, Missing, Missing> {
        ListViewStoreBuilder::new(resource_key)
    }

    fn new(
        resource_key: String,
        config: ListViewConfig,
        client: Arc<dyn ResourceClient>,
        metadata: Arc<dyn MetadataProvider>,
        runtime: Handle,
    ) -> Self {
        let inner = Arc::new(StoreInner {
            resource_key,
            page: config.page,
            locale: config.locale,
            client,
            metadata,
            runtime,
            fetch: Mutex::new(FetchState::default()),
            loading: Cell::new(false),
            data: Cell::new(Vec::new()),
            page_count: Cell::new(0),
            selections: Cell::new(Selection::new()),
            last_error: Cell::new(None),
        });

        let store = Self {
            subscriptions: Mutex::new(observe_inputs(&inner)),
            inner,
        };
        log::debug!("{}: store created", store.inner.resource_key);
        store
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Fetches the current page, whether or not the inputs changed.
    ///
    /// `loading` is `true` when this returns. The returned handle can be
    /// awaited to learn whether the response was applied and to receive the
    /// resource client's error, if any. After [`destroy`](Self::destroy)
    /// nothing is sent and the handle reports [`RequestOutcome::Discarded`].
    pub fn send_request(&self) -> RequestHandle {
        self.inner.dispatch()
    }

    /// Sets the loading flag directly.
    pub fn set_loading(&self, loading: bool) {
        self.inner.loading.set(loading);
    }

    /// Returns the query the next request would carry.
    pub fn query(&self) -> ListQuery {
        self.inner.query()
    }

    /// Returns the field definitions of this store's resource, exactly as
    /// the metadata provider returned them.
    pub fn get_fields(&self) -> FieldMap {
        self.inner.metadata.get_fields(&self.inner.resource_key)
    }

    // =========================================================================
    // State accessors
    // =========================================================================

    /// Returns the resource key this store lists.
    pub fn resource_key(&self) -> &str {
        &self.inner.resource_key
    }

    /// Returns `true` while the latest request has not resolved.
    pub fn loading(&self) -> bool {
        self.inner.loading.get()
    }

    /// Returns the rows of the most recently applied page.
    pub fn data(&self) -> Vec<Row> {
        self.inner.data.get()
    }

    /// Returns the page count of the most recently applied page (0 if the
    /// backend did not report one).
    pub fn page_count(&self) -> u32 {
        self.inner.page_count.get()
    }

    /// Returns the selected row IDs in selection order.
    pub fn selections(&self) -> Selection {
        self.inner.selections.get()
    }

    /// Returns the message of the latest request's failure, if it failed.
    ///
    /// Cleared when a later request succeeds.
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error.get()
    }

    /// Watches the loading flag.
    pub fn watch_loading(&self) -> watch::Receiver<bool> {
        self.inner.loading.watch()
    }

    /// Watches the current page's rows.
    pub fn watch_data(&self) -> watch::Receiver<Vec<Row>> {
        self.inner.data.watch()
    }

    /// Watches the page count.
    pub fn watch_page_count(&self) -> watch::Receiver<u32> {
        self.inner.page_count.watch()
    }

    /// Watches the selection.
    pub fn watch_selections(&self) -> watch::Receiver<Selection> {
        self.inner.selections.watch()
    }

    /// Waits until no request is loading.
    ///
    /// Resolves immediately if nothing is loading. If the loading flag is
    /// never reset (e.g. the store was destroyed mid-request) this never
    /// resolves; wrap it in a timeout where that matters.
    pub async fn wait_until_idle(&self) {
        self.inner.loading.wait_for(|loading| !loading).await;
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Selects a row unless it already is.
    pub fn select(&self, id: impl Into<RowId>) {
        let id = id.into();
        self.inner.selections.modify(|selection| selection.select(id));
    }

    /// Deselects a row if it is selected.
    pub fn deselect(&self, id: impl Into<RowId>) {
        let id = id.into();
        self.inner.selections.modify(|selection| selection.deselect(&id));
    }

    /// Selects every row of the current page, appending them in row order
    /// after the existing selection.
    pub fn select_entire_page(&self) {
        let ids = self.page_ids();
        self.inner
            .selections
            .modify(|selection| !selection.select_all(ids).is_empty());
    }

    /// Deselects every row of the current page; selections made on other
    /// pages are kept.
    pub fn deselect_entire_page(&self) {
        let ids = self.page_ids();
        self.inner
            .selections
            .modify(|selection| !selection.deselect_all(ids).is_empty());
    }

    /// Deselects everything.
    pub fn clear_selection(&self) {
        self.inner
            .selections
            .modify(|selection| !selection.clear().is_empty());
    }

    /// Replaces the whole selection, dropping duplicate IDs.
    pub fn set_selections<I, T>(&self, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<RowId>,
    {
        let selection: Selection = ids.into_iter().map(Into::into).collect();
        self.inner.selections.set(selection);
    }

    /// Returns `true` if the row is selected.
    pub fn is_selected(&self, id: impl Into<RowId>) -> bool {
        let id = id.into();
        self.inner.selections.with(|selection| selection.contains(&id))
    }

    /// Returns `true` if the current page has rows and all of them are selected.
    pub fn is_entire_page_selected(&self) -> bool {
        let ids = self.page_ids();
        !ids.is_empty()
            && self
                .inner
                .selections
                .with(|selection| ids.iter().all(|id| selection.contains(id)))
    }

    fn page_ids(&self) -> Vec<RowId> {
        self.inner
            .data
            .with(|rows| rows.iter().filter_map(Row::id).collect())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Stops observing the page and locale cells and drops any response
    /// still in flight. Further calls are no-ops.
    pub fn destroy(&self) {
        {
            let mut fetch = self.inner.fetch.lock().unwrap_or_else(PoisonError::into_inner);
            if fetch.destroyed {
                return;
            }
            fetch.destroyed = true;
        }

        let subscriptions = match self.subscriptions.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        for subscription in subscriptions {
            subscription.unsubscribe();
        }

        log::debug!("{}: store destroyed", self.inner.resource_key);
    }

    /// Returns `true` once [`destroy`](Self::destroy) has been called.
    pub fn is_destroyed(&self) -> bool {
        self.inner
            .fetch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .destroyed
    }
}

impl Drop for ListViewStore {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Debug for ListViewStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListViewStore")
            .field("resource_key", &self.inner.resource_key)
            .field("loading", &self.loading())
            .field("rows", &self.inner.data.with(Vec::len))
            .field("page_count", &self.page_count())
            .field("selections", &self.inner.selections.with(Selection::len))
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

/// Subscribes the store to its page and locale cells.
///
/// Listeners hold a weak reference, so the cells never keep a store alive.
fn observe_inputs(inner: &Arc<StoreInner>) -> Vec<Subscription> {
    let mut subscriptions = Vec::with_capacity(2);

    let store = Arc::downgrade(inner);
    subscriptions.push(inner.page.subscribe(move |_| inputs_changed(&store)));

    if let Some(locale) = &inner.locale {
        let store = Arc::downgrade(inner);
        subscriptions.push(locale.subscribe(move |_| inputs_changed(&store)));
    }

    subscriptions
}

fn inputs_changed(store: &Weak<StoreInner>) {
    let Some(inner) = store.upgrade() else {
        return;
    };
    if inner.page.with(Option::is_none) {
        return;
    }
    // Reactive fetches report failures through `last_error` and the log.
    drop(inner.dispatch());
}

impl StoreInner {
    fn query(&self) -> ListQuery {
        ListQuery::new()
            .with_page(self.page.get())
            .with_locale(self.locale.as_ref().and_then(|locale| locale.get()))
    }

    fn dispatch(self: &Arc<Self>) -> RequestHandle {
        // The query is read under the same lock that assigns the token, so
        // the latest token always carries the latest inputs.
        let (token, query) = {
            let mut fetch = self.fetch.lock().unwrap_or_else(PoisonError::into_inner);
            if fetch.destroyed {
                return RequestHandle::discarded();
            }
            fetch.latest += 1;
            self.loading.set_quiet(true);
            (fetch.latest, self.query())
        };
        self.loading.notify();

        log::debug!("{}: request #{} {:?}", self.resource_key, token, query);
        let response = self.client.get_list(&self.resource_key, &query);

        let store = Arc::downgrade(self);
        let task = self.runtime.spawn(async move {
            let result = response.await;
            match store.upgrade() {
                Some(inner) => inner.resolve(token, result),
                None => result.map(|_| RequestOutcome::Discarded),
            }
        });

        RequestHandle::new(token, task)
    }

    fn resolve(&self, token: u64, result: Result<PageResult, Error>) -> Result<RequestOutcome, Error> {
        let (page, error) = match result {
            Ok(page) => (Some(page), None),
            Err(error) => (None, Some(error)),
        };

        let mut changed = Changed::default();
        let outcome = {
            let fetch = self.fetch.lock().unwrap_or_else(PoisonError::into_inner);
            if fetch.destroyed {
                RequestOutcome::Discarded
            } else if fetch.latest != token {
                RequestOutcome::Superseded
            } else {
                changed.loading = self.loading.set_quiet(false);
                changed.last_error = self
                    .last_error
                    .set_quiet(error.as_ref().map(ToString::to_string));
                if let Some(page) = page {
                    let (rows, page_count) = page.into_parts();
                    changed.data = self.data.set_quiet(rows);
                    changed.page_count = self.page_count.set_quiet(page_count.unwrap_or(0));
                }
                RequestOutcome::Applied
            }
        };

        if changed.loading {
            self.loading.notify();
        }
        if changed.data {
            self.data.notify();
        }
        if changed.page_count {
            self.page_count.notify();
        }
        if changed.last_error {
            self.last_error.notify();
        }

        match error {
            Some(error) => {
                if outcome.is_applied() {
                    log::warn!("{}: request #{} failed: {}", self.resource_key, token, error);
                } else {
                    log::debug!(
                        "{}: request #{} failed ({:?}): {}",
                        self.resource_key,
                        token,
                        outcome,
                        error
                    );
                }
                Err(error)
            }
            None => {
                if !outcome.is_applied() {
                    log::debug!(
                        "{}: response #{} dropped ({:?})",
                        self.resource_key,
                        token,
                        outcome
                    );
                }
                Ok(outcome)
            }
        }
    }
}
