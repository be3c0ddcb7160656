//! Shared fixtures for store tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use datagrid_lib::error::Error;
use datagrid_lib::error::StoreError;
use datagrid_lib::model::PageResult;
use datagrid_lib::model::Row;
use datagrid_lib::{Cell, InMemoryMetadata, ListQuery, ListViewConfig, ListViewStore, ResourceClient};
use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::oneshot;

pub type Reply = Result<PageResult, Error>;

enum Queued {
    Ready(Reply),
    Deferred(oneshot::Receiver<Reply>),
}

/// Resource client that records every call and answers from a script.
///
/// Calls are recorded synchronously, before the returned future is polled.
/// Queued replies are used first, in order; once the queue is empty every
/// call gets the default page.
#[derive(Default)]
pub struct MockClient {
    calls: Mutex<Vec<(String, ListQuery)>>,
    queue: Mutex<VecDeque<Queued>>,
    default: Mutex<PageResult>,
}

impl MockClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answers every unscripted call with `page`.
    pub fn respond_with(&self, page: PageResult) {
        *self.default.lock().unwrap() = page;
    }

    /// Answers the next unanswered call with `reply`.
    pub fn reply_next(&self, reply: Reply) {
        self.queue.lock().unwrap().push_back(Queued::Ready(reply));
    }

    /// Holds the next call's response until the returned sender fires.
    pub fn defer_next(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.queue.lock().unwrap().push_back(Queued::Deferred(rx));
        tx
    }

    pub fn calls(&self) -> Vec<(String, ListQuery)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_query(&self) -> Option<ListQuery> {
        self.calls.lock().unwrap().last().map(|(_, query)| query.clone())
    }
}

impl ResourceClient for MockClient {
    fn get_list(&self, resource_key: &str, query: &ListQuery) -> BoxFuture<'static, Reply> {
        self.calls
            .lock()
            .unwrap()
            .push((resource_key.to_string(), query.clone()));

        match self.queue.lock().unwrap().pop_front() {
            Some(Queued::Ready(reply)) => async move { reply }.boxed(),
            Some(Queued::Deferred(rx)) => async move {
                rx.await
                    .unwrap_or_else(|_| Err(StoreError::Task("reply dropped".into()).into()))
            }
            .boxed(),
            None => {
                let page = self.default.lock().unwrap().clone();
                async move { Ok(page) }.boxed()
            }
        }
    }
}

/// Resource client answering every call with one row whose id is the
/// requested page number, after yielding once.
#[derive(Default)]
pub struct EchoClient;

impl ResourceClient for EchoClient {
    fn get_list(&self, _resource_key: &str, query: &ListQuery) -> BoxFuture<'static, Reply> {
        let page = query.page.unwrap_or(0);
        async move {
            tokio::task::yield_now().await;
            Ok(PageResult::new(vec![Row::with_id(i64::from(page))]).with_page_count(page))
        }
        .boxed()
    }
}

pub fn rows(ids: &[i64]) -> Vec<Row> {
    ids.iter().map(|id| Row::with_id(*id)).collect()
}

pub fn page_of(ids: &[i64], page_count: u32) -> PageResult {
    PageResult::new(rows(ids)).with_page_count(page_count)
}

/// Store for the `tests` resource observing the given cells.
pub fn store_with(
    client: &Arc<MockClient>,
    page: &Cell<Option<u32>>,
    locale: Option<&Cell<Option<String>>>,
) -> ListViewStore {
    let mut config = ListViewConfig::new(page.clone());
    if let Some(locale) = locale {
        config = config.with_locale(locale.clone());
    }

    ListViewStore::builder("tests")
        .config(config)
        .client(Arc::clone(client))
        .metadata(InMemoryMetadata::new())
        .build()
        .expect("store builds inside a runtime")
}
