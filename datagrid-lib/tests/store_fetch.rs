//! Fetch behaviour of the list-view store: when requests go out, what they
//! carry, and which responses are allowed to reach the store.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{page_of, rows, store_with, EchoClient, MockClient};
use datagrid_lib::error::{ApiError, Error, StoreError};
use datagrid_lib::model::{FieldDefinition, PageResult, RowId};
use datagrid_lib::{
    Cell, InMemoryMetadata, ListQuery, ListViewConfig, ListViewStore, MetadataProvider,
    RequestOutcome,
};

#[tokio::test]
async fn test_no_request_without_page() {
    let client = MockClient::new();
    let page = Cell::new(None);
    let locale = Cell::new(None);
    let store = store_with(&client, &page, Some(&locale));

    locale.set(Some("en".to_string()));

    assert_eq!(client.call_count(), 0);
    assert!(!store.loading());
    store.destroy();
}

#[tokio::test]
async fn test_request_with_default_parameters() {
    let client = MockClient::new();
    client.respond_with(page_of(&[1], 3));
    let page = Cell::new(None);
    let store = store_with(&client, &page, None);

    page.set(Some(1));

    assert_eq!(
        client.calls(),
        vec![("tests".to_string(), ListQuery::new().page(1))]
    );
    assert!(store.loading());

    store.wait_until_idle().await;
    assert_eq!(store.data(), rows(&[1]));
    assert_eq!(store.page_count(), 3);
    store.destroy();
}

#[tokio::test]
async fn test_request_to_other_page() {
    let client = MockClient::new();
    let page = Cell::new(None);
    let store = store_with(&client, &page, None);

    page.set(Some(1));
    assert_eq!(client.last_query(), Some(ListQuery::new().page(1)));

    page.set(Some(2));
    assert_eq!(client.last_query(), Some(ListQuery::new().page(2)));
    assert_eq!(client.call_count(), 2);
    store.destroy();
}

#[tokio::test]
async fn test_setting_same_page_does_not_refetch() {
    let client = MockClient::new();
    let page = Cell::new(None);
    let store = store_with(&client, &page, None);

    page.set(Some(1));
    page.set(Some(1));

    assert_eq!(client.call_count(), 1);
    store.destroy();
}

#[tokio::test]
async fn test_request_to_other_locale() {
    let client = MockClient::new();
    let page = Cell::new(None);
    let locale = Cell::new(None);
    let store = store_with(&client, &page, Some(&locale));

    page.set(Some(1));
    locale.set(Some("en".to_string()));
    assert_eq!(client.last_query(), Some(ListQuery::new().page(1).locale("en")));

    locale.set(Some("de".to_string()));
    assert_eq!(client.last_query(), Some(ListQuery::new().page(1).locale("de")));
    assert_eq!(client.call_count(), 3);
    store.destroy();
}

#[tokio::test]
async fn test_no_locale_key_when_locale_undefined() {
    let client = MockClient::new();
    let page = Cell::new(None);
    let locale = Cell::new(None);
    let store = store_with(&client, &page, Some(&locale));

    page.set(Some(1));

    let (_, query) = &client.calls()[0];
    assert_eq!(query.locale, None);
    assert!(!query.contains("locale"));
    assert_eq!(query.to_pairs(), vec![("page".to_string(), "1".to_string())]);
    let value = serde_json::to_value(query).unwrap();
    assert!(value.get("locale").is_none());
    store.destroy();
}

#[tokio::test]
async fn test_loading_set_before_request() {
    let client = MockClient::new();
    let page = Cell::new(None);
    let store = store_with(&client, &page, None);

    page.set(Some(1));
    store.set_loading(false);
    let _handle = store.send_request();

    assert!(store.loading());
    assert_eq!(client.call_count(), 2);
    store.destroy();
}

#[tokio::test]
async fn test_loading_reset_after_request() {
    let client = MockClient::new();
    client.reply_next(Ok(PageResult::default()));
    let page = Cell::new(None);
    let store = store_with(&client, &page, None);

    let outcome = store.send_request().wait().await.unwrap();

    assert_eq!(outcome, RequestOutcome::Applied);
    assert!(!store.loading());
    assert!(store.data().is_empty());
    assert_eq!(store.page_count(), 0);
    // sent without a page entry since none was set
    assert_eq!(client.last_query(), Some(ListQuery::new()));
    store.destroy();
}

#[tokio::test]
async fn test_loading_stays_true_until_response() {
    let client = MockClient::new();
    let reply = client.defer_next();
    let page = Cell::new(None);
    let store = store_with(&client, &page, None);

    let handle = store.send_request();
    tokio::task::yield_now().await;
    assert!(store.loading());

    reply.send(Ok(page_of(&[4, 5], 2))).unwrap();
    assert_eq!(handle.wait().await.unwrap(), RequestOutcome::Applied);

    assert!(!store.loading());
    assert_eq!(store.data(), rows(&[4, 5]));
    assert_eq!(store.page_count(), 2);
    store.destroy();
}

#[tokio::test]
async fn test_stale_response_is_discarded() {
    let client = MockClient::new();
    let first = client.defer_next();
    let second = client.defer_next();
    let page = Cell::new(Some(1));
    let store = store_with(&client, &page, None);

    let older = store.send_request();
    let newer = store.send_request();
    assert!(newer.token() > older.token());

    second.send(Ok(page_of(&[2], 5))).unwrap();
    assert_eq!(newer.wait().await.unwrap(), RequestOutcome::Applied);

    first.send(Ok(page_of(&[1], 9))).unwrap();
    assert_eq!(older.wait().await.unwrap(), RequestOutcome::Superseded);

    assert_eq!(store.data(), rows(&[2]));
    assert_eq!(store.page_count(), 5);
    assert!(!store.loading());
    store.destroy();
}

#[tokio::test]
async fn test_older_response_does_not_end_loading() {
    let client = MockClient::new();
    let first = client.defer_next();
    let _second = client.defer_next();
    let page = Cell::new(Some(1));
    let store = store_with(&client, &page, None);

    let older = store.send_request();
    let _newer = store.send_request();

    first.send(Ok(page_of(&[1], 1))).unwrap();
    assert_eq!(older.wait().await.unwrap(), RequestOutcome::Superseded);

    assert!(store.loading());
    assert!(store.data().is_empty());
    store.destroy();
}

#[tokio::test]
async fn test_response_after_destroy_is_ignored() {
    let client = MockClient::new();
    let reply = client.defer_next();
    let page = Cell::new(Some(1));
    let store = store_with(&client, &page, None);

    let handle = store.send_request();
    store.destroy();

    reply.send(Ok(page_of(&[1, 2], 4))).unwrap();
    assert_eq!(handle.wait().await.unwrap(), RequestOutcome::Discarded);

    assert!(store.loading());
    assert!(store.data().is_empty());
    assert_eq!(store.page_count(), 0);
}

#[tokio::test]
async fn test_destroy_stops_observing_inputs() {
    let client = MockClient::new();
    let page = Cell::new(None);
    let locale = Cell::new(None);
    let store = store_with(&client, &page, Some(&locale));

    page.set(Some(1));
    store.destroy();
    assert!(store.is_destroyed());
    assert_eq!(page.listener_count(), 0);
    assert_eq!(locale.listener_count(), 0);

    page.set(Some(2));
    locale.set(Some("en".to_string()));
    assert_eq!(client.call_count(), 1);

    let handle = store.send_request();
    assert_eq!(handle.token(), None);
    assert_eq!(handle.wait().await.unwrap(), RequestOutcome::Discarded);
    assert_eq!(client.call_count(), 1);

    store.destroy();
}

#[tokio::test]
async fn test_drop_detaches_from_cells() {
    let client = MockClient::new();
    let page = Cell::new(None);

    drop(store_with(&client, &page, None));
    page.set(Some(1));

    assert_eq!(client.call_count(), 0);
    assert_eq!(page.listener_count(), 0);
}

#[tokio::test]
async fn test_failed_request_resets_loading() {
    let client = MockClient::new();
    client.reply_next(Err(ApiError::http(500, "boom").into()));
    let page = Cell::new(Some(1));
    let store = store_with(&client, &page, None);

    let err = store.send_request().wait().await.unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert!(!store.loading());
    assert_eq!(store.last_error().as_deref(), Some("HTTP 500: boom"));

    client.respond_with(page_of(&[1], 1));
    store.send_request().wait().await.unwrap();
    assert_eq!(store.last_error(), None);
    assert_eq!(store.data(), rows(&[1]));
    store.destroy();
}

#[tokio::test]
async fn test_reactive_failure_is_recorded() {
    let client = MockClient::new();
    client.respond_with(page_of(&[1, 2], 2));
    client.reply_next(Err(ApiError::http(503, "unavailable").into()));
    let page = Cell::new(None);
    let store = store_with(&client, &page, None);

    page.set(Some(1));
    store.wait_until_idle().await;

    assert!(store.last_error().is_some());
    assert!(store.data().is_empty());

    page.set(Some(2));
    store.wait_until_idle().await;
    assert_eq!(store.last_error(), None);
    assert_eq!(store.data(), rows(&[1, 2]));
    store.destroy();
}

#[tokio::test]
async fn test_failure_of_superseded_request_is_ignored() {
    let client = MockClient::new();
    let first = client.defer_next();
    let second = client.defer_next();
    let page = Cell::new(Some(1));
    let store = store_with(&client, &page, None);

    let older = store.send_request();
    let newer = store.send_request();

    first
        .send(Err(ApiError::http(500, "late failure").into()))
        .unwrap();
    assert!(older.wait().await.is_err());
    assert!(store.loading());
    assert_eq!(store.last_error(), None);

    second.send(Ok(page_of(&[3], 1))).unwrap();
    newer.wait().await.unwrap();
    assert!(!store.loading());
    store.destroy();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_page_changes_settle_on_final_page() {
    let page = Cell::new(None);
    let store = ListViewStore::builder("tests")
        .config(ListViewConfig::new(page.clone()))
        .client(EchoClient)
        .metadata(InMemoryMetadata::new())
        .build()
        .unwrap();

    std::thread::scope(|scope| {
        for offset in [1u32, 2] {
            let page = page.clone();
            scope.spawn(move || {
                for round in 0..200u32 {
                    page.set(Some(round * 2 + offset));
                }
            });
        }
    });

    tokio::time::timeout(Duration::from_secs(5), store.wait_until_idle())
        .await
        .expect("requests resolve");

    let expected = page.get().unwrap();
    assert_eq!(store.data()[0].id(), Some(RowId::from(i64::from(expected))));
    assert_eq!(store.page_count(), expected);
    store.destroy();
}

#[tokio::test]
async fn test_watch_data_sees_applied_page() {
    let client = MockClient::new();
    client.respond_with(page_of(&[8, 9], 1));
    let page = Cell::new(None);
    let store = store_with(&client, &page, None);
    let mut data = store.watch_data();

    page.set(Some(1));
    tokio::time::timeout(Duration::from_secs(1), data.changed())
        .await
        .expect("data changes")
        .unwrap();

    assert_eq!(*data.borrow(), rows(&[8, 9]));
    store.destroy();
}

#[tokio::test]
async fn test_get_fields_returns_provider_result() {
    let metadata = Arc::new(InMemoryMetadata::new());
    metadata.register("tests", [FieldDefinition::new("test")]);
    let expected = metadata.get_fields("tests");

    let store = ListViewStore::builder("tests")
        .config(ListViewConfig::new(Cell::new(None)))
        .client(MockClient::new())
        .metadata(Arc::clone(&metadata))
        .build()
        .unwrap();

    let fields = store.get_fields();
    assert!(Arc::ptr_eq(&fields, &expected));
    store.destroy();
}

#[test]
fn test_build_outside_runtime_fails() {
    let result = ListViewStore::builder("tests")
        .config(ListViewConfig::new(Cell::new(None)))
        .client(MockClient::new())
        .metadata(InMemoryMetadata::new())
        .build();

    assert!(matches!(result, Err(Error::Store(StoreError::NoRuntime))));
}

#[test]
fn test_build_with_explicit_runtime() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let client = MockClient::new();
    client.respond_with(page_of(&[1], 1));
    let page = Cell::new(None);

    let store = ListViewStore::builder("tests")
        .config(ListViewConfig::new(page.clone()))
        .client(Arc::clone(&client))
        .metadata(InMemoryMetadata::new())
        .runtime(runtime.handle().clone())
        .build()
        .unwrap();

    page.set(Some(1));
    runtime.block_on(store.wait_until_idle());

    assert_eq!(store.data(), rows(&[1]));
    store.destroy();
}
