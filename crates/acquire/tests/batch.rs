//! Integration tests for batch loading
//!
//! Lists are loaded strictly in order; mappings go straight into the cache.

mod common;

use acquire::{Acquire, AcquireError, Batch, ContentValue, ResolvedAddress, Transports};
use common::{ms, MockHttp};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn with_http(http: &Arc<MockHttp>) -> Acquire {
    Acquire::with_transports(Transports::new().with_http(http.clone()))
}

fn parsed(value: serde_json::Value) -> Option<ContentValue> {
    Some(ContentValue::Parsed(value))
}

#[tokio::test(start_paused = true)]
async fn test_list_results_follow_input_order() {
    // "c" is fastest, "b" slowest
    let http = Arc::new(
        MockHttp::new()
            .respond_after("/modules/app/a.json", ms(50), "\"a\"")
            .respond_after("/modules/app/b.json", ms(90), "\"b\"")
            .respond_after("/modules/app/c.json", ms(10), "\"c\""),
    );
    let acquire = with_http(&http);

    let results = acquire
        .load(Batch::specifiers(["app/a.json", "app/b.json", "app/c.json"]))
        .await;

    assert_eq!(
        results,
        vec![Ok(parsed(json!("a"))), Ok(parsed(json!("b"))), Ok(parsed(json!("c")))]
    );
    assert_eq!(
        http.calls(),
        vec![
            "/modules/app/a.json",
            "/modules/app/b.json",
            "/modules/app/c.json"
        ]
    );
}

#[tokio::test]
async fn test_non_string_entries_are_skipped() {
    let http = Arc::new(
        MockHttp::new()
            .respond("/modules/app/a.json", "1")
            .respond("/modules/app/b.json", "2"),
    );
    let acquire = with_http(&http);

    let results = acquire
        .load(Batch::List(vec![
            json!("app/a.json"),
            json!(42),
            json!(null),
            json!("app/b.json"),
        ]))
        .await;

    assert_eq!(
        results,
        vec![Ok(parsed(json!(1))), Ok(None), Ok(None), Ok(parsed(json!(2)))]
    );
    assert_eq!(http.total_calls(), 2);
}

#[tokio::test]
async fn test_failed_entry_does_not_abort_batch() {
    let http = Arc::new(
        MockHttp::new()
            .respond("/modules/app/a.json", "1")
            .respond("/modules/app/c.json", "3"),
    );
    let acquire = with_http(&http);

    let results = acquire
        .load(Batch::specifiers(["app/a.json", "app/b.json", "app/c.json"]))
        .await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0], Ok(parsed(json!(1))));
    assert!(matches!(results[1], Err(AcquireError::Fetch { .. })));
    assert_eq!(results[2], Ok(parsed(json!(3))));
}

#[tokio::test]
async fn test_repeated_entries_fetch_once() {
    let http = Arc::new(MockHttp::new().respond("/modules/app/a.json", "1"));
    let acquire = with_http(&http);

    let results = acquire
        .load(Batch::specifiers(["app/a.json", "/modules/app/a.json", "app/a.json"]))
        .await;

    assert!(results.iter().all(|r| r == &Ok(parsed(json!(1)))));
    assert_eq!(http.total_calls(), 1);
}

#[tokio::test]
async fn test_mapping_writes_cache_without_transport() {
    let http = Arc::new(MockHttp::new());
    let acquire = with_http(&http);

    let results = acquire.load(Batch::from(json!({"x": 1, "y": 2}))).await;

    assert_eq!(results, vec![Ok(parsed(json!(1))), Ok(parsed(json!(2)))]);
    assert_eq!(
        acquire.cache().get(&ResolvedAddress::verbatim("x")),
        parsed(json!(1))
    );
    assert_eq!(
        acquire.cache().get(&ResolvedAddress::verbatim("y")),
        parsed(json!(2))
    );
    assert_eq!(http.total_calls(), 0);
}

#[tokio::test]
async fn test_mapping_keeps_insertion_order() {
    let acquire = Acquire::with_transports(Transports::new());

    let results = acquire.load(Batch::from(json!({"zeta": 1, "alpha": 2}))).await;

    assert_eq!(results, vec![Ok(parsed(json!(1))), Ok(parsed(json!(2)))]);
}

#[tokio::test]
async fn test_preloaded_address_serves_later_loads() {
    let http = Arc::new(MockHttp::new());
    let acquire = with_http(&http);

    acquire
        .load(Batch::entries([("/modules/app/data.json", "preloaded")]))
        .await;
    let result = acquire.require("app/data.json").await;

    assert_eq!(result, Ok(Some(ContentValue::Raw("preloaded".to_string()))));
    assert_eq!(http.total_calls(), 0);
}

#[tokio::test]
async fn test_mapping_callback_runs_once_after_cache_write() {
    let acquire = Acquire::with_transports(Transports::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let received = Arc::new(Mutex::new(Vec::new()));

    let handle = {
        let calls = calls.clone();
        let received = received.clone();
        acquire.load_then(Batch::from(json!({"x": 1, "y": 2})), move |results| {
            calls.fetch_add(1, Ordering::SeqCst);
            *received.lock() = results;
        })
    };

    // Cache is written before load_then returns; the callback has not run yet
    assert!(acquire.cache().contains(&ResolvedAddress::verbatim("x")));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    handle.await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        *received.lock(),
        vec![Ok(parsed(json!(1))), Ok(parsed(json!(2)))]
    );
}

#[tokio::test(start_paused = true)]
async fn test_list_callback_receives_ordered_results() {
    let http = Arc::new(
        MockHttp::new()
            .respond_after("/modules/app/a.json", ms(30), "\"a\"")
            .respond_after("/modules/app/b.json", ms(5), "\"b\""),
    );
    let acquire = with_http(&http);
    let received = Arc::new(Mutex::new(None));

    let handle = {
        let received = received.clone();
        acquire.load_then(
            Batch::specifiers(["app/a.json", "app/b.json"]),
            move |results| {
                *received.lock() = Some(results);
            },
        )
    };
    handle.await.unwrap();

    assert_eq!(
        received.lock().take(),
        Some(vec![Ok(parsed(json!("a"))), Ok(parsed(json!("b")))])
    );
}

#[tokio::test]
async fn test_empty_list_completes() {
    let acquire = Acquire::with_transports(Transports::new());
    assert!(acquire.load(Batch::List(Vec::new())).await.is_empty());
}
