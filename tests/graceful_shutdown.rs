//! Draining behaviour of the server under shutdown.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::StatusCode;

use budget_tracker::lifecycle::LifecyclePhase;
use budget_tracker::{ServerError, ShutdownReason};

mod common;

use common::SlowStore;

#[tokio::test]
async fn test_in_flight_requests_complete_within_window() {
    let store = Arc::new(SlowStore::new(Duration::from_millis(500), Duration::ZERO));
    let server = common::spawn_server(store.clone(), 15).await;

    let requests: Vec<_> = (0..4)
        .map(|_| {
            let url = server.url("/api/v1/users");
            tokio::spawn(async move { reqwest::get(url).await.map(|res| res.status()) })
        })
        .collect();
    common::wait_in_progress(&store, 4).await;

    server.shutdown.trigger(ShutdownReason::Terminate);

    for request in requests {
        let status = request.await.unwrap().unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    let report = server.running.await.unwrap().unwrap();
    assert_eq!(report.reason, ShutdownReason::Terminate);
    assert!(report.drained_in < Duration::from_secs(15));
    assert_eq!(server.phases.current(), LifecyclePhase::Stopped);
}

#[tokio::test]
async fn test_new_connections_are_refused_after_drain() {
    let server = common::spawn_memory_server().await;
    let url = server.url("/health");

    server.shutdown.trigger(ShutdownReason::Interrupt);
    server.running.await.unwrap().unwrap();

    assert!(reqwest::get(url).await.is_err());
}

#[tokio::test]
async fn test_slow_request_does_not_hold_shutdown_past_window() {
    let store = Arc::new(SlowStore::new(Duration::from_secs(10), Duration::ZERO));
    let server = common::spawn_server(store.clone(), 1).await;

    let url = server.url("/api/v1/users");
    let request = tokio::spawn(async move { reqwest::get(url).await });
    common::wait_in_progress(&store, 1).await;

    let started = Instant::now();
    server.shutdown.trigger(ShutdownReason::Quit);
    let outcome = server.running.await.unwrap();
    let elapsed = started.elapsed();

    match outcome {
        Err(ServerError::DrainTimeout { in_flight, timeout }) => {
            assert!(in_flight >= 1);
            assert_eq!(timeout, Duration::from_secs(1));
        }
        other => panic!("expected drain timeout, got {other:?}"),
    }
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(5), "shutdown took {elapsed:?}");
    assert_eq!(server.phases.current(), LifecyclePhase::Stopped);

    let abandoned = tokio::time::timeout(Duration::from_secs(5), request)
        .await
        .unwrap()
        .unwrap();
    assert!(abandoned.is_err());
}
