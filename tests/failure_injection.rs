//! Failure injection tests for the gateway.

use axum::http::StatusCode;
use serde_json::Value;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

mod common;

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let backend = common::unreachable_addr().await;
    let root = tempfile::tempdir().unwrap();
    let (addr, shutdown) = common::start_gateway(common::gateway_config(backend, root.path())).await;

    let res = tokio::time::timeout(
        Duration::from_secs(5),
        common::client().get(format!("http://{addr}/gateway/color/x")).send(),
    )
    .await
    .expect("gateway must answer within a bounded time")
    .expect("Gateway unreachable");

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "bad_gateway");
    assert_eq!(body["description"], "upstream [color-service] unavailable");

    shutdown.trigger();
}

#[tokio::test]
async fn test_hanging_upstream_times_out() {
    let backend = common::start_hanging_backend().await;
    let root = tempfile::tempdir().unwrap();
    let mut config = common::gateway_config(backend, root.path());
    config.timeouts.upstream_ms = 300;
    let (addr, shutdown) = common::start_gateway(config).await;

    let start = Instant::now();
    let res = tokio::time::timeout(
        Duration::from_secs(5),
        common::client().get(format!("http://{addr}/gateway/color")).send(),
    )
    .await
    .expect("gateway must not hang on a silent upstream")
    .unwrap();

    assert_eq!(res.status(), StatusCode::GATEWAY_TIMEOUT);
    assert!(start.elapsed() >= Duration::from_millis(300));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "gateway_timeout");

    shutdown.trigger();
}

#[tokio::test]
async fn test_request_timeout_answers_json() {
    let backend = common::start_hanging_backend().await;
    let root = tempfile::tempdir().unwrap();
    let mut config = common::gateway_config(backend, root.path());
    config.timeouts.upstream_ms = 5_000;
    config.timeouts.request_secs = 1;
    let (addr, shutdown) = common::start_gateway(config).await;

    let res = common::client()
        .get(format!("http://{addr}/gateway/color"))
        .header("x-request-id", "slow-1")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(res.headers()["x-request-id"], "slow-1");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "request_timeout");

    shutdown.trigger();
}

#[tokio::test]
async fn test_client_disconnect_cancels_upstream() {
    let (backend, upstream_closed) = common::start_eof_tracking_backend().await;
    let root = tempfile::tempdir().unwrap();
    let mut config = common::gateway_config(backend, root.path());
    config.timeouts.upstream_ms = 10_000;
    let (addr, shutdown) = common::start_gateway(config).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(format!("GET /gateway/color HTTP/1.1\r\nHost: {addr}\r\n\r\n").as_bytes())
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!upstream_closed.load(Ordering::SeqCst));
    drop(stream);

    let deadline = Instant::now() + Duration::from_secs(3);
    while !upstream_closed.load(Ordering::SeqCst) && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(
        upstream_closed.load(Ordering::SeqCst),
        "upstream connection should close once the client goes away"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_slow_upstream_does_not_block_other_requests() {
    let slow = common::start_hanging_backend().await;
    let fast = common::start_echo_backend().await;
    let root = tempfile::tempdir().unwrap();

    let mut config = common::gateway_config(fast, root.path());
    config.routes.push(common::route("slow-service", "/gateway/slow", slow));
    config.timeouts.upstream_ms = 2_000;
    let (addr, shutdown) = common::start_gateway(config).await;
    let client = common::client();

    let slow_client = client.clone();
    let slow_url = format!("http://{addr}/gateway/slow/wait");
    let slow_request = tokio::spawn(async move { slow_client.get(&slow_url).send().await });

    tokio::time::sleep(Duration::from_millis(100)).await;

    let start = Instant::now();
    let res = client.get(format!("http://{addr}/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let res = client.get(format!("http://{addr}/gateway/color/ping")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert!(
        start.elapsed() < Duration::from_millis(1_000),
        "fast requests waited on the slow upstream"
    );

    let slow_res = slow_request.await.unwrap().unwrap();
    assert_eq!(slow_res.status(), StatusCode::GATEWAY_TIMEOUT);

    shutdown.trigger();
}

#[tokio::test]
async fn test_gateway_survives_upstream_failures() {
    let backend = common::unreachable_addr().await;
    let root = tempfile::tempdir().unwrap();
    let (addr, shutdown) = common::start_gateway(common::gateway_config(backend, root.path())).await;
    let client = common::client();

    for _ in 0..10 {
        let res = client.get(format!("http://{addr}/gateway/color")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    }

    let res = client.get(format!("http://{addr}/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_accepting() {
    let backend = common::start_echo_backend().await;
    let root = tempfile::tempdir().unwrap();
    let (addr, shutdown) = common::start_gateway(common::gateway_config(backend, root.path())).await;
    // A fresh client per phase so no pooled connection outlives the shutdown.
    let res = common::client().get(format!("http://{addr}/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let after = common::client().get(format!("http://{addr}/health")).send().await;
    assert!(after.is_err(), "listener should be closed after shutdown");
}
