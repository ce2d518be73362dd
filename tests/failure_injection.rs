//! Failure injection tests: dead backends, timeouts, no failover.

use std::time::Duration;

use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn test_unreachable_backend_returns_bad_gateway() {
    let dead = common::dead_backend().await;
    let balancer = common::start_balancer(&[dead], 1, 30).await;

    let res = common::client().get(balancer.url("/")).send().await.expect("balancer unreachable");
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert!(common::eventually(|| balancer.registry.backends()[0].active() == 0).await);
}

#[tokio::test]
async fn test_dead_backend_is_not_avoided() {
    let dead = common::dead_backend().await;
    let live = common::start_mock_backend("live").await;
    let balancer = common::start_balancer(&[dead, live], 2, 30).await;
    let client = common::client();

    // No health checks and no retries: the dead backend keeps being picked
    // and each of those requests fails on its own.
    let mut ok = 0;
    let mut failed = 0;
    for _ in 0..40 {
        let res = client.get(balancer.url("/")).send().await.unwrap();
        match res.status() {
            StatusCode::OK => ok += 1,
            StatusCode::BAD_GATEWAY => failed += 1,
            other => panic!("unexpected status {other}"),
        }
    }
    assert!(ok > 0, "live backend never served");
    assert!(failed > 0, "dead backend never selected");

    for backend in balancer.registry.backends() {
        assert!(common::eventually(|| backend.active() == 0).await);
    }
}

#[tokio::test]
async fn test_backend_error_status_is_passed_through() {
    let addr = common::start_programmable_backend(|_head| async { (500, "boom".to_string()) }).await;
    let balancer = common::start_balancer(&[addr], 1, 30).await;

    let res = common::client().get(balancer.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.text().await.unwrap(), "boom");
}

#[tokio::test]
async fn test_timed_out_request_releases_backend() {
    let addr = common::start_programmable_backend(|_head| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        (200, "too late".to_string())
    })
    .await;
    let balancer = common::start_balancer(&[addr], 1, 1).await;
    let backend = balancer.registry.backends()[0].clone();

    let res = common::client().get(balancer.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
    assert!(common::eventually(|| backend.active() == 0).await);
}

#[tokio::test]
async fn test_concurrent_requests_leave_no_residue() {
    let mut addrs = Vec::new();
    for name in ["b0", "b1", "b2", "b3"] {
        addrs.push(common::start_mock_backend(name).await);
    }
    let balancer = common::start_balancer(&addrs, 2, 30).await;
    let client = common::client();

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let client = client.clone();
            let url = balancer.url("/");
            tokio::spawn(async move {
                for _ in 0..10 {
                    let res = client.get(&url).send().await.unwrap();
                    assert_eq!(res.status(), StatusCode::OK);
                }
            })
        })
        .collect();
    for result in futures_util::future::join_all(tasks).await {
        result.unwrap();
    }

    for backend in balancer.registry.backends() {
        assert!(common::eventually(|| backend.active() == 0).await);
    }
}
