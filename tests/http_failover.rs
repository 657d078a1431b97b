//! End-to-end failover between two HTTP providers.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use api_balancer::balancer::{AdaptiveFailoverBalancer, SequenceDraws};
use api_balancer::config::{ProviderConfig, ProvidersConfig};
use api_balancer::providers::{HttpProvider, ProviderError};
use api_balancer::Provider;
use serde_json::Value;

mod common;

fn provider(name: &str, addr: std::net::SocketAddr) -> Arc<HttpProvider> {
    let config = ProviderConfig {
        name: name.to_string(),
        url: format!("http://{}/api", addr),
        timeout_secs: 2,
    };
    Arc::new(HttpProvider::from_config(&config).unwrap())
}

async fn get(
    lb: &AdaptiveFailoverBalancer<HttpProvider>,
    path: &str,
) -> Result<(String, Value), ProviderError> {
    lb.load_balance(|p| async move {
        let body: Value = p.get_json(path).await?;
        Ok::<_, ProviderError>((p.name().to_string(), body))
    })
    .await
}

#[tokio::test]
async fn test_http_fallback_on_server_error() {
    let left_hits = Arc::new(AtomicU32::new(0));
    let lh = left_hits.clone();
    let left_addr = common::start_programmable_backend(move || {
        let lh = lh.clone();
        async move {
            lh.fetch_add(1, Ordering::SeqCst);
            (503, "{\"error\":\"unavailable\"}".to_string())
        }
    })
    .await;
    let right_addr = common::start_mock_backend(200, "{\"height\":4242}").await;

    let lb = AdaptiveFailoverBalancer::new(
        provider("neoscan", left_addr),
        provider("neondb", right_addr),
    )
        .with_random(SequenceDraws::constant(0.5));

    let (name, body) = get(&lb, "v1/get_height").await.unwrap();
    assert_eq!(name, "neondb");
    assert_eq!(body["height"], 4242);
    assert_eq!(left_hits.load(Ordering::SeqCst), 1);
    assert!((lb.preference() - 0.2).abs() < 1e-12);
}

#[tokio::test]
async fn test_http_both_down_surfaces_secondary_status() {
    let left_addr = common::start_mock_backend(500, "{}").await;
    let right_addr = common::start_mock_backend(502, "{}").await;

    let lb = AdaptiveFailoverBalancer::new(
        provider("neoscan", left_addr),
        provider("neondb", right_addr),
    )
        .with_random(SequenceDraws::constant(0.5));

    let err = get(&lb, "/v1/get_height").await.unwrap_err();
    match err {
        ProviderError::Status { provider, status } => {
            assert_eq!(provider, "neondb");
            assert_eq!(status, 502);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_http_connection_refused_falls_back() {
    // Bind and drop to get a port nothing listens on.
    let dead = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = dead.local_addr().unwrap();
    drop(dead);

    let right_addr = common::start_mock_backend(200, "{\"ok\":true}").await;
    let lb = AdaptiveFailoverBalancer::new(
        provider("neoscan", dead_addr),
        provider("neondb", right_addr),
    );

    let (name, body) = get(&lb, "status").await.unwrap();
    assert_eq!(name, "neondb");
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_http_invalid_json_is_a_failure() {
    let left_addr = common::start_mock_backend(200, "not json").await;
    let right_addr = common::start_mock_backend(200, "{\"ok\":true}").await;

    let lb = AdaptiveFailoverBalancer::new(
        provider("neoscan", left_addr),
        provider("neondb", right_addr),
    )
        .with_random(SequenceDraws::constant(0.5));

    let (name, _) = get(&lb, "status").await.unwrap();
    assert_eq!(name, "neondb");
}

#[test]
fn test_default_providers_build() {
    let providers = ProvidersConfig::default();
    let left = HttpProvider::from_config(&providers.left).unwrap();
    let right = HttpProvider::from_config(&providers.right).unwrap();
    assert_eq!(left.name(), "neoscan");
    assert_eq!(right.name(), "neondb");
}
