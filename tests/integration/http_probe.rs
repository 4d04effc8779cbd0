//! HTTP probe against a mock server
//!
//! These tests verify that every transport outcome becomes a sample:
//! - responses are classified by status family
//! - redirects are not followed and count against availability
//! - timeouts report the probe timeout as latency
//! - refused connections count as server errors

use std::time::Duration;

use web_monitor::metrics::{MetricEngine, Timeframe};
use web_monitor::probe::{HttpProbe, Probe};
use web_monitor::sample::{Sample, StatusClass};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn probe_status(status: u16) -> StatusClass {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(&mock_server)
        .await;

    let probe = HttpProbe::new(Duration::from_secs(5)).unwrap();
    let sample = probe
        .probe(&format!("{}/health", mock_server.uri()))
        .await;

    sample.status()
}

#[tokio::test]
async fn test_probe_classifies_responses() {
    assert_eq!(probe_status(200).await, StatusClass::Success);
    assert_eq!(probe_status(204).await, StatusClass::Success);
    assert_eq!(probe_status(404).await, StatusClass::ClientError);
    assert_eq!(probe_status(503).await, StatusClass::ServerError);
    assert_eq!(probe_status(304).await, StatusClass::Other);
}

#[tokio::test]
async fn test_probe_reports_redirect_without_following() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let probe = HttpProbe::new(Duration::from_secs(5)).unwrap();
    let redirected = probe.probe(&format!("{}/old", mock_server.uri())).await;
    assert_eq!(redirected.status(), StatusClass::Other);

    // A redirect is not an available response
    let engine = MetricEngine::new(Duration::from_secs(1));
    let timeframe = Timeframe::new("2s", Duration::from_secs(2), Duration::from_secs(1));
    let ok = Sample::from_response(Duration::from_millis(50), 200);
    let snapshot = engine.compute(&timeframe, &[ok, redirected]);

    assert_eq!(snapshot.availability, 50.0);
    assert_eq!(snapshot.count_2xx, 1);
    assert_eq!(snapshot.count_other, 1);
}

#[tokio::test]
async fn test_probe_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let timeout = Duration::from_millis(200);
    let probe = HttpProbe::new(timeout).unwrap();
    let sample = probe.probe(&mock_server.uri()).await;

    assert_eq!(sample.status(), StatusClass::Timeout);
    assert_eq!(sample.latency(), probe.timeout());
    assert_eq!(probe.timeout(), timeout);
}

#[tokio::test]
async fn test_probe_connection_refused() {
    // Reserve a free port, then close it again
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let probe = HttpProbe::new(Duration::from_secs(1)).unwrap();
    let sample = probe.probe(&format!("http://127.0.0.1:{port}/")).await;

    assert_eq!(sample.status(), StatusClass::ServerError);
    assert_eq!(sample.latency(), Duration::ZERO);
}
