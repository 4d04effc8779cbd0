//! Alert delivery to a webhook

use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use web_monitor::alert::{AlertEngine, AlertKind};
use web_monitor::config::Webhook;
use web_monitor::monitor::{Job, Monitor};
use web_monitor::notify::Notifier;
use web_monitor::scheduler::Scheduler;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::*;

#[tokio::test]
async fn test_notifier_posts_event() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_partial_json(json!({
            "target": "https://example.com/",
            "kind": "down",
            "availability": 12.5
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut engine = AlertEngine::new("https://example.com/", 80.0);
    let event = engine.evaluate(12.5).cloned().unwrap();
    assert_eq!(event.kind, AlertKind::Down);
    assert!(event.timestamp <= Utc::now());

    let notifier = Notifier::new(
        Webhook {
            url: format!("{}/hook", mock_server.uri()),
        },
        Duration::from_secs(5),
    )
    .unwrap();
    notifier.notify(&event).await;
}

#[tokio::test]
async fn test_notifier_survives_failing_webhook() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut engine = AlertEngine::new("https://example.com/", 80.0);
    let event = engine.evaluate(0.0).cloned().unwrap();

    let notifier = Notifier::new(
        Webhook {
            url: mock_server.uri(),
        },
        Duration::from_secs(5),
    )
    .unwrap();

    // Must not panic or error
    notifier.notify(&event).await;
}

#[tokio::test]
async fn test_monitor_forwards_alerts_to_webhook() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_partial_json(json!({ "kind": "down" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config("https://example.com/");
    config.alert.webhook = Some(Webhook {
        url: format!("{}/hook", mock_server.uri()),
    });

    let mut monitor = Monitor::from_config(
        &config,
        Box::new(ScriptedProbe::new(&[503])),
        Box::new(RecordingRender::default()),
    )
    .unwrap();
    let mut scheduler: Scheduler<Job> = Scheduler::new();
    monitor.schedule(&mut scheduler).unwrap();

    // Probe and both refreshes are due immediately
    for _ in 0..3 {
        assert!(scheduler.step(&mut monitor).await.unwrap().succeeded);
    }

    assert_eq!(monitor.targets()[0].alerts().len(), 1);
}
