//! Integration tests for the full watcher pipeline: a real log file followed
//! by the tailer, the detection engine, and a mockito webhook endpoint.

use std::{io::Write, path::Path, time::Duration};

use poolwatch::{config::AppConfig, supervisor::Watcher};
use tempfile::TempDir;
use url::Url;

fn append(path: &Path, content: &str) {
    let mut file = std::fs::OpenOptions::new().create(true).append(true).open(path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
}

fn test_config(log: &Path, webhook_url: Option<Url>) -> AppConfig {
    let mut config = AppConfig::default();
    config.log_file = log.to_path_buf();
    config.webhook_url = webhook_url;
    config.poll_interval_ms = Duration::from_millis(10);
    config
}

/// Drives the watcher over `lines`, then cancels it once the settle period
/// has elapsed.
async fn run_watcher_over(config: AppConfig, log: &Path, lines: &str) {
    let watcher = Watcher::builder().config(config).build().unwrap();
    let token = watcher.cancellation_token();
    let handle = tokio::spawn(watcher.run());

    append(log, lines);
    tokio::time::sleep(Duration::from_millis(300)).await;
    token.cancel();

    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn failover_storm_inside_cooldown_posts_once() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(mockito::Matcher::Regex("Failover detected".to_string()))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let log = dir.path().join("access.log");
    append(&log, "");

    let mut config = test_config(&log, Some(Url::parse(&server.url()).unwrap()));
    config.alert_cooldown_secs = Duration::from_secs(300);

    // Two transitions (a->b, b->a) plus a garbage line; the shared cooldown
    // lets exactly one alert through and the garbage is skipped.
    let lines = concat!(
        r#"{"pool":"a","status":200}"#, "\n",
        r#"{"pool":"b","status":200}"#, "\n",
        "}{ definitely not json\n",
        r#"{"pool":"a","status":200}"#, "\n",
    );
    run_watcher_over(config, &log, lines).await;

    mock.assert_async().await;
}

#[tokio::test]
async fn elevated_error_rate_posts_decorated_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(mockito::Matcher::Regex(
            ":rotating_light: High error rate: 50.0%".to_string(),
        ))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let log = dir.path().join("access.log");
    append(&log, "");

    let mut config = test_config(&log, Some(Url::parse(&server.url()).unwrap()));
    config.window_size = 4;
    config.error_rate_threshold = 40.0;

    let lines = concat!(
        r#"{"pool":"a","status":200}"#, "\n",
        r#"{"pool":"a","status":500}"#, "\n",
        r#"{"pool":"a","status":500}"#, "\n",
        r#"{"pool":"a","status":200}"#, "\n",
    );
    run_watcher_over(config, &log, lines).await;

    mock.assert_async().await;
}

#[tokio::test]
async fn runs_without_webhook_configured() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("access.log");
    append(&log, "");

    let mut config = test_config(&log, None);
    config.window_size = 2;
    config.error_rate_threshold = 1.0;

    // Alert conditions fire but degrade to local logging; the loop keeps
    // running and shuts down cleanly.
    let lines = concat!(
        r#"{"pool":"a","status":500}"#, "\n",
        r#"{"pool":"b","status":500}"#, "\n",
    );
    run_watcher_over(config, &log, lines).await;
}

#[tokio::test]
async fn transport_failure_is_not_fatal() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", "/").with_status(503).expect(1).create_async().await;

    let dir = TempDir::new().unwrap();
    let log = dir.path().join("access.log");
    append(&log, "");

    let config = test_config(&log, Some(Url::parse(&server.url()).unwrap()));

    let lines = concat!(
        r#"{"pool":"a","status":200}"#, "\n",
        r#"{"pool":"b","status":200}"#, "\n",
    );
    run_watcher_over(config, &log, lines).await;

    mock.assert_async().await;
}
