//! Unit tests for CLI commands.

use super::*;
use crate::Cli;
use chrono::NaiveDate;
use clap::Parser;
use npmapi_registry::DependedCount;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create a test command context pointed at a mock server
fn create_test_context(server: &MockServer) -> CommandContext {
    let mut config = ApiToml::default();
    config.registry.url = format!("{}/", server.uri());
    config.registry.downloads_url = server.uri();
    config.registry.score_url = server.uri();
    config.retry.max_retries = 0;

    CommandContext {
        client: RegistryClient::with_config(client_config(&config)).unwrap(),
        output: crate::output::OutputHandler::new(),
    }
}

fn counts(pairs: &[(&str, u64)]) -> Vec<DependedCount> {
    pairs
        .iter()
        .map(|(name, count)| DependedCount { name: name.to_string(), count: *count })
        .collect()
}

#[test]
fn test_parse_all_with_global_flags() {
    let cli = Cli::try_parse_from([
        "npmapi", "all", "--min-count", "10", "--timeout", "30", "--registry", "http://localhost:4873",
    ])
    .unwrap();

    match cli.command {
        Commands::All { min_count, count } => {
            assert_eq!(min_count, Some(10));
            assert!(!count);
        }
        _ => panic!("Expected the all command"),
    }

    let overrides = cli.config_overrides();
    assert_eq!(overrides.get("timeout").map(String::as_str), Some("30"));
    assert_eq!(overrides.get("registry").map(String::as_str), Some("http://localhost:4873"));
}

#[test]
fn test_parse_downloads_dates() {
    let cli = Cli::try_parse_from(["npmapi", "downloads", "left-pad", "2024-01-01", "2024-01-31"]).unwrap();
    match cli.command {
        Commands::Downloads { name, start, end } => {
            assert_eq!(name, "left-pad");
            assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
            assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        }
        _ => panic!("Expected the downloads command"),
    }

    assert!(Cli::try_parse_from(["npmapi", "downloads", "left-pad", "yesterday", "today"]).is_err());
}

#[test]
fn test_no_overrides_without_flags() {
    let cli = Cli::try_parse_from(["npmapi", "updates"]).unwrap();
    assert!(cli.config_overrides().is_empty());
}

#[test]
fn test_client_config_from_toml() {
    let mut config = ApiToml::default();
    config.registry.url = "http://localhost:4873/".to_string();
    config.http.timeout_secs = 20;
    config.retry.initial_delay_ms = 50;

    let client = client_config(&config);
    assert_eq!(client.registry_url, "http://localhost:4873");
    assert_eq!(client.timeout, Some(Duration::from_secs(20)));
    assert_eq!(client.retry.initial_delay, Duration::from_millis(50));
    assert_eq!(client.user_agent, ClientConfig::default().user_agent);

    config.http.user_agent = Some("mirror-sync/1.0".to_string());
    assert_eq!(client_config(&config).user_agent, "mirror-sync/1.0");
}

#[test]
fn test_check_min_count() {
    assert!(listing::check_min_count(5, None).is_ok());
    assert!(listing::check_min_count(5, Some(5)).is_ok());

    match listing::check_min_count(4, Some(5)).unwrap_err() {
        NpmError::ListingTooSmall { count, minimum } => {
            assert_eq!(count, 4);
            assert_eq!(minimum, 5);
        }
        other => panic!("Expected ListingTooSmall error, got {:?}", other),
    }
}

#[test]
fn test_top_depended() {
    let all = counts(&[("a", 3), ("b", 10), ("c", 3), ("d", 1)]);

    assert_eq!(listing::top_depended(all.clone(), None), all);
    assert_eq!(
        listing::top_depended(all, Some(3)),
        counts(&[("b", 10), ("a", 3), ("c", 3)])
    );
}

#[tokio::test]
async fn test_all_command_enforces_min_count() {
    let server = MockServer::start().await;
    let body = r#"{"_updated":1,"a":{"name":"a","time":{"modified":"2024-01-01T00:00:00Z"}},"b":{"name":"b"}}"#;
    Mock::given(method("GET"))
        .and(path("/-/all/static/all.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let ctx = create_test_context(&server);
    assert!(listing::all(Some(1), true, &ctx).await.is_ok());

    let result = listing::all(Some(2), true, &ctx).await;
    assert!(matches!(result, Err(NpmError::ListingTooSmall { count: 1, minimum: 2 })));
}

#[tokio::test]
async fn test_info_command_reports_missing_package() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/no-such-package"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let ctx = create_test_context(&server);
    let result = package::info("no-such-package", &ctx).await;
    assert!(matches!(result, Err(NpmError::PackageNotFound { .. })));
}

#[tokio::test]
async fn test_downloads_range_rejects_reversed_days() {
    let server = MockServer::start().await;
    let ctx = create_test_context(&server);

    let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let result = downloads::range("left-pad", start, end, &ctx).await;
    assert!(matches!(result, Err(NpmError::ConfigValidation { .. })));
}
