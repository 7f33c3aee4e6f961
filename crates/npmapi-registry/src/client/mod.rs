//! HTTP client for the npm registry, downloads API and npms.io

use std::time::Duration;
use chrono::NaiveDate;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use npmapi_core::error::NpmError;
use npmapi_core::utils::date::{format_day, today_utc, yesterday_utc};
use crate::api::{
    update_names, DayDownloads, DependedCount, DependedView, DownloadsRange, PackageDocument,
    PackageInfo, Score, ScoreResponse, UserProfile,
};
use crate::listing::{decode_bulk_listing, forward_response, listing_channel};
use crate::RegistryResult;

/// Configuration for exponential backoff retry logic
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial delay before first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

/// Endpoints and transport settings for one client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Registry base URL
    pub registry_url: String,
    /// Download statistics base URL
    pub downloads_url: String,
    /// npms.io API base URL
    pub score_url: String,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// User agent sent with every request
    pub user_agent: String,
    /// Capacity of the bulk listing chunk channel
    pub listing_buffer: usize,
    /// Retry configuration
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            registry_url: "https://registry.npmjs.org".to_string(),
            downloads_url: "https://api.npmjs.org".to_string(),
            score_url: "https://api.npms.io/v2".to_string(),
            timeout: None,
            user_agent: format!("npmapi/{}", env!("CARGO_PKG_VERSION")),
            listing_buffer: 32,
            retry: RetryConfig::default(),
        }
    }
}

/// Main HTTP client for registry operations
#[derive(Debug, Clone)]
pub struct RegistryClient {
    /// Underlying HTTP client with connection pooling
    client: Client,
    /// Endpoints, timeout and retry settings
    config: ClientConfig,
}

impl RegistryClient {
    /// Create new registry client against the public npm services
    pub fn new() -> RegistryResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create registry client with custom configuration
    pub fn with_config(config: ClientConfig) -> RegistryResult<Self> {
        let client = ClientBuilder::new()
            // Connection pooling configuration
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            // Enable gzip compression
            .gzip(true)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| NpmError::network(format!("Failed to create HTTP client: {}", e), e))?;

        Ok(Self { client, config })
    }

    /// Active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute HTTP request with exponential backoff retry logic
    async fn with_retry<F, Fut, T>(&self, operation: F) -> RegistryResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = RegistryResult<T>>,
    {
        let retry = &self.config.retry;
        let mut delay = retry.initial_delay;
        let mut last_error = None;

        for attempt in 0..=retry.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    // Not-found, empty and undecodable answers will not improve
                    if !error.is_recoverable() || attempt == retry.max_retries {
                        last_error = Some(error);
                        break;
                    }

                    warn!(attempt = attempt + 1, delay_ms = delay.as_millis() as u64, "retrying: {}", error);
                    last_error = Some(error);

                    tokio::time::sleep(delay).await;

                    delay = std::cmp::min(
                        Duration::from_millis((delay.as_millis() as f64 * retry.multiplier) as u64),
                        retry.max_delay,
                    );
                }
            }
        }

        Err(last_error.unwrap_or_else(|| NpmError::Network {
            message: "Retry operation failed without error".to_string(),
            source: None,
        }))
    }

    /// GET request carrying the configured timeout
    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url).header("Accept", "application/json");
        match self.config.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    /// Send a GET and classify the status; `not_found` builds the 404 error
    async fn send<N>(&self, url: &str, not_found: &N) -> RegistryResult<Response>
    where
        N: Fn() -> NpmError,
    {
        debug!(url, "GET");
        let response = self
            .get(url)
            .send()
            .await
            .map_err(|e| NpmError::network(format!("Failed to fetch {}: {}", url, e), e))?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(not_found()),
            status => Err(NpmError::Network {
                message: format!("{} returned status {}", url, status),
                source: None,
            }),
        }
    }

    /// Fetch and decode a JSON document with retry
    async fn fetch_json<T, N>(&self, url: &str, not_found: N) -> RegistryResult<T>
    where
        T: DeserializeOwned,
        N: Fn() -> NpmError,
    {
        self.with_retry(|| async {
            let response = self.send(url, &not_found).await?;
            response.json::<T>().await.map_err(|e| {
                if e.is_decode() {
                    NpmError::decode(format!("Invalid JSON from {}: {}", url, e), e)
                } else {
                    NpmError::network(format!("Failed to read {}: {}", url, e), e)
                }
            })
        })
        .await
    }

    /// Names of every package published at least once, sorted.
    ///
    /// The listing body is streamed into the listing decoder. Only the
    /// request itself is retried; a failure mid-body rejects the call.
    pub async fn get_all(&self) -> RegistryResult<Vec<String>> {
        let url = format!("{}/-/all/static/all.json", self.config.registry_url);
        let not_found = || NpmError::Network {
            message: format!("Bulk listing is not available at {}", url),
            source: None,
        };

        let response = self.with_retry(|| self.send(&url, &not_found)).await?;

        let (sink, source) = listing_channel(self.config.listing_buffer);
        let ((), names) = tokio::join!(forward_response(response, sink), decode_bulk_listing(source));
        let names = names?;

        info!(packages = names.len(), "fetched bulk listing");
        Ok(names)
    }

    /// Registry profile of a user
    pub async fn get_user(&self, name: &str) -> RegistryResult<UserProfile> {
        let url = format!("{}/-/user/org.couchdb.user:{}", self.config.registry_url, name);
        self.fetch_json(&url, || NpmError::UserNotFound { name: name.to_string() })
            .await
    }

    /// Summary of a package document
    pub async fn get_package(&self, name: &str) -> RegistryResult<PackageInfo> {
        let url = format!("{}/{}", self.config.registry_url, encode_package_name(name));
        let document: Value = self
            .fetch_json(&url, || NpmError::PackageNotFound { name: name.to_string() })
            .await?;

        if is_empty_document(&document) {
            return Err(NpmError::EmptyDocument { name: name.to_string() });
        }

        let document: PackageDocument = serde_json::from_value(document).map_err(|e| {
            NpmError::decode(format!("Unexpected package document for {}: {}", name, e), e)
        })?;
        Ok(document.into())
    }

    /// Daily downloads of a package between two days, inclusive
    pub async fn get_downloads(
        &self,
        name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RegistryResult<Vec<DayDownloads>> {
        let url = format!(
            "{}/downloads/range/{}:{}/{}",
            self.config.downloads_url,
            format_day(start),
            format_day(end),
            name
        );
        let range: DownloadsRange = self
            .fetch_json(&url, || NpmError::PackageNotFound { name: name.to_string() })
            .await?;
        Ok(range.downloads)
    }

    /// Downloads of a package on one day, `None` when the service has no entry for it
    pub async fn get_downloads_by_day(&self, name: &str, day: NaiveDate) -> RegistryResult<Option<u64>> {
        let downloads = self.get_downloads(name, day, day).await?;
        let day = format_day(day);
        Ok(downloads
            .first()
            .filter(|entry| entry.day == day)
            .map(|entry| entry.downloads))
    }

    /// Downloads of a package today (UTC)
    pub async fn get_today_downloads(&self, name: &str) -> RegistryResult<Option<u64>> {
        self.get_downloads_by_day(name, today_utc()).await
    }

    /// Downloads of a package yesterday (UTC)
    pub async fn get_yesterday_downloads(&self, name: &str) -> RegistryResult<Option<u64>> {
        self.get_downloads_by_day(name, yesterday_utc()).await
    }

    /// Names of packages updated today
    pub async fn get_today_updates(&self) -> RegistryResult<Vec<String>> {
        let url = format!("{}/-/all/static/today.json", self.config.registry_url);
        let document: Value = self
            .fetch_json(&url, || NpmError::Network {
                message: format!("Update listing is not available at {}", url),
                source: None,
            })
            .await?;
        Ok(update_names(&document))
    }

    /// Dependent counts for every package
    pub async fn get_dependeds(&self) -> RegistryResult<Vec<DependedCount>> {
        let url = format!("{}/-/_view/dependedUpon?group_level=1", self.config.registry_url);
        let view: DependedView = self
            .fetch_json(&url, || NpmError::Network {
                message: format!("Dependents view is not available at {}", url),
                source: None,
            })
            .await?;
        Ok(view.into_counts())
    }

    /// npms.io score of a package, `None` when it has not been analyzed
    pub async fn get_score(&self, name: &str) -> RegistryResult<Option<Score>> {
        let encoded: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
        let url = format!("{}/package/{}", self.config.score_url, encoded);
        let response: ScoreResponse = self
            .fetch_json(&url, || NpmError::PackageNotFound { name: name.to_string() })
            .await?;
        Ok(response.score.map(Score::from))
    }
}

/// Encode package name for URL (handle scoped packages)
fn encode_package_name(name: &str) -> String {
    if name.starts_with('@') {
        // Scoped package: @org/pkg → @org%2fpkg
        name.replace('/', "%2f")
    } else {
        name.to_string()
    }
}

fn is_empty_document(document: &Value) -> bool {
    match document {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
