use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::error::ApiError;
use crate::core::config::{GitHubConfig, TrackerConfig};

pub const USER_AGENT_VALUE: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const API_VERSION_HEADER: &str = "x-github-api-version";

/// Counters kept by the gate for the run summary.
#[derive(Debug, Default)]
struct GateCounters {
    requests: AtomicU64,
    failures: AtomicU64,
    rate_limit_waits: AtomicU64,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateStats {
    pub requests: u64,
    pub failures: u64,
    pub rate_limit_waits: u64,
    pub peak_in_flight: usize,
}

/// Tracks one in-flight attempt; decrements on drop so early returns and
/// errors cannot leave the counter raised.
struct InFlight<'a> {
    counters: &'a GateCounters,
}

impl<'a> InFlight<'a> {
    fn enter(counters: &'a GateCounters) -> Self {
        let now = counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        counters.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        Self { counters }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The single outbound path to the GitHub API.
///
/// Every call acquires one permit from a shared semaphore for the duration
/// of the HTTP attempt, so at most `max_concurrent` requests are ever in
/// flight. Rate-limit responses are waited out and replayed up to
/// `max_rate_limit_retries` times; every other failure is logged and
/// reported to the caller as `None`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    permits: Arc<Semaphore>,
    max_rate_limit_retries: u32,
    counters: Arc<GateCounters>,
}

impl ApiClient {
    pub fn new(
        token: &SecretString,
        github: &GitHubConfig,
        tracker: &TrackerConfig,
    ) -> Result<Self, ApiError> {
        if tracker.max_concurrent == 0 {
            return Err(ApiError::InvalidConfiguration(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            API_VERSION_HEADER,
            HeaderValue::from_str(&github.api_version)?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(github.request_timeout_secs))
            .connect_timeout(Duration::from_secs(github.connect_timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: github.api_url.trim_end_matches('/').to_string(),
            permits: Arc::new(Semaphore::new(tracker.max_concurrent)),
            max_rate_limit_retries: tracker.max_rate_limit_retries,
            counters: Arc::new(GateCounters::default()),
        })
    }

    pub fn with_base_url(base_url: &str, max_concurrent: usize) -> Result<Self, ApiError> {
        let github = GitHubConfig {
            api_url: base_url.to_string(),
            ..GitHubConfig::default()
        };
        let tracker = TrackerConfig {
            max_concurrent,
            ..TrackerConfig::default()
        };
        Self::new(&SecretString::from("test-token"), &github, &tracker)
    }

    pub fn with_max_rate_limit_retries(mut self, retries: u32) -> Self {
        self.max_rate_limit_retries = retries;
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn stats(&self) -> GateStats {
        GateStats {
            requests: self.counters.requests.load(Ordering::SeqCst),
            failures: self.counters.failures.load(Ordering::SeqCst),
            rate_limit_waits: self.counters.rate_limit_waits.load(Ordering::SeqCst),
            peak_in_flight: self.counters.peak_in_flight.load(Ordering::SeqCst),
        }
    }

    /// Issues a GET against `path` and returns the body as a list.
    ///
    /// A single JSON object is wrapped into a one-element list. `None` means
    /// "no data": the call failed, or rate-limit retries ran out.
    pub async fn request(&self, path: &str, query: &[(&str, String)]) -> Option<Vec<Value>> {
        let url = self.url(path);
        let mut waits = 0u32;

        loop {
            match self.attempt(&url, query).await {
                Ok(items) => return Some(items),
                Err(ApiError::RateLimited { wait }) if waits < self.max_rate_limit_retries => {
                    waits += 1;
                    self.counters.rate_limit_waits.fetch_add(1, Ordering::SeqCst);
                    warn!(
                        url = %url,
                        wait_secs = wait.as_secs(),
                        attempt = waits,
                        "rate limit hit, waiting before retry"
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(e) => {
                    self.counters.failures.fetch_add(1, Ordering::SeqCst);
                    if e.is_not_found() {
                        debug!(url = %url, "resource not found");
                    } else {
                        warn!(url = %url, error = %e, "API request failed");
                    }
                    return None;
                }
            }
        }
    }

    /// One HTTP attempt under a permit. The permit is dropped before the
    /// caller sleeps out a rate limit.
    async fn attempt(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<Value>, ApiError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ApiError::InvalidConfiguration("request gate closed".to_string()))?;
        let _in_flight = InFlight::enter(&self.counters);
        self.counters.requests.fetch_add(1, Ordering::SeqCst);

        debug!(url, ?query, "GET");
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();

        if status == StatusCode::OK {
            let body: Value = response.json().await?;
            return Ok(match body {
                Value::Array(items) => items,
                other => vec![other],
            });
        }

        if let Some(wait) = rate_limit_wait(status, response.headers(), Utc::now().timestamp()) {
            return Err(ApiError::RateLimited { wait });
        }

        Err(ApiError::ApiResponse {
            status: status.as_u16(),
            message: response.text().await.unwrap_or_default(),
        })
    }
}

/// Returns how long to wait when `status`/`headers` describe a rate limit.
///
/// `retry-after` wins when present; otherwise a reset time (or an exhausted
/// quota) means waiting until one second past `x-ratelimit-reset`. A 403
/// with quota left, or with no rate-limit headers at all, is a plain
/// permission error.
pub fn rate_limit_wait(status: StatusCode, headers: &HeaderMap, now_epoch: i64) -> Option<Duration> {
    if status != StatusCode::FORBIDDEN && status != StatusCode::TOO_MANY_REQUESTS {
        return None;
    }

    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    if let Some(secs) = header("retry-after").and_then(|v| v.trim().parse::<u64>().ok()) {
        return Some(Duration::from_secs(secs));
    }

    let remaining = header("x-ratelimit-remaining").map(str::trim);
    if remaining.is_some_and(|r| r != "0") {
        return None;
    }

    let reset = header("x-ratelimit-reset").and_then(|v| v.trim().parse::<i64>().ok());
    if reset.is_none() && remaining.is_none() {
        return None;
    }

    let until_reset = reset.unwrap_or(0).saturating_sub(now_epoch).max(0) as u64;
    Some(Duration::from_secs(until_reset.saturating_add(1)))
}
