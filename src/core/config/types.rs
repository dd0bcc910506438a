use serde::Deserialize;

use crate::core::report::ReportFormat;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub tracker: TrackerConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_api_version() -> String {
    "2022-11-28".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Upper bound on simultaneous outbound requests.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Lookback window for commits, in days.
    #[serde(default = "default_days")]
    pub days: u32,

    #[serde(default = "default_max_rate_limit_retries")]
    pub max_rate_limit_retries: u32,
}

fn default_max_concurrent() -> usize {
    20
}

fn default_days() -> u32 {
    30
}

fn default_max_rate_limit_retries() -> u32 {
    10
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            days: default_days(),
            max_rate_limit_retries: default_max_rate_limit_retries(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: ReportFormat,

    #[serde(default)]
    pub output_dir: Option<String>,
}
