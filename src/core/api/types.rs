//! Wire shapes for the subset of the GitHub REST API the tracker reads.
//!
//! Only the fields the tracker consumes are declared; everything else in the
//! payloads is ignored by serde.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::error::ApiError;

/// Decodes every item of a list response, failing on the first bad item.
pub fn decode_all<T: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>, ApiError> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(ApiError::from))
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoInfo {
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiAccount {
    pub login: String,
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
}

impl ApiAccount {
    pub fn is_user(&self) -> bool {
        self.account_type.as_deref() == Some("User")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCommit {
    pub sha: String,
    pub html_url: String,
    pub commit: CommitData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitData {
    pub message: String,
    pub author: CommitSignature,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitSignature {
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCommitDetail {
    #[serde(default)]
    pub stats: CommitStats,
    #[serde(default)]
    pub files: Vec<ApiFile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitStats {
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiFile {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub changes: u64,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUserRef {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPullRequest {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: Option<ApiUserRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiLabel {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiIssue {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels: Vec<ApiLabel>,
    #[serde(default)]
    pub user: Option<ApiUserRef>,
    /// Present only when the issue is really a pull request.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl ApiIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request
            .as_ref()
            .is_some_and(|marker| !marker.is_null())
    }
}

/// Items whose author may be checked against the contributor being tracked.
pub trait Authored {
    fn author_login(&self) -> Option<&str>;

    fn is_authored_by(&self, login: &str) -> bool {
        self.author_login()
            .is_none_or(|author| author.eq_ignore_ascii_case(login))
    }
}

impl Authored for ApiPullRequest {
    fn author_login(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.login.as_str())
    }
}

impl Authored for ApiIssue {
    fn author_login(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.login.as_str())
    }
}
