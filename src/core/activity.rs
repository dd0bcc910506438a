//! Activity records collected per contributor.
//!
//! A record is built once from API data and never mutated afterwards. The
//! kind-specific payload is a tagged variant, so each kind always carries
//! exactly the fields its reports need.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::api::{ApiCommit, ApiCommitDetail, ApiFile, ApiIssue, ApiPullRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Commit,
    PullRequest,
    Issue,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Commit => "commit",
            ActivityKind::PullRequest => "pull_request",
            ActivityKind::Issue => "issue",
        }
    }

    /// Whether records of this kind carry line additions/deletions.
    pub fn counts_line_changes(&self) -> bool {
        matches!(self, ActivityKind::Commit | ActivityKind::PullRequest)
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub filename: String,
    pub additions: u64,
    pub deletions: u64,
    pub changes: u64,
    pub status: String,
}

impl From<ApiFile> for FileChange {
    fn from(file: ApiFile) -> Self {
        Self {
            filename: file.filename,
            additions: file.additions,
            deletions: file.deletions,
            changes: file.changes,
            status: file.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitDetail {
    pub sha: String,
    pub message: String,
    pub total_additions: u64,
    pub total_deletions: u64,
    pub total_changes: u64,
    pub files_changed: Vec<FileChange>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestDetail {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub merged: bool,
    pub total_additions: u64,
    pub total_deletions: u64,
    pub files_changed: Vec<FileChange>,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueDetail {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub labels: Vec<String>,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityDetail {
    Commit(CommitDetail),
    PullRequest(PullRequestDetail),
    Issue(IssueDetail),
}

impl ActivityDetail {
    pub fn kind(&self) -> ActivityKind {
        match self {
            ActivityDetail::Commit(_) => ActivityKind::Commit,
            ActivityDetail::PullRequest(_) => ActivityKind::PullRequest,
            ActivityDetail::Issue(_) => ActivityKind::Issue,
        }
    }

    /// `(additions, deletions)`; issues never carry line changes.
    pub fn line_changes(&self) -> (u64, u64) {
        match self {
            ActivityDetail::Commit(c) => (c.total_additions, c.total_deletions),
            ActivityDetail::PullRequest(pr) => (pr.total_additions, pr.total_deletions),
            ActivityDetail::Issue(_) => (0, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityRecord {
    contributor: String,
    repository: String,
    timestamp: DateTime<Utc>,
    detail: ActivityDetail,
}

impl ActivityRecord {
    pub fn new(
        contributor: impl Into<String>,
        repository: impl Into<String>,
        timestamp: DateTime<Utc>,
        detail: ActivityDetail,
    ) -> Self {
        Self {
            contributor: contributor.into(),
            repository: repository.into(),
            timestamp,
            detail,
        }
    }

    pub fn commit(
        contributor: &str,
        repository: &str,
        commit: ApiCommit,
        detail: ApiCommitDetail,
    ) -> Self {
        let timestamp = commit.commit.author.date;
        Self::new(
            contributor,
            repository,
            timestamp,
            ActivityDetail::Commit(CommitDetail {
                sha: commit.sha,
                message: commit.commit.message,
                total_additions: detail.stats.additions,
                total_deletions: detail.stats.deletions,
                total_changes: detail.stats.total,
                files_changed: detail.files.into_iter().map(FileChange::from).collect(),
                url: commit.html_url,
            }),
        )
    }

    pub fn pull_request(
        contributor: &str,
        repository: &str,
        pr: ApiPullRequest,
        files: Vec<ApiFile>,
    ) -> Self {
        let files_changed: Vec<FileChange> = files.into_iter().map(FileChange::from).collect();
        let total_additions = files_changed.iter().map(|f| f.additions).sum();
        let total_deletions = files_changed.iter().map(|f| f.deletions).sum();

        Self::new(
            contributor,
            repository,
            pr.created_at,
            ActivityDetail::PullRequest(PullRequestDetail {
                number: pr.number,
                title: pr.title,
                state: pr.state,
                merged: pr.merged_at.is_some(),
                total_additions,
                total_deletions,
                files_changed,
                url: pr.html_url,
                created_at: pr.created_at,
                updated_at: pr.updated_at,
                merged_at: pr.merged_at,
            }),
        )
    }

    pub fn issue(contributor: &str, repository: &str, issue: ApiIssue) -> Self {
        Self::new(
            contributor,
            repository,
            issue.created_at,
            ActivityDetail::Issue(IssueDetail {
                number: issue.number,
                title: issue.title,
                state: issue.state,
                labels: issue.labels.into_iter().map(|l| l.name).collect(),
                url: issue.html_url,
                created_at: issue.created_at,
                updated_at: issue.updated_at,
                closed_at: issue.closed_at,
            }),
        )
    }

    pub fn contributor(&self) -> &str {
        &self.contributor
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn kind(&self) -> ActivityKind {
        self.detail.kind()
    }

    pub fn detail(&self) -> &ActivityDetail {
        &self.detail
    }
}
