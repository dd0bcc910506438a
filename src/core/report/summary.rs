use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::activity::{ActivityKind, ActivityRecord};

const RULE_WIDTH: usize = 80;
const NOT_AVAILABLE: &str = "N/A";

/// Per-contributor aggregate derived from that contributor's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub contributor: String,
    pub repository: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_created_at: Option<DateTime<Utc>>,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_activity: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_commit: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commit: Option<DateTime<Utc>>,
    pub total_commits: usize,
    pub total_pull_requests: usize,
    pub total_issues: usize,
    pub total_activities: usize,
    pub total_additions: u64,
    pub total_deletions: u64,
    pub net_changes: i64,
}

impl Summary {
    pub fn from_records(
        contributor: &str,
        repository: &str,
        repository_created_at: Option<DateTime<Utc>>,
        records: &[ActivityRecord],
        generated_at: DateTime<Utc>,
    ) -> Self {
        let mut sorted: Vec<&ActivityRecord> = records.iter().collect();
        sorted.sort_by_key(|r| r.timestamp());

        let count = |kind: ActivityKind| sorted.iter().filter(|r| r.kind() == kind).count();

        let mut commit_dates = sorted
            .iter()
            .filter(|r| r.kind() == ActivityKind::Commit)
            .map(|r| r.timestamp());
        let first_commit = commit_dates.next();
        let last_commit = commit_dates.last().or(first_commit);

        let (total_additions, total_deletions) = sorted
            .iter()
            .filter(|r| r.kind().counts_line_changes())
            .map(|r| r.detail().line_changes())
            .fold((0u64, 0u64), |(add, del), (a, d)| (add + a, del + d));

        Self {
            contributor: contributor.to_string(),
            repository: repository.to_string(),
            repository_created_at,
            generated_at,
            first_activity: sorted.first().map(|r| r.timestamp()),
            first_commit,
            last_commit,
            total_commits: count(ActivityKind::Commit),
            total_pull_requests: count(ActivityKind::PullRequest),
            total_issues: count(ActivityKind::Issue),
            total_activities: sorted.len(),
            total_additions,
            total_deletions,
            net_changes: total_additions as i64 - total_deletions as i64,
        }
    }

    pub fn to_text(&self) -> String {
        let date = |d: Option<DateTime<Utc>>| {
            d.map(|d| d.to_rfc3339())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };

        let mut out = String::new();
        let _ = writeln!(out, "GitHub Activity Report for: {}", self.contributor);
        let _ = writeln!(out, "Repository: {}", self.repository);
        let _ = writeln!(
            out,
            "Repository Created: {}",
            date(self.repository_created_at)
        );
        let _ = writeln!(
            out,
            "Generated on: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        );
        let _ = writeln!(out, "{}\n", "=".repeat(RULE_WIDTH));
        let _ = writeln!(out, "Date Started Working: {}", date(self.first_activity));
        let _ = writeln!(out, "First Commit Date: {}", date(self.first_commit));
        let _ = writeln!(out, "Last Commit Date: {}", date(self.last_commit));
        let _ = writeln!(out, "Total Commits: {}", self.total_commits);
        let _ = writeln!(out, "Total Pull Requests: {}", self.total_pull_requests);
        let _ = writeln!(out, "Total Issues: {}", self.total_issues);
        let _ = writeln!(out, "Total Activities: {}", self.total_activities);
        let _ = writeln!(out, "Net Changes: {:+}", self.net_changes);
        let _ = writeln!(
            out,
            "Total Changes: +{} -{}",
            self.total_additions, self.total_deletions
        );
        out
    }
}
