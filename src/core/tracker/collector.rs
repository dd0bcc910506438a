use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::join_all;
use tracing::{debug, info, warn};

use super::error::{Result, TrackError};
use crate::core::activity::{ActivityKind, ActivityRecord};
use crate::core::api::{
    decode_all, ApiClient, ApiCommit, ApiCommitDetail, ApiFile, ApiIssue, ApiPullRequest,
    Authored,
};

const ITEM_STATES: [&str; 2] = ["open", "closed"];

/// Gathers commits, pull requests and issues for one contributor of one
/// repository. Cheap to clone; all clones share the same request gate.
#[derive(Debug, Clone)]
pub struct ActivityCollector {
    client: ApiClient,
    repository: String,
    since: DateTime<Utc>,
}

impl ActivityCollector {
    pub fn new(client: ApiClient, repository: impl Into<String>, since: DateTime<Utc>) -> Self {
        Self {
            client,
            repository: repository.into(),
            since,
        }
    }

    /// Runs the three sub-fetches concurrently. A sub-fetch that fails is
    /// logged and contributes no records; the others are unaffected.
    pub async fn collect(&self, login: &str) -> Vec<ActivityRecord> {
        info!(contributor = login, repository = %self.repository, "processing activity");

        let (commits, pull_requests, issues) = futures::join!(
            self.commits(login),
            self.pull_requests(login),
            self.issues(login)
        );

        let mut records = Vec::new();
        for result in [commits, pull_requests, issues] {
            match result {
                Ok(batch) => records.extend(batch),
                Err(e) => warn!(contributor = login, kind = %e.kind(), error = %e, "sub-fetch failed"),
            }
        }

        debug!(contributor = login, records = records.len(), "activity collected");
        records
    }

    /// Commits authored by `login` since the cutoff, one detail call each.
    /// Commits whose detail call returns no data are skipped.
    pub async fn commits(&self, login: &str) -> Result<Vec<ActivityRecord>> {
        let path = format!("repos/{}/commits", self.repository);
        let query = [
            ("author", login.to_string()),
            ("since", self.since.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ];

        let commits: Vec<ApiCommit> = decode_all(self.client.paginate(&path, &query).await)
            .map_err(|e| TrackError::decode(ActivityKind::Commit, login, e))?;

        let details = join_all(commits.iter().map(|commit| {
            let path = format!("repos/{}/commits/{}", self.repository, commit.sha);
            async move { self.client.request(&path, &[]).await }
        }))
        .await;

        let mut records = Vec::with_capacity(commits.len());
        for (commit, detail) in commits.into_iter().zip(details) {
            let Some(detail) = detail.and_then(|items| items.into_iter().next()) else {
                debug!(contributor = login, sha = %commit.sha, "commit detail unavailable, skipping");
                continue;
            };
            let detail: ApiCommitDetail = serde_json::from_value(detail)
                .map_err(|e| TrackError::decode(ActivityKind::Commit, login, e))?;
            records.push(ActivityRecord::commit(login, &self.repository, commit, detail));
        }

        Ok(records)
    }

    /// Open and closed pull requests opened by `login`, with the file
    /// listing of each summed into line totals.
    pub async fn pull_requests(&self, login: &str) -> Result<Vec<ActivityRecord>> {
        let path = format!("repos/{}/pulls", self.repository);
        let mut seen = HashSet::new();
        let mut pulls = Vec::new();

        for state in ITEM_STATES {
            let items = self
                .client
                .paginate(&path, &listing_query(login, state))
                .await;
            let batch: Vec<ApiPullRequest> = decode_all(items)
                .map_err(|e| TrackError::decode(ActivityKind::PullRequest, login, e))?;

            pulls.extend(
                batch
                    .into_iter()
                    .filter(|pr| pr.is_authored_by(login))
                    .filter(|pr| seen.insert(pr.number)),
            );
        }

        let file_lists = join_all(pulls.iter().map(|pr| {
            let path = format!("repos/{}/pulls/{}/files", self.repository, pr.number);
            async move { self.client.paginate(&path, &[]).await }
        }))
        .await;

        let mut records = Vec::with_capacity(pulls.len());
        for (pr, files) in pulls.into_iter().zip(file_lists) {
            let files: Vec<ApiFile> = decode_all(files)
                .map_err(|e| TrackError::decode(ActivityKind::PullRequest, login, e))?;
            records.push(ActivityRecord::pull_request(login, &self.repository, pr, files));
        }

        Ok(records)
    }

    /// Open and closed issues opened by `login`. Pull requests reported
    /// through the issues endpoint are dropped.
    pub async fn issues(&self, login: &str) -> Result<Vec<ActivityRecord>> {
        let path = format!("repos/{}/issues", self.repository);
        let mut records = Vec::new();

        for state in ITEM_STATES {
            let items = self
                .client
                .paginate(&path, &listing_query(login, state))
                .await;
            let batch: Vec<ApiIssue> = decode_all(items)
                .map_err(|e| TrackError::decode(ActivityKind::Issue, login, e))?;

            records.extend(
                batch
                    .into_iter()
                    .filter(|issue| !issue.is_pull_request())
                    .filter(|issue| issue.is_authored_by(login))
                    .map(|issue| ActivityRecord::issue(login, &self.repository, issue)),
            );
        }

        Ok(records)
    }
}

fn listing_query(login: &str, state: &str) -> [(&'static str, String); 4] {
    [
        ("creator", login.to_string()),
        ("state", state.to_string()),
        ("sort", "updated".to_string()),
        ("direction", "desc".to_string()),
    ]
}
