use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, TimeDelta, Utc};
use futures::future::join_all;
use tracing::{error, info, warn};

use super::collector::ActivityCollector;
use crate::core::activity::ActivityRecord;
use crate::core::api::{decode_all, ApiAccount, ApiClient, RepoInfo};

/// Which accounts get an activity report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackScope {
    /// Accounts of type `User` listed as repository contributors.
    #[default]
    Contributors,
    /// Contributors plus every member of the owning organization.
    ContributorsAndMembers,
}

#[derive(Debug, Default)]
pub struct TrackingResult {
    /// `None` when the repository could not be verified.
    pub repository: Option<RepoInfo>,
    pub activities: BTreeMap<String, Vec<ActivityRecord>>,
}

impl TrackingResult {
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct RepoTracker {
    client: ApiClient,
    org: String,
    repo: String,
    scope: TrackScope,
}

impl RepoTracker {
    pub fn new(client: ApiClient, org: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            client,
            org: org.into(),
            repo: repo.into(),
            scope: TrackScope::default(),
        }
    }

    pub fn with_scope(mut self, scope: TrackScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.org, self.repo)
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn verify_repository(&self) -> Option<RepoInfo> {
        let full_name = self.full_name();
        info!(repository = %full_name, "checking repository");

        let item = self
            .client
            .request(&format!("repos/{full_name}"), &[])
            .await?
            .into_iter()
            .next()?;

        match serde_json::from_value::<RepoInfo>(item) {
            Ok(repo) => {
                info!(
                    repository = %repo.full_name,
                    description = repo.description.as_deref().unwrap_or("No description"),
                    language = repo.language.as_deref().unwrap_or("Not specified"),
                    stars = repo.stargazers_count,
                    "repository found"
                );
                Some(repo)
            }
            Err(e) => {
                warn!(repository = %full_name, error = %e, "unreadable repository metadata");
                None
            }
        }
    }

    pub async fn list_contributors(&self) -> Vec<String> {
        let path = format!("repos/{}/contributors", self.full_name());
        let accounts = self.list_accounts(&path).await;
        let logins: Vec<String> = accounts
            .into_iter()
            .filter(ApiAccount::is_user)
            .map(|a| a.login)
            .collect();
        info!(count = logins.len(), "contributors found");
        logins
    }

    pub async fn list_org_members(&self) -> Vec<String> {
        let path = format!("orgs/{}/members", self.org);
        let logins: Vec<String> = self
            .list_accounts(&path)
            .await
            .into_iter()
            .map(|a| a.login)
            .collect();
        info!(org = %self.org, count = logins.len(), "organization members found");
        logins
    }

    async fn list_accounts(&self, path: &str) -> Vec<ApiAccount> {
        let items = self.client.paginate(path, &[]).await;
        decode_all(items).unwrap_or_else(|e| {
            warn!(path, error = %e, "unreadable account listing");
            Vec::new()
        })
    }

    /// Logins to track under the configured scope, deduplicated, in
    /// discovery order.
    pub async fn discover(&self) -> Vec<String> {
        let mut logins = self.list_contributors().await;

        if self.scope == TrackScope::ContributorsAndMembers {
            logins.extend(self.list_org_members().await);
        }

        let mut seen = HashSet::new();
        logins.retain(|login| seen.insert(login.to_ascii_lowercase()));
        logins
    }

    pub async fn track(&self, days: u32) -> TrackingResult {
        let since = lookback_start(Utc::now(), days);
        info!(
            repository = %self.full_name(),
            days,
            since = %since.date_naive(),
            "starting repository tracking"
        );
        self.track_since(since).await
    }

    /// Verify, discover, fan out one collector task per login, then keep
    /// only logins with at least one record. Never fails: every problem
    /// shows up as a log line and a smaller result.
    pub async fn track_since(&self, since: DateTime<Utc>) -> TrackingResult {
        let Some(repository) = self.verify_repository().await else {
            error!(repository = %self.full_name(), "repository not found or not accessible");
            return TrackingResult::default();
        };

        let logins = self.discover().await;
        if logins.is_empty() {
            error!(repository = %self.full_name(), "no contributors found or API access denied");
            return TrackingResult {
                repository: Some(repository),
                activities: BTreeMap::new(),
            };
        }

        info!(count = logins.len(), "processing contributors");
        let collector = ActivityCollector::new(self.client.clone(), self.full_name(), since);

        let handles = logins.iter().map(|login| {
            let collector = collector.clone();
            let login = login.clone();
            tokio::spawn(async move { collector.collect(&login).await })
        });
        let outcomes = join_all(handles).await;

        let mut activities = BTreeMap::new();
        for (login, outcome) in logins.into_iter().zip(outcomes) {
            match outcome {
                Ok(records) if !records.is_empty() => {
                    activities.insert(login, records);
                }
                Ok(_) => info!(contributor = %login, "no activity, skipping"),
                Err(e) => error!(contributor = %login, error = %e, "failed to process contributor"),
            }
        }

        TrackingResult {
            repository: Some(repository),
            activities,
        }
    }
}

/// Start of a `days`-long window ending at `now`, never earlier than the
/// Unix epoch (GitHub has no activity before it).
pub fn lookback_start(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    TimeDelta::try_days(i64::from(days))
        .and_then(|window| now.checked_sub_signed(window))
        .map_or(DateTime::<Utc>::UNIX_EPOCH, |since| since.max(DateTime::<Utc>::UNIX_EPOCH))
}
