#![allow(dead_code)]

use repotrack::core::api::ApiClient;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ORG: &str = "acme";
pub const REPO: &str = "widgets";

/// A mock GitHub API preloaded with a catch-all that answers every
/// unmatched GET with an empty list.
pub struct MockGitHub {
    pub server: MockServer,
}

impl MockGitHub {
    pub async fn start() -> Self {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .with_priority(50)
            .mount(&server)
            .await;

        Self { server }
    }

    #[must_use]
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    #[must_use]
    pub fn client(&self, max_concurrent: usize) -> ApiClient {
        ApiClient::with_base_url(&self.server.uri(), max_concurrent)
            .expect("failed to build client")
    }

    fn repo_path(suffix: &str) -> String {
        format!("/repos/{ORG}/{REPO}{suffix}")
    }

    pub async fn repository(&self) {
        Mock::given(method("GET"))
            .and(path(Self::repo_path("")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "full_name": format!("{ORG}/{REPO}"),
                "description": "Widgets for everyone",
                "language": "Rust",
                "stargazers_count": 42,
                "created_at": "2020-01-15T09:00:00Z"
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn repository_not_found(&self) {
        Mock::given(method("GET"))
            .and(path(Self::repo_path("")))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found"
            })))
            .mount(&self.server)
            .await;
    }

    /// `accounts` are `(login, type)` pairs.
    pub async fn contributors(&self, accounts: &[(&str, &str)]) {
        let body: Vec<Value> = accounts
            .iter()
            .map(|(login, kind)| json!({ "login": login, "type": kind }))
            .collect();

        Mock::given(method("GET"))
            .and(path(Self::repo_path("/contributors")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn org_members(&self, logins: &[&str]) {
        let body: Vec<Value> = logins.iter().map(|l| json!({ "login": l })).collect();

        Mock::given(method("GET"))
            .and(path(format!("/orgs/{ORG}/members")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// `commits` are `(sha, date, additions, deletions)`.
    pub async fn commits(&self, login: &str, commits: &[(&str, &str, u64, u64)]) {
        let listing: Vec<Value> = commits
            .iter()
            .map(|(sha, date, _, _)| {
                json!({
                    "sha": sha,
                    "html_url": format!("https://github.com/{ORG}/{REPO}/commit/{sha}"),
                    "commit": {
                        "message": format!("commit {sha}"),
                        "author": { "name": login, "date": date }
                    }
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path(Self::repo_path("/commits")))
            .and(query_param("author", login))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing))
            .mount(&self.server)
            .await;

        for (sha, _, additions, deletions) in commits {
            self.commit_detail(sha, *additions, *deletions).await;
        }
    }

    pub async fn commit_detail(&self, sha: &str, additions: u64, deletions: u64) {
        Mock::given(method("GET"))
            .and(path(Self::repo_path(&format!("/commits/{sha}"))))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sha": sha,
                "stats": {
                    "additions": additions,
                    "deletions": deletions,
                    "total": additions + deletions
                },
                "files": [{
                    "filename": "src/lib.rs",
                    "additions": additions,
                    "deletions": deletions,
                    "changes": additions + deletions,
                    "status": "modified"
                }]
            })))
            .mount(&self.server)
            .await;
    }

    /// Answers the pulls listing for `state` with `pulls`, regardless of
    /// the creator filter, like the real endpoint does.
    pub async fn pulls(&self, state: &str, pulls: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path(Self::repo_path("/pulls")))
            .and(query_param("state", state))
            .respond_with(ResponseTemplate::new(200).set_body_json(pulls))
            .mount(&self.server)
            .await;
    }

    /// `files` are `(filename, additions, deletions)`.
    pub async fn pull_files(&self, number: u64, files: &[(&str, u64, u64)]) {
        let body: Vec<Value> = files
            .iter()
            .map(|(name, additions, deletions)| {
                json!({
                    "filename": name,
                    "additions": additions,
                    "deletions": deletions,
                    "changes": additions + deletions,
                    "status": "modified"
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path(Self::repo_path(&format!("/pulls/{number}/files"))))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn issues(&self, login: &str, state: &str, issues: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path(Self::repo_path("/issues")))
            .and(query_param("creator", login))
            .and(query_param("state", state))
            .respond_with(ResponseTemplate::new(200).set_body_json(issues))
            .mount(&self.server)
            .await;
    }
}

#[must_use]
pub fn pull_request(number: u64, author: &str, state: &str, merged: bool) -> Value {
    json!({
        "number": number,
        "title": format!("PR #{number}"),
        "state": state,
        "html_url": format!("https://github.com/{ORG}/{REPO}/pull/{number}"),
        "created_at": "2024-06-05T10:00:00Z",
        "updated_at": "2024-06-06T10:00:00Z",
        "merged_at": if merged { Value::from("2024-06-06T10:00:00Z") } else { Value::Null },
        "user": { "login": author }
    })
}

#[must_use]
pub fn issue(number: u64, author: &str, state: &str) -> Value {
    json!({
        "number": number,
        "title": format!("Issue #{number}"),
        "state": state,
        "html_url": format!("https://github.com/{ORG}/{REPO}/issues/{number}"),
        "created_at": "2024-06-07T10:00:00Z",
        "updated_at": "2024-06-07T11:00:00Z",
        "closed_at": null,
        "labels": [{ "name": "bug" }],
        "user": { "login": author }
    })
}

/// An issues-endpoint item that is really a pull request.
#[must_use]
pub fn pull_request_as_issue(number: u64, author: &str, state: &str) -> Value {
    let mut value = issue(number, author, state);
    value["pull_request"] = json!({
        "url": format!("https://api.github.com/repos/{ORG}/{REPO}/pulls/{number}")
    });
    value
}
