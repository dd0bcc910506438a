use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, error, info};

use super::summary::Summary;
use super::{ReportError, ReportFormat};
use crate::core::tracker::TrackingResult;

#[derive(Debug, Default)]
pub struct WriteOutcome {
    pub written: Vec<PathBuf>,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    format: ReportFormat,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>, format: ReportFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
        }
    }

    pub fn default_output_dir(repo: &str) -> PathBuf {
        PathBuf::from(format!("github_activities_{repo}"))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn path_for(&self, contributor: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{}.{}",
            file_stem(contributor),
            self.format.extension()
        ))
    }

    pub fn render(&self, summary: &Summary) -> Result<String, ReportError> {
        Ok(match self.format {
            ReportFormat::Text => summary.to_text(),
            ReportFormat::Json => serde_json::to_string_pretty(summary)?,
            ReportFormat::Toml => toml::to_string(summary)?,
        })
    }

    /// Summarizes every retained contributor in `result` and writes one file
    /// each. Only a failure to create the output directory is an error;
    /// a file that cannot be written is logged and counted.
    pub async fn write_reports(
        &self,
        result: &TrackingResult,
        repository: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<WriteOutcome, ReportError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        info!(output_dir = %self.output_dir.display(), "saving activity reports");

        let created_at = result.repository.as_ref().and_then(|r| r.created_at);
        let writes = result.activities.iter().map(|(login, records)| {
            let summary =
                Summary::from_records(login, repository, created_at, records, generated_at);
            self.write_one(summary)
        });

        let mut outcome = WriteOutcome::default();
        for written in join_all(writes).await {
            match written {
                Ok(path) => outcome.written.push(path),
                Err(e) => {
                    error!(error = %e, "failed to write report");
                    outcome.failed += 1;
                }
            }
        }

        info!(
            written = outcome.written.len(),
            failed = outcome.failed,
            "activity reports saved"
        );
        Ok(outcome)
    }

    async fn write_one(&self, summary: Summary) -> Result<PathBuf, ReportError> {
        let path = self.path_for(&summary.contributor);
        let contents = self.render(&summary)?;

        let target = path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&target, contents.as_bytes())).await??;

        debug!(path = %path.display(), "report written");
        Ok(path)
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let file = atomicwrites::AtomicFile::new(path, atomicwrites::OverwriteBehavior::AllowOverwrite);

    match file.write(|f| f.write_all(contents)) {
        Err(atomicwrites::Error::Internal(e)) => Err(e),
        Err(atomicwrites::Error::User(e)) => Err(e),
        Ok(()) => Ok(()),
    }
}

/// Keeps a login usable as a file name: anything outside the characters
/// GitHub allows in account names becomes `_`.
fn file_stem(contributor: &str) -> String {
    let stem: String = contributor
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '[' | ']') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        "_".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use chrono::TimeZone;
    use tempfile::TempDir;

    use crate::core::activity::{ActivityDetail, ActivityRecord, IssueDetail};

    fn issue_record(login: &str) -> ActivityRecord {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        ActivityRecord::new(
            login,
            "acme/widgets",
            at,
            ActivityDetail::Issue(IssueDetail {
                number: 1,
                title: "t".to_string(),
                state: "open".to_string(),
                labels: Vec::new(),
                url: String::new(),
                created_at: at,
                updated_at: at,
                closed_at: None,
            }),
        )
    }

    fn result_for(logins: &[&str]) -> TrackingResult {
        let activities: BTreeMap<String, Vec<ActivityRecord>> = logins
            .iter()
            .map(|login| (login.to_string(), vec![issue_record(login)]))
            .collect();
        TrackingResult {
            repository: None,
            activities,
        }
    }

    #[test]
    fn test_file_stem_sanitizes_paths() {
        assert_eq!(file_stem("alice"), "alice");
        assert_eq!(file_stem("dependabot[bot]"), "dependabot[bot]");
        assert_eq!(file_stem("../etc/passwd"), "___etc_passwd");
        assert_eq!(file_stem(""), "_");
    }

    #[test]
    fn test_default_output_dir_uses_repo_name() {
        assert_eq!(
            ReportWriter::default_output_dir("widgets"),
            PathBuf::from("github_activities_widgets")
        );
    }

    #[tokio::test]
    async fn test_write_reports_creates_directory_and_one_file_each() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("nested").join("reports");
        let writer = ReportWriter::new(&out, ReportFormat::Text);

        let outcome = writer
            .write_reports(&result_for(&["alice", "bob"]), "acme/widgets", Utc::now())
            .await
            .unwrap();

        assert_eq!(outcome.written.len(), 2);
        assert_eq!(outcome.failed, 0);
        let alice = std::fs::read_to_string(out.join("alice.txt")).unwrap();
        assert!(alice.contains("GitHub Activity Report for: alice"));
        assert!(alice.contains("Total Issues: 1"));
        assert!(out.join("bob.txt").exists());
    }

    #[tokio::test]
    async fn test_write_reports_with_no_contributors_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let writer = ReportWriter::new(tmp.path().join("out"), ReportFormat::Text);

        let outcome = writer
            .write_reports(&TrackingResult::default(), "acme/widgets", Utc::now())
            .await
            .unwrap();

        assert!(outcome.written.is_empty());
        assert_eq!(std::fs::read_dir(tmp.path().join("out")).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_json_and_toml_formats() {
        let tmp = TempDir::new().unwrap();

        let json = ReportWriter::new(tmp.path(), ReportFormat::Json);
        json.write_reports(&result_for(&["alice"]), "acme/widgets", Utc::now())
            .await
            .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(tmp.path().join("alice.json")).unwrap())
                .unwrap();
        assert_eq!(value["contributor"], "alice");
        assert_eq!(value["total_issues"], 1);
        assert_eq!(value["net_changes"], 0);
        assert!(value.get("first_commit").is_none());

        let toml_writer = ReportWriter::new(tmp.path(), ReportFormat::Toml);
        toml_writer
            .write_reports(&result_for(&["alice"]), "acme/widgets", Utc::now())
            .await
            .unwrap();
        let table: toml::Table =
            toml::from_str(&std::fs::read_to_string(tmp.path().join("alice.toml")).unwrap())
                .unwrap();
        assert_eq!(table["repository"].as_str(), Some("acme/widgets"));
        assert_eq!(table["total_activities"].as_integer(), Some(1));
    }

    #[tokio::test]
    async fn test_unwritable_output_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let writer = ReportWriter::new(blocker.join("out"), ReportFormat::Text);
        let result = writer
            .write_reports(&result_for(&["alice"]), "acme/widgets", Utc::now())
            .await;

        assert!(matches!(result, Err(ReportError::Io(_))));
    }
}
