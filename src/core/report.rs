pub mod summary;
pub mod writer;

use clap::ValueEnum;
use serde::Deserialize;
use thiserror::Error;

pub use summary::Summary;
pub use writer::{ReportWriter, WriteOutcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    #[value(help = "Plain text key/value report")]
    Text,
    #[value(help = "JSON document")]
    Json,
    #[value(help = "TOML document")]
    Toml,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Toml => "toml",
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("Report task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
