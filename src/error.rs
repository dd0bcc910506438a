use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("GitHub token required. Pass --token or set GITHUB_TOKEN.")]
    AuthenticationRequired,

    #[error("API error: {0}")]
    Api(#[from] crate::core::api::ApiError),

    #[error("Report error: {0}")]
    Report(#[from] crate::core::report::ReportError),
}

pub type Result<T> = std::result::Result<T, CliError>;
