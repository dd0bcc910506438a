pub mod loader;
pub mod types;

pub use loader::{load, load_from};
pub use types::{Config, GitHubConfig, ReportConfig, TrackerConfig};
