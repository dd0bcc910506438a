pub mod collector;
pub mod error;
pub mod repository;

pub use collector::ActivityCollector;
pub use error::TrackError;
pub use repository::{RepoTracker, TrackScope, TrackingResult};
