pub mod client;
pub mod error;
pub mod paginate;
pub mod types;


pub use client::{rate_limit_wait, ApiClient, GateStats};
pub use error::ApiError;
pub use paginate::MAX_PAGE_SIZE;
pub use types::{
    decode_all, ApiAccount, ApiCommit, ApiCommitDetail, ApiFile, ApiIssue, ApiPullRequest,
    Authored, RepoInfo,
};
