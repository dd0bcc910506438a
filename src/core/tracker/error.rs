use thiserror::Error;

use crate::core::activity::ActivityKind;
use crate::core::api::ApiError;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("failed to decode {kind} data for {contributor}: {source}")]
    Decode {
        kind: ActivityKind,
        contributor: String,
        #[source]
        source: ApiError,
    },
}

impl TrackError {
    pub fn decode(kind: ActivityKind, contributor: &str, source: impl Into<ApiError>) -> Self {
        TrackError::Decode {
            kind,
            contributor: contributor.to_string(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ActivityKind {
        match self {
            TrackError::Decode { kind, .. } => *kind,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackError>;
