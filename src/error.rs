//! Error types for Vitalflow

use thiserror::Error;

/// Errors reported by a health data source.
///
/// None of these cross the facade boundary: every public query on
/// [`HealthFacade`](crate::facade::HealthFacade) is total and maps failures to
/// the zero-valued stats object for the requested kind, logging internally.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("permission denied by the data source")]
    PermissionDenied,

    #[error("no health data backend is available on this platform")]
    Unavailable,

    #[error("upstream query failed: {0}")]
    UpstreamQuery(String),

    #[error("invalid source payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("malformed sample record: {0}")]
    MalformedRecord(String),

    #[error("unknown source platform: {0}")]
    UnknownPlatform(String),
}
