use shared::error::InitializationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed XML payload: {0}")]
    Xml(#[from] quick_xml::DeError),
    #[error("API error {code}: {message}")]
    Api { code: String, message: String },
    #[error("invalid {field} value {value:?}, expected YYYYMMDDHHMMSS")]
    Timestamp { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Anything that can go wrong while processing one district. Caught at the
/// orchestrator loop so the remaining districts still run.
#[derive(Debug, Error)]
pub enum DistrictError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),
    #[error("write failed: {0}")]
    Query(#[from] QueryError),
}

#[derive(Debug, Error)]
pub enum PollerError {
    #[error(transparent)]
    Init(#[from] InitializationError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] FetchError),
}
