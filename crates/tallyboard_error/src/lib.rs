//! Error types for the Tallyboard grid client.
//!
//! Every error records the source location where it was raised. Request
//! cancellation is not represented: a superseded fetch is an expected
//! outcome, not a failure.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod http;
mod json;
mod query;

pub use config::ConfigError;
pub use http::HttpError;
pub use json::JsonError;
pub use query::{QueryError, QueryErrorKind};

/// Crate-level error variants.
#[derive(Debug, Clone, derive_more::From)]
pub enum TallyboardErrorKind {
    /// HTTP transport or status error
    Http(HttpError),
    /// JSON decoding error
    Json(JsonError),
    /// Configuration error
    Config(ConfigError),
    /// Query state or URL error
    Query(QueryError),
}

impl std::fmt::Display for TallyboardErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyboardErrorKind::Http(e) => write!(f, "{}", e),
            TallyboardErrorKind::Json(e) => write!(f, "{}", e),
            TallyboardErrorKind::Config(e) => write!(f, "{}", e),
            TallyboardErrorKind::Query(e) => write!(f, "{}", e),
        }
    }
}

/// Tallyboard error with kind discrimination.
#[derive(Debug, Clone)]
pub struct TallyboardError(Box<TallyboardErrorKind>);

impl TallyboardError {
    /// Create a new error from a kind.
    pub fn new(kind: TallyboardErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TallyboardErrorKind {
        &self.0
    }

    /// HTTP status of the failed request, if the server produced one.
    pub fn http_status(&self) -> Option<u16> {
        match self.kind() {
            TallyboardErrorKind::Http(e) => e.status,
            _ => None,
        }
    }
}

impl std::fmt::Display for TallyboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tallyboard Error: {}", self.0)
    }
}

impl std::error::Error for TallyboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            TallyboardErrorKind::Http(e) => Some(e),
            TallyboardErrorKind::Json(e) => Some(e),
            TallyboardErrorKind::Config(e) => Some(e),
            TallyboardErrorKind::Query(e) => Some(e),
        }
    }
}

impl<T> From<T> for TallyboardError
where
    T: Into<TallyboardErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Tallyboard operations.
pub type TallyboardResult<T> = std::result::Result<T, TallyboardError>;
