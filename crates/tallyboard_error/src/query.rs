//! Grid query error types.

/// Specific error conditions for grid query handling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryErrorKind {
    /// A query parameter could not be interpreted for its field
    InvalidParameter {
        /// Parameter key
        key: String,
        /// Raw value as found in the query string
        value: String,
    },
    /// The grid has no collection endpoint configured
    MissingFetchUrl,
    /// An endpoint URL could not be parsed
    InvalidUrl(String),
}

impl std::fmt::Display for QueryErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryErrorKind::InvalidParameter { key, value } => {
                write!(f, "Invalid value '{}' for parameter '{}'", value, key)
            }
            QueryErrorKind::MissingFetchUrl => write!(f, "No fetch URL configured"),
            QueryErrorKind::InvalidUrl(url) => write!(f, "Invalid URL: {}", url),
        }
    }
}

/// Error type for grid query operations.
///
/// # Examples
///
/// ```
/// use tallyboard_error::{QueryError, QueryErrorKind};
///
/// let err = QueryError::new(QueryErrorKind::MissingFetchUrl);
/// assert!(format!("{}", err).contains("No fetch URL"));
/// ```
#[derive(Debug, Clone)]
pub struct QueryError {
    /// Error kind
    pub kind: QueryErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl QueryError {
    /// Create a new QueryError with the given kind at the current location.
    #[track_caller]
    pub fn new(kind: QueryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Query Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for QueryError {}
