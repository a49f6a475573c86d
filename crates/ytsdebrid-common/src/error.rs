//! Error types for the resolution pipeline.
//!
//! Only metadata-stage failures are represented here. Conversion failures are
//! absorbed inside the debrid client and never reach callers.

/// Errors surfaced by catalog and stream resolution.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested item is absent from the metadata provider's result set.
    #[error("No metadata was found for {id}")]
    NotFound {
        /// The external identifier that was looked up.
        id: String,
    },

    /// The metadata provider could not be reached or answered with an error.
    #[error("Invalid response from metadata API for {query}: {reason}")]
    FetchFailed {
        /// The serialized query that was sent.
        query: String,
        /// Human-readable description of the failure.
        reason: String,
    },

    /// The metadata provider answered, but the payload could not be parsed.
    #[error("Error parsing metadata response for {query}: {source}")]
    ParseFailed {
        /// The serialized query that was sent.
        query: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::FetchFailed { .. } => 502,
            Error::ParseFailed { .. } => 502,
        }
    }

    /// Short machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "not_found",
            Error::FetchFailed { .. } => "fetch_failed",
            Error::ParseFailed { .. } => "parse_failed",
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(id: impl Into<String>) -> Self {
        Error::NotFound { id: id.into() }
    }

    /// Convenience constructor for [`Error::FetchFailed`].
    pub fn fetch_failed(query: impl Into<String>, reason: impl ToString) -> Self {
        Error::FetchFailed {
            query: query.into(),
            reason: reason.to_string(),
        }
    }

    /// Convenience constructor for [`Error::ParseFailed`].
    pub fn parse_failed(query: impl Into<String>, source: serde_json::Error) -> Self {
        Error::ParseFailed {
            query: query.into(),
            source,
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
