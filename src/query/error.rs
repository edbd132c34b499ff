//! Query error types
//!
//! The taxonomy is deliberately narrow. Issuing a query before any
//! dataset has been ingested is the one condition surfaced to callers;
//! malformed row values degrade silently during ingestion, and unknown
//! agents or empty ranges return well-formed empty results.

use thiserror::Error;

/// Errors surfaced by the engine and the query-string parser
#[derive(Error, Debug)]
pub enum EngineError {
    /// A query was issued before any dataset was ingested
    #[error("no dataset loaded")]
    NoDataset,

    /// A query string could not be parsed
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(EngineError::NoDataset.to_string(), "no dataset loaded");
        assert_eq!(
            EngineError::Parse("bad token".to_string()).to_string(),
            "parse error: bad token"
        );
    }
}
