use thiserror::Error;

use crate::deals::DealId;

/// Errors surfaced to the caller of the engine.
///
/// The engine only fails when it cannot interpret the request. Empty input
/// and empty results are valid states, never errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid {field} \"{value}\": {reason}")]
    InvalidCriteria {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl EngineError {
    pub(crate) fn invalid(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidCriteria {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// A record whose deal fields do not support its declared deal type.
///
/// Recovered locally by the normalizer (the record is priced as a single
/// unit) and never propagated out of a query.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("deal {id} is malformed: {reason}")]
pub struct MalformedRecord {
    pub id: DealId,
    pub reason: &'static str,
}

/// A record that fails structural validation (empty name, negative price, ...).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("deal {id}: {reason}")]
pub struct RecordError {
    pub id: DealId,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}

impl From<RecordError> for CatalogError {
    fn from(err: RecordError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShareError {
    #[error("no deals selected to share")]
    NothingSelected,

    #[error("share link contains no valid deal ids")]
    NoIds,
}
