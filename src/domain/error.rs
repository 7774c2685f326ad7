// Error taxonomy for query handling
use std::fmt;
use thiserror::Error;

use super::query::Boundary;

/// Errors that abort a single query before anything is fetched.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The query model is not valid JSON for `FiapQuery`.
    #[error("json unmarshal: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured server timezone is not a `±HH:MM` offset.
    #[error("server timezone parse: {0}")]
    Settings(#[from] InvalidServerTimezone),

    /// A fixed boundary is not in `YYYY-MM-DD HH:MM:SS` form.
    #[error("{boundary} time parse: {raw:?}: {source}")]
    TimeParse {
        boundary: Boundary,
        raw: String,
        #[source]
        source: FixedTimeError,
    },

    #[error("data range: unsupported value {0:?}, expected period, latest or oldest")]
    InvalidFetchMode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid offset {0:?}, expected ±HH:MM")]
pub struct InvalidServerTimezone(pub String);

/// Why a fixed boundary string was rejected.
#[derive(Debug, Error)]
pub enum FixedTimeError {
    #[error("expected YYYY-MM-DD HH:MM:SS")]
    Layout,

    #[error(transparent)]
    Chrono(#[from] chrono::ParseError),
}

/// Errors collected while reconciling one retrieval outcome.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The retrieval call itself failed; no point data is trustworthy.
    #[error("{0:#}")]
    Transport(anyhow::Error),

    #[error("fiap error: type {kind}, value {detail}")]
    FiapDomain { kind: String, detail: String },

    #[error("point id '{0}' provides point sets")]
    ProvidesPointSets(String),

    #[error("point id '{0}' not provides point data")]
    MissingPointData(String),
}

/// Ordered aggregate of every `FetchError` seen for one query.
#[derive(Debug, Default)]
pub struct FetchErrors(Vec<FetchError>);

impl FetchErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FetchError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FetchError> {
        self.0.iter()
    }
}

impl fmt::Display for FetchErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FetchErrors {}
