use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Failures raised while reconciling sheet data into players, entries and matches.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Malformed source data: compound names, short rows, broken match pairs.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// More than one distinct candidate matched. Never resolved by picking one.
    #[error("Not a unique match: {0}")]
    NotUniqueMatch(String),

    #[error("No match: {0}")]
    NoMatch(String),

    #[error("Store error: {0:#}")]
    Store(#[source] anyhow::Error),

    #[error("Tabular source error: {0:#}")]
    Source(#[source] anyhow::Error),
}

impl ReconcileError {
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    pub fn not_unique(msg: impl Into<String>) -> Self {
        Self::NotUniqueMatch(msg.into())
    }

    pub fn no_match(msg: impl Into<String>) -> Self {
        Self::NoMatch(msg.into())
    }

    /// Stable name of the error kind, reported at the HTTP and CLI boundaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidFormat(_) => "InvalidFormat",
            Self::NotUniqueMatch(_) => "NotUniqueMatch",
            Self::NoMatch(_) => "NoMatch",
            Self::Store(_) => "Store",
            Self::Source(_) => "Source",
        }
    }
}

impl From<anyhow::Error> for ReconcileError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(err)
    }
}

/// A reconciliation failure scoped to the league whose ingestion it aborted.
#[derive(Debug, Error)]
#[error("League {league}: {source}")]
pub struct IngestError {
    pub league: String,
    #[source]
    pub source: ReconcileError,
}

impl IngestError {
    pub fn new(league: &str, source: ReconcileError) -> Self {
        Self {
            league: league.to_string(),
            source,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.source.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinct() {
        let kinds = [
            ReconcileError::invalid_format("x").kind(),
            ReconcileError::not_unique("x").kind(),
            ReconcileError::no_match("x").kind(),
            ReconcileError::Store(anyhow::anyhow!("x")).kind(),
            ReconcileError::Source(anyhow::anyhow!("x")).kind(),
        ];
        let unique: std::collections::HashSet<_> = kinds.iter().collect();
        assert_eq!(unique.len(), kinds.len());
    }

    #[test]
    fn ingest_error_names_league() {
        let err = IngestError::new("KLR", ReconcileError::no_match("Player not found: Bob"));
        assert_eq!(err.kind(), "NoMatch");
        assert!(err.to_string().contains("KLR"));
        assert!(err.to_string().contains("Bob"));
    }
}
