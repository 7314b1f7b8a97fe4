//! Error types for catalog loading and recommendation.

use std::fmt;

use ctop_core::error::BotError;

/// A catalog record that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedEntry {
    /// Zero-based position of the record in the catalog document.
    pub index: usize,
    pub reason: String,
}

impl fmt::Display for MalformedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}: {}", self.index, self.reason)
    }
}

/// Errors from loading the FAQ catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog resource is missing, unreadable, unparseable or empty.
    #[error("Catalog configuration error: {0}")]
    Configuration(String),
    /// One or more records failed validation. Every offending record is
    /// listed, not only the first.
    #[error("Malformed catalog entries: {}", join_entries(.0))]
    MalformedEntries(Vec<MalformedEntry>),
}

impl CatalogError {
    /// Indices of the offending records, empty for configuration errors.
    pub fn malformed_indices(&self) -> Vec<usize> {
        match self {
            CatalogError::Configuration(_) => Vec::new(),
            CatalogError::MalformedEntries(entries) => entries.iter().map(|e| e.index).collect(),
        }
    }
}

fn join_entries(entries: &[MalformedEntry]) -> String {
    entries
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<CatalogError> for BotError {
    fn from(err: CatalogError) -> Self {
        BotError::Catalog(err.to_string())
    }
}

/// Errors from the recommendation boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecommendError {
    /// The caller violated the `recommend` contract (wrong argument types).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
