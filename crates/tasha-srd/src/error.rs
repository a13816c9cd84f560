//! Error types for the rules corpus.

use crate::category::Category;

/// Errors raised while loading or querying the rules corpus.
#[derive(Debug, thiserror::Error)]
pub enum SrdError {
    /// A key was looked up in a category that does not contain it.
    #[error("{category} not found: \"{key}\"")]
    NotFound {
        /// The category that was searched.
        category: Category,
        /// The key that was requested.
        key: String,
    },

    /// An embedded corpus file failed to parse.
    #[error("corpus file {file} is malformed: {source}")]
    Corpus {
        /// Name of the data file.
        file: &'static str,
        /// The underlying TOML error.
        source: Box<toml::de::Error>,
    },

    /// A corpus entry names another entry that does not exist.
    #[error("{file}: \"{entry}\" references unknown {category} \"{reference}\"")]
    Dangling {
        /// Name of the data file holding the broken entry.
        file: &'static str,
        /// The entry carrying the reference.
        entry: String,
        /// The category the reference should resolve in.
        category: Category,
        /// The unresolved name.
        reference: String,
    },
}

impl SrdError {
    /// Shorthand for a [`SrdError::NotFound`].
    pub fn not_found(category: Category, key: impl Into<String>) -> Self {
        Self::NotFound {
            category,
            key: key.into(),
        }
    }
}

/// Convenience result type for corpus operations.
pub type SrdResult<T> = Result<T, SrdError>;
