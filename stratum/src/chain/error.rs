//! Error types produced by chain lookups, writes, and deletes.

use std::fmt;

use thiserror::Error;

/// Result alias for fallible chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Errors that can occur while resolving or mutating a [`crate::Chain`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChainError {
    /// The requested key is held by no layer eligible for the operation.
    ///
    /// For lookups this means no layer at all contains the key; for deletes
    /// it means the local layer does not currently hold it, even when lower
    /// layers do.
    #[error("key '{key}' not found")]
    KeyNotFound {
        /// The key that failed to resolve, rendered for display.
        key: String,
    },

    /// Two or more layers hold differing values for the same key under the
    /// unique-value policy.
    #[error("key '{key}' resolves to conflicting values [{}]", .values.join(", "))]
    InconsistentValue {
        /// The key whose layers disagree.
        key: String,
        /// Every value found for the key, one per containing layer, in
        /// layer order.
        values: Vec<String>,
    },

    /// A write or delete targeted a local layer that does not support
    /// mutation.
    #[error("the local layer does not accept writes")]
    ImmutableLayer,
}

impl ChainError {
    /// Build a [`ChainError::KeyNotFound`] for `key`.
    pub(crate) fn key_not_found(key: &impl fmt::Display) -> Self {
        Self::KeyNotFound {
            key: key.to_string(),
        }
    }

    /// Build a [`ChainError::InconsistentValue`] naming every conflicting
    /// value in layer order.
    pub(crate) fn inconsistent<V: fmt::Debug>(key: &impl fmt::Display, values: &[V]) -> Self {
        Self::InconsistentValue {
            key: key.to_string(),
            values: values.iter().map(|value| format!("{value:?}")).collect(),
        }
    }
}
