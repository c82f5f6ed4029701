//! Error handling and result types for the index structures.
//!
//! Lookup misses are never errors; they surface as `None`. Everything here is
//! either a configuration problem detected at construction time or a caller
//! error detected before any mutation starts.

use thiserror::Error;

use crate::key::Domain;

/// Error type for index construction and typed access.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    /// Fanout below the minimum the ordered index can split with.
    #[error("invalid fanout {fanout} (minimum required: {min})")]
    InvalidFanout { fanout: usize, min: usize },

    /// Initial bucket count that is zero or not a power of two.
    #[error("invalid initial bucket count {0}: must be a non-zero power of two")]
    InvalidBucketCount(usize),

    /// Element-type descriptor naming a domain we do not know.
    #[error("unknown domain '{0}'")]
    UnknownDomain(String),

    /// Element-type descriptor with no attributes.
    #[error("empty {0} descriptor")]
    EmptyDescriptor(&'static str),

    /// Index implementation name we cannot map to a structure.
    #[error("unknown index kind '{0}'")]
    UnknownIndexKind(String),

    /// A key or tuple component whose domain differs from the declared one.
    #[error("type mismatch at position {position}: expected {expected}, found {found}")]
    TypeMismatch {
        position: usize,
        expected: Domain,
        found: Domain,
    },

    /// A key or tuple with the wrong number of components.
    #[error("arity mismatch: expected {expected} components, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// Structural invariant violation found by an invariant check.
    #[error("corrupted tree: {0}")]
    CorruptedTree(String),
}

impl IndexError {
    /// Create a CorruptedTree error with context
    pub fn corrupted_tree(component: &str, details: &str) -> Self {
        Self::CorruptedTree(format!("{} corruption: {}", component, details))
    }

    /// True for errors raised while building an index.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFanout { .. }
                | Self::InvalidBucketCount(_)
                | Self::UnknownDomain(_)
                | Self::EmptyDescriptor(_)
                | Self::UnknownIndexKind(_)
        )
    }

    /// True for errors raised by a key or tuple that does not fit its descriptor.
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. } | Self::ArityMismatch { .. })
    }
}

/// Public result type for index operations that may fail
pub type IndexResult<T> = Result<T, IndexError>;

/// Result type for index construction
pub type InitResult<T> = Result<T, IndexError>;
