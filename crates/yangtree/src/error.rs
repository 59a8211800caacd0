//! Error types for data tree operations.

use thiserror::Error;
use yangtree_model::InstancePath;

/// Result type alias for data tree operations.
pub type DataTreeResult<T> = Result<T, DataTreeError>;

/// Coarse classification of [`DataTreeError`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller error: bad path, sealed modification, misuse of the seal protocol.
    InvalidArgument,
    /// Another transaction changed the data this modification was based on.
    Conflict,
    /// A value does not match the structure its schema node requires.
    IncorrectStructure,
    /// An operation outside the defined set; indicates a logic bug.
    Unsupported,
    /// The schema cannot be turned into apply strategies.
    Schema,
}

/// Errors that can occur during data tree operations.
#[derive(Debug, Error)]
pub enum DataTreeError {
    /// Invalid argument supplied by the caller.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of what went wrong.
        message: String,
    },

    /// The modification is sealed and cannot be changed.
    #[error("data tree modification is sealed, no further modifications allowed")]
    Sealed,

    /// `ready()` was called on an already sealed modification.
    #[error("attempted to seal an already-sealed data tree modification")]
    AlreadySealed,

    /// The operation requires a sealed modification.
    #[error("data tree modification has not been sealed")]
    NotSealed,

    /// The modification conflicts with a change committed by another transaction.
    #[error("conflicting modification at {path}: {message}")]
    ConflictingModification {
        /// Path of the conflicting node.
        path: InstancePath,
        /// Human-readable cause.
        message: String,
    },

    /// A value does not match the structure of its schema node.
    #[error("incorrect data structure at {path}: {message}")]
    IncorrectStructure {
        /// Path of the offending node.
        path: InstancePath,
        /// Description of the mismatch.
        message: String,
    },

    /// An operation outside the defined enumeration.
    #[error("unsupported operation: {message}")]
    UnsupportedOperation {
        /// Description of the operation.
        message: String,
    },

    /// The data tree changed after the candidate was prepared.
    #[error("data tree root changed since the candidate was prepared")]
    StaleCandidate,

    /// The schema cannot be used to build apply strategies.
    #[error("schema error: {message}")]
    Schema {
        /// Description of the problem.
        message: String,
    },

    /// A thread panicked while holding the data tree root lock.
    #[error("data tree root lock poisoned")]
    LockPoisoned,
}

impl DataTreeError {
    /// Create an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        DataTreeError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a conflicting modification error.
    #[inline]
    pub fn conflict(path: &InstancePath, message: impl Into<String>) -> Self {
        DataTreeError::ConflictingModification {
            path: path.clone(),
            message: message.into(),
        }
    }

    /// Create an incorrect structure error.
    #[inline]
    pub fn incorrect_structure(path: &InstancePath, message: impl Into<String>) -> Self {
        DataTreeError::IncorrectStructure {
            path: path.clone(),
            message: message.into(),
        }
    }

    /// Create an unsupported operation error.
    #[inline]
    pub fn unsupported(message: impl Into<String>) -> Self {
        DataTreeError::UnsupportedOperation {
            message: message.into(),
        }
    }

    /// Create a schema error.
    #[inline]
    pub fn schema(message: impl Into<String>) -> Self {
        DataTreeError::Schema {
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DataTreeError::InvalidArgument { .. }
            | DataTreeError::Sealed
            | DataTreeError::AlreadySealed
            | DataTreeError::NotSealed => ErrorKind::InvalidArgument,
            DataTreeError::ConflictingModification { .. } | DataTreeError::StaleCandidate => {
                ErrorKind::Conflict
            }
            DataTreeError::IncorrectStructure { .. } => ErrorKind::IncorrectStructure,
            DataTreeError::UnsupportedOperation { .. } | DataTreeError::LockPoisoned => {
                ErrorKind::Unsupported
            }
            DataTreeError::Schema { .. } => ErrorKind::Schema,
        }
    }

    /// Returns true if retrying against a fresh snapshot may succeed.
    #[inline]
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    /// The path this error refers to, if any.
    pub fn path(&self) -> Option<&InstancePath> {
        match self {
            DataTreeError::ConflictingModification { path, .. }
            | DataTreeError::IncorrectStructure { path, .. } => Some(path),
            _ => None,
        }
    }
}
