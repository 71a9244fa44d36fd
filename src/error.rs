//! Error types shared by every queue in the crate
//!
//! Failures fall into two kinds: an argument that does not fit the operation
//! ([`ErrorKind::Type`]) and a position that does not exist
//! ([`ErrorKind::Index`]). Neither leaves a queue in a modified state.

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T, E = QueueError> = std::result::Result<T, E>;

/// Broad category of a [`QueueError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller supplied an argument the operation cannot accept
    Type,
    /// A position was out of bounds, or the queue had nothing to remove
    Index,
}

/// Errors returned by queue operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// `dequeue` was called on a queue with no live elements.
    #[error("dequeue from an empty queue")]
    Empty,

    /// An index fell outside `[-len, len)`.
    #[error("queue index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The index as supplied by the caller, before normalization.
        index: isize,
        /// The queue length at the time of the call.
        len: usize,
    },

    /// A source or batch argument could not be iterated.
    #[error("'{type_name}' object is not iterable")]
    NotIterable {
        /// Name of the offending argument's type.
        type_name: &'static str,
    },

    /// More positional arguments were supplied than the operation takes.
    #[error("expected at most {max} argument(s), got {given}")]
    TooManyArguments {
        /// Largest accepted argument count.
        max: usize,
        /// Number of arguments actually supplied.
        given: usize,
    },

    /// A required positional argument was not supplied.
    #[error("missing required argument '{expected}'")]
    MissingArgument {
        /// Name of the missing argument.
        expected: &'static str,
    },
}

impl QueueError {
    /// Returns the category this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueueError::Empty | QueueError::IndexOutOfRange { .. } => ErrorKind::Index,
            QueueError::NotIterable { .. }
            | QueueError::TooManyArguments { .. }
            | QueueError::MissingArgument { .. } => ErrorKind::Type,
        }
    }

    /// Returns true if this is an out-of-bounds or empty-queue error
    #[inline]
    pub fn is_index_error(&self) -> bool {
        self.kind() == ErrorKind::Index
    }

    /// Returns true if this is an argument error
    #[inline]
    pub fn is_type_error(&self) -> bool {
        self.kind() == ErrorKind::Type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(QueueError::Empty.kind(), ErrorKind::Index);
        assert!(QueueError::IndexOutOfRange { index: 3, len: 3 }.is_index_error());
        assert!(QueueError::NotIterable { type_name: "int" }.is_type_error());
        assert!(QueueError::TooManyArguments { max: 1, given: 2 }.is_type_error());
        assert!(QueueError::MissingArgument { expected: "items" }.is_type_error());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(QueueError::Empty.to_string(), "dequeue from an empty queue");
        assert_eq!(
            QueueError::IndexOutOfRange { index: -4, len: 3 }.to_string(),
            "queue index -4 out of range for length 3"
        );
        assert_eq!(
            QueueError::NotIterable { type_name: "int" }.to_string(),
            "'int' object is not iterable"
        );
    }
}
