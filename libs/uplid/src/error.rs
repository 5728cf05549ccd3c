//! Error types for identifier parsing, generation, and comparison.

use thiserror::Error;

/// Errors that can occur when parsing, generating, or comparing identifiers.
///
/// Every variant carries the offending values so callers (and validation
/// layers built on top) can report them without re-parsing the input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input did not split into exactly `<prefix>_<uid>`.
    #[error("identifier must be of the form <prefix>_<uid>, got '{input}'")]
    Format { input: String },

    /// The prefix is empty or contains characters outside `a-z`.
    #[error("prefix must be non-empty lowercase ASCII letters, got '{prefix}'")]
    InvalidPrefixShape { prefix: String },

    /// The prefix is well formed but not the one the caller expected.
    #[error("expected prefix '{expected}', got '{actual}'")]
    PrefixMismatch { expected: String, actual: String },

    /// The encoded uid is not exactly 27 characters long.
    #[error("expected encoded uid to be {expected} characters long, got {actual}")]
    InvalidUidLength { expected: usize, actual: usize },

    /// The encoded uid is the right length but does not decode.
    #[error("invalid encoded uid '{encoded}': {reason}")]
    MalformedUid { encoded: String, reason: String },

    /// An ordering comparison was attempted against a value of another kind.
    #[error("cannot compare {left} with {right}")]
    IncomparableKind {
        left: &'static str,
        right: &'static str,
    },

    /// The instant cannot be represented in a KSUID timestamp.
    #[error("instant {instant} is outside the representable KSUID range")]
    TimestampOutOfRange { instant: String },
}

impl IdError {
    /// Returns true if this error concerns the prefix (shape or mismatch).
    pub fn is_prefix_error(&self) -> bool {
        matches!(
            self,
            IdError::InvalidPrefixShape { .. } | IdError::PrefixMismatch { .. }
        )
    }

    /// Returns true if this error concerns the encoded uid portion.
    pub fn is_uid_error(&self) -> bool {
        matches!(
            self,
            IdError::InvalidUidLength { .. } | IdError::MalformedUid { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_predicates() {
        let mismatch = IdError::PrefixMismatch {
            expected: "usr".into(),
            actual: "ord".into(),
        };
        assert!(mismatch.is_prefix_error());
        assert!(!mismatch.is_uid_error());

        let length = IdError::InvalidUidLength {
            expected: 27,
            actual: 26,
        };
        assert!(length.is_uid_error());
        assert!(!length.is_prefix_error());

        assert!(!IdError::Format { input: "x".into() }.is_prefix_error());
    }

    #[test]
    fn test_error_messages_carry_values() {
        let err = IdError::PrefixMismatch {
            expected: "abc".into(),
            actual: "xyz".into(),
        };
        assert_eq!(err.to_string(), "expected prefix 'abc', got 'xyz'");

        let err = IdError::InvalidUidLength {
            expected: 27,
            actual: 26,
        };
        assert_eq!(
            err.to_string(),
            "expected encoded uid to be 27 characters long, got 26"
        );
    }
}
