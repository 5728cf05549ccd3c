//! Prefix shape rules and the type-level prefix binding.

use crate::IdError;

/// Separator between the prefix and the encoded uid.
pub const SEPARATOR: char = '_';

/// Binds an identifier prefix to a marker type.
///
/// Implement this (usually through [`define_id!`](crate::define_id)) to get a
/// dedicated [`Id`](crate::Id) type per entity kind.
pub trait Prefix {
    /// The literal prefix, e.g. `"usr"`.
    const PREFIX: &'static str;
}

/// Returns true if `prefix` is non-empty and made only of `a-z`.
///
/// Usable in const context so `define_id!` can reject bad literals at
/// compile time.
#[must_use]
pub const fn is_valid_prefix(prefix: &str) -> bool {
    let bytes = prefix.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_lowercase() {
            return false;
        }
        i += 1;
    }
    true
}

/// Checks the prefix shape.
pub fn validate_prefix(prefix: &str) -> Result<(), IdError> {
    if is_valid_prefix(prefix) {
        Ok(())
    } else {
        Err(IdError::InvalidPrefixShape {
            prefix: prefix.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_prefixes() {
        for prefix in ["usr", "ord", "a", "workspace"] {
            assert!(is_valid_prefix(prefix), "{prefix} should be valid");
            assert!(validate_prefix(prefix).is_ok());
        }
    }

    #[test]
    fn test_invalid_prefixes() {
        for prefix in ["", "USR", "Usr", "us1", "us-r", "us_r", "usé", " usr"] {
            assert!(!is_valid_prefix(prefix), "{prefix:?} should be invalid");
            assert_eq!(
                validate_prefix(prefix).unwrap_err(),
                IdError::InvalidPrefixShape {
                    prefix: prefix.to_string()
                }
            );
        }
    }

    #[test]
    fn test_is_valid_prefix_in_const_context() {
        const OK: bool = is_valid_prefix("org");
        const BAD: bool = is_valid_prefix("Org");
        assert!(OK);
        assert!(!BAD);
    }
}
