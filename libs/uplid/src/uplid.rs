//! Identifiers whose prefix is supplied at runtime.

use std::any::{type_name, Any};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::ksuid::{KsuidMs, ENCODED_LEN};
use crate::prefix::{validate_prefix, SEPARATOR};
use crate::IdError;

/// A prefixed identifier: `<prefix>_<ksuid>`.
///
/// Ordering is by prefix first, then by the KSUID (creation time, then
/// payload). Field order matters: the derives rely on it.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uplid {
    prefix: Cow<'static, str>,
    uid: KsuidMs,
}

impl Uplid {
    /// Pairs a prefix with an existing KSUID.
    ///
    /// The prefix is trusted and not validated; use [`Uplid::parse`] for
    /// untrusted input.
    #[must_use]
    pub fn new(prefix: impl Into<Cow<'static, str>>, uid: KsuidMs) -> Self {
        Self {
            prefix: prefix.into(),
            uid,
        }
    }

    /// Pairs a prefix with a KSUID given in its encoded form.
    ///
    /// The prefix is trusted; the encoded uid is strictly decoded.
    pub fn from_encoded(
        prefix: impl Into<Cow<'static, str>>,
        encoded: &str,
    ) -> Result<Self, IdError> {
        let uid = KsuidMs::from_base62(encoded)?;
        Ok(Self::new(prefix, uid))
    }

    /// Parses `<prefix>_<uid>`, requiring the prefix to be `expected`.
    ///
    /// Checks run in a fixed order so the same input always yields the same
    /// error: separator, prefix shape, prefix match, uid length, uid decode.
    pub fn parse(text: &str, expected: impl Into<Cow<'static, str>>) -> Result<Self, IdError> {
        let expected = expected.into();
        let uid = parse_parts(text, Some(&*expected))?.1;
        Ok(Self::new(expected, uid))
    }

    /// Parses `<prefix>_<uid>` accepting any well-formed prefix.
    pub fn parse_any(text: &str) -> Result<Self, IdError> {
        let (prefix, uid) = parse_parts(text, None)?;
        Ok(Self::new(prefix.to_string(), uid))
    }

    /// Generates a fresh identifier stamped with the current time.
    #[must_use]
    pub fn generate(prefix: impl Into<Cow<'static, str>>) -> Self {
        let id = Self::new(prefix, KsuidMs::new());
        trace!(id = %id, "generated identifier");
        id
    }

    /// Generates a fresh identifier stamped with `at`.
    pub fn generate_at(
        prefix: impl Into<Cow<'static, str>>,
        at: DateTime<Utc>,
    ) -> Result<Self, IdError> {
        let id = Self::new(prefix, KsuidMs::from_datetime(at)?);
        trace!(id = %id, at = %at, "generated identifier");
        Ok(id)
    }

    /// Returns a generator bound to `prefix`.
    ///
    /// Each call reads the clock again.
    pub fn factory(
        prefix: impl Into<Cow<'static, str>>,
    ) -> impl Fn() -> Uplid + Clone + Send + Sync {
        let prefix = prefix.into();
        move || Uplid::generate(prefix.clone())
    }

    /// The prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The embedded KSUID.
    #[must_use]
    pub const fn uid(&self) -> KsuidMs {
        self.uid
    }

    /// The creation instant carried by the KSUID.
    #[must_use]
    pub fn instant(&self) -> DateTime<Utc> {
        self.uid.datetime()
    }

    /// The creation instant as fractional Unix seconds.
    #[must_use]
    pub fn timestamp(&self) -> f64 {
        self.uid.timestamp()
    }

    /// `self >= other`, built from equality and ordering.
    #[must_use]
    pub fn gte(&self, other: &Self) -> bool {
        self == other || self.cmp(other) == Ordering::Greater
    }

    /// `self <= other`, built from equality and ordering.
    #[must_use]
    pub fn lte(&self, other: &Self) -> bool {
        self == other || self.cmp(other) == Ordering::Less
    }

    /// Equality against a value of any type; another kind is never equal.
    #[must_use]
    pub fn equals_any<T: Any>(&self, other: &T) -> bool {
        (other as &dyn Any)
            .downcast_ref::<Self>()
            .is_some_and(|other| self == other)
    }

    /// Ordering against a value of any type.
    ///
    /// Fails with [`IdError::IncomparableKind`] unless `other` is a `Uplid`.
    /// Differing prefixes are not an error; they order lexicographically.
    pub fn try_compare<T: Any>(&self, other: &T) -> Result<Ordering, IdError> {
        match (other as &dyn Any).downcast_ref::<Self>() {
            Some(other) => Ok(self.cmp(other)),
            None => Err(IdError::IncomparableKind {
                left: type_name::<Self>(),
                right: type_name::<T>(),
            }),
        }
    }
}

impl fmt::Display for Uplid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.prefix, SEPARATOR, self.uid)
    }
}

impl fmt::Debug for Uplid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uplid({self})")
    }
}

/// Runs the parse pipeline, returning the parsed prefix and decoded KSUID.
///
/// With `expected` set the prefix must match it exactly.
pub(crate) fn parse_parts<'a>(
    text: &'a str,
    expected: Option<&str>,
) -> Result<(&'a str, KsuidMs), IdError> {
    let result = split_and_decode(text, expected);
    if let Err(err) = &result {
        debug!(input = text, error = %err, "rejected identifier");
    }
    result
}

fn split_and_decode<'a>(
    text: &'a str,
    expected: Option<&str>,
) -> Result<(&'a str, KsuidMs), IdError> {
    let mut parts = text.split(SEPARATOR);
    let (prefix, encoded) = match (parts.next(), parts.next(), parts.next()) {
        (Some(prefix), Some(encoded), None) => (prefix, encoded),
        _ => {
            return Err(IdError::Format {
                input: text.to_string(),
            })
        }
    };

    validate_prefix(prefix)?;

    if let Some(expected) = expected {
        if prefix != expected {
            return Err(IdError::PrefixMismatch {
                expected: expected.to_string(),
                actual: prefix.to_string(),
            });
        }
    }

    let len = encoded.chars().count();
    if len != ENCODED_LEN {
        return Err(IdError::InvalidUidLength {
            expected: ENCODED_LEN,
            actual: len,
        });
    }

    let uid = KsuidMs::from_base62(encoded)?;
    Ok((prefix, uid))
}
