//! Identifiers whose prefix is fixed by the type.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::ksuid::KsuidMs;
use crate::prefix::{Prefix, SEPARATOR};
use crate::uplid::parse_parts;
use crate::{IdError, Uplid};

/// A prefixed identifier whose prefix is `P::PREFIX`.
///
/// Only the KSUID is stored. Identifiers of different kinds are different
/// types, so comparing them does not compile.
pub struct Id<P: Prefix> {
    uid: KsuidMs,
    _kind: PhantomData<fn() -> P>,
}

impl<P: Prefix> Id<P> {
    /// The prefix for this ID type.
    pub const PREFIX: &'static str = P::PREFIX;

    /// Creates a new ID with a fresh KSUID.
    #[must_use]
    pub fn new() -> Self {
        let id = Self::from_uid(KsuidMs::new());
        trace!(id = %id, "generated identifier");
        id
    }

    /// Creates a new ID stamped with `at`.
    pub fn generate_at(at: DateTime<Utc>) -> Result<Self, IdError> {
        let id = Self::from_uid(KsuidMs::from_datetime(at)?);
        trace!(id = %id, at = %at, "generated identifier");
        Ok(id)
    }

    /// Returns a generator for this ID type.
    #[must_use]
    pub fn factory() -> fn() -> Self {
        Self::new
    }

    /// Creates an ID from an existing KSUID.
    #[must_use]
    pub const fn from_uid(uid: KsuidMs) -> Self {
        Self {
            uid,
            _kind: PhantomData,
        }
    }

    /// Creates an ID from an encoded KSUID (without prefix).
    pub fn from_encoded(encoded: &str) -> Result<Self, IdError> {
        KsuidMs::from_base62(encoded).map(Self::from_uid)
    }

    /// Parses an ID from a string.
    ///
    /// The string must be in the format `{prefix}_{ksuid}`.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        let (_, uid) = parse_parts(s, Some(P::PREFIX))?;
        Ok(Self::from_uid(uid))
    }

    /// The prefix.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        P::PREFIX
    }

    /// Returns the underlying KSUID.
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

    /// Drops the type-level prefix.
    #[must_use]
    pub fn into_untyped(self) -> Uplid {
        Uplid::new(P::PREFIX, self.uid)
    }
}

impl<P: Prefix> Default for Id<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Prefix> Clone for Id<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: Prefix> Copy for Id<P> {}

impl<P: Prefix> PartialEq for Id<P> {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl<P: Prefix> Eq for Id<P> {}

impl<P: Prefix> PartialOrd for Id<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P: Prefix> Ord for Id<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uid.cmp(&other.uid)
    }
}

impl<P: Prefix> Hash for Id<P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        P::PREFIX.hash(state);
        self.uid.hash(state);
    }
}

impl<P: Prefix> fmt::Display for Id<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", P::PREFIX, SEPARATOR, self.uid)
    }
}

impl<P: Prefix> fmt::Debug for Id<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({self})")
    }
}

impl<P: Prefix> FromStr for Id<P> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<P: Prefix> From<Id<P>> for Uplid {
    fn from(id: Id<P>) -> Self {
        id.into_untyped()
    }
}

impl<P: Prefix> TryFrom<Uplid> for Id<P> {
    type Error = IdError;

    fn try_from(id: Uplid) -> Result<Self, Self::Error> {
        if id.prefix() != P::PREFIX {
            return Err(IdError::PrefixMismatch {
                expected: P::PREFIX.to_string(),
                actual: id.prefix().to_string(),
            });
        }
        Ok(Self::from_uid(id.uid()))
    }
}

impl<P: Prefix> AsRef<KsuidMs> for Id<P> {
    fn as_ref(&self) -> &KsuidMs {
        &self.uid
    }
}
