//! Binding identifiers into serialization and validation layers.
//!
//! Identifiers serialize as their canonical string. Deserializing a typed
//! [`Id`] checks the prefix against the type; deserializing an untyped
//! [`Uplid`] only checks its shape. [`validator`] wraps parse errors in a
//! [`ValidationError`] suitable for field-level reporting.

use std::borrow::Cow;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::ksuid::KsuidMs;
use crate::prefix::Prefix;
use crate::{Id, IdError, Uplid};

/// A rejected identifier field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{title} at '{loc}': {source}")]
pub struct ValidationError {
    /// Type label, e.g. `UsrId`.
    pub title: String,
    /// Field location, e.g. `usr_id`.
    pub loc: String,
    /// The rejected input.
    pub input: String,
    /// Why it was rejected.
    #[source]
    pub source: IdError,
}

impl ValidationError {
    fn new(prefix: &str, input: &str, source: IdError) -> Self {
        Self {
            title: format!("{}Id", capitalize(prefix)),
            loc: format!("{prefix}_id"),
            input: input.to_string(),
            source,
        }
    }
}

/// Returns a string validator bound to `prefix`.
pub fn validator(
    prefix: impl Into<Cow<'static, str>>,
) -> impl Fn(&str) -> Result<Uplid, ValidationError> + Clone + Send + Sync {
    let prefix = prefix.into();
    move |input: &str| {
        Uplid::parse(input, prefix.clone()).map_err(|e| ValidationError::new(&prefix, input, e))
    }
}

impl<P: Prefix> Id<P> {
    /// Returns a string validator for this ID type.
    #[must_use]
    pub fn validator() -> fn(&str) -> Result<Self, ValidationError> {
        |input: &str| Self::parse(input).map_err(|e| ValidationError::new(P::PREFIX, input, e))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Visitor that accepts strings and hands them to a parse function.
struct StrVisitor<F> {
    expecting: &'static str,
    parse: F,
}

impl<'de, T, F> Visitor<'de> for StrVisitor<F>
where
    F: FnOnce(&str) -> Result<T, IdError>,
{
    type Value = T;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.expecting)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
        (self.parse)(v).map_err(E::custom)
    }
}

impl Serialize for KsuidMs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base62())
    }
}

impl<'de> Deserialize<'de> for KsuidMs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(StrVisitor {
            expecting: "a 27-character base62 KSUID",
            parse: KsuidMs::from_base62,
        })
    }
}

impl Serialize for Uplid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Uplid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(StrVisitor {
            expecting: "a prefixed identifier <prefix>_<ksuid>",
            parse: Uplid::parse_any,
        })
    }
}

impl<P: Prefix> Serialize for Id<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, P: Prefix> Deserialize<'de> for Id<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(StrVisitor {
            expecting: "a prefixed identifier <prefix>_<ksuid>",
            parse: Id::<P>::parse,
        })
    }
}
