//! # uplid
//!
//! Prefixed, lexicographically sortable unique identifiers.
//!
//! ## Design Principles
//!
//! - The prefix names the entity kind; the KSUID carries creation time
//! - Every identifier has exactly one canonical string form
//! - Parsing is strict and deterministic: the same bad input always yields
//!   the same error
//! - Identifiers are immutable values, ordered by prefix then creation time
//!
//! ## ID Format
//!
//! All identifiers use the format `{prefix}_{ksuid}` where the prefix is one
//! or more lowercase ASCII letters and the KSUID is 27 base62 characters.
//!
//! Examples:
//! - `usr_2Qm7b0Gd1kYkVN1nuvJYm3k8W1a`
//! - `ord_2Qm7b1KzCjW5TfQ0Rr8xGdS6p2e`
//!
//! ## Two flavours
//!
//! - [`Uplid`] takes its prefix at runtime, for callers that handle many
//!   kinds through one type.
//! - [`Id<P>`](Id) fixes the prefix in the type via [`Prefix`], usually
//!   declared with [`define_id!`]. Mixing kinds is a compile error.

mod adapter;
mod error;
mod ksuid;
mod macros;
mod prefix;
mod typed;
mod uplid;

pub use adapter::{validator, ValidationError};
pub use error::IdError;
pub use ksuid::{KsuidMs, BYTE_LEN, ENCODED_LEN, KSUID_EPOCH, PAYLOAD_LEN, TIMESTAMP_LEN};
pub use prefix::{is_valid_prefix, validate_prefix, Prefix, SEPARATOR};
pub use typed::Id;
pub use uplid::Uplid;
