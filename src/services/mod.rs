//! Use cases composed from repository calls. Each function takes the
//! request's connection, resolves the related display names the responses
//! embed, and reports failures as [`ServiceError`](crate::error::ServiceError).
//! Writes run inside a transaction so a failed statement leaves no partial
//! change behind.

use chrono::{DateTime, NaiveDateTime, Utc};

pub mod comments;
pub mod documents;
pub mod folders;
pub mod permissions;
pub mod statistics;
pub mod users;

/// Display name used when a referenced user row cannot be resolved.
pub const UNKNOWN_NAME: &str = "Unknown";

pub(crate) fn to_iso(dt: NaiveDateTime) -> String {
    DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc).to_rfc3339()
}
