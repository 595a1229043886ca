//! UUID v7 utilities for time-ordered identifiers.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

/// Generate a new UUIDv7 identifier.
///
/// Catalog ids sort by creation time, which keeps folder listings stable.
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

/// Check whether an id is a version 7 UUID.
pub fn is_v7(id: &Uuid) -> bool {
    id.get_version_num() == 7
}

/// Extract the embedded creation time of a UUIDv7.
pub fn extract_timestamp(id: &Uuid) -> Option<DateTime<Utc>> {
    if !is_v7(id) {
        return None;
    }
    let bytes = id.as_bytes();
    let millis = bytes[..6]
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    Utc.timestamp_millis_opt(millis as i64).single()
}
