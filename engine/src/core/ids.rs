//! Identifier Generator
//!
//! Draft content identifies every material, segment and track with an
//! 8-4-4-4-12 hex token. capdraft always emits the upper-case form; lower-case
//! ids found in existing drafts or catalogs are accepted as-is.

use uuid::Uuid;

/// Generates a fresh upper-case version-4 identifier.
pub fn new_id() -> String {
    Uuid::new_v4().hyphenated().to_string().to_ascii_uppercase()
}

/// Returns true if `value` has the canonical 8-4-4-4-12 hex grouping.
pub fn is_canonical_id(value: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];
    let parts: Vec<&str> = value.split('-').collect();
    parts.len() == GROUPS.len()
        && parts
            .iter()
            .zip(GROUPS)
            .all(|(part, len)| part.len() == len && part.bytes().all(|b| b.is_ascii_hexdigit()))
}
