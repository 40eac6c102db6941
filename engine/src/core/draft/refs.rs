//! Reference Maintainer
//!
//! The editor expects a fixed set of auxiliary material references in every
//! draft, whatever effects were applied. They are constants, not generated.

use serde_json::Value;
use tracing::debug;

use super::document::{top_level_mut, EXTRA_MATERIAL_REFS};
use crate::core::{CoreError, CoreResult};

pub const SPEED_REF: &str = "A7C3F0E2-9B1D-4E5A-8C6F-1D2E3F4A5B61";
pub const PLACEHOLDER_INFO_REF: &str = "B8D4A1F3-0C2E-4F6B-9D7A-2E3F4A5B6C72";
pub const CANVAS_REF: &str = "C9E5B2A4-1D3F-4A7C-8E8B-3F4A5B6C7D83";
pub const MATERIAL_ANIMATION_REF: &str = "D0F6C3B5-2E4A-4B8D-9F9C-4A5B6C7D8E94";
pub const SOUND_CHANNEL_MAPPING_REF: &str = "E1A7D4C6-3F5B-4C9E-8A0D-5B6C7D8E9FA5";
pub const VOCAL_SEPARATION_REF: &str = "F2B8E5D7-4A6C-4DAF-9B1E-6C7D8E9FA0B6";

/// Every reference a draft must carry, in the order they are appended.
pub const REQUIRED_REFS: [&str; 6] = [
    SPEED_REF,
    PLACEHOLDER_INFO_REF,
    CANVAS_REF,
    MATERIAL_ANIMATION_REF,
    SOUND_CHANNEL_MAPPING_REF,
    VOCAL_SEPARATION_REF,
];

/// Appends any missing required reference. Existing entries are left in place.
///
/// Returns how many references were added.
pub fn ensure_references(doc: &mut Value) -> CoreResult<usize> {
    let refs = top_level_mut(doc, EXTRA_MATERIAL_REFS)?;
    if refs.iter().any(|r| !r.is_string()) {
        return Err(CoreError::MalformedDocument(
            "extra_material_refs contains a non-string entry".to_string(),
        ));
    }

    let mut added = 0;
    for required in REQUIRED_REFS {
        if !refs.iter().any(|r| r.as_str() == Some(required)) {
            refs.push(Value::String(required.to_string()));
            added += 1;
        }
    }

    if added > 0 {
        debug!("Added {} missing extra material references", added);
    }
    Ok(added)
}

/// True if every required reference is present.
pub fn has_required_references(doc: &Value) -> bool {
    let Some(refs) = doc.get(EXTRA_MATERIAL_REFS).and_then(Value::as_array) else {
        return false;
    };
    REQUIRED_REFS
        .iter()
        .all(|required| refs.iter().any(|r| r.as_str() == Some(*required)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_creates_missing_list() {
        let mut doc = json!({});
        assert_eq!(ensure_references(&mut doc).unwrap(), 6);
        assert!(has_required_references(&doc));
    }

    #[test]
    fn test_appends_without_reordering() {
        let mut doc = json!({"extra_material_refs": ["custom", CANVAS_REF]});
        assert_eq!(ensure_references(&mut doc).unwrap(), 5);

        let refs = doc["extra_material_refs"].as_array().unwrap();
        assert_eq!(refs[0], "custom");
        assert_eq!(refs[1], CANVAS_REF);
        assert_eq!(refs.len(), 7);
    }

    #[test]
    fn test_idempotent() {
        let mut doc = json!({});
        ensure_references(&mut doc).unwrap();
        let once = doc.clone();
        assert_eq!(ensure_references(&mut doc).unwrap(), 0);
        assert_eq!(doc, once);
    }

    #[test]
    fn test_rejects_malformed_list() {
        let mut doc = json!({"extra_material_refs": {"a": 1}});
        assert!(ensure_references(&mut doc).is_err());

        let mut doc = json!({"extra_material_refs": [1]});
        assert!(ensure_references(&mut doc).is_err());
    }
}
