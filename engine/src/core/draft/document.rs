//! Draft Document Access
//!
//! The draft is kept as a `serde_json::Value` so members capdraft does not
//! model survive a round trip untouched. These helpers give typed, checked
//! access to the parts the engine edits and create missing collections lazily.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::models::{TRACK_TYPE_EFFECT, TRACK_TYPE_VIDEO};
use crate::core::{CoreError, CoreResult, TimeRange};

pub const MATERIALS: &str = "materials";
pub const VIDEO_EFFECTS: &str = "video_effects";
pub const MATERIAL_ANIMATIONS: &str = "material_animations";
pub const TRANSITIONS: &str = "transitions";
pub const LOUDNESSES: &str = "loudnesses";
pub const EXTRA_MATERIAL_REFS: &str = "extra_material_refs";
pub const TRACKS: &str = "tracks";
pub const SEGMENTS: &str = "segments";

/// Outcome of an upsert into an ordered collection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upsert {
    Inserted(usize),
    Replaced(usize),
}

/// Returns the root object of a draft.
pub fn root_mut(doc: &mut Value) -> CoreResult<&mut Map<String, Value>> {
    doc.as_object_mut()
        .ok_or_else(|| CoreError::MalformedDocument("draft root is not an object".to_string()))
}

/// Returns `parent[key]` as an object, inserting `{}` when missing or null.
pub fn ensure_object<'a>(
    parent: &'a mut Map<String, Value>,
    key: &str,
) -> CoreResult<&'a mut Map<String, Value>> {
    let slot = parent
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if slot.is_null() {
        *slot = Value::Object(Map::new());
    }
    slot.as_object_mut()
        .ok_or_else(|| CoreError::MalformedDocument(format!("'{key}' is not an object")))
}

/// Returns `parent[key]` as an array, inserting `[]` when missing or null.
pub fn ensure_array<'a>(
    parent: &'a mut Map<String, Value>,
    key: &str,
) -> CoreResult<&'a mut Vec<Value>> {
    let slot = parent
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if slot.is_null() {
        *slot = Value::Array(Vec::new());
    }
    slot.as_array_mut()
        .ok_or_else(|| CoreError::MalformedDocument(format!("'{key}' is not an array")))
}

/// Returns `materials.<name>`, creating both levels as needed.
pub fn materials_mut<'a>(doc: &'a mut Value, name: &str) -> CoreResult<&'a mut Vec<Value>> {
    let materials = ensure_object(root_mut(doc)?, MATERIALS)?;
    ensure_array(materials, name)
}

/// Returns a top-level array member, creating it as needed.
pub fn top_level_mut<'a>(doc: &'a mut Value, key: &str) -> CoreResult<&'a mut Vec<Value>> {
    ensure_array(root_mut(doc)?, key)
}

/// Reads `value[key]` as a string.
pub fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Position of the first item whose `key` member equals `expected`.
pub fn position_by(items: &[Value], key: &str, expected: &str) -> Option<usize> {
    items
        .iter()
        .position(|item| str_field(item, key) == Some(expected))
}

/// Replaces the item whose `key` matches `value[key]` in place, or appends.
pub fn upsert_by(items: &mut Vec<Value>, key: &str, value: Value) -> CoreResult<Upsert> {
    let expected = str_field(&value, key)
        .ok_or_else(|| CoreError::Internal(format!("upserted value has no '{key}'")))?
        .to_string();
    match position_by(items, key, &expected) {
        Some(index) => {
            items[index] = value;
            Ok(Upsert::Replaced(index))
        }
        None => {
            items.push(value);
            Ok(Upsert::Inserted(items.len() - 1))
        }
    }
}

/// Index of the first track of the given type.
pub fn find_track(tracks: &[Value], kind: &str) -> Option<usize> {
    position_by(tracks, "type", kind)
}

/// Segments of the first video track, or an empty list.
pub fn video_segments(doc: &Value) -> Vec<Value> {
    doc.get(TRACKS)
        .and_then(Value::as_array)
        .and_then(|tracks| find_track(tracks, TRACK_TYPE_VIDEO).map(|i| &tracks[i]))
        .and_then(|track| track.get(SEGMENTS))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Segments array of the first video track, mutable.
pub fn video_segments_mut(doc: &mut Value) -> CoreResult<Option<&mut Vec<Value>>> {
    let tracks = top_level_mut(doc, TRACKS)?;
    let Some(index) = find_track(tracks, TRACK_TYPE_VIDEO) else {
        return Ok(None);
    };
    let track = tracks[index]
        .as_object_mut()
        .ok_or_else(|| CoreError::MalformedDocument("video track is not an object".to_string()))?;
    ensure_array(track, SEGMENTS).map(Some)
}

/// Index of the first effect track.
pub fn find_effect_track(tracks: &[Value]) -> Option<usize> {
    find_track(tracks, TRACK_TYPE_EFFECT)
}

/// `target_timerange` of a segment, if well-formed.
pub fn segment_timerange(segment: &Value) -> Option<TimeRange> {
    segment
        .get("target_timerange")
        .and_then(parse_opt::<TimeRange>)
}

/// Deserializes a value, treating shape mismatches as absent.
pub fn parse_opt<T: DeserializeOwned>(value: &Value) -> Option<T> {
    T::deserialize(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_materials_mut_creates_levels() {
        let mut doc = json!({});
        materials_mut(&mut doc, VIDEO_EFFECTS).unwrap().push(json!({"id": "A"}));
        assert_eq!(doc, json!({"materials": {"video_effects": [{"id": "A"}]}}));
    }

    #[test]
    fn test_null_members_are_replaced() {
        let mut doc = json!({"materials": null, "tracks": null});
        materials_mut(&mut doc, TRANSITIONS).unwrap();
        top_level_mut(&mut doc, TRACKS).unwrap();
        assert_eq!(doc, json!({"materials": {"transitions": []}, "tracks": []}));
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let mut doc = json!({"materials": []});
        let err = materials_mut(&mut doc, VIDEO_EFFECTS).unwrap_err();
        assert!(matches!(err, CoreError::MalformedDocument(_)));

        let mut not_object = json!([1, 2, 3]);
        assert!(root_mut(&mut not_object).is_err());
    }

    #[test]
    fn test_upsert_preserves_position() {
        let mut items = vec![json!({"id": "a", "v": 1}), json!({"id": "b", "v": 1})];
        let first = upsert_by(&mut items, "id", json!({"id": "a", "v": 2})).unwrap();
        let second = upsert_by(&mut items, "id", json!({"id": "c", "v": 1})).unwrap();
        assert_eq!(first, Upsert::Replaced(0));
        assert_eq!(second, Upsert::Inserted(2));
        assert_eq!(items[0]["v"], 2);
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_video_segments_uses_first_video_track() {
        let doc = json!({"tracks": [
            {"type": "audio", "segments": [{"id": "x"}]},
            {"type": "video", "segments": [{"id": "v1"}]},
            {"type": "video", "segments": [{"id": "v2"}]}
        ]});
        let segments = video_segments(&doc);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0]["id"], "v1");
    }

    #[test]
    fn test_segment_timerange_tolerates_garbage() {
        let good = json!({"target_timerange": {"start": 1, "duration": 2}});
        let bad = json!({"target_timerange": "soon"});
        assert_eq!(segment_timerange(&good), Some(TimeRange::new(1, 2)));
        assert_eq!(segment_timerange(&bad), None);
        assert_eq!(segment_timerange(&json!({})), None);
    }
}
