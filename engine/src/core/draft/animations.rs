//! Clip Animation Applier
//!
//! Attaches in/out/group animations to clips of the first video track.
//! Descriptor `i` targets video segment `i`. A clip's animations live in one
//! `sticker_animation` record referenced from its `extra_material_refs`.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::descriptor::{AnimationDescriptor, AnimationType};
use super::document::*;
use super::factory::{create_material_animation, EntityFactory};
use super::models::{DEFAULT_ANIMATION_DURATION, STICKER_ANIMATION_TYPE};
use super::refs::ensure_references;
use super::transitions::segment_refs_mut;
use crate::core::{CoreError, CoreResult, MaterialId, TimeRange};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationSummary {
    pub applied: usize,
    pub records_created: usize,
}

#[derive(Clone, Debug, Default)]
pub struct AnimationApplier {
    factory: EntityFactory,
}

impl AnimationApplier {
    pub fn new(factory: EntityFactory) -> Self {
        Self { factory }
    }

    /// Returns a new draft with `animations` applied; the original on any fault.
    pub fn apply(&self, document: &Value, animations: &[AnimationDescriptor]) -> Value {
        match self.try_apply(document, animations) {
            Ok((doc, summary)) => {
                info!(
                    "Applied {} clip animation(s), created {} record(s)",
                    summary.applied, summary.records_created
                );
                doc
            }
            Err(e) => {
                warn!("Failed to apply animations, keeping original draft: {}", e);
                document.clone()
            }
        }
    }

    pub fn try_apply(
        &self,
        document: &Value,
        animations: &[AnimationDescriptor],
    ) -> CoreResult<(Value, AnimationSummary)> {
        let mut doc = document.clone();
        materials_mut(&mut doc, MATERIAL_ANIMATIONS)?;
        ensure_references(&mut doc)?;

        let mut summary = AnimationSummary::default();
        let segments = video_segments(&doc);

        for (i, desc) in animations.iter().enumerate() {
            if desc.is_sentinel() {
                continue;
            }
            let Some(kind) = desc.kind else {
                warn!("Animation '{}' has no in/out/group type, skipping", desc.name);
                continue;
            };
            let Some(segment) = segments.get(i) else {
                debug!("No video clip at position {} for animation '{}'", i, desc.name);
                continue;
            };
            let Some(clip) = segment_timerange(segment) else {
                debug!("Video clip {} has no timerange, skipping '{}'", i, desc.name);
                continue;
            };

            let entry = self
                .factory
                .create_clip_animation(desc, kind, placement(kind, desc, clip.duration));
            let entry = serde_json::to_value(&entry)?;

            let record_id = match animation_record(&mut doc, segment)? {
                Some(id) => id,
                None => {
                    let material_id = str_field(segment, "material_id").unwrap_or_default();
                    let record = create_material_animation(material_id);
                    let id = record.id.clone();
                    materials_mut(&mut doc, MATERIAL_ANIMATIONS)?.push(serde_json::to_value(&record)?);
                    segment_refs_mut(&mut doc, i)?.push(Value::String(id.clone()));
                    summary.records_created += 1;
                    id
                }
            };

            let records = materials_mut(&mut doc, MATERIAL_ANIMATIONS)?;
            let index = position_by(records, "id", &record_id)
                .ok_or_else(|| CoreError::MaterialNotFound(record_id.clone()))?;
            let record = records[index].as_object_mut().ok_or_else(|| {
                CoreError::MalformedDocument(format!("animation record {record_id} is not an object"))
            })?;
            let list = ensure_array(record, "animations")?;
            list.retain(|existing| keeps(kind, existing));
            list.push(entry);
            summary.applied += 1;
        }

        Ok((doc, summary))
    }
}

/// Where an animation of `kind` sits inside a clip of `clip_duration`.
fn placement(kind: AnimationType, desc: &AnimationDescriptor, clip_duration: i64) -> TimeRange {
    let requested = desc.duration.unwrap_or(DEFAULT_ANIMATION_DURATION).max(0);
    let duration = requested.min(clip_duration.max(0));
    match kind {
        AnimationType::In => TimeRange::new(0, duration),
        AnimationType::Out => TimeRange::new(clip_duration - duration, duration),
        AnimationType::Group => TimeRange::new(0, clip_duration.max(0)),
    }
}

/// Whether an existing animation survives adding a new one of `kind`.
fn keeps(kind: AnimationType, existing: &Value) -> bool {
    let existing_kind = str_field(existing, "type").and_then(AnimationType::parse);
    match kind {
        AnimationType::Group => false,
        _ => existing_kind != Some(kind) && existing_kind != Some(AnimationType::Group),
    }
}

/// Id of the `sticker_animation` record a clip references.
fn animation_record(doc: &mut Value, segment: &Value) -> CoreResult<Option<MaterialId>> {
    let Some(refs) = segment.get(EXTRA_MATERIAL_REFS).and_then(Value::as_array) else {
        return Ok(None);
    };
    let records: &[Value] = materials_mut(doc, MATERIAL_ANIMATIONS)?;
    Ok(refs
        .iter()
        .filter_map(Value::as_str)
        .find(|r| {
            records.iter().any(|m| {
                str_field(m, "id") == Some(*r) && str_field(m, "type") == Some(STICKER_ANIMATION_TYPE)
            })
        })
        .map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(duration: i64) -> Value {
        json!({"tracks": [{"type": "video", "segments": [{
            "id": "V0",
            "material_id": "VM0",
            "target_timerange": {"start": 0, "duration": duration}
        }]}]})
    }

    fn clip_animations(doc: &Value) -> Vec<Value> {
        let record_id = doc["tracks"][0]["segments"][0]["extra_material_refs"][0].clone();
        doc["materials"]["material_animations"]
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["id"] == record_id)
            .expect("record")["animations"]
            .as_array()
            .unwrap()
            .clone()
    }

    #[test]
    fn test_in_animation_creates_record() {
        let applier = AnimationApplier::default();
        let result = applier.apply(&draft(3_000_000), &[AnimationDescriptor::new("Fade In", AnimationType::In)]);

        let records = result["materials"]["material_animations"].as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["material_id"], "VM0");
        assert_eq!(records[0]["type"], "sticker_animation");

        let animations = clip_animations(&result);
        assert_eq!(animations.len(), 1);
        assert_eq!(animations[0]["type"], "in");
        assert_eq!(animations[0]["start"], 0);
        assert_eq!(animations[0]["duration"], 500_000);
    }

    #[test]
    fn test_out_animation_ends_with_clip() {
        let applier = AnimationApplier::default();
        let desc = AnimationDescriptor::new("Fade Out", AnimationType::Out).with_duration(1_000_000);
        let result = applier.apply(&draft(3_000_000), &[desc]);
        let animations = clip_animations(&result);
        assert_eq!(animations[0]["start"], 2_000_000);
        assert_eq!(animations[0]["duration"], 1_000_000);
    }

    #[test]
    fn test_in_and_out_coexist_and_replace_same_type() {
        let applier = AnimationApplier::default();
        let doc = applier.apply(&draft(3_000_000), &[AnimationDescriptor::new("Fade In", AnimationType::In)]);
        let doc = applier.apply(&doc, &[AnimationDescriptor::new("Fade Out", AnimationType::Out)]);
        let doc = applier.apply(&doc, &[AnimationDescriptor::new("Zoom In", AnimationType::In)]);

        let animations = clip_animations(&doc);
        assert_eq!(animations.len(), 2);
        let names: Vec<&str> = animations.iter().map(|a| a["name"].as_str().unwrap()).collect();
        assert!(names.contains(&"Fade Out"));
        assert!(names.contains(&"Zoom In"));
        assert_eq!(doc["materials"]["material_animations"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_group_replaces_everything() {
        let applier = AnimationApplier::default();
        let doc = applier.apply(&draft(2_000_000), &[AnimationDescriptor::new("Fade In", AnimationType::In)]);
        let doc = applier.apply(&doc, &[AnimationDescriptor::new("Swing", AnimationType::Group)]);

        let animations = clip_animations(&doc);
        assert_eq!(animations.len(), 1);
        assert_eq!(animations[0]["type"], "group");
        assert_eq!(animations[0]["duration"], 2_000_000);
    }

    #[test]
    fn test_duration_capped_to_clip() {
        let applier = AnimationApplier::default();
        let result = applier.apply(&draft(200_000), &[AnimationDescriptor::new("Fade In", AnimationType::In)]);
        assert_eq!(clip_animations(&result)[0]["duration"], 200_000);
    }

    #[test]
    fn test_sentinel_and_untyped_skipped() {
        let applier = AnimationApplier::default();
        let untyped = AnimationDescriptor {
            name: "Mystery".to_string(),
            ..AnimationDescriptor::default()
        };
        let none = AnimationDescriptor {
            name: "None".to_string(),
            ..AnimationDescriptor::default()
        };
        let result = applier.apply(&draft(1_000_000), &[none, untyped]);
        assert!(result["materials"]["material_animations"].as_array().unwrap().is_empty());
    }
}
