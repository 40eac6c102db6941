//! Transition Applier
//!
//! Places transitions between consecutive clips of the first video track.
//! Descriptor `i` describes the cut between video segment `i` and `i + 1`; the
//! transition material is referenced from segment `i`'s `extra_material_refs`.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::descriptor::TransitionDescriptor;
use super::document::*;
use super::factory::EntityFactory;
use super::models::DEFAULT_TRANSITION_DURATION;
use super::refs::ensure_references;
use crate::core::{ids, CoreError, CoreResult, MaterialId, Micros};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionSummary {
    pub applied: usize,
    pub removed: usize,
}

#[derive(Clone, Debug, Default)]
pub struct TransitionApplier {
    factory: EntityFactory,
}

impl TransitionApplier {
    pub fn new(factory: EntityFactory) -> Self {
        Self { factory }
    }

    /// Returns a new draft with `transitions` applied; the original on any fault.
    pub fn apply(&self, document: &Value, transitions: &[TransitionDescriptor]) -> Value {
        match self.try_apply(document, transitions) {
            Ok((doc, summary)) => {
                info!(
                    "Applied {} transition(s), removed {}",
                    summary.applied, summary.removed
                );
                doc
            }
            Err(e) => {
                warn!("Failed to apply transitions, keeping original draft: {}", e);
                document.clone()
            }
        }
    }

    pub fn try_apply(
        &self,
        document: &Value,
        transitions: &[TransitionDescriptor],
    ) -> CoreResult<(Value, TransitionSummary)> {
        let mut doc = document.clone();
        materials_mut(&mut doc, TRANSITIONS)?;
        ensure_references(&mut doc)?;

        let mut summary = TransitionSummary::default();
        let segments = video_segments(&doc);
        if segments.len() < 2 {
            debug!("Fewer than two video clips, no transition slots");
            return Ok((doc, summary));
        }
        if transitions.len() > segments.len() - 1 {
            debug!(
                "Ignoring {} transition(s) beyond the last cut",
                transitions.len() - (segments.len() - 1)
            );
        }

        for (i, desc) in transitions.iter().enumerate().take(segments.len() - 1) {
            let current = current_transition(&mut doc, &segments[i])?;

            if desc.is_sentinel() {
                if let Some(id) = current {
                    segment_refs_mut(&mut doc, i)?.retain(|r| r.as_str() != Some(id.as_str()));
                    materials_mut(&mut doc, TRANSITIONS)?
                        .retain(|m| str_field(m, "id") != Some(id.as_str()));
                    summary.removed += 1;
                }
                continue;
            }

            let duration = resolve_duration(desc, &segments[i], &segments[i + 1]);
            let id = current.unwrap_or_else(ids::new_id);
            let material = self.factory.create_transition(&id, desc, duration);
            upsert_by(
                materials_mut(&mut doc, TRANSITIONS)?,
                "id",
                serde_json::to_value(&material)?,
            )?;

            let refs = segment_refs_mut(&mut doc, i)?;
            if !refs.iter().any(|r| r.as_str() == Some(id.as_str())) {
                refs.push(Value::String(id));
            }
            summary.applied += 1;
        }

        Ok((doc, summary))
    }
}

/// Transition duration: requested (or 1s) capped at the shorter adjacent clip.
fn resolve_duration(desc: &TransitionDescriptor, left: &Value, right: &Value) -> Micros {
    let requested = desc.duration.unwrap_or(DEFAULT_TRANSITION_DURATION).max(0);
    [left, right]
        .iter()
        .filter_map(|s| segment_timerange(s))
        .map(|r| r.duration)
        .fold(requested, Micros::min)
}

/// Id of the transition material a segment already references.
fn current_transition(doc: &mut Value, segment: &Value) -> CoreResult<Option<MaterialId>> {
    let Some(refs) = segment.get(EXTRA_MATERIAL_REFS).and_then(Value::as_array) else {
        return Ok(None);
    };
    let transitions: &[Value] = materials_mut(doc, TRANSITIONS)?;
    Ok(refs
        .iter()
        .filter_map(Value::as_str)
        .find(|r| position_by(transitions, "id", r).is_some())
        .map(str::to_string))
}

/// `extra_material_refs` of video segment `index`, created if missing.
pub(crate) fn segment_refs_mut(doc: &mut Value, index: usize) -> CoreResult<&mut Vec<Value>> {
    let segments = video_segments_mut(doc)?
        .ok_or_else(|| CoreError::MalformedDocument("video track disappeared".to_string()))?;
    let segment = segments
        .get_mut(index)
        .and_then(Value::as_object_mut)
        .ok_or_else(|| {
            CoreError::MalformedDocument(format!("video segment {index} is not an object"))
        })?;
    ensure_array(segment, EXTRA_MATERIAL_REFS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(durations: &[i64]) -> Value {
        let mut start = 0;
        let segments: Vec<Value> = durations
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let s = json!({
                    "id": format!("V{i}"),
                    "material_id": format!("VM{i}"),
                    "target_timerange": {"start": start, "duration": d},
                    "extra_material_refs": []
                });
                start += d;
                s
            })
            .collect();
        json!({"tracks": [{"type": "video", "segments": segments}]})
    }

    fn transitions(doc: &Value) -> &Vec<Value> {
        doc["materials"]["transitions"].as_array().unwrap()
    }

    fn refs(doc: &Value, i: usize) -> &Vec<Value> {
        doc["tracks"][0]["segments"][i]["extra_material_refs"]
            .as_array()
            .unwrap()
    }

    #[test]
    fn test_transition_between_clips() {
        let applier = TransitionApplier::default();
        let doc = draft(&[5_000_000, 5_000_000]);
        let result = applier.apply(&doc, &[TransitionDescriptor::named("Dissolve")]);

        assert_eq!(transitions(&result).len(), 1);
        let material = &transitions(&result)[0];
        assert_eq!(material["duration"], 1_000_000);
        assert_eq!(refs(&result, 0), &vec![material["id"].clone()]);
        assert!(refs(&result, 1).is_empty());
    }

    #[test]
    fn test_duration_capped_to_shorter_clip() {
        let applier = TransitionApplier::default();
        let doc = draft(&[5_000_000, 400_000]);
        let desc = TransitionDescriptor::named("Slide").with_duration(2_000_000);
        let result = applier.apply(&doc, &[desc]);
        assert_eq!(transitions(&result)[0]["duration"], 400_000);
    }

    #[test]
    fn test_reapply_replaces_in_place() {
        let applier = TransitionApplier::default();
        let doc = draft(&[5_000_000, 5_000_000]);
        let once = applier.apply(&doc, &[TransitionDescriptor::named("Dissolve")]);
        let twice = applier.apply(&once, &[TransitionDescriptor::named("Wipe")]);

        assert_eq!(transitions(&twice).len(), 1);
        assert_eq!(transitions(&twice)[0]["name"], "Wipe");
        assert_eq!(transitions(&twice)[0]["id"], transitions(&once)[0]["id"]);
        assert_eq!(refs(&twice, 0).len(), 1);
    }

    #[test]
    fn test_cut_removes_transition() {
        let applier = TransitionApplier::default();
        let doc = draft(&[5_000_000, 5_000_000, 5_000_000]);
        let once = applier.apply(
            &doc,
            &[
                TransitionDescriptor::named("Dissolve"),
                TransitionDescriptor::named("Wipe"),
            ],
        );
        let cut = applier.apply(&once, &[TransitionDescriptor::named("Cut")]);

        assert_eq!(transitions(&cut).len(), 1);
        assert_eq!(transitions(&cut)[0]["name"], "Wipe");
        assert!(refs(&cut, 0).is_empty());
        assert_eq!(refs(&cut, 1).len(), 1);
    }

    #[test]
    fn test_single_clip_has_no_slots() {
        let applier = TransitionApplier::default();
        let result = applier.apply(&draft(&[5_000_000]), &[TransitionDescriptor::named("Dissolve")]);
        assert!(transitions(&result).is_empty());
    }

    #[test]
    fn test_extra_descriptors_ignored() {
        let applier = TransitionApplier::default();
        let result = applier.apply(
            &draft(&[1_000_000, 1_000_000]),
            &[
                TransitionDescriptor::named("A"),
                TransitionDescriptor::named("B"),
            ],
        );
        assert_eq!(transitions(&result).len(), 1);
    }

    #[test]
    fn test_malformed_returns_original() {
        let applier = TransitionApplier::default();
        let doc = json!({"materials": {"transitions": {}}});
        assert_eq!(applier.apply(&doc, &[TransitionDescriptor::named("A")]), doc);
    }
}
