//! Draft Content Merger
//!
//! Applies a list of video effects to a draft. The caller's document is never
//! touched: all work happens on a clone that is returned only when every step
//! succeeded. Any fault along the way yields the original document instead.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::descriptor::EffectDescriptor;
use super::document::*;
use super::factory::{
    create_effect_segment, create_effect_track, create_loudness, create_material_animation,
    EntityFactory,
};
use super::models::{VideoEffectMaterial, BASE_RENDER_INDEX, DEFAULT_EFFECT_DURATION};
use super::refs::ensure_references;
use crate::core::{CoreError, CoreResult, TimeRange};

/// What a merge changed
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeSummary {
    pub materials_inserted: usize,
    pub materials_updated: usize,
    pub segments: usize,
    pub track_created: bool,
}

/// Applies effect descriptors to draft documents.
#[derive(Clone, Debug, Default)]
pub struct DraftMerger {
    factory: EntityFactory,
}

impl DraftMerger {
    pub fn new(factory: EntityFactory) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &EntityFactory {
        &self.factory
    }

    /// Returns a new draft with `effects` applied.
    ///
    /// Never fails: a malformed draft or an internal fault is logged and the
    /// original document is returned unchanged.
    pub fn apply(&self, document: &Value, effects: &[EffectDescriptor]) -> Value {
        match self.try_apply(document, effects) {
            Ok((doc, summary)) => {
                info!(
                    "Applied {} effect(s): {} material(s) inserted, {} updated",
                    summary.segments, summary.materials_inserted, summary.materials_updated
                );
                doc
            }
            Err(e) => {
                warn!("Failed to apply effects, keeping original draft: {}", e);
                document.clone()
            }
        }
    }

    /// Same as [`DraftMerger::apply`] with the effect list given as raw JSON.
    pub fn apply_json(&self, document: &Value, effects: &Value) -> Value {
        match serde_json::from_value::<Vec<EffectDescriptor>>(effects.clone()) {
            Ok(effects) => self.apply(document, &effects),
            Err(e) => {
                warn!("Invalid effect list, keeping original draft: {}", e);
                document.clone()
            }
        }
    }

    /// Fallible core of [`DraftMerger::apply`].
    pub fn try_apply(
        &self,
        document: &Value,
        effects: &[EffectDescriptor],
    ) -> CoreResult<(Value, MergeSummary)> {
        let mut doc = document.clone();
        normalize_document(&mut doc)?;
        ensure_references(&mut doc)?;

        let effects: Vec<&EffectDescriptor> = effects.iter().filter(|e| !e.is_sentinel()).collect();
        let mut summary = MergeSummary::default();
        if effects.is_empty() {
            debug!("No effects to apply after filtering sentinels");
            return Ok((doc, summary));
        }

        // Materials and their auxiliary records
        let mut claimed: HashSet<String> = HashSet::new();
        let mut material_ids = Vec::with_capacity(effects.len());
        for desc in &effects {
            let material = self.resolve_material(&mut doc, desc, &claimed)?;
            let material_id = material.id.clone();
            claimed.insert(material_id.clone());

            match upsert_by(
                materials_mut(&mut doc, VIDEO_EFFECTS)?,
                "id",
                serde_json::to_value(&material)?,
            )? {
                Upsert::Inserted(_) => summary.materials_inserted += 1,
                Upsert::Replaced(index) => {
                    debug!("Updated effect material {} at position {}", material_id, index);
                    summary.materials_updated += 1;
                }
            }

            upsert_auxiliary(
                materials_mut(&mut doc, MATERIAL_ANIMATIONS)?,
                serde_json::to_value(create_material_animation(&material_id))?,
            )?;
            upsert_auxiliary(
                top_level_mut(&mut doc, LOUDNESSES)?,
                serde_json::to_value(create_loudness(&material_id))?,
            )?;

            material_ids.push(material_id);
        }

        // Timeline placement
        let video = video_segments(&doc);
        let mut next_render_index = BASE_RENDER_INDEX;
        let mut segments = Vec::with_capacity(effects.len());
        for (i, (desc, material_id)) in effects.iter().zip(&material_ids).enumerate() {
            let explicit = desc.explicit_range();
            let range = explicit
                .or_else(|| {
                    video
                        .get(i)
                        .and_then(segment_timerange)
                        .map(|r| r.capped(DEFAULT_EFFECT_DURATION))
                })
                .unwrap_or_else(|| TimeRange::new(0, DEFAULT_EFFECT_DURATION));

            // The override only applies alongside an explicit timerange.
            let render_index = explicit
                .and(desc.explicit_render_index())
                .unwrap_or(next_render_index);
            next_render_index = match render_index.checked_add(1) {
                Some(next) => next,
                None => {
                    warn!("Render index reached {}, later segments share it", render_index);
                    render_index
                }
            };

            segments.push(create_effect_segment(material_id, range, render_index));
        }
        summary.segments = segments.len();

        let tracks = top_level_mut(&mut doc, TRACKS)?;
        match find_effect_track(tracks) {
            Some(index) => {
                let track = tracks[index].as_object_mut().ok_or_else(|| {
                    CoreError::MalformedDocument("effect track is not an object".to_string())
                })?;
                track.insert(SEGMENTS.to_string(), serde_json::to_value(&segments)?);
            }
            None => {
                tracks.push(serde_json::to_value(create_effect_track(segments))?);
                summary.track_created = true;
            }
        }

        Ok((doc, summary))
    }

    /// Builds the material for `desc`, reusing an unclaimed material id when the
    /// descriptor has none. Matches on effect class, or on name when no class is given.
    fn resolve_material(
        &self,
        doc: &mut Value,
        desc: &EffectDescriptor,
        claimed: &HashSet<String>,
    ) -> CoreResult<VideoEffectMaterial> {
        if desc.material_id().is_some() {
            return Ok(self.factory.create_video_effect(desc));
        }
        let (field, wanted) = match desc.effect_class() {
            Some(class) => ("effect_id", class),
            None if !desc.name.trim().is_empty() => ("name", desc.name.as_str()),
            None => return Ok(self.factory.create_video_effect(desc)),
        };
        let existing = materials_mut(doc, VIDEO_EFFECTS)?
            .iter()
            .filter(|m| str_field(m, field) == Some(wanted))
            .filter_map(|m| str_field(m, "id"))
            .find(|id| !claimed.contains(*id))
            .map(str::to_string);
        match existing {
            Some(id) => {
                debug!("Reusing material {} for {} {}", id, field, wanted);
                let with_id = EffectDescriptor {
                    id: Some(id),
                    ..desc.clone()
                };
                Ok(self.factory.create_video_effect(&with_id))
            }
            None => Ok(self.factory.create_video_effect(desc)),
        }
    }
}

/// Applies `effects` with default factory settings.
pub fn apply(document: &Value, effects: &[EffectDescriptor]) -> Value {
    DraftMerger::default().apply(document, effects)
}

/// Creates every collection the engine writes to, leaving existing content alone.
pub fn normalize_document(doc: &mut Value) -> CoreResult<()> {
    let root = root_mut(doc)?;
    let materials = ensure_object(root, MATERIALS)?;
    ensure_array(materials, VIDEO_EFFECTS)?;
    ensure_array(materials, MATERIAL_ANIMATIONS)?;
    ensure_array(root, LOUDNESSES)?;
    ensure_array(root, EXTRA_MATERIAL_REFS)?;
    ensure_array(root, TRACKS)?;
    Ok(())
}

/// Upserts a record keyed by `material_id`, keeping the id of a record it replaces.
fn upsert_auxiliary(items: &mut Vec<Value>, mut record: Value) -> CoreResult<Upsert> {
    if let Some(material_id) = str_field(&record, "material_id").map(str::to_string) {
        if let Some(existing_id) = position_by(items, "material_id", &material_id)
            .and_then(|i| str_field(&items[i], "id"))
            .map(str::to_string)
        {
            record["id"] = Value::String(existing_id);
        }
    }
    upsert_by(items, "material_id", record)
}
