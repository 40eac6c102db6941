//! Entity Factories
//!
//! Build well-formed draft entities from minimal input. Each entity kind has
//! exactly one constructor here; callers never assemble these shapes by hand.

use super::descriptor::{AnimationDescriptor, AnimationType, EffectDescriptor, TransitionDescriptor};
use super::models::*;
use crate::core::{ids, Micros, TimeRange};

/// Creates entities with locale-dependent defaults.
#[derive(Clone, Debug)]
pub struct EntityFactory {
    category_name: String,
}

impl Default for EntityFactory {
    fn default() -> Self {
        Self {
            category_name: DEFAULT_CATEGORY_NAME.to_string(),
        }
    }
}

impl EntityFactory {
    /// Factory whose default category name follows `language`
    pub fn for_language(language: &str) -> Self {
        Self {
            category_name: category_name_for(language).to_string(),
        }
    }

    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    /// Builds a video effect material, filling every missing field with its default.
    ///
    /// A descriptor without an id gets a freshly generated one.
    pub fn create_video_effect(&self, source: &EffectDescriptor) -> VideoEffectMaterial {
        let id = source.material_id().map(str::to_string).unwrap_or_else(ids::new_id);
        let effect_id = source.effect_class().unwrap_or_default().to_string();
        let resource_id = source
            .resource_id
            .clone()
            .unwrap_or_else(|| effect_id.clone());

        VideoEffectMaterial {
            adjust_params: source.adjust_params.clone().unwrap_or_default(),
            algorithm_artifact_path: String::new(),
            apply_target_type: source.apply_target_type.unwrap_or(DEFAULT_APPLY_TARGET_TYPE),
            apply_time_range: None,
            category_id: source
                .category_id
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY_ID.to_string()),
            category_name: source
                .category_name
                .clone()
                .unwrap_or_else(|| self.category_name.clone()),
            common_keyframes: source.common_keyframes.clone().unwrap_or_default(),
            covering_relation_change: source.covering_relation_change.unwrap_or(0),
            disable_effect_faces: Vec::new(),
            effect_id,
            effect_mask: source.effect_mask.clone().unwrap_or_default(),
            enable_mask: source.enable_mask.unwrap_or(true),
            formula_id: String::new(),
            id,
            item_effect_type: source.item_effect_type.unwrap_or(DEFAULT_ITEM_EFFECT_TYPE),
            name: source.name.clone(),
            path: source.path.clone().unwrap_or_default(),
            platform: source
                .platform
                .clone()
                .unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
            render_index: 0,
            request_id: String::new(),
            resource_id,
            source_platform: source.source_platform.unwrap_or(DEFAULT_SOURCE_PLATFORM),
            sub_type: 0,
            time_range: None,
            kind: VIDEO_EFFECT_TYPE.to_string(),
            value: source.value.unwrap_or(DEFAULT_EFFECT_VALUE),
            version: String::new(),
        }
    }

    /// Builds a transition material with an already-resolved duration.
    pub fn create_transition(
        &self,
        id: &str,
        source: &TransitionDescriptor,
        duration: Micros,
    ) -> TransitionMaterial {
        let effect_id = source.effect_id.clone().unwrap_or_default();
        TransitionMaterial {
            category_id: source
                .category_id
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY_ID.to_string()),
            category_name: source
                .category_name
                .clone()
                .unwrap_or_else(|| self.category_name.clone()),
            duration,
            resource_id: source
                .resource_id
                .clone()
                .unwrap_or_else(|| effect_id.clone()),
            effect_id,
            id: id.to_string(),
            is_overlap: source.is_overlap.unwrap_or(false),
            name: source.name.clone(),
            path: source.path.clone().unwrap_or_default(),
            platform: DEFAULT_PLATFORM.to_string(),
            request_id: String::new(),
            kind: TRANSITION_TYPE.to_string(),
        }
    }

    /// Builds one in/out/group animation entry placed at `range` within its clip.
    pub fn create_clip_animation(
        &self,
        source: &AnimationDescriptor,
        kind: AnimationType,
        range: TimeRange,
    ) -> ClipAnimation {
        let resource_id = source.resource_id.clone().unwrap_or_default();
        ClipAnimation {
            anim_adjust_params: None,
            category_id: source.category_id.clone().unwrap_or_default(),
            category_name: source
                .category_name
                .clone()
                .unwrap_or_else(|| kind.as_str().to_string()),
            duration: range.duration,
            id: source
                .id
                .clone()
                .filter(|id| !id.is_empty())
                .or_else(|| Some(resource_id.clone()).filter(|id| !id.is_empty()))
                .unwrap_or_else(ids::new_id),
            material_type: TRACK_TYPE_VIDEO.to_string(),
            name: source.name.clone(),
            panel: TRACK_TYPE_VIDEO.to_string(),
            path: source.path.clone().unwrap_or_default(),
            platform: DEFAULT_PLATFORM.to_string(),
            request_id: String::new(),
            resource_id,
            start: range.start,
            kind: kind.as_str().to_string(),
        }
    }
}

/// Builds an effect segment with every fixed field at its default.
pub fn create_effect_segment(
    material_id: &str,
    range: TimeRange,
    render_index: i64,
) -> EffectSegment {
    EffectSegment {
        caption_info: None,
        cartoon: false,
        clip: ClipTransform::default(),
        common_keyframes: Vec::new(),
        desc: String::new(),
        enable_adjust: true,
        enable_color_correct_adjust: false,
        enable_color_curves: true,
        enable_color_match_adjust: false,
        enable_color_wheels: true,
        enable_lut: false,
        enable_smart_color_adjust: false,
        extra_material_refs: Vec::new(),
        group_id: String::new(),
        hdr_settings: HdrSettings::default(),
        id: ids::new_id(),
        intensifies_audio: false,
        is_placeholder: false,
        is_tone_modify: false,
        keyframe_refs: Vec::new(),
        last_nonzero_volume: 1.0,
        material_id: material_id.to_string(),
        render_index,
        responsive_layout: ResponsiveLayout::default(),
        reverse: false,
        source_timerange: None,
        speed: 1.0,
        target_timerange: range,
        template_id: String::new(),
        template_scene: "default".to_string(),
        track_attribute: 0,
        track_render_index: 0,
        uniform_scale: UniformScale::default(),
        visible: true,
        volume: 1.0,
    }
}

/// Effect segment at 0s lasting 3s with the base render index
pub fn create_default_effect_segment(material_id: &str) -> EffectSegment {
    create_effect_segment(
        material_id,
        TimeRange::new(0, DEFAULT_EFFECT_DURATION),
        BASE_RENDER_INDEX,
    )
}

/// Wraps segments in a new effect track. Tracks always get a fresh id.
pub fn create_effect_track(segments: Vec<EffectSegment>) -> EffectTrack {
    EffectTrack {
        attribute: 0,
        flag: 0,
        id: ids::new_id(),
        is_default_name: true,
        name: String::new(),
        segments,
        kind: TRACK_TYPE_EFFECT.to_string(),
    }
}

pub fn create_material_animation(material_id: &str) -> MaterialAnimation {
    MaterialAnimation {
        animations: Vec::new(),
        id: ids::new_id(),
        material_id: material_id.to_string(),
        multi_language_current: "none".to_string(),
        kind: STICKER_ANIMATION_TYPE.to_string(),
    }
}

pub fn create_loudness(material_id: &str) -> Loudness {
    Loudness {
        enable: false,
        file_id: String::new(),
        id: ids::new_id(),
        loudness_param: None,
        material_id: material_id.to_string(),
        target_loudness: 0.0,
        time_range: None,
    }
}
