//! Draft Content Model Definitions
//!
//! Fixed-schema entities inserted into draft documents. Every field the
//! consuming editor requires is present; defaults are the named constants below.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{MaterialId, Micros, SegmentId, TimeRange, TrackId};

// =============================================================================
// Defaults
// =============================================================================

/// Default effect segment duration (3s)
pub const DEFAULT_EFFECT_DURATION: Micros = 3_000_000;

/// First render index handed out to effect segments
pub const BASE_RENDER_INDEX: i64 = 11_000;

/// Default transition duration (1s)
pub const DEFAULT_TRANSITION_DURATION: Micros = 1_000_000;

/// Default in/out clip animation duration (0.5s)
pub const DEFAULT_ANIMATION_DURATION: Micros = 500_000;

pub const DEFAULT_APPLY_TARGET_TYPE: i32 = 2;
pub const DEFAULT_CATEGORY_ID: &str = "27296";
pub const DEFAULT_CATEGORY_NAME: &str = "Trending";
pub const DEFAULT_ITEM_EFFECT_TYPE: i32 = 0;
pub const DEFAULT_SOURCE_PLATFORM: i32 = 1;
pub const DEFAULT_EFFECT_VALUE: f64 = 1.0;
pub const DEFAULT_PLATFORM: &str = "all";

pub const VIDEO_EFFECT_TYPE: &str = "video_effect";
pub const TRANSITION_TYPE: &str = "transition";
pub const STICKER_ANIMATION_TYPE: &str = "sticker_animation";

/// Track type tags used by the editor
pub const TRACK_TYPE_VIDEO: &str = "video";
pub const TRACK_TYPE_EFFECT: &str = "effect";

/// Localized name of the default effect category.
pub fn category_name_for(language: &str) -> &'static str {
    match language {
        "zh" => "热门",
        "ja" => "トレンド",
        "ko" => "인기",
        _ => DEFAULT_CATEGORY_NAME,
    }
}

// =============================================================================
// Video Effect Material
// =============================================================================

/// One adjustable parameter of a video effect
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdjustParam {
    pub name: String,
    #[serde(default)]
    pub default_value: f64,
    #[serde(default)]
    pub value: f64,
}

/// Entry of `materials.video_effects`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoEffectMaterial {
    pub adjust_params: Vec<AdjustParam>,
    pub algorithm_artifact_path: String,
    pub apply_target_type: i32,
    pub apply_time_range: Option<TimeRange>,
    pub category_id: String,
    pub category_name: String,
    pub common_keyframes: Vec<Value>,
    pub covering_relation_change: i32,
    pub disable_effect_faces: Vec<Value>,
    pub effect_id: String,
    pub effect_mask: Vec<Value>,
    pub enable_mask: bool,
    pub formula_id: String,
    pub id: MaterialId,
    pub item_effect_type: i32,
    pub name: String,
    pub path: String,
    pub platform: String,
    pub render_index: i64,
    pub request_id: String,
    pub resource_id: String,
    pub source_platform: i32,
    pub sub_type: i32,
    pub time_range: Option<TimeRange>,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: f64,
    pub version: String,
}

// =============================================================================
// Effect Segment
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flip {
    pub horizontal: bool,
    pub vertical: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

/// Clip transform of a segment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipTransform {
    pub alpha: f64,
    pub flip: Flip,
    pub rotation: f64,
    pub scale: Vec2,
    pub transform: Vec2,
}

impl Default for ClipTransform {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            flip: Flip {
                horizontal: false,
                vertical: false,
            },
            rotation: 0.0,
            scale: Vec2 { x: 1.0, y: 1.0 },
            transform: Vec2 { x: 0.0, y: 0.0 },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HdrSettings {
    pub intensity: f64,
    pub mode: i32,
    pub nits: i32,
}

impl Default for HdrSettings {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            mode: 1,
            nits: 1000,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveLayout {
    pub enable: bool,
    pub horizontal_pos_layout: i32,
    pub size_layout: i32,
    pub target_follow: String,
    pub vertical_pos_layout: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UniformScale {
    pub on: bool,
    pub value: f64,
}

impl Default for UniformScale {
    fn default() -> Self {
        Self {
            on: true,
            value: 1.0,
        }
    }
}

/// Timeline placement of a video effect material
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectSegment {
    pub caption_info: Option<Value>,
    pub cartoon: bool,
    pub clip: ClipTransform,
    pub common_keyframes: Vec<Value>,
    pub desc: String,
    pub enable_adjust: bool,
    pub enable_color_correct_adjust: bool,
    pub enable_color_curves: bool,
    pub enable_color_match_adjust: bool,
    pub enable_color_wheels: bool,
    pub enable_lut: bool,
    pub enable_smart_color_adjust: bool,
    pub extra_material_refs: Vec<MaterialId>,
    pub group_id: String,
    pub hdr_settings: HdrSettings,
    pub id: SegmentId,
    pub intensifies_audio: bool,
    pub is_placeholder: bool,
    pub is_tone_modify: bool,
    pub keyframe_refs: Vec<Value>,
    pub last_nonzero_volume: f64,
    pub material_id: MaterialId,
    pub render_index: i64,
    pub responsive_layout: ResponsiveLayout,
    pub reverse: bool,
    pub source_timerange: Option<TimeRange>,
    pub speed: f64,
    pub target_timerange: TimeRange,
    pub template_id: String,
    pub template_scene: String,
    pub track_attribute: i32,
    pub track_render_index: i32,
    pub uniform_scale: UniformScale,
    pub visible: bool,
    pub volume: f64,
}

// =============================================================================
// Effect Track
// =============================================================================

/// Track grouping effect segments
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectTrack {
    pub attribute: i32,
    pub flag: i32,
    pub id: TrackId,
    pub is_default_name: bool,
    pub name: String,
    pub segments: Vec<EffectSegment>,
    #[serde(rename = "type")]
    pub kind: String,
}

// =============================================================================
// Auxiliary Records
// =============================================================================

/// Entry of `materials.material_animations`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialAnimation {
    pub animations: Vec<ClipAnimation>,
    pub id: MaterialId,
    pub material_id: MaterialId,
    pub multi_language_current: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Entry of top-level `loudnesses`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Loudness {
    pub enable: bool,
    pub file_id: String,
    pub id: MaterialId,
    pub loudness_param: Option<Value>,
    pub material_id: MaterialId,
    pub target_loudness: f64,
    pub time_range: Option<TimeRange>,
}

/// One in/out/group animation inside a `sticker_animation` record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipAnimation {
    pub anim_adjust_params: Option<Value>,
    pub category_id: String,
    pub category_name: String,
    pub duration: Micros,
    pub id: String,
    pub material_type: String,
    pub name: String,
    pub panel: String,
    pub path: String,
    pub platform: String,
    pub request_id: String,
    pub resource_id: String,
    pub start: Micros,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Entry of `materials.transitions`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionMaterial {
    pub category_id: String,
    pub category_name: String,
    pub duration: Micros,
    pub effect_id: String,
    pub id: MaterialId,
    pub is_overlap: bool,
    pub name: String,
    pub path: String,
    pub platform: String,
    pub request_id: String,
    pub resource_id: String,
    #[serde(rename = "type")]
    pub kind: String,
}
