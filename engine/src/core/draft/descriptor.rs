//! Apply Descriptors
//!
//! Minimal inputs describing what the user picked: an effect, a transition
//! or a clip animation. Descriptors come from catalog entries or straight from
//! the UI as JSON, so every field except the name is optional.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::models::AdjustParam;
use crate::core::{Micros, TimeRange};

/// Name of the "no effect" / "no animation" sentinel
pub const NONE_NAME: &str = "None";
/// Id of the "no effect" / "no animation" sentinel
pub const NONE_ID: &str = "none";
/// Name of the "no transition" sentinel
pub const CUT_NAME: &str = "Cut";
/// Id of the "no transition" sentinel
pub const CUT_ID: &str = "cut";

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

// =============================================================================
// Effect Descriptor
// =============================================================================

/// Explicit timeline placement carried by a descriptor
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentHint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_timerange: Option<TimeRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_index: Option<i64>,
}

/// A video effect to apply
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjust_params: Option<Vec<AdjustParam>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_target_type: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_mask: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_effect_type: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_platform: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_keyframes: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_mask: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub covering_relation_change: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<SegmentHint>,
}

impl EffectDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_effect_id(mut self, effect_id: impl Into<String>) -> Self {
        self.effect_id = Some(effect_id.into());
        self
    }

    pub fn with_timerange(mut self, start: Micros, duration: Micros) -> Self {
        self.segment.get_or_insert_with(SegmentHint::default).target_timerange =
            Some(TimeRange::new(start, duration));
        self
    }

    pub fn with_render_index(mut self, render_index: i64) -> Self {
        self.segment.get_or_insert_with(SegmentHint::default).render_index = Some(render_index);
        self
    }

    /// Material id, if one was supplied
    pub fn material_id(&self) -> Option<&str> {
        non_empty(&self.id)
    }

    /// Effect-class id, if one was supplied
    pub fn effect_class(&self) -> Option<&str> {
        non_empty(&self.effect_id)
    }

    /// True for the "None" placeholder the UI offers
    pub fn is_sentinel(&self) -> bool {
        self.name == NONE_NAME || self.id.as_deref() == Some(NONE_ID)
    }

    /// Explicit placement, if the descriptor carries a timerange
    pub fn explicit_range(&self) -> Option<TimeRange> {
        self.segment.as_ref().and_then(|s| s.target_timerange)
    }

    pub fn explicit_render_index(&self) -> Option<i64> {
        self.segment.as_ref().and_then(|s| s.render_index)
    }
}

// =============================================================================
// Transition Descriptor
// =============================================================================

/// A transition to place between two video clips
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Micros>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_overlap: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl TransitionDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, duration: Micros) -> Self {
        self.duration = Some(duration);
        self
    }

    /// True for the "Cut" (no transition) placeholder
    pub fn is_sentinel(&self) -> bool {
        self.name == CUT_NAME || self.id.as_deref() == Some(CUT_ID)
    }
}

// =============================================================================
// Animation Descriptor
// =============================================================================

/// Where a clip animation plays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationType {
    In,
    Out,
    Group,
}

impl AnimationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Group => "group",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            "group" => Some(Self::Group),
            _ => None,
        }
    }
}

impl std::fmt::Display for AnimationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An in/out/group animation for a video clip
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<AnimationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Micros>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl AnimationDescriptor {
    pub fn new(name: impl Into<String>, kind: AnimationType) -> Self {
        Self {
            name: name.into(),
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, duration: Micros) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn is_sentinel(&self) -> bool {
        self.name == NONE_NAME || self.id.as_deref() == Some(NONE_ID)
    }
}
