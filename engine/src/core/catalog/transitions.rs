//! Transition catalog entries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{icon_for, CatalogItem, CatalogKind};
use crate::core::draft::document::{MATERIALS, TRANSITIONS};
use crate::core::draft::{CUT_ID, CUT_NAME, DEFAULT_TRANSITION_DURATION, TRANSITION_TYPE};
use crate::core::Micros;

/// Icons for well-known transition names, checked before keyword heuristics.
const NAMED_ICONS: &[(&str, &str)] = &[
    ("cut", "scissors"),
    ("dissolve", "layers"),
    ("fade to black", "moon"),
    ("fade to white", "sun"),
    ("slide left", "arrow-left"),
    ("slide right", "arrow-right"),
    ("slide up", "arrow-up"),
    ("slide down", "arrow-down"),
    ("zoom in", "zoom-in"),
    ("zoom out", "zoom-out"),
    ("spin", "rotate-cw"),
    ("wipe", "chevrons-right"),
];

/// A transition offered to the user
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn named_icon(name: &str) -> Option<&'static str> {
    let lowered = name.trim().to_lowercase();
    NAMED_ICONS
        .iter()
        .find(|(known, _)| *known == lowered)
        .map(|(_, icon)| *icon)
}

fn sample(id: &str, name: &str, effect_id: &str, overlap: bool) -> TransitionEntry {
    TransitionEntry {
        id: Some(id.to_string()),
        name: name.to_string(),
        kind: Some(TRANSITION_TYPE.to_string()),
        effect_id: Some(effect_id.to_string()),
        resource_id: Some(effect_id.to_string()),
        category_name: Some("Basic".to_string()),
        duration: Some(DEFAULT_TRANSITION_DURATION),
        is_overlap: Some(overlap),
        ..TransitionEntry::default()
    }
}

impl CatalogItem for TransitionEntry {
    const KIND: CatalogKind = CatalogKind::Transitions;

    fn sentinel() -> Self {
        Self {
            id: Some(CUT_ID.to_string()),
            name: CUT_NAME.to_string(),
            duration: Some(0),
            ..Self::default()
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_tag(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    fn prepare(&mut self) {
        if self.duration.is_none() {
            self.duration = Some(DEFAULT_TRANSITION_DURATION);
        }
        if self.icon.as_deref().map_or(true, str::is_empty) {
            let icon = named_icon(&self.name)
                .unwrap_or_else(|| icon_for(&self.name, Some(TRANSITION_TYPE)));
            self.icon = Some(icon.to_string());
        }
    }

    fn accepts_type(tag: &str) -> bool {
        tag == TRANSITION_TYPE
    }

    fn draft_items(doc: &Value) -> Option<Vec<Value>> {
        doc.get(MATERIALS)?.get(TRANSITIONS)?.as_array().cloned()
    }

    fn samples() -> Vec<Self> {
        vec![
            sample("1A2B3C4D-5E6F-4A7B-8C9D-0E1F2A3B4C61", "Dissolve", "6724845717472416269", true),
            sample("2B3C4D5E-6F7A-4B8C-9D0E-1F2A3B4C5D62", "Slide Left", "6724846004664799751", false),
            sample("3C4D5E6F-7A8B-4C9D-AE1F-2A3B4C5D6E63", "Zoom In", "6724239388189921806", true),
            sample("4D5E6F7A-8B9C-4DAE-BF20-3B4C5D6E7F64", "Wipe", "6724846146423885326", false),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_cut() {
        let cut = TransitionEntry::sentinel();
        assert_eq!(cut.name, "Cut");
        assert!(cut.is_sentinel());
    }

    #[test]
    fn test_prepare_defaults_duration() {
        let mut entry = TransitionEntry {
            id: Some("T".into()),
            name: "Twist".into(),
            ..TransitionEntry::default()
        };
        entry.prepare();
        assert_eq!(entry.duration, Some(1_000_000));
        assert_eq!(entry.icon.as_deref(), Some("rotate-cw"));
    }

    #[test]
    fn test_named_icon_takes_precedence() {
        // keyword heuristic alone would pick "layers" for "fade"
        let mut entry = TransitionEntry {
            name: "Fade to Black".into(),
            ..TransitionEntry::default()
        };
        entry.prepare();
        assert_eq!(entry.icon.as_deref(), Some("moon"));
    }

    #[test]
    fn test_unknown_name_gets_transition_fallback() {
        let mut entry = TransitionEntry {
            name: "Mystery".into(),
            ..TransitionEntry::default()
        };
        entry.prepare();
        assert_eq!(entry.icon.as_deref(), Some("shuffle"));
    }
}
