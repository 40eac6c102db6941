//! Clip animation catalog entries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{icon_for, Catalog, CatalogItem, CatalogKind};
use crate::core::draft::document::{MATERIALS, MATERIAL_ANIMATIONS};
use crate::core::draft::{AnimationType, DEFAULT_ANIMATION_DURATION, NONE_ID, NONE_NAME};
use crate::core::Micros;

/// An in, out or group animation offered to the user
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnimationEntry {
    pub fn animation_type(&self) -> Option<AnimationType> {
        self.kind.as_deref().and_then(AnimationType::parse)
    }
}

fn sample(id: &str, name: &str, kind: AnimationType, resource_id: &str) -> AnimationEntry {
    AnimationEntry {
        id: Some(id.to_string()),
        name: name.to_string(),
        kind: Some(kind.as_str().to_string()),
        resource_id: Some(resource_id.to_string()),
        category_name: Some(kind.as_str().to_string()),
        duration: Some(DEFAULT_ANIMATION_DURATION),
        ..AnimationEntry::default()
    }
}

impl CatalogItem for AnimationEntry {
    const KIND: CatalogKind = CatalogKind::Animations;

    fn sentinel() -> Self {
        Self {
            id: Some(NONE_ID.to_string()),
            name: NONE_NAME.to_string(),
            icon: Some("ban".to_string()),
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
        if self.icon.as_deref().map_or(true, str::is_empty) {
            self.icon = Some(icon_for(&self.name, self.kind.as_deref()).to_string());
        }
    }

    fn accepts_type(tag: &str) -> bool {
        AnimationType::parse(tag).is_some()
    }

    fn draft_items(doc: &Value) -> Option<Vec<Value>> {
        let records = doc.get(MATERIALS)?.get(MATERIAL_ANIMATIONS)?.as_array()?;
        Some(
            records
                .iter()
                .filter_map(|record| record.get("animations").and_then(Value::as_array))
                .flatten()
                .cloned()
                .collect(),
        )
    }

    fn samples() -> Vec<Self> {
        use AnimationType::*;
        vec![
            sample("5E6F7A8B-9CAD-4EBF-8021-4C5D6E7F8A71", "Fade In", In, "6798320778182922760"),
            sample("6F7A8B9C-ADBE-4FC0-9132-5D6E7F8A9B72", "Zoom In", In, "6798332733694153230"),
            sample("7A8B9CAD-BECF-40D1-A243-6E7F8A9BAC73", "Fade Out", Out, "6798320902548230669"),
            sample("8B9CADBE-CFD0-41E2-B354-7F8A9BACBD74", "Slide Out", Out, "6798333705401143816"),
            sample("9CADBECF-D0E1-42F3-8465-8A9BACBDCE75", "Swing", Group, "6798333485997101582"),
            sample("ADBECFD0-E1F2-4304-9576-9BACBDCEDF76", "Bounce", Group, "6798334264812245517"),
        ]
    }
}

impl Catalog<AnimationEntry> {
    /// Entries of one animation type, sentinel first
    pub fn filter(&self, kind: AnimationType) -> Vec<AnimationEntry> {
        self.entries()
            .iter()
            .filter(|e| e.is_sentinel() || e.animation_type() == Some(kind))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_by_type_keeps_sentinel_first() {
        let mut catalog: Catalog<AnimationEntry> = Catalog::new();
        catalog.merge(AnimationEntry::samples());

        let outs = catalog.filter(AnimationType::Out);
        assert_eq!(outs.len(), 3);
        assert!(outs[0].is_sentinel());
        assert!(outs[1..]
            .iter()
            .all(|e| e.animation_type() == Some(AnimationType::Out)));
    }

    #[test]
    fn test_filter_on_empty_catalog() {
        let catalog: Catalog<AnimationEntry> = Catalog::new();
        let groups = catalog.filter(AnimationType::Group);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "None");
    }

    #[test]
    fn test_accepts_only_animation_types() {
        assert!(AnimationEntry::accepts_type("in"));
        assert!(AnimationEntry::accepts_type("group"));
        assert!(!AnimationEntry::accepts_type("video_effect"));
    }

    #[test]
    fn test_draft_items_flattens_records() {
        let doc = json!({"materials": {"material_animations": [
            {"id": "R1", "animations": [{"id": "a", "name": "Fade In", "type": "in"}]},
            {"id": "R2", "animations": [
                {"id": "b", "name": "Fade Out", "type": "out"},
                {"id": "c", "name": "Swing", "type": "group"}
            ]},
            {"id": "R3"}
        ]}});
        let items = AnimationEntry::draft_items(&doc).unwrap();
        assert_eq!(items.len(), 3);
    }
}
