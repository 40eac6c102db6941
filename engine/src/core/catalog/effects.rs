//! Video effect catalog entries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{icon_for, CatalogItem, CatalogKind};
use crate::core::draft::document::{MATERIALS, VIDEO_EFFECTS};
use crate::core::draft::{AdjustParam, NONE_ID, NONE_NAME, VIDEO_EFFECT_TYPE};

/// A video effect offered to the user
///
/// Fields the catalog does not interpret are kept in `extra` and flow into
/// the descriptor when the entry is applied.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectEntry {
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
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjust_params: Option<Vec<AdjustParam>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn sample(id: &str, name: &str, effect_id: &str, category: &str) -> EffectEntry {
    EffectEntry {
        id: Some(id.to_string()),
        name: name.to_string(),
        kind: Some(VIDEO_EFFECT_TYPE.to_string()),
        effect_id: Some(effect_id.to_string()),
        resource_id: Some(effect_id.to_string()),
        category_name: Some(category.to_string()),
        value: Some(1.0),
        ..EffectEntry::default()
    }
}

impl CatalogItem for EffectEntry {
    const KIND: CatalogKind = CatalogKind::Effects;

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
        matches!(tag, VIDEO_EFFECT_TYPE | "effect" | "face_effect")
    }

    fn draft_items(doc: &Value) -> Option<Vec<Value>> {
        doc.get(MATERIALS)?.get(VIDEO_EFFECTS)?.as_array().cloned()
    }

    fn samples() -> Vec<Self> {
        vec![
            sample("8A6A4C3E-1B2D-4E5F-9A7B-0C1D2E3F4A51", "Blur", "7015457373548155393", "Basic"),
            sample("3F2E1D0C-9B8A-4765-A4B3-C2D1E0F9A852", "Glitch", "7015456943241890305", "Trending"),
            sample("B1C2D3E4-F5A6-4B7C-8D9E-0F1A2B3C4D53", "Shake", "7015458251353960961", "Trending"),
            sample("C4D5E6F7-A8B9-4C0D-9E1F-2A3B4C5D6E54", "Film Grain", "7015459025719997953", "Retro"),
            sample("D7E8F9A0-B1C2-4D3E-AF40-5A6B7C8D9E55", "Glow", "7015456586528921089", "Light"),
            sample("E0F1A2B3-C4D5-4E6F-8A7B-8C9D0E1F2A56", "Color Pop", "7015457967033753090", "Color"),
        ]
    }
}
