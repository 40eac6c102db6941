//! Request and response shapes shared by the commands.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::core::catalog::{to_descriptor, Catalog, CatalogItem};
use crate::core::{CoreError, CoreResult};

/// Result of an apply command
///
/// Applying never fails outright: on any fault `draft` is the caller's
/// original document and `error` says why.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResponse<S> {
    pub draft: Value,
    pub summary: Option<S>,
    pub error: Option<String>,
}

impl<S> ApplyResponse<S> {
    pub fn from_result(original: Value, result: CoreResult<(Value, S)>) -> Self {
        match result {
            Ok((draft, summary)) => Self {
                draft,
                summary: Some(summary),
                error: None,
            },
            Err(e) => {
                warn!("Apply failed, returning original draft: {}", e);
                Self {
                    draft: original,
                    summary: None,
                    error: Some(e.to_ipc_error()),
                }
            }
        }
    }

    pub fn is_applied(&self) -> bool {
        self.error.is_none()
    }
}

/// Turns a JSON list into descriptors.
///
/// A string item names a catalog entry by id or name; an object item is a
/// descriptor given inline.
pub fn resolve_items<T, D>(catalog: &Catalog<T>, items: &Value) -> CoreResult<Vec<D>>
where
    T: CatalogItem,
    D: DeserializeOwned,
{
    let list = items.as_array().ok_or_else(|| {
        CoreError::InvalidDescriptor("expected a list of catalog names or descriptors".to_string())
    })?;

    list.iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(query) => {
                let entry = catalog.find(query).ok_or_else(|| {
                    CoreError::EntryNotFound(format!("{} '{}'", T::KIND, query))
                })?;
                to_descriptor(entry)
            }
            Value::Object(_) => serde_json::from_value(item.clone())
                .map_err(|e| CoreError::InvalidDescriptor(format!("item {}: {}", i, e))),
            other => Err(CoreError::InvalidDescriptor(format!(
                "item {} must be a name or an object, got {}",
                i, other
            ))),
        })
        .collect()
}

/// Parses candidate entries one by one; returns the parsed ones and how many were invalid.
pub fn parse_candidates<T: CatalogItem>(entries: &Value) -> CoreResult<(Vec<T>, usize)> {
    let list = entries.as_array().ok_or_else(|| {
        CoreError::InvalidDescriptor("expected a list of catalog entries".to_string())
    })?;

    let mut invalid = 0;
    let parsed = list
        .iter()
        .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
            Ok(entry) => Some(entry),
            Err(_) => {
                invalid += 1;
                None
            }
        })
        .collect();
    Ok((parsed, invalid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{EffectEntry, TransitionEntry};
    use crate::core::draft::{EffectDescriptor, TransitionDescriptor};
    use serde_json::json;

    fn effects() -> Catalog<EffectEntry> {
        let mut catalog = Catalog::new();
        catalog.merge(EffectEntry::samples());
        catalog
    }

    #[test]
    fn test_resolve_names_and_inline_objects() {
        let items = json!(["Blur", {"name": "Custom", "effect_id": "7"}]);
        let descriptors: Vec<EffectDescriptor> = resolve_items(&effects(), &items).unwrap();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].name, "Blur");
        assert!(descriptors[0].material_id().is_some());
        assert_eq!(descriptors[1].effect_class(), Some("7"));
    }

    #[test]
    fn test_resolve_sentinel_by_name() {
        let mut catalog: Catalog<TransitionEntry> = Catalog::new();
        catalog.merge(TransitionEntry::samples());
        let descriptors: Vec<TransitionDescriptor> = resolve_items(&catalog, &json!(["cut"])).unwrap();
        assert!(descriptors[0].is_sentinel());
    }

    #[test]
    fn test_resolve_unknown_name() {
        let err = resolve_items::<_, EffectDescriptor>(&effects(), &json!(["Nope"])).unwrap_err();
        assert!(matches!(err, CoreError::EntryNotFound(_)));
    }

    #[test]
    fn test_resolve_rejects_non_list_and_scalars() {
        assert!(resolve_items::<_, EffectDescriptor>(&effects(), &json!({"name": "Blur"})).is_err());
        assert!(resolve_items::<_, EffectDescriptor>(&effects(), &json!([42])).is_err());
    }

    #[test]
    fn test_parse_candidates_counts_invalid() {
        let (parsed, invalid) =
            parse_candidates::<EffectEntry>(&json!([{"id": "a", "name": "A"}, {"name": 3}, "x"])).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(invalid, 2);
    }

    #[test]
    fn test_apply_response_on_error_keeps_original() {
        let original = json!({"keep": true});
        let response: ApplyResponse<()> = ApplyResponse::from_result(
            original.clone(),
            Err(CoreError::MalformedDocument("bad".into())),
        );
        assert_eq!(response.draft, original);
        assert!(!response.is_applied());
        assert!(response.error.unwrap().contains("bad"));
    }
}
