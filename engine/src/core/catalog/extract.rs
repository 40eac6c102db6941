//! Pulls catalog entries out of arbitrary JSON documents.
//!
//! A draft document is read through its `materials` collection. Anything else
//! is either a plain array of entries or gets scanned recursively for objects
//! that carry a name, an id and a type tag valid for the catalog kind.

use serde_json::Value;
use tracing::debug;

use super::CatalogItem;

/// Extracts entries of kind `T` from `doc`; invalid items are dropped.
pub fn extract_entries<T: CatalogItem>(doc: &Value) -> Vec<T> {
    if let Some(items) = T::draft_items(doc) {
        return items.iter().filter_map(parse::<T>).collect();
    }

    if let Value::Array(items) = doc {
        return items
            .iter()
            .filter(|item| match item.get("type").and_then(Value::as_str) {
                Some(tag) => T::accepts_type(tag),
                None => true,
            })
            .filter_map(parse::<T>)
            .collect();
    }

    let mut found = Vec::new();
    scan(doc, &mut found);
    found
}

fn parse<T: CatalogItem>(item: &Value) -> Option<T> {
    match serde_json::from_value::<T>(item.clone()) {
        Ok(entry) => Some(entry),
        Err(e) => {
            debug!("Dropping invalid {} item: {}", T::KIND, e);
            None
        }
    }
}

fn is_candidate<T: CatalogItem>(object: &serde_json::Map<String, Value>) -> bool {
    let has_text = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.trim().is_empty())
    };
    has_text("name")
        && has_text("id")
        && object
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(T::accepts_type)
}

fn scan<T: CatalogItem>(value: &Value, found: &mut Vec<T>) {
    match value {
        Value::Object(object) => {
            if is_candidate::<T>(object) {
                if let Some(entry) = parse::<T>(value) {
                    found.push(entry);
                    return;
                }
            }
            for child in object.values() {
                scan(child, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                scan(item, found);
            }
        }
        _ => {}
    }
}
