//! Catalog Commands
//!
//! Listing, merging and reloading the effect, transition and animation catalogs.

use serde_json::Value;

use crate::core::catalog::{
    AnimationEntry, Catalog, CatalogItem, EffectEntry, LoadOutcome, MergeReport, TransitionEntry,
};
use crate::core::draft::AnimationType;
use crate::ipc::parse_candidates;
use crate::AppState;

/// Lists the effect catalog, sentinel first
pub async fn get_effects(state: &AppState) -> Result<Vec<EffectEntry>, String> {
    Ok(state.catalogs.lock().await.effects.entries().to_vec())
}

/// Lists the transition catalog, sentinel first
pub async fn get_transitions(state: &AppState) -> Result<Vec<TransitionEntry>, String> {
    Ok(state.catalogs.lock().await.transitions.entries().to_vec())
}

/// Lists animations, optionally only those of one type (`in`, `out`, `group`)
pub async fn get_animations(
    state: &AppState,
    kind: Option<String>,
) -> Result<Vec<AnimationEntry>, String> {
    let catalogs = state.catalogs.lock().await;
    match kind.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        None => Ok(catalogs.animations.entries().to_vec()),
        Some(raw) => {
            let kind = AnimationType::parse(raw)
                .ok_or_else(|| format!("Unknown animation type '{}': expected in, out or group", raw))?;
            Ok(catalogs.animations.filter(kind))
        }
    }
}

fn merge_into<T: CatalogItem>(catalog: &mut Catalog<T>, entries: &Value) -> Result<MergeReport, String> {
    let (candidates, invalid) = parse_candidates::<T>(entries).map_err(|e| e.to_ipc_error())?;
    let mut report = catalog.merge(candidates);
    report.skipped += invalid;
    Ok(report)
}

/// Upserts effect entries into the catalog
pub async fn merge_effects(state: &AppState, entries: Value) -> Result<MergeReport, String> {
    merge_into(&mut state.catalogs.lock().await.effects, &entries)
}

/// Upserts transition entries into the catalog
pub async fn merge_transitions(state: &AppState, entries: Value) -> Result<MergeReport, String> {
    merge_into(&mut state.catalogs.lock().await.transitions, &entries)
}

/// Upserts animation entries into the catalog
pub async fn merge_animations(state: &AppState, entries: Value) -> Result<MergeReport, String> {
    merge_into(&mut state.catalogs.lock().await.animations, &entries)
}

/// Reloads every catalog from the configured sources
pub async fn reload_catalogs(state: &AppState) -> Result<Vec<LoadOutcome>, String> {
    state.reload_catalogs().await.map_err(|e| e.to_ipc_error())
}
