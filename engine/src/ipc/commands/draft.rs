//! Draft Commands
//!
//! Load, edit and save draft documents. Edits accept catalog names or inline
//! descriptors and always hand back a usable draft.

use serde_json::Value;

use crate::core::draft::{
    self, AnimationApplier, AnimationDescriptor, AnimationSummary, DraftMerger,
    EffectDescriptor, MergeSummary, TransitionApplier, TransitionDescriptor, TransitionSummary,
};
use crate::core::fs::{atomic_write_json_pretty, read_json, validate_draft_path, validate_output_path};
use crate::ipc::{resolve_items, ApplyResponse};
use crate::AppState;

/// Applies video effects to `draft`
pub async fn apply_effects(
    state: &AppState,
    draft: Value,
    effects: Value,
) -> Result<ApplyResponse<MergeSummary>, String> {
    let descriptors = {
        let catalogs = state.catalogs.lock().await;
        resolve_items::<_, EffectDescriptor>(&catalogs.effects, &effects)
    };
    let result = descriptors.and_then(|d| DraftMerger::new(state.factory()).try_apply(&draft, &d));
    Ok(ApplyResponse::from_result(draft, result))
}

/// Places transitions between consecutive clips of `draft`
pub async fn apply_transitions(
    state: &AppState,
    draft: Value,
    transitions: Value,
) -> Result<ApplyResponse<TransitionSummary>, String> {
    let descriptors = {
        let catalogs = state.catalogs.lock().await;
        resolve_items::<_, TransitionDescriptor>(&catalogs.transitions, &transitions)
    };
    let result =
        descriptors.and_then(|d| TransitionApplier::new(state.factory()).try_apply(&draft, &d));
    Ok(ApplyResponse::from_result(draft, result))
}

/// Attaches clip animations to clips of `draft`
pub async fn apply_animations(
    state: &AppState,
    draft: Value,
    animations: Value,
) -> Result<ApplyResponse<AnimationSummary>, String> {
    let descriptors = {
        let catalogs = state.catalogs.lock().await;
        resolve_items::<_, AnimationDescriptor>(&catalogs.animations, &animations)
    };
    let result =
        descriptors.and_then(|d| AnimationApplier::new(state.factory()).try_apply(&draft, &d));
    Ok(ApplyResponse::from_result(draft, result))
}

/// Returns `draft` with every required material reference present
pub async fn ensure_references(draft: Value) -> Result<Value, String> {
    let mut doc = draft;
    draft::ensure_references(&mut doc).map_err(|e| e.to_ipc_error())?;
    Ok(doc)
}

/// Reads a draft document from disk
pub async fn load_draft(path: String) -> Result<Value, String> {
    let path = validate_draft_path(&path, "draftPath")?;
    let doc: Value = tokio::task::spawn_blocking(move || read_json::<Value>(&path))
        .await
        .map_err(|e| format!("Draft read task failed: {}", e))?
        .map_err(|e| e.to_ipc_error())?;
    if !doc.is_object() {
        return Err("Draft document root must be an object".to_string());
    }
    Ok(doc)
}

/// Writes a draft document to disk atomically
pub async fn save_draft(path: String, draft: Value) -> Result<(), String> {
    if !draft.is_object() {
        return Err("Draft document root must be an object".to_string());
    }
    let path = validate_output_path(&path, "outputPath")?;
    tokio::task::spawn_blocking(move || atomic_write_json_pretty(&path, &draft))
        .await
        .map_err(|e| format!("Draft write task failed: {}", e))?
        .map_err(|e| e.to_ipc_error())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{CatalogItem, EffectEntry};
    use crate::core::draft::REQUIRED_REFS;
    use serde_json::json;

    fn two_clip_draft() -> Value {
        json!({
            "materials": {},
            "tracks": [{"type": "video", "segments": [
                {"id": "V0", "material_id": "M0", "target_timerange": {"start": 0, "duration": 4_000_000}},
                {"id": "V1", "material_id": "M1", "target_timerange": {"start": 4_000_000, "duration": 600_000}}
            ]}]
        })
    }

    async fn state_with_samples(dir: &std::path::Path) -> AppState {
        let state = AppState::new(dir);
        *state.catalogs.lock().await = crate::core::catalog::CatalogStore::with_samples();
        state
    }

    #[tokio::test]
    async fn test_apply_effects_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_samples(dir.path()).await;

        let response = apply_effects(&state, two_clip_draft(), json!(["Blur", "None"])).await.unwrap();
        assert!(response.is_applied());
        let summary = response.summary.unwrap();
        assert_eq!(summary.segments, 1);

        let blur_id = EffectEntry::samples()[0].id.clone().unwrap();
        assert_eq!(response.draft["materials"]["video_effects"][0]["id"], blur_id.as_str());
    }

    #[tokio::test]
    async fn test_apply_effects_unknown_name_returns_original() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_samples(dir.path()).await;
        let draft = two_clip_draft();

        let response = apply_effects(&state, draft.clone(), json!(["Nope"])).await.unwrap();
        assert_eq!(response.draft, draft);
        assert!(response.error.is_some());
    }

    #[tokio::test]
    async fn test_apply_transitions_caps_duration() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_samples(dir.path()).await;

        let response = apply_transitions(&state, two_clip_draft(), json!(["Dissolve"])).await.unwrap();
        assert_eq!(response.summary.unwrap().applied, 1);
        assert_eq!(response.draft["materials"]["transitions"][0]["duration"], 600_000);
    }

    #[tokio::test]
    async fn test_apply_animations_inline_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(dir.path());

        let response = apply_animations(
            &state,
            two_clip_draft(),
            json!([{"name": "Spin", "type": "group"}]),
        )
        .await
        .unwrap();
        assert_eq!(response.summary.unwrap().applied, 1);
    }

    #[tokio::test]
    async fn test_ensure_references_command() {
        let doc = ensure_references(json!({"extra_material_refs": []})).await.unwrap();
        assert_eq!(doc["extra_material_refs"].as_array().unwrap().len(), REQUIRED_REFS.len());
        assert!(ensure_references(json!([])).await.is_err());
    }

    #[tokio::test]
    async fn test_save_and_load_draft() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project").join("draft_content.json");
        let path_str = path.to_string_lossy().into_owned();

        save_draft(path_str.clone(), two_clip_draft()).await.unwrap();
        let loaded = load_draft(path_str).await.unwrap();
        assert_eq!(loaded, two_clip_draft());
    }

    #[tokio::test]
    async fn test_save_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.json").to_string_lossy().into_owned();
        assert!(save_draft(path, json!([1, 2])).await.is_err());
    }

    #[tokio::test]
    async fn test_load_missing_draft() {
        let err = load_draft("/definitely/not/here.json".into()).await.unwrap_err();
        assert!(err.contains("not found"));
    }
}
