//! Settings Commands
//!
//! Read, update and reset the persisted application settings.

use serde_json::Value;

use crate::core::settings::AppSettings;
use crate::AppState;

/// Returns the current settings
pub async fn get_settings(state: &AppState) -> Result<AppSettings, String> {
    Ok(state.settings().load())
}

/// Deep-merges a partial settings object into the current settings and saves.
///
/// Returns the settings as persisted, after normalization.
pub async fn set_settings(state: &AppState, partial: Value) -> Result<AppSettings, String> {
    if !partial.is_object() {
        return Err("Settings update must be a JSON object".to_string());
    }

    let current = state.settings().load();
    let mut merged = serde_json::to_value(&current)
        .map_err(|e| format!("Failed to serialize current settings: {}", e))?;
    merge_json(&mut merged, partial);

    let updated: AppSettings = serde_json::from_value(merged)
        .map_err(|e| format!("Failed to apply settings update: {}", e))?;
    state.settings().save(&updated).map_err(|e| e.to_ipc_error())
}

/// Deletes persisted settings and returns the defaults
pub async fn reset_settings(state: &AppState) -> Result<AppSettings, String> {
    state.settings().reset().map_err(|e| e.to_ipc_error())
}

fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                merge_json(base_map.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, patch) => *base = patch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(dir.path());

        set_settings(&state, json!({"catalog": {"sourceDirs": ["/a"]}})).await.unwrap();
        let saved = set_settings(&state, json!({"general": {"language": "zh"}})).await.unwrap();

        assert_eq!(saved.general.language, "zh");
        assert_eq!(saved.catalog.source_dirs, vec!["/a"]);
        assert_eq!(get_settings(&state).await.unwrap(), saved);
    }

    #[tokio::test]
    async fn test_update_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(dir.path());
        let saved = set_settings(&state, json!({"catalog": {"fetchTimeoutMs": 1}})).await.unwrap();
        assert_eq!(saved.catalog.fetch_timeout_ms, 100);
    }

    #[tokio::test]
    async fn test_bad_updates_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(dir.path());
        assert!(set_settings(&state, json!("loud")).await.is_err());
        assert!(set_settings(&state, json!({"logging": {"fileLogging": "yes"}})).await.is_err());
    }

    #[tokio::test]
    async fn test_reset() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(dir.path());
        set_settings(&state, json!({"general": {"language": "ko"}})).await.unwrap();
        assert_eq!(reset_settings(&state).await.unwrap(), AppSettings::default());
        assert_eq!(get_settings(&state).await.unwrap().general.language, "en");
    }
}
