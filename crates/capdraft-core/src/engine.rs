//! Event-emitting wrapper around the IPC facade.

use std::sync::Arc;

use serde_json::Value;

use capdraft_lib::core::catalog::{CatalogKind, LoadOutcome, MergeReport};
use capdraft_lib::core::draft::{AnimationSummary, MergeSummary, TransitionSummary};
use capdraft_lib::ipc::{self, ApplyResponse};
use capdraft_lib::AppState;

use crate::events::{EngineEvent, EventBus};

/// Shared engine handle for headless hosts
#[derive(Clone)]
pub struct DraftEngine {
    state: Arc<AppState>,
    events: EventBus,
}

impl DraftEngine {
    pub fn new(state: AppState) -> Self {
        Self::with_bus(Arc::new(state), EventBus::default())
    }

    pub fn with_bus(state: Arc<AppState>, events: EventBus) -> Self {
        Self { state, events }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub async fn reload_catalogs(&self) -> Result<Vec<LoadOutcome>, String> {
        let outcomes = ipc::reload_catalogs(&self.state).await?;
        self.events.emit(EngineEvent::CatalogsReloaded {
            outcomes: outcomes.clone(),
        });
        Ok(outcomes)
    }

    pub async fn merge(&self, kind: CatalogKind, entries: Value) -> Result<MergeReport, String> {
        let report = match kind {
            CatalogKind::Effects => ipc::merge_effects(&self.state, entries).await?,
            CatalogKind::Transitions => ipc::merge_transitions(&self.state, entries).await?,
            CatalogKind::Animations => ipc::merge_animations(&self.state, entries).await?,
        };
        self.events.emit(EngineEvent::CatalogMerged {
            catalog: kind.to_string(),
            added: report.added,
            updated: report.updated,
        });
        Ok(report)
    }

    pub async fn apply_effects(
        &self,
        draft: Value,
        effects: Value,
    ) -> Result<ApplyResponse<MergeSummary>, String> {
        let response = ipc::apply_effects(&self.state, draft, effects).await?;
        self.announce("effects", &response);
        Ok(response)
    }

    pub async fn apply_transitions(
        &self,
        draft: Value,
        transitions: Value,
    ) -> Result<ApplyResponse<TransitionSummary>, String> {
        let response = ipc::apply_transitions(&self.state, draft, transitions).await?;
        self.announce("transitions", &response);
        Ok(response)
    }

    pub async fn apply_animations(
        &self,
        draft: Value,
        animations: Value,
    ) -> Result<ApplyResponse<AnimationSummary>, String> {
        let response = ipc::apply_animations(&self.state, draft, animations).await?;
        self.announce("animations", &response);
        Ok(response)
    }

    pub async fn save_draft(&self, path: String, draft: Value) -> Result<(), String> {
        ipc::save_draft(path.clone(), draft).await?;
        self.events.emit(EngineEvent::DraftSaved { path });
        Ok(())
    }

    fn announce<S>(&self, edit: &str, response: &ApplyResponse<S>) {
        let event = match &response.error {
            None => EngineEvent::DraftEdited {
                edit: edit.to_string(),
            },
            Some(error) => EngineEvent::DraftEditFailed {
                edit: edit.to_string(),
                error: error.clone(),
            },
        };
        self.events.emit(event);
    }
}
