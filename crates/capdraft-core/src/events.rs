//! Engine events, fanned out over a tokio broadcast channel.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

use capdraft_lib::core::catalog::LoadOutcome;

/// Event names, matching the `event` tag of [`EngineEvent`]
pub mod event_names {
    pub const CATALOGS_RELOADED: &str = "catalogs:reloaded";
    pub const CATALOG_MERGED: &str = "catalog:merged";
    pub const DRAFT_EDITED: &str = "draft:edited";
    pub const DRAFT_EDIT_FAILED: &str = "draft:editFailed";
    pub const DRAFT_SAVED: &str = "draft:saved";
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EngineEvent {
    #[serde(rename = "catalogs:reloaded")]
    CatalogsReloaded { outcomes: Vec<LoadOutcome> },
    #[serde(rename = "catalog:merged")]
    CatalogMerged { catalog: String, added: usize, updated: usize },
    #[serde(rename = "draft:edited")]
    DraftEdited { edit: String },
    #[serde(rename = "draft:editFailed")]
    DraftEditFailed { edit: String, error: String },
    #[serde(rename = "draft:saved")]
    DraftSaved { path: String },
}

impl EngineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CatalogsReloaded { .. } => event_names::CATALOGS_RELOADED,
            Self::CatalogMerged { .. } => event_names::CATALOG_MERGED,
            Self::DraftEdited { .. } => event_names::DRAFT_EDITED,
            Self::DraftEditFailed { .. } => event_names::DRAFT_EDIT_FAILED,
            Self::DraftSaved { .. } => event_names::DRAFT_SAVED,
        }
    }
}

/// Multi-subscriber event channel; events sent with no subscribers are dropped.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<EngineEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.sender.subscribe()
    }

    /// Sends `event` and returns how many subscribers got it.
    pub fn emit(&self, event: EngineEvent) -> usize {
        let name = event.name();
        let delivered = self.sender.send(event).unwrap_or(0);
        trace!("Emitted {} to {} subscriber(s)", name, delivered);
        delivered
    }
}
