//! CapDraft Core
//!
//! The draft-editing engine without any desktop shell, plus an event bus so
//! headless hosts can observe what the engine does.

pub mod engine;
pub mod events;

pub use capdraft_lib::core;
pub use capdraft_lib::ipc;
pub use capdraft_lib::{init_logging, init_logging_from, AppState};

pub use engine::DraftEngine;
pub use events::{EngineEvent, EventBus};
