//! Draft Content Module
//!
//! Reads and rewrites CapCut draft-content documents: entity factories,
//! reference maintenance, and the effect/transition/animation mergers.

mod animations;
mod descriptor;
pub mod document;
mod factory;
mod merger;
mod models;
pub mod refs;
mod transitions;

pub use animations::{AnimationApplier, AnimationSummary};
pub use descriptor::*;
pub use factory::*;
pub use merger::{apply, normalize_document, DraftMerger, MergeSummary};
pub use models::*;
pub use refs::{ensure_references, has_required_references, REQUIRED_REFS};
pub use transitions::{TransitionApplier, TransitionSummary};
