//! capdraft Core Engine
//!
//! Draft-content mutation engine and the catalogs that feed it.
//! Handles effect/transition/animation merging, catalog loading, settings and file I/O.

pub mod catalog;
pub mod draft;
pub mod fs;
pub mod ids;
pub mod settings;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;

#[cfg(test)]
mod tests_destructive;
