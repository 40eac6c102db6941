//! IPC command implementations, grouped by concern.

mod catalog;
mod draft;
mod settings;

pub use catalog::*;
pub use draft::*;
pub use settings::*;
