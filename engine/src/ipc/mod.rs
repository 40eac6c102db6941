//! IPC Facade
//!
//! Entry points a desktop shell or the CLI calls. Every command takes plain
//! JSON-friendly arguments and returns `Result<_, String>` so it can be
//! exposed over any message channel unchanged.

mod commands;
mod payloads;

pub use commands::*;
pub use payloads::*;
