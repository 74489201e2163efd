//! # Tether Core Kernel
//!
//! Shared foundations for the rest of the engine.
//!
//! ## Key Components:
//!
//! - **Error Handling**: The crate-wide [`Error`](error::Error) enum and its
//!   `Result` alias, aggregating the typed errors of each subsystem.
//! - **Logging**: The [`ComponentLogger`](logger::ComponentLogger) trait through
//!   which every acquisition warning and callback failure is reported, plus the
//!   default [`FacadeLogger`](logger::FacadeLogger) that forwards to the `log` crate.
//! - **Core Constants**: Well-known keys and names shared by the dispatch layer,
//!   found in the `constants` submodule.
pub mod constants;
pub mod error;
pub mod logger;

pub use error::{Error, Result};
pub use logger::{ComponentLogger, FacadeLogger};

// Test module declaration
#[cfg(test)]
mod tests;
