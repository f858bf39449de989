//! Edit geometry for a multi-track timeline: roll, slip, ripple, drag-trim
//! and linked A/V propagation.
//!
//! Nothing here mutates a project. Every operation reads a [`model::Sequence`]
//! and produces previews or [`intent::EditIntent`]s for an external executor.

pub mod config;
pub mod edit;
pub mod error;
pub mod handlers;
pub mod intent;
pub mod model;

pub use config::EditSettings;
pub use error::LibraryError;
pub use intent::{EditExecutor, EditIntent};
