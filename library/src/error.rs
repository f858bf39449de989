use thiserror::Error;
use uuid::Uuid;

use crate::intent::EditIntent;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Settings parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("Settings serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Clip with ID {0} not found")]
    ClipNotFound(Uuid),
    #[error("Track with ID {0} not found")]
    TrackNotFound(Uuid),
    #[error("Track with ID {0} is locked")]
    TrackLocked(Uuid),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Executor error: {0}")]
    Executor(String),
    /// The executor failed after earlier intents of the same edit were
    /// applied. `executed` lists those, in order, so the caller can undo them.
    #[error("Edit failed after {} intent(s) were applied: {source}", executed.len())]
    PartiallyApplied {
        executed: Vec<EditIntent>,
        source: Box<LibraryError>,
    },
}
