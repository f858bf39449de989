pub mod clip_edit_handler;

pub use clip_edit_handler::{ClipEditHandler, EditContext};
