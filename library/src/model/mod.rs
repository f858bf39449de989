pub mod clip;
pub mod sequence;
pub mod track;

pub use clip::{Clip, ClipPlace, ClipRange};
pub use sequence::{Marker, Sequence};
pub use track::{Track, TrackKind};

/// Time in seconds.
pub type TimeSec = f64;
