//! Clip time arithmetic shared by every edit operation.
//!
//! Nothing here fails: invalid speeds and zoom levels are replaced by safe
//! values so that a drag in progress never aborts.

use crate::model::{Clip, TimeSec};

/// Tolerance used when comparing positions that should be identical.
pub const TIME_EPSILON: f64 = 1e-6;

/// Gap allowed between two clips that still count as touching.
pub const ADJACENCY_TOLERANCE_SEC: f64 = 0.01;

/// Returns `speed`, or `1.0` when it is zero, negative or not finite.
pub fn safe_speed(speed: f64) -> f64 {
    if speed.is_finite() && speed > 0.0 {
        speed
    } else {
        1.0
    }
}

/// Timeline duration derived from the source range and speed.
pub fn clip_duration(clip: &Clip) -> TimeSec {
    clip.range.span() / safe_speed(clip.speed)
}

pub fn clip_end_time(clip: &Clip) -> TimeSec {
    clip.place.timeline_in_sec + clip_duration(clip)
}

/// Rounds `time` to the nearest multiple of `interval`.
pub fn snap_to_grid(time: TimeSec, interval: f64) -> TimeSec {
    if !interval.is_finite() || interval <= 0.0 {
        return time;
    }
    (time / interval).round() * interval
}

/// Converts a horizontal pointer distance to seconds at `zoom` pixels per second.
pub fn pixels_to_seconds(px: f64, zoom: f64, min_zoom: f64) -> TimeSec {
    let floor = if min_zoom.is_finite() && min_zoom > 0.0 {
        min_zoom
    } else {
        crate::config::DEFAULT_MIN_ZOOM
    };
    let zoom = if zoom.is_finite() { zoom.max(floor) } else { floor };
    if !px.is_finite() {
        return 0.0;
    }
    px / zoom
}

pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= TIME_EPSILON
}
