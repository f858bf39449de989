use serde::{Deserialize, Serialize};

use super::time::{TIME_EPSILON, clip_end_time, safe_speed};
use crate::model::{Clip, ClipPlace, ClipRange, TimeSec};

/// The two halves of a clip cut at a timeline instant.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SplitResult {
    pub first_range: ClipRange,
    pub first_place: ClipPlace,
    pub second_range: ClipRange,
    pub second_place: ClipPlace,
}

/// Cuts `clip` at timeline time `at`. `None` unless `at` lies strictly inside.
pub fn split_clip(clip: &Clip, at: TimeSec) -> Option<SplitResult> {
    let start = clip.place.timeline_in_sec;
    let end = clip_end_time(clip);
    if !at.is_finite() || at <= start + TIME_EPSILON || at >= end - TIME_EPSILON {
        return None;
    }

    let speed = safe_speed(clip.speed);
    let relative = at - start;
    let source_split = clip.range.source_in_sec + relative * speed;

    Some(SplitResult {
        first_range: ClipRange::new(clip.range.source_in_sec, source_split),
        first_place: ClipPlace::new(start, relative),
        second_range: ClipRange::new(source_split, clip.range.source_out_sec),
        second_place: ClipPlace::new(at, (clip.range.source_out_sec - source_split) / speed),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_split_with_speed() {
        let clip = Clip::new(Uuid::new_v4())
            .with_source_range(10.0, 20.0)
            .with_speed(2.0)
            .place_at(4.0);
        // timeline 4..9, cut at 6 -> 2s in = 4 source seconds
        let split = split_clip(&clip, 6.0).unwrap();
        assert_eq!(split.first_range, ClipRange::new(10.0, 14.0));
        assert_eq!(split.first_place, ClipPlace::new(4.0, 2.0));
        assert_eq!(split.second_range, ClipRange::new(14.0, 20.0));
        assert_eq!(split.second_place, ClipPlace::new(6.0, 3.0));
    }

    #[test]
    fn test_split_on_edges_is_rejected() {
        let clip = Clip::new(Uuid::new_v4())
            .with_source_range(0.0, 5.0)
            .place_at(1.0);
        assert!(split_clip(&clip, 1.0).is_none());
        assert!(split_clip(&clip, 6.0).is_none());
        assert!(split_clip(&clip, 7.0).is_none());
        assert!(split_clip(&clip, f64::NAN).is_none());
    }
}
