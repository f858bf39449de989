use log::{debug, trace};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Clip, ClipPlace, ClipRange, TimeSec};

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SlipResult {
    pub clip_id: Uuid,
    pub track_id: Uuid,
    pub new_source_in: TimeSec,
    pub new_source_out: TimeSec,
    /// Timeline placement, echoed unchanged.
    pub place: ClipPlace,
    pub constrained: bool,
}

/// Shifts the source window `[source_in, source_out]` by `offset`.
///
/// The lower bound is fixed first and the upper bound second, so media shorter
/// than the clip's span ends up pinned to its end with a shortened window.
/// That case is only flagged, never resized.
pub fn compute_slip(
    source_in: TimeSec,
    source_out: TimeSec,
    source_duration: TimeSec,
    offset: TimeSec,
    min_clip_duration: f64,
) -> (TimeSec, TimeSec, bool) {
    let span = source_out - source_in;
    let offset = if offset.is_finite() { offset } else { 0.0 };
    let mut new_in = source_in + offset;
    let mut new_out = source_out + offset;
    let mut constrained = false;

    if new_in < 0.0 {
        new_in = 0.0;
        new_out = span;
        constrained = true;
    }
    if new_out > source_duration {
        new_out = source_duration;
        new_in = (source_duration - span).max(0.0);
        constrained = true;
    }
    if new_out - new_in < min_clip_duration {
        constrained = true;
    }
    (new_in, new_out, constrained)
}

/// Values captured when a slip starts; handed back on cancel.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SlipOriginal {
    pub clip_id: Uuid,
    pub track_id: Uuid,
    pub range: ClipRange,
    pub place: ClipPlace,
    pub source_duration: TimeSec,
}

#[derive(Debug, Clone)]
struct SlipSession {
    original: SlipOriginal,
    last: Option<SlipResult>,
}

#[derive(Debug, Clone)]
pub struct SlipEditor {
    min_clip_duration: f64,
    session: Option<SlipSession>,
}

impl SlipEditor {
    pub fn new(min_clip_duration: f64) -> Self {
        Self {
            min_clip_duration,
            session: None,
        }
    }

    pub fn is_slipping(&self) -> bool {
        self.session.is_some()
    }

    pub fn start(&mut self, clip: &Clip, track_id: Uuid, source_duration: TimeSec) -> bool {
        if self.session.is_some() {
            return false;
        }
        debug!("Slip started on clip {}", clip.id);
        self.session = Some(SlipSession {
            original: SlipOriginal {
                clip_id: clip.id,
                track_id,
                range: clip.range,
                place: clip.place,
                source_duration,
            },
            last: None,
        });
        true
    }

    /// `offset` is the total slip since `start`, in source seconds.
    pub fn update(&mut self, offset: TimeSec) -> Option<SlipResult> {
        let min_clip_duration = self.min_clip_duration;
        let session = self.session.as_mut()?;
        let result = Self::solve(&session.original, offset, min_clip_duration);
        trace!(
            "Slip {} -> [{:.3}, {:.3}] constrained: {}",
            result.clip_id, result.new_source_in, result.new_source_out, result.constrained
        );
        session.last = Some(result.clone());
        Some(result)
    }

    /// Finishes with the last computed window, or the original when never moved.
    pub fn end(&mut self) -> Option<SlipResult> {
        let session = self.session.take()?;
        let result = session
            .last
            .unwrap_or_else(|| Self::solve(&session.original, 0.0, self.min_clip_duration));
        debug!("Slip ended on clip {}", result.clip_id);
        Some(result)
    }

    pub fn cancel(&mut self) -> Option<SlipOriginal> {
        let session = self.session.take()?;
        debug!("Slip cancelled on clip {}", session.original.clip_id);
        Some(session.original)
    }

    fn solve(original: &SlipOriginal, offset: TimeSec, min_clip_duration: f64) -> SlipResult {
        let (new_source_in, new_source_out, constrained) = compute_slip(
            original.range.source_in_sec,
            original.range.source_out_sec,
            original.source_duration,
            offset,
            min_clip_duration,
        );
        SlipResult {
            clip_id: original.clip_id,
            track_id: original.track_id,
            new_source_in,
            new_source_out,
            place: original.place,
            constrained,
        }
    }
}
