//! Bounds for moving an edit point between two adjacent clips.

use serde::{Deserialize, Serialize};

use super::edit_point::EditPoint;
use super::time::{clip_duration, safe_speed};
use crate::model::TimeSec;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "kebab-case")]
pub enum ConstraintReason {
    /// Outgoing clip would drop below the minimum duration.
    OutgoingMin,
    /// Incoming clip would drop below the minimum duration.
    IncomingMin,
    /// Outgoing clip ran out of source media after its out point.
    OutgoingSource,
    /// Incoming clip ran out of source media before its in point.
    IncomingSource,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RollBounds {
    pub min_offset: TimeSec,
    pub max_offset: TimeSec,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RollResult {
    pub new_edit_time: TimeSec,
    pub outgoing_source_out: TimeSec,
    pub outgoing_timeline_out: TimeSec,
    pub incoming_source_in: TimeSec,
    pub incoming_timeline_in: TimeSec,
    /// Offset actually applied, after clamping.
    pub offset: TimeSec,
    pub constrained: bool,
    pub reason: Option<ConstraintReason>,
    pub bounds: RollBounds,
}

impl RollResult {
    pub fn outgoing_duration(&self, edit_point: &EditPoint) -> TimeSec {
        self.outgoing_timeline_out - edit_point.outgoing.place.timeline_in_sec
    }

    pub fn incoming_duration(&self, edit_point: &EditPoint) -> TimeSec {
        super::time::clip_end_time(&edit_point.incoming) - self.incoming_timeline_in
    }
}

pub fn roll_bounds(edit_point: &EditPoint, min_clip_duration: f64) -> RollBounds {
    let (min_offset, max_offset, _, _) = roll_limits(edit_point, min_clip_duration);
    RollBounds {
        min_offset,
        max_offset,
    }
}

// (min_offset, max_offset, min_by_outgoing_duration, max_by_incoming_duration)
fn roll_limits(edit_point: &EditPoint, min_clip_duration: f64) -> (f64, f64, f64, f64) {
    let outgoing = &edit_point.outgoing;
    let incoming = &edit_point.incoming;
    let outgoing_speed = safe_speed(outgoing.speed);
    let incoming_speed = safe_speed(incoming.speed);

    let min_by_outgoing_duration = -(clip_duration(outgoing) - min_clip_duration);
    let max_by_incoming_duration = clip_duration(incoming) - min_clip_duration;
    let max_by_outgoing_source =
        (edit_point.outgoing_source_duration - outgoing.range.source_out_sec) / outgoing_speed;
    let min_by_incoming_source = -(incoming.range.source_in_sec / incoming_speed);

    let min_offset = min_by_outgoing_duration.max(min_by_incoming_source);
    let max_offset = max_by_incoming_duration.min(max_by_outgoing_source);
    (
        min_offset,
        max_offset,
        min_by_outgoing_duration,
        max_by_incoming_duration,
    )
}

/// Clamps `requested_offset` (positive = later) and derives the new field values.
///
/// The reported reason is inferred from which combined bound equals the
/// duration limit, not traced from the bound that actually fired.
pub fn solve_roll(
    edit_point: &EditPoint,
    requested_offset: TimeSec,
    min_clip_duration: f64,
) -> RollResult {
    let (min_offset, max_offset, min_by_outgoing_duration, max_by_incoming_duration) =
        roll_limits(edit_point, min_clip_duration);

    let requested = if requested_offset.is_finite() {
        requested_offset
    } else {
        0.0
    };

    let (offset, reason) = if requested < min_offset {
        let reason = if min_offset == min_by_outgoing_duration {
            ConstraintReason::OutgoingMin
        } else {
            ConstraintReason::IncomingSource
        };
        (min_offset, Some(reason))
    } else if requested > max_offset {
        let reason = if max_offset == max_by_incoming_duration {
            ConstraintReason::IncomingMin
        } else {
            ConstraintReason::OutgoingSource
        };
        (max_offset, Some(reason))
    } else {
        (requested, None)
    };

    let outgoing = &edit_point.outgoing;
    let incoming = &edit_point.incoming;

    RollResult {
        new_edit_time: edit_point.edit_time + offset,
        outgoing_source_out: outgoing.range.source_out_sec + offset * safe_speed(outgoing.speed),
        outgoing_timeline_out: super::time::clip_end_time(outgoing) + offset,
        incoming_source_in: incoming.range.source_in_sec + offset * safe_speed(incoming.speed),
        incoming_timeline_in: incoming.place.timeline_in_sec + offset,
        offset,
        constrained: reason.is_some(),
        reason,
        bounds: RollBounds {
            min_offset,
            max_offset,
        },
    }
}
