use log::{debug, trace};

use super::constraints::{RollResult, solve_roll};
use super::edit_point::EditPoint;
use crate::model::TimeSec;

#[derive(Debug, Clone)]
struct RollSession {
    /// Captured at start and never modified.
    original: EditPoint,
    current_offset: TimeSec,
}

/// Drag session that moves the cut between two adjacent clips.
///
/// Total sequence length is unchanged: every result shifts the outgoing out
/// point and the incoming in point by the same constrained offset.
#[derive(Debug, Clone)]
pub struct RollEditor {
    min_clip_duration: f64,
    session: Option<RollSession>,
}

impl RollEditor {
    pub fn new(min_clip_duration: f64) -> Self {
        Self {
            min_clip_duration,
            session: None,
        }
    }

    pub fn is_rolling(&self) -> bool {
        self.session.is_some()
    }

    pub fn edit_point(&self) -> Option<&EditPoint> {
        self.session.as_ref().map(|s| &s.original)
    }

    /// Starts a roll at `edit_point`. Returns `false` if a roll is already active.
    pub fn start(&mut self, edit_point: EditPoint) -> bool {
        if self.session.is_some() {
            return false;
        }
        debug!(
            "Roll started at {:.3}s on track {}",
            edit_point.edit_time, edit_point.track_id
        );
        self.session = Some(RollSession {
            original: edit_point,
            current_offset: 0.0,
        });
        true
    }

    /// Adds `delta` to the running offset and solves against the originals.
    ///
    /// The clamped offset is stored back, so overshooting a bound and coming
    /// back responds immediately instead of first unwinding the overshoot.
    pub fn update(&mut self, delta: TimeSec) -> Option<RollResult> {
        let min_clip_duration = self.min_clip_duration;
        let session = self.session.as_mut()?;
        let delta = if delta.is_finite() { delta } else { 0.0 };
        let result = solve_roll(
            &session.original,
            session.current_offset + delta,
            min_clip_duration,
        );
        session.current_offset = result.offset;
        trace!(
            "Roll offset {:.3}s (constrained: {}, reason: {:?})",
            result.offset, result.constrained, result.reason
        );
        Some(result)
    }

    pub fn end(&mut self) -> Option<RollResult> {
        let session = self.session.take()?;
        let result = solve_roll(
            &session.original,
            session.current_offset,
            self.min_clip_duration,
        );
        debug!(
            "Roll ended: edit point {:.3}s -> {:.3}s",
            session.original.edit_time, result.new_edit_time
        );
        Some(result)
    }

    /// Drops the session and hands back the untouched edit point.
    pub fn cancel(&mut self) -> Option<EditPoint> {
        let session = self.session.take()?;
        debug!("Roll cancelled at {:.3}s", session.original.edit_time);
        Some(session.original)
    }
}
