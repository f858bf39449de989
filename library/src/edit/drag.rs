//! Pointer-driven move and trim of a single clip.
//!
//! A press only becomes a drag once the pointer travels past the drag
//! threshold, so plain clicks stay selections. While dragging, every preview is
//! recomputed from the values captured at pointer-down plus the total pointer
//! travel, never from the previous preview.

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::snap::{SnapPoint, snap_clip_edges};
use super::time::{clip_duration, pixels_to_seconds, safe_speed, snap_to_grid};
use crate::config::EditSettings;
use crate::intent::EditIntent;
use crate::model::{Clip, TimeSec};

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "kebab-case")]
pub enum DragType {
    Move,
    TrimLeft,
    TrimRight,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DragPhase {
    Idle,
    PendingDrag,
    Dragging,
}

/// Reasons a drag is torn down without committing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DragInterrupt {
    Escape,
    Blur,
    Unmount,
}

/// View state needed to turn pixels into seconds.
#[derive(Clone, Copy, Debug)]
pub struct DragContext<'a> {
    /// Pixels per second.
    pub zoom: f64,
    pub grid_interval: Option<f64>,
    /// Point-snap targets; only used by moves.
    pub snap_points: &'a [SnapPoint],
}

impl<'a> DragContext<'a> {
    pub fn new(zoom: f64) -> Self {
        Self {
            zoom,
            grid_interval: None,
            snap_points: &[],
        }
    }

    /// Zoom from the view, grid from the user's settings.
    pub fn from_settings(zoom: f64, settings: &EditSettings) -> Self {
        Self::new(zoom).with_grid(settings.grid_interval_sec)
    }

    pub fn with_grid(mut self, interval: Option<f64>) -> Self {
        self.grid_interval = interval;
        self
    }

    pub fn with_snap_points(mut self, points: &'a [SnapPoint]) -> Self {
        self.snap_points = points;
        self
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DragPreview {
    pub clip_id: Uuid,
    pub track_id: Uuid,
    pub drag_type: DragType,
    pub timeline_in: TimeSec,
    pub source_in: TimeSec,
    pub source_out: TimeSec,
    pub duration: TimeSec,
    /// Point the move snapped to, for the snap indicator.
    pub snap_point: Option<SnapPoint>,
}

impl DragPreview {
    pub fn to_intent(&self, sequence_id: Uuid) -> EditIntent {
        match self.drag_type {
            DragType::Move => EditIntent::MoveClip {
                sequence_id,
                track_id: self.track_id,
                clip_id: self.clip_id,
                new_timeline_in: self.timeline_in,
                target_track_id: None,
            },
            DragType::TrimLeft => EditIntent::TrimClip {
                sequence_id,
                track_id: self.track_id,
                clip_id: self.clip_id,
                new_source_in: Some(self.source_in),
                new_source_out: None,
                new_timeline_in: Some(self.timeline_in),
            },
            DragType::TrimRight => EditIntent::TrimClip {
                sequence_id,
                track_id: self.track_id,
                clip_id: self.clip_id,
                new_source_in: None,
                new_source_out: Some(self.source_out),
                new_timeline_in: None,
            },
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DragOutcome {
    /// The drag finished and should be sent to the executor.
    Committed(DragPreview),
    /// The pointer never crossed the threshold.
    Clicked { clip_id: Uuid, track_id: Uuid },
    Cancelled,
    /// No session was active.
    Idle,
}

#[derive(Clone, Copy, Debug)]
struct DragOrigin {
    clip_id: Uuid,
    track_id: Uuid,
    drag_type: DragType,
    start_x: f64,
    start_y: f64,
    source_in: TimeSec,
    source_out: TimeSec,
    timeline_in: TimeSec,
    duration: TimeSec,
    speed: f64,
    max_source_duration: TimeSec,
}

#[derive(Clone, Copy, Debug)]
struct DragState {
    origin: DragOrigin,
    phase: DragPhase,
    preview: Option<DragPreview>,
}

#[derive(Debug, Clone)]
pub struct ClipDragSession {
    drag_threshold_px: f64,
    snap_threshold_px: f64,
    min_clip_duration: f64,
    min_zoom: f64,
    state: Option<DragState>,
}

impl ClipDragSession {
    pub fn new(settings: &EditSettings) -> Self {
        Self {
            drag_threshold_px: settings.drag_threshold_px,
            snap_threshold_px: settings.snap_threshold_px,
            min_clip_duration: settings.min_clip_duration_sec,
            min_zoom: settings.min_zoom,
            state: None,
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.state.map_or(DragPhase::Idle, |s| s.phase)
    }

    pub fn preview(&self) -> Option<DragPreview> {
        self.state.and_then(|s| s.preview)
    }

    pub fn active_snap_point(&self) -> Option<SnapPoint> {
        self.preview().and_then(|p| p.snap_point)
    }

    /// Arms a drag on `clip`. Ignored while another drag is in progress.
    ///
    /// `max_source_duration` is the total length of the clip's media; `None`
    /// leaves trim-right unbounded.
    pub fn pointer_down(
        &mut self,
        clip: &Clip,
        track_id: Uuid,
        drag_type: DragType,
        x: f64,
        y: f64,
        max_source_duration: Option<TimeSec>,
    ) -> bool {
        if self.state.is_some() {
            return false;
        }
        self.state = Some(DragState {
            origin: DragOrigin {
                clip_id: clip.id,
                track_id,
                drag_type,
                start_x: x,
                start_y: y,
                source_in: clip.range.source_in_sec,
                source_out: clip.range.source_out_sec,
                timeline_in: clip.place.timeline_in_sec,
                duration: clip_duration(clip),
                speed: safe_speed(clip.speed),
                max_source_duration: max_source_duration.unwrap_or(f64::INFINITY),
            },
            phase: DragPhase::PendingDrag,
            preview: None,
        });
        true
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, ctx: &DragContext) -> Option<DragPreview> {
        let settings = (self.snap_threshold_px, self.min_clip_duration, self.min_zoom);
        let threshold = self.drag_threshold_px;
        let state = self.state.as_mut()?;
        let dx = x - state.origin.start_x;
        let dy = y - state.origin.start_y;

        if state.phase == DragPhase::PendingDrag {
            if !(dx.abs() > threshold || dy.abs() > threshold) {
                return None;
            }
            debug!(
                "Drag ({:?}) started on clip {}",
                state.origin.drag_type, state.origin.clip_id
            );
            state.phase = DragPhase::Dragging;
        }

        let (snap_threshold_px, min_clip_duration, min_zoom) = settings;
        let delta = pixels_to_seconds(dx, ctx.zoom, min_zoom);
        let o = &state.origin;
        let preview = match o.drag_type {
            DragType::Move => {
                let snap_threshold = pixels_to_seconds(snap_threshold_px, ctx.zoom, min_zoom);
                compute_move(o, delta, ctx, snap_threshold)
            }
            DragType::TrimLeft => {
                compute_trim_left(o, delta, ctx.grid_interval, min_clip_duration)
            }
            DragType::TrimRight => {
                compute_trim_right(o, delta, ctx.grid_interval, min_clip_duration)
            }
        };
        trace!(
            "Drag preview in={:.3} src=[{:.3}, {:.3}] dur={:.3}",
            preview.timeline_in, preview.source_in, preview.source_out, preview.duration
        );
        state.preview = Some(preview);
        Some(preview)
    }

    /// Finishes the interaction and clears the session.
    pub fn end(&mut self, commit: bool) -> DragOutcome {
        let Some(state) = self.state.take() else {
            return DragOutcome::Idle;
        };
        match (state.phase, commit, state.preview) {
            (DragPhase::PendingDrag, true, _) => DragOutcome::Clicked {
                clip_id: state.origin.clip_id,
                track_id: state.origin.track_id,
            },
            (DragPhase::Dragging, true, Some(preview)) => {
                debug!("Drag committed on clip {}", preview.clip_id);
                DragOutcome::Committed(preview)
            }
            _ => {
                debug!("Drag cancelled on clip {}", state.origin.clip_id);
                DragOutcome::Cancelled
            }
        }
    }

    /// Escape, window blur and unmount all discard the drag.
    pub fn interrupt(&mut self, reason: DragInterrupt) -> DragOutcome {
        if self.state.is_some() {
            debug!("Drag interrupted by {:?}", reason);
        }
        self.end(false)
    }
}

fn compute_move(
    o: &DragOrigin,
    delta: TimeSec,
    ctx: &DragContext,
    snap_threshold: f64,
) -> DragPreview {
    let mut timeline_in = (o.timeline_in + delta).max(0.0);
    let mut snap_point = None;

    if let Some((snapped, point)) =
        snap_clip_edges(ctx.snap_points, timeline_in, o.duration, snap_threshold)
    {
        timeline_in = snapped.max(0.0);
        snap_point = Some(point);
    } else if let Some(grid) = ctx.grid_interval {
        timeline_in = snap_to_grid(timeline_in, grid).max(0.0);
    }

    DragPreview {
        clip_id: o.clip_id,
        track_id: o.track_id,
        drag_type: o.drag_type,
        timeline_in,
        source_in: o.source_in,
        source_out: o.source_out,
        duration: o.duration,
        snap_point,
    }
}

fn compute_trim_left(
    o: &DragOrigin,
    delta: TimeSec,
    grid: Option<f64>,
    min_clip_duration: f64,
) -> DragPreview {
    let max_delta = o.duration - min_clip_duration;
    let clamped = delta.max(-o.source_in).min(max_delta);

    let (mut timeline_in, mut source_in) =
        fit_head(o, o.timeline_in + clamped, o.source_in + clamped * o.speed);

    if let Some(grid) = grid {
        let snapped = snap_to_grid(timeline_in, grid).min(o.timeline_in + max_delta);
        (timeline_in, source_in) =
            fit_head(o, snapped, o.source_in + (snapped - o.timeline_in) * o.speed);
    }

    DragPreview {
        clip_id: o.clip_id,
        track_id: o.track_id,
        drag_type: o.drag_type,
        timeline_in,
        source_in,
        source_out: o.source_out,
        duration: (o.source_out - source_in) / o.speed,
        snap_point: None,
    }
}

// Keeps the head of the clip at non-negative source and timeline positions,
// moving both together.
fn fit_head(o: &DragOrigin, timeline_in: TimeSec, source_in: TimeSec) -> (TimeSec, TimeSec) {
    let (mut timeline_in, mut source_in) = (timeline_in, source_in);
    if source_in < 0.0 {
        timeline_in -= source_in / o.speed;
        source_in = 0.0;
    }
    if timeline_in < 0.0 {
        source_in -= timeline_in * o.speed;
        timeline_in = 0.0;
    }
    (timeline_in, source_in)
}

fn compute_trim_right(
    o: &DragOrigin,
    delta: TimeSec,
    grid: Option<f64>,
    min_clip_duration: f64,
) -> DragPreview {
    let min_out = o.source_in + min_clip_duration * o.speed;
    let max_out = o.max_source_duration;
    let clamp_out = |out: TimeSec| out.min(max_out).max(min_out);

    let mut source_out = clamp_out(o.source_out + delta * o.speed);
    if let Some(grid) = grid {
        let duration = snap_to_grid((source_out - o.source_in) / o.speed, grid);
        source_out = clamp_out(o.source_in + duration * o.speed);
    }

    DragPreview {
        clip_id: o.clip_id,
        track_id: o.track_id,
        drag_type: o.drag_type,
        timeline_in: o.timeline_in,
        source_in: o.source_in,
        source_out,
        duration: (source_out - o.source_in) / o.speed,
        snap_point: None,
    }
}
