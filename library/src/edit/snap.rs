use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::clip_end_time;
use crate::model::{Sequence, TimeSec};

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub enum SnapKind {
    ClipStart,
    ClipEnd,
    Playhead,
    Marker,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SnapPoint {
    pub time: TimeSec,
    pub kind: SnapKind,
}

impl SnapPoint {
    pub fn new(time: TimeSec, kind: SnapKind) -> Self {
        Self { time, kind }
    }
}

/// Gathers clip edges, the playhead and markers as snap targets.
///
/// Clips in `exclude` are skipped: the dragged clip and anything that moves
/// with it, see [`LinkedSelection::moving_clips`](super::linked::LinkedSelection::moving_clips).
pub fn collect_snap_points(
    sequence: &Sequence,
    playhead: Option<TimeSec>,
    exclude: &[Uuid],
) -> Vec<SnapPoint> {
    let mut points = Vec::new();
    for track in &sequence.tracks {
        for clip in &track.clips {
            if exclude.contains(&clip.id) {
                continue;
            }
            points.push(SnapPoint::new(clip.place.timeline_in_sec, SnapKind::ClipStart));
            points.push(SnapPoint::new(clip_end_time(clip), SnapKind::ClipEnd));
        }
    }
    if let Some(time) = playhead {
        points.push(SnapPoint::new(time, SnapKind::Playhead));
    }
    points.extend(
        sequence
            .markers
            .iter()
            .map(|m| SnapPoint::new(m.time_sec, SnapKind::Marker)),
    );
    points
}

/// Nearest snap point within `threshold` of `time`. Ties keep the earlier point.
pub fn nearest_snap_point(
    points: &[SnapPoint],
    time: TimeSec,
    threshold: TimeSec,
) -> Option<SnapPoint> {
    let mut best: Option<(SnapPoint, f64)> = None;
    for point in points {
        let dist = (point.time - time).abs();
        if dist > threshold {
            continue;
        }
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((*point, dist)),
        }
    }
    best.map(|(p, _)| p)
}

/// Snaps a clip of `duration` starting at `start` by either edge.
/// Returns the adjusted start and the point that won.
pub fn snap_clip_edges(
    points: &[SnapPoint],
    start: TimeSec,
    duration: TimeSec,
    threshold: TimeSec,
) -> Option<(TimeSec, SnapPoint)> {
    let by_start = nearest_snap_point(points, start, threshold)
        .map(|p| (p.time, p, (p.time - start).abs()));
    let end = start + duration;
    let by_end = nearest_snap_point(points, end, threshold)
        .map(|p| (p.time - duration, p, (p.time - end).abs()));

    match (by_start, by_end) {
        (Some(s), Some(e)) => {
            if e.2 < s.2 {
                Some((e.0, e.1))
            } else {
                Some((s.0, s.1))
            }
        }
        (Some(s), None) => Some((s.0, s.1)),
        (None, Some(e)) => Some((e.0, e.1)),
        (None, None) => None,
    }
}
