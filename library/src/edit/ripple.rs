//! Downstream position shifts for delete, insert, move and trim edits.
//!
//! Every entry point reads the sequence and returns the shifts; applying them
//! is left to the command executor.

use std::collections::{BTreeMap, HashSet};

use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::{TIME_EPSILON, clip_duration, clip_end_time};
use crate::intent::EditIntent;
use crate::model::{Sequence, TimeSec, Track};

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RippleOperation {
    Delete,
    Insert {
        track_id: Uuid,
        start_time: TimeSec,
        duration: TimeSec,
    },
    Move {
        track_id: Uuid,
        clip_id: Uuid,
        from_time: TimeSec,
        to_time: TimeSec,
    },
    Trim {
        track_id: Uuid,
        clip_id: Uuid,
        new_duration: TimeSec,
    },
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AffectedClip {
    pub clip_id: Uuid,
    pub track_id: Uuid,
    pub original_time: TimeSec,
    pub new_time: TimeSec,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RippleResult {
    pub affected_clips: Vec<AffectedClip>,
    pub total_delta: TimeSec,
}

impl RippleResult {
    pub fn is_empty(&self) -> bool {
        self.affected_clips.is_empty()
    }

    /// One `MoveClip` intent per shifted clip.
    pub fn into_intents(self, sequence_id: Uuid) -> Vec<EditIntent> {
        self.affected_clips
            .into_iter()
            .map(|a| EditIntent::MoveClip {
                sequence_id,
                track_id: a.track_id,
                clip_id: a.clip_id,
                new_timeline_in: a.new_time,
                target_track_id: None,
            })
            .collect()
    }
}

/// Shifts every clip of `track` starting at or after `pivot` by `delta`.
fn shift_from(
    track: &Track,
    pivot: TimeSec,
    delta: TimeSec,
    exclude: &HashSet<Uuid>,
    floor: TimeSec,
) -> Vec<AffectedClip> {
    if !track.is_editable() {
        return Vec::new();
    }
    shift_where(track, delta, floor, |start, id| {
        !exclude.contains(&id) && start >= pivot - TIME_EPSILON
    })
}

fn shift_where<P>(track: &Track, delta: TimeSec, floor: TimeSec, pred: P) -> Vec<AffectedClip>
where
    P: Fn(TimeSec, Uuid) -> bool,
{
    let mut affected: Vec<AffectedClip> = track
        .clips
        .iter()
        .filter(|c| pred(c.place.timeline_in_sec, c.id))
        .map(|c| AffectedClip {
            clip_id: c.id,
            track_id: track.id,
            original_time: c.place.timeline_in_sec,
            new_time: (c.place.timeline_in_sec + delta).max(floor),
        })
        .collect();
    affected.sort_by(|a, b| a.original_time.total_cmp(&b.original_time));
    affected
}

/// Closes the gaps left by deleting `deleted_ids`.
///
/// Each track holding deleted clips ripples from its earliest deleted clip by
/// the summed durations it lost. With `ripple_all_tracks`, the remaining
/// tracks ripple from the earliest deletion by the total deleted duration.
pub fn ripple_delete(
    sequence: &Sequence,
    deleted_ids: &[Uuid],
    ripple_all_tracks: bool,
    min_gap: TimeSec,
) -> RippleResult {
    let deleted: HashSet<Uuid> = deleted_ids.iter().copied().collect();
    // track index -> (earliest start, summed duration)
    let mut per_track: BTreeMap<usize, (TimeSec, TimeSec)> = BTreeMap::new();

    for (index, track) in sequence.tracks.iter().enumerate() {
        for clip in track.clips.iter().filter(|c| deleted.contains(&c.id)) {
            let entry = per_track
                .entry(index)
                .or_insert((clip.place.timeline_in_sec, 0.0));
            entry.0 = entry.0.min(clip.place.timeline_in_sec);
            entry.1 += clip_duration(clip);
        }
    }

    if per_track.is_empty() {
        return RippleResult::default();
    }

    let total_deleted: TimeSec = per_track.values().map(|(_, d)| d).sum();
    let global_pivot = per_track
        .values()
        .map(|(start, _)| *start)
        .fold(f64::INFINITY, f64::min);

    let mut affected = Vec::new();
    for (index, track) in sequence.tracks.iter().enumerate() {
        if let Some((pivot, lost)) = per_track.get(&index) {
            affected.extend(shift_from(track, *pivot, -lost, &deleted, min_gap));
        } else if ripple_all_tracks {
            affected.extend(shift_from(
                track,
                global_pivot,
                -total_deleted,
                &deleted,
                min_gap,
            ));
        }
    }

    debug!(
        "Ripple delete of {} clip(s) shifts {} clip(s)",
        deleted.len(),
        affected.len()
    );
    RippleResult {
        affected_clips: affected,
        total_delta: -total_deleted,
    }
}

/// Opens room for `insert_duration` seconds at `insert_time`.
pub fn ripple_insert(
    sequence: &Sequence,
    track_id: Uuid,
    insert_time: TimeSec,
    insert_duration: TimeSec,
    ripple_all_tracks: bool,
    min_gap: TimeSec,
) -> RippleResult {
    let none = HashSet::new();
    let affected = sequence
        .tracks
        .iter()
        .filter(|t| ripple_all_tracks || t.id == track_id)
        .flat_map(|t| shift_from(t, insert_time, insert_duration, &none, min_gap))
        .collect();
    RippleResult {
        affected_clips: affected,
        total_delta: insert_duration,
    }
}

/// Shifts the clips the moved clip passes over.
///
/// Only clips strictly between `from_time` and `to_time` move: left by the
/// moved clip's duration when it travels right, right when it travels left.
pub fn ripple_move(
    sequence: &Sequence,
    track_id: Uuid,
    clip_id: Uuid,
    from_time: TimeSec,
    to_time: TimeSec,
    min_gap: TimeSec,
) -> RippleResult {
    let total_delta = to_time - from_time;
    let Some(track) = sequence.get_track(track_id) else {
        return RippleResult::default();
    };
    let Some(moved) = track.get_clip(clip_id) else {
        return RippleResult::default();
    };
    if !track.is_editable() || total_delta.abs() <= TIME_EPSILON {
        return RippleResult {
            affected_clips: Vec::new(),
            total_delta,
        };
    }

    let moved_duration = clip_duration(moved);
    let (lo, hi, shift) = if total_delta > 0.0 {
        (from_time, to_time, -moved_duration)
    } else {
        (to_time, from_time, moved_duration)
    };

    let affected = shift_where(track, shift, min_gap, |start, id| {
        id != clip_id && start > lo && start < hi
    });
    RippleResult {
        affected_clips: affected,
        total_delta,
    }
}

/// Follows a trim by moving everything after the clip's original end.
pub fn ripple_trim(
    sequence: &Sequence,
    track_id: Uuid,
    clip_id: Uuid,
    new_duration: TimeSec,
    min_gap: TimeSec,
) -> RippleResult {
    let Some(track) = sequence.get_track(track_id) else {
        return RippleResult::default();
    };
    let Some(trimmed) = track.get_clip(clip_id) else {
        return RippleResult::default();
    };
    let delta = new_duration - clip_duration(trimmed);
    let original_end = clip_end_time(trimmed);
    let exclude: HashSet<Uuid> = [clip_id].into_iter().collect();

    RippleResult {
        affected_clips: shift_from(track, original_end, delta, &exclude, min_gap),
        total_delta: delta,
    }
}

/// Dispatches on a [`RippleOperation`]. `Delete` needs the ids separately.
pub fn ripple(
    sequence: &Sequence,
    operation: RippleOperation,
    deleted_ids: &[Uuid],
    ripple_all_tracks: bool,
    min_gap: TimeSec,
) -> RippleResult {
    match operation {
        RippleOperation::Delete => {
            ripple_delete(sequence, deleted_ids, ripple_all_tracks, min_gap)
        }
        RippleOperation::Insert {
            track_id,
            start_time,
            duration,
        } => ripple_insert(
            sequence,
            track_id,
            start_time,
            duration,
            ripple_all_tracks,
            min_gap,
        ),
        RippleOperation::Move {
            track_id,
            clip_id,
            from_time,
            to_time,
        } => ripple_move(sequence, track_id, clip_id, from_time, to_time, min_gap),
        RippleOperation::Trim {
            track_id,
            clip_id,
            new_duration,
        } => ripple_trim(sequence, track_id, clip_id, new_duration, min_gap),
    }
}

/// Returns a copy of `sequence` with the shifts written in, for previews.
pub fn apply_ripple(sequence: &Sequence, result: &RippleResult) -> Sequence {
    let mut preview = sequence.clone();
    for shift in &result.affected_clips {
        if let Some(clip) = preview.get_clip_mut(shift.clip_id) {
            clip.place.timeline_in_sec = shift.new_time;
        }
    }
    preview
}
