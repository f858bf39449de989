//! Mirrors clip edits onto the companion clip of a linked A/V pair.
//!
//! Two clips are linked when they sit on different tracks, come from the same
//! asset and start at the same timeline position.

use log::debug;
use uuid::Uuid;

use super::time::approx_eq;
use crate::intent::EditIntent;
use crate::model::{Clip, Sequence, Track};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedSelection {
    pub enabled: bool,
}

impl Default for LinkedSelection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Clips linked to `primary`, which lives on `primary_track_id`.
pub fn find_companions<'a>(
    sequence: &'a Sequence,
    primary: &Clip,
    primary_track_id: Uuid,
) -> Vec<(&'a Track, &'a Clip)> {
    sequence
        .tracks
        .iter()
        .filter(|t| t.id != primary_track_id && t.is_editable())
        .flat_map(|t| t.clips.iter().map(move |c| (t, c)))
        .filter(|(_, c)| {
            c.id != primary.id
                && c.asset_id == primary.asset_id
                && approx_eq(c.place.timeline_in_sec, primary.place.timeline_in_sec)
        })
        .collect()
}

impl LinkedSelection {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// The clip plus the companion that follows it when it is dragged.
    ///
    /// Pass this as the exclusion list when collecting snap points, otherwise
    /// a companion at the clip's own position pulls the drag back.
    pub fn moving_clips(&self, sequence: &Sequence, clip: &Clip, track_id: Uuid) -> Vec<Uuid> {
        let mut ids = vec![clip.id];
        if self.enabled {
            if let Some((_, companion)) = find_companions(sequence, clip, track_id).first() {
                ids.push(companion.id);
            }
        }
        ids
    }

    /// Intents that repeat `primary` on its linked companions.
    ///
    /// `primary` must describe the edit against the clip's current values in
    /// `sequence`. Roll and slip edits are never mirrored. `ignore_linked`
    /// suppresses propagation for a single edit (Alt-drag).
    pub fn propagate(
        &self,
        sequence: &Sequence,
        primary: &EditIntent,
        ignore_linked: bool,
    ) -> Vec<EditIntent> {
        if !self.enabled || ignore_linked {
            return Vec::new();
        }

        let (track_id, clip_id) = match primary {
            EditIntent::MoveClip {
                track_id, clip_id, ..
            }
            | EditIntent::TrimClip {
                track_id, clip_id, ..
            }
            | EditIntent::SplitClip {
                track_id, clip_id, ..
            }
            | EditIntent::DeleteClip {
                track_id, clip_id, ..
            } => (*track_id, *clip_id),
            EditIntent::RollEdit { .. } | EditIntent::SlipEdit { .. } => return Vec::new(),
        };

        let Some(clip) = sequence
            .get_track(track_id)
            .and_then(|t| t.get_clip(clip_id))
        else {
            return Vec::new();
        };

        let companions = find_companions(sequence, clip, track_id);
        let mirrored: Vec<EditIntent> = match primary {
            EditIntent::DeleteClip { sequence_id, .. } => companions
                .iter()
                .map(|(t, c)| EditIntent::DeleteClip {
                    sequence_id: *sequence_id,
                    track_id: t.id,
                    clip_id: c.id,
                })
                .collect(),
            _ => companions
                .first()
                .and_then(|(t, c)| translate(primary, clip, t.id, c))
                .into_iter()
                .collect(),
        };

        if !mirrored.is_empty() {
            debug!(
                "{} on clip {} mirrored onto {} linked clip(s)",
                primary.type_name(),
                clip_id,
                mirrored.len()
            );
        }
        mirrored
    }
}

fn translate(
    primary: &EditIntent,
    clip: &Clip,
    track_id: Uuid,
    companion: &Clip,
) -> Option<EditIntent> {
    let mirrored = match primary {
        EditIntent::MoveClip {
            sequence_id,
            new_timeline_in,
            ..
        } => EditIntent::MoveClip {
            sequence_id: *sequence_id,
            track_id,
            clip_id: companion.id,
            new_timeline_in: companion.place.timeline_in_sec
                + (new_timeline_in - clip.place.timeline_in_sec),
            target_track_id: None,
        },
        EditIntent::TrimClip {
            sequence_id,
            new_source_in,
            new_source_out,
            new_timeline_in,
            ..
        } => EditIntent::TrimClip {
            sequence_id: *sequence_id,
            track_id,
            clip_id: companion.id,
            new_source_in: new_source_in
                .map(|v| companion.range.source_in_sec + (v - clip.range.source_in_sec)),
            new_source_out: new_source_out
                .map(|v| companion.range.source_out_sec + (v - clip.range.source_out_sec)),
            new_timeline_in: new_timeline_in
                .map(|v| companion.place.timeline_in_sec + (v - clip.place.timeline_in_sec)),
        },
        EditIntent::SplitClip {
            sequence_id,
            split_at,
            ..
        } => EditIntent::SplitClip {
            sequence_id: *sequence_id,
            track_id,
            clip_id: companion.id,
            split_at: *split_at,
        },
        EditIntent::DeleteClip { sequence_id, .. } => EditIntent::DeleteClip {
            sequence_id: *sequence_id,
            track_id,
            clip_id: companion.id,
        },
        EditIntent::RollEdit { .. } | EditIntent::SlipEdit { .. } => return None,
    };
    Some(mirrored)
}
