use log::{debug, info, warn};
use uuid::Uuid;

use crate::config::EditSettings;
use crate::edit::linked::LinkedSelection;
use crate::edit::ripple::{RippleResult, ripple_delete};
use crate::edit::split::split_clip;
use crate::error::LibraryError;
use crate::intent::{EditExecutor, EditIntent};
use crate::model::{Sequence, TimeSec};

/// Per-sequence options for dispatching edits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditContext {
    pub sequence_id: Uuid,
    pub linked: LinkedSelection,
    pub ripple_all_tracks: bool,
    pub min_clip_gap: TimeSec,
}

impl EditContext {
    pub fn new(sequence_id: Uuid) -> Self {
        Self::from_settings(sequence_id, &EditSettings::default())
    }

    pub fn from_settings(sequence_id: Uuid, settings: &EditSettings) -> Self {
        Self {
            sequence_id,
            linked: LinkedSelection::new(settings.linked_selection),
            ripple_all_tracks: settings.ripple_all_tracks,
            min_clip_gap: settings.min_clip_gap_sec,
        }
    }
}

pub struct ClipEditHandler;

impl ClipEditHandler {
    /// Checks that `intent` targets existing clips on unlocked tracks of
    /// `sequence`.
    pub fn validate(sequence: &Sequence, intent: &EditIntent) -> Result<(), LibraryError> {
        if intent.sequence_id() != sequence.id {
            return Err(LibraryError::InvalidArgument(format!(
                "Intent targets sequence {} but sequence {} was given",
                intent.sequence_id(),
                sequence.id
            )));
        }

        for track_id in intent.touched_tracks() {
            let track = sequence
                .get_track(track_id)
                .ok_or(LibraryError::TrackNotFound(track_id))?;
            if !track.is_editable() {
                warn!(
                    "Rejected {}: {} track {} is locked",
                    intent.type_name(),
                    track.kind,
                    track_id
                );
                return Err(LibraryError::TrackLocked(track_id));
            }
        }

        let track_id = intent.track_id();
        let track = sequence
            .get_track(track_id)
            .ok_or(LibraryError::TrackNotFound(track_id))?;
        for clip_id in intent.clip_ids() {
            if track.get_clip(clip_id).is_none() {
                return Err(LibraryError::ClipNotFound(clip_id));
            }
        }

        match intent {
            EditIntent::MoveClip {
                new_timeline_in, ..
            } => check_position("newTimelineIn", *new_timeline_in)?,
            EditIntent::TrimClip {
                clip_id,
                new_source_in,
                new_source_out,
                new_timeline_in,
                ..
            } => {
                let clip = track
                    .get_clip(*clip_id)
                    .ok_or(LibraryError::ClipNotFound(*clip_id))?;
                if let Some(v) = new_source_in {
                    check_position("newSourceIn", *v)?;
                }
                if let Some(v) = new_source_out {
                    check_finite("newSourceOut", *v)?;
                }
                if let Some(v) = new_timeline_in {
                    check_position("newTimelineIn", *v)?;
                }
                let source_in = new_source_in.unwrap_or(clip.range.source_in_sec);
                let source_out = new_source_out.unwrap_or(clip.range.source_out_sec);
                check_range(*clip_id, source_in, source_out)?;
            }
            EditIntent::SplitClip {
                clip_id, split_at, ..
            } => {
                let clip = track
                    .get_clip(*clip_id)
                    .ok_or(LibraryError::ClipNotFound(*clip_id))?;
                if split_clip(clip, *split_at).is_none() {
                    return Err(LibraryError::InvalidArgument(format!(
                        "Split time {} is outside clip {}",
                        split_at, clip_id
                    )));
                }
            }
            EditIntent::DeleteClip { .. } => {}
            EditIntent::RollEdit {
                outgoing_clip_id,
                incoming_clip_id,
                outgoing_source_out,
                incoming_source_in,
                incoming_timeline_in,
                ..
            } => {
                check_position("incomingSourceIn", *incoming_source_in)?;
                check_position("incomingTimelineIn", *incoming_timeline_in)?;
                check_finite("outgoingSourceOut", *outgoing_source_out)?;
                let outgoing = track
                    .get_clip(*outgoing_clip_id)
                    .ok_or(LibraryError::ClipNotFound(*outgoing_clip_id))?;
                let incoming = track
                    .get_clip(*incoming_clip_id)
                    .ok_or(LibraryError::ClipNotFound(*incoming_clip_id))?;
                check_range(
                    *outgoing_clip_id,
                    outgoing.range.source_in_sec,
                    *outgoing_source_out,
                )?;
                check_range(
                    *incoming_clip_id,
                    *incoming_source_in,
                    incoming.range.source_out_sec,
                )?;
            }
            EditIntent::SlipEdit {
                clip_id,
                new_source_in,
                new_source_out,
                ..
            } => {
                check_position("newSourceIn", *new_source_in)?;
                check_finite("newSourceOut", *new_source_out)?;
                check_range(*clip_id, *new_source_in, *new_source_out)?;
            }
        }
        Ok(())
    }

    /// Sends `intent` and its linked mirrors to `executor`.
    ///
    /// Nothing runs unless the primary and every mirror validate. Returns every
    /// intent executed, primary first; a failure after the primary ran comes
    /// back as [`LibraryError::PartiallyApplied`].
    pub fn dispatch<E>(
        executor: &mut E,
        sequence: &Sequence,
        ctx: &EditContext,
        intent: EditIntent,
        ignore_linked: bool,
    ) -> Result<Vec<EditIntent>, LibraryError>
    where
        E: EditExecutor + ?Sized,
    {
        Self::validate(sequence, &intent)?;
        let mirrored = ctx.linked.propagate(sequence, &intent, ignore_linked);
        // a mirror can fail where the primary passed, e.g. a trim past the
        // companion's shorter source range
        for linked in &mirrored {
            Self::validate(sequence, linked)?;
        }

        info!(
            "Dispatching {} on track {} ({} linked)",
            intent.type_name(),
            intent.track_id(),
            mirrored.len()
        );
        execute_all(executor, std::iter::once(intent).chain(mirrored), Vec::new())
    }

    /// Applies ripple shifts as `MoveClip` intents.
    pub fn dispatch_ripple<E>(
        executor: &mut E,
        ctx: &EditContext,
        result: RippleResult,
    ) -> Result<Vec<EditIntent>, LibraryError>
    where
        E: EditExecutor + ?Sized,
    {
        let intents = result.into_intents(ctx.sequence_id);
        if !intents.is_empty() {
            debug!("Applying ripple to {} clip(s)", intents.len());
        }
        execute_all(executor, intents, Vec::new())
    }

    /// Deletes a clip with its linked companions and closes the gaps behind
    /// them.
    pub fn ripple_delete_clip<E>(
        executor: &mut E,
        sequence: &Sequence,
        ctx: &EditContext,
        track_id: Uuid,
        clip_id: Uuid,
        ignore_linked: bool,
    ) -> Result<Vec<EditIntent>, LibraryError>
    where
        E: EditExecutor + ?Sized,
    {
        let delete = EditIntent::DeleteClip {
            sequence_id: ctx.sequence_id,
            track_id,
            clip_id,
        };
        let executed = Self::dispatch(executor, sequence, ctx, delete, ignore_linked)?;

        let deleted: Vec<Uuid> = executed.iter().flat_map(|i| i.clip_ids()).collect();
        let shifts = ripple_delete(
            sequence,
            &deleted,
            ctx.ripple_all_tracks,
            ctx.min_clip_gap,
        );
        execute_all(executor, shifts.into_intents(ctx.sequence_id), executed)
    }
}

// Runs `intents` in order, appending each success to `executed`. A failure
// after anything was applied is reported as `PartiallyApplied`.
fn execute_all<E, I>(
    executor: &mut E,
    intents: I,
    mut executed: Vec<EditIntent>,
) -> Result<Vec<EditIntent>, LibraryError>
where
    E: EditExecutor + ?Sized,
    I: IntoIterator<Item = EditIntent>,
{
    for intent in intents {
        if let Err(e) = executor.execute(&intent) {
            if executed.is_empty() {
                return Err(e);
            }
            warn!(
                "{} failed after {} intent(s) were applied: {}",
                intent.type_name(),
                executed.len(),
                e
            );
            return Err(LibraryError::PartiallyApplied {
                executed,
                source: Box::new(e),
            });
        }
        executed.push(intent);
    }
    Ok(executed)
}

fn check_finite(field: &str, value: TimeSec) -> Result<(), LibraryError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LibraryError::InvalidArgument(format!(
            "{} must be finite, got {}",
            field, value
        )))
    }
}

/// Finite and not before zero.
fn check_position(field: &str, value: TimeSec) -> Result<(), LibraryError> {
    check_finite(field, value)?;
    if value < 0.0 {
        return Err(LibraryError::InvalidArgument(format!(
            "{} must not be negative, got {}",
            field, value
        )));
    }
    Ok(())
}

fn check_range(
    clip_id: Uuid,
    source_in: TimeSec,
    source_out: TimeSec,
) -> Result<(), LibraryError> {
    if source_out <= source_in {
        return Err(LibraryError::InvalidArgument(format!(
            "Clip {} would end at source {} before its start {}",
            clip_id, source_out, source_in
        )));
    }
    Ok(())
}
