//! Edit descriptors handed to the command executor.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::edit::constraints::RollResult;
use crate::edit::edit_point::EditPoint;
use crate::edit::slip::SlipResult;
use crate::error::LibraryError;
use crate::model::TimeSec;

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum EditIntent {
    MoveClip {
        sequence_id: Uuid,
        track_id: Uuid,
        clip_id: Uuid,
        new_timeline_in: TimeSec,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_track_id: Option<Uuid>,
    },
    TrimClip {
        sequence_id: Uuid,
        track_id: Uuid,
        clip_id: Uuid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_source_in: Option<TimeSec>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_source_out: Option<TimeSec>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_timeline_in: Option<TimeSec>,
    },
    SplitClip {
        sequence_id: Uuid,
        track_id: Uuid,
        clip_id: Uuid,
        split_at: TimeSec,
    },
    DeleteClip {
        sequence_id: Uuid,
        track_id: Uuid,
        clip_id: Uuid,
    },
    RollEdit {
        sequence_id: Uuid,
        track_id: Uuid,
        outgoing_clip_id: Uuid,
        incoming_clip_id: Uuid,
        outgoing_source_out: TimeSec,
        incoming_source_in: TimeSec,
        incoming_timeline_in: TimeSec,
    },
    SlipEdit {
        sequence_id: Uuid,
        track_id: Uuid,
        clip_id: Uuid,
        new_source_in: TimeSec,
        new_source_out: TimeSec,
    },
}

impl EditIntent {
    pub fn roll(sequence_id: Uuid, edit_point: &EditPoint, result: &RollResult) -> Self {
        EditIntent::RollEdit {
            sequence_id,
            track_id: edit_point.track_id,
            outgoing_clip_id: edit_point.outgoing.id,
            incoming_clip_id: edit_point.incoming.id,
            outgoing_source_out: result.outgoing_source_out,
            incoming_source_in: result.incoming_source_in,
            incoming_timeline_in: result.incoming_timeline_in,
        }
    }

    pub fn slip(sequence_id: Uuid, result: &SlipResult) -> Self {
        EditIntent::SlipEdit {
            sequence_id,
            track_id: result.track_id,
            clip_id: result.clip_id,
            new_source_in: result.new_source_in,
            new_source_out: result.new_source_out,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            EditIntent::MoveClip { .. } => "MoveClip",
            EditIntent::TrimClip { .. } => "TrimClip",
            EditIntent::SplitClip { .. } => "SplitClip",
            EditIntent::DeleteClip { .. } => "DeleteClip",
            EditIntent::RollEdit { .. } => "RollEdit",
            EditIntent::SlipEdit { .. } => "SlipEdit",
        }
    }

    pub fn sequence_id(&self) -> Uuid {
        match self {
            EditIntent::MoveClip { sequence_id, .. }
            | EditIntent::TrimClip { sequence_id, .. }
            | EditIntent::SplitClip { sequence_id, .. }
            | EditIntent::DeleteClip { sequence_id, .. }
            | EditIntent::RollEdit { sequence_id, .. }
            | EditIntent::SlipEdit { sequence_id, .. } => *sequence_id,
        }
    }

    pub fn track_id(&self) -> Uuid {
        match self {
            EditIntent::MoveClip { track_id, .. }
            | EditIntent::TrimClip { track_id, .. }
            | EditIntent::SplitClip { track_id, .. }
            | EditIntent::DeleteClip { track_id, .. }
            | EditIntent::RollEdit { track_id, .. }
            | EditIntent::SlipEdit { track_id, .. } => *track_id,
        }
    }

    /// Tracks written by this intent, including a move's destination.
    pub fn touched_tracks(&self) -> Vec<Uuid> {
        match self {
            EditIntent::MoveClip {
                track_id,
                target_track_id: Some(target),
                ..
            } if target != track_id => vec![*track_id, *target],
            _ => vec![self.track_id()],
        }
    }

    /// Clips written by this intent.
    pub fn clip_ids(&self) -> Vec<Uuid> {
        match self {
            EditIntent::MoveClip { clip_id, .. }
            | EditIntent::TrimClip { clip_id, .. }
            | EditIntent::SplitClip { clip_id, .. }
            | EditIntent::DeleteClip { clip_id, .. }
            | EditIntent::SlipEdit { clip_id, .. } => vec![*clip_id],
            EditIntent::RollEdit {
                outgoing_clip_id,
                incoming_clip_id,
                ..
            } => vec![*outgoing_clip_id, *incoming_clip_id],
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value, LibraryError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// The command layer that applies, persists and undoes edits.
pub trait EditExecutor {
    fn execute(&mut self, intent: &EditIntent) -> Result<(), LibraryError>;
}

impl<F> EditExecutor for F
where
    F: FnMut(&EditIntent) -> Result<(), LibraryError>,
{
    fn execute(&mut self, intent: &EditIntent) -> Result<(), LibraryError> {
        self(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_is_tagged_camel_case() {
        let sequence_id = Uuid::new_v4();
        let clip_id = Uuid::new_v4();
        let track_id = Uuid::new_v4();
        let intent = EditIntent::TrimClip {
            sequence_id,
            track_id,
            clip_id,
            new_source_in: Some(1.5),
            new_source_out: None,
            new_timeline_in: Some(3.0),
        };

        let json = intent.to_json().unwrap();
        assert_eq!(json["type"], "TrimClip");
        assert_eq!(json["clipId"], clip_id.to_string());
        assert_eq!(json["newSourceIn"], 1.5);
        assert!(json.get("newSourceOut").is_none());

        let parsed: EditIntent = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, intent);
    }

    #[test]
    fn test_move_to_other_track_touches_both() {
        let from = Uuid::new_v4();
        let to = Uuid::new_v4();
        let intent = EditIntent::MoveClip {
            sequence_id: Uuid::new_v4(),
            track_id: from,
            clip_id: Uuid::new_v4(),
            new_timeline_in: 2.0,
            target_track_id: Some(to),
        };
        assert_eq!(intent.touched_tracks(), vec![from, to]);
    }

    #[test]
    fn test_closure_executor() {
        let mut seen = Vec::new();
        let mut exec = |intent: &EditIntent| -> Result<(), LibraryError> {
            seen.push(intent.type_name());
            Ok(())
        };
        let intent = EditIntent::DeleteClip {
            sequence_id: Uuid::new_v4(),
            track_id: Uuid::new_v4(),
            clip_id: Uuid::new_v4(),
        };
        exec.execute(&intent).unwrap();
        assert_eq!(seen, vec!["DeleteClip"]);
    }
}
