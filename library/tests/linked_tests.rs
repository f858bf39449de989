//! Linked A/V propagation and dispatch through ClipEditHandler.

use library::edit::LinkedSelection;
use library::edit::linked::find_companions;
use library::handlers::{ClipEditHandler, EditContext};
use library::model::{Clip, Sequence, Track};
use library::{EditIntent, LibraryError};
use uuid::Uuid;

struct Fixture {
    sequence: Sequence,
    video_track: Uuid,
    audio_track: Uuid,
    /// Picture and sound of one asset, both at 5..9.
    video: Uuid,
    audio: Uuid,
    /// Unrelated clips at 9..11 on each track.
    video_next: Uuid,
    audio_next: Uuid,
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fixture() -> Fixture {
    let mut sequence = Sequence::new("Linked");
    let asset = Uuid::new_v4();

    let video = Clip::new(asset).with_source_range(0.0, 4.0).place_at(5.0);
    let audio = Clip::new(asset).with_source_range(0.0, 4.0).place_at(5.0);
    let video_next = Clip::new(Uuid::new_v4())
        .with_source_range(0.0, 2.0)
        .place_at(9.0);
    let audio_next = Clip::new(Uuid::new_v4())
        .with_source_range(0.0, 2.0)
        .place_at(9.0);
    let ids = (video.id, audio.id, video_next.id, audio_next.id);

    let mut video_track = Track::new_video("V1");
    video_track.add_clip(video);
    video_track.add_clip(video_next);
    let mut audio_track = Track::new_audio("A1");
    audio_track.add_clip(audio);
    audio_track.add_clip(audio_next);
    let (video_track_id, audio_track_id) = (video_track.id, audio_track.id);
    sequence.add_track(video_track);
    sequence.add_track(audio_track);

    Fixture {
        sequence,
        video_track: video_track_id,
        audio_track: audio_track_id,
        video: ids.0,
        audio: ids.1,
        video_next: ids.2,
        audio_next: ids.3,
    }
}

fn move_video(f: &Fixture, to: f64) -> EditIntent {
    EditIntent::MoveClip {
        sequence_id: f.sequence.id,
        track_id: f.video_track,
        clip_id: f.video,
        new_timeline_in: to,
        target_track_id: None,
    }
}

#[test]
fn test_companion_lookup() {
    let f = fixture();
    let (track, clip) = f.sequence.find_clip(f.video).unwrap();
    let companions = find_companions(&f.sequence, clip, track.id);
    assert_eq!(companions.len(), 1);
    assert_eq!(companions[0].1.id, f.audio);
    assert_eq!(companions[0].0.id, f.audio_track);
}

#[test]
fn test_offset_companion_is_not_linked() {
    let mut f = fixture();
    f.sequence.get_clip_mut(f.audio).unwrap().place.timeline_in_sec = 5.5;
    let linked = LinkedSelection::default();
    assert!(linked.propagate(&f.sequence, &move_video(&f, 7.0), false).is_empty());
}

#[test]
fn test_locked_companion_is_not_linked() {
    let mut f = fixture();
    f.sequence.get_track_mut(f.audio_track).unwrap().locked = true;
    let linked = LinkedSelection::default();
    assert!(linked.propagate(&f.sequence, &move_video(&f, 7.0), false).is_empty());
}

#[test]
fn test_move_is_mirrored() {
    let f = fixture();
    let mirrored = LinkedSelection::default().propagate(&f.sequence, &move_video(&f, 7.0), false);
    assert_eq!(
        mirrored,
        vec![EditIntent::MoveClip {
            sequence_id: f.sequence.id,
            track_id: f.audio_track,
            clip_id: f.audio,
            new_timeline_in: 7.0,
            target_track_id: None,
        }]
    );
}

#[test]
fn test_trim_is_mirrored_by_delta() {
    let f = fixture();
    let trim = EditIntent::TrimClip {
        sequence_id: f.sequence.id,
        track_id: f.video_track,
        clip_id: f.video,
        new_source_in: Some(1.0),
        new_source_out: None,
        new_timeline_in: Some(6.0),
    };
    let mirrored = LinkedSelection::default().propagate(&f.sequence, &trim, false);
    assert_eq!(
        mirrored,
        vec![EditIntent::TrimClip {
            sequence_id: f.sequence.id,
            track_id: f.audio_track,
            clip_id: f.audio,
            new_source_in: Some(1.0),
            new_source_out: None,
            new_timeline_in: Some(6.0),
        }]
    );
}

#[test]
fn test_split_and_delete_are_mirrored() {
    let f = fixture();
    let linked = LinkedSelection::default();

    let split = EditIntent::SplitClip {
        sequence_id: f.sequence.id,
        track_id: f.video_track,
        clip_id: f.video,
        split_at: 6.5,
    };
    let mirrored = linked.propagate(&f.sequence, &split, false);
    assert_eq!(mirrored.len(), 1);
    assert!(matches!(
        mirrored[0],
        EditIntent::SplitClip { clip_id, split_at, .. } if clip_id == f.audio && split_at == 6.5
    ));

    let delete = EditIntent::DeleteClip {
        sequence_id: f.sequence.id,
        track_id: f.video_track,
        clip_id: f.video,
    };
    let mirrored = linked.propagate(&f.sequence, &delete, false);
    assert_eq!(mirrored[0].clip_ids(), vec![f.audio]);
}

#[test]
fn test_propagation_can_be_suppressed() {
    let f = fixture();
    let intent = move_video(&f, 7.0);

    // Alt キー押下時は単独編集
    assert!(LinkedSelection::default().propagate(&f.sequence, &intent, true).is_empty());
    assert!(LinkedSelection::new(false).propagate(&f.sequence, &intent, false).is_empty());
}

#[test]
fn test_roll_and_slip_are_not_mirrored() {
    let f = fixture();
    let slip = EditIntent::SlipEdit {
        sequence_id: f.sequence.id,
        track_id: f.video_track,
        clip_id: f.video,
        new_source_in: 0.5,
        new_source_out: 4.5,
    };
    let roll = EditIntent::RollEdit {
        sequence_id: f.sequence.id,
        track_id: f.video_track,
        outgoing_clip_id: f.video,
        incoming_clip_id: f.video_next,
        outgoing_source_out: 3.0,
        incoming_source_in: 0.0,
        incoming_timeline_in: 8.0,
    };
    let linked = LinkedSelection::default();
    assert!(linked.propagate(&f.sequence, &slip, false).is_empty());
    assert!(linked.propagate(&f.sequence, &roll, false).is_empty());
}

#[test]
fn test_dispatch_executes_primary_then_linked() {
    init_logger();
    let f = fixture();
    let ctx = EditContext::new(f.sequence.id);
    let mut log: Vec<EditIntent> = Vec::new();
    let mut exec = |intent: &EditIntent| -> Result<(), LibraryError> {
        log.push(intent.clone());
        Ok(())
    };

    let executed =
        ClipEditHandler::dispatch(&mut exec, &f.sequence, &ctx, move_video(&f, 7.0), false)
            .unwrap();
    assert_eq!(executed.len(), 2);
    assert_eq!(executed[0].track_id(), f.video_track);
    assert_eq!(executed[1].track_id(), f.audio_track);
    assert_eq!(log, executed);
}

#[test]
fn test_dispatch_rejects_invalid_targets() {
    let mut f = fixture();
    let ctx = EditContext::new(f.sequence.id);
    let mut calls = 0;
    let mut exec = |_: &EditIntent| -> Result<(), LibraryError> {
        calls += 1;
        Ok(())
    };

    let missing = EditIntent::DeleteClip {
        sequence_id: f.sequence.id,
        track_id: f.video_track,
        clip_id: Uuid::new_v4(),
    };
    let err = ClipEditHandler::dispatch(&mut exec, &f.sequence, &ctx, missing, false).unwrap_err();
    assert!(matches!(err, LibraryError::ClipNotFound(_)));

    let outside = EditIntent::SplitClip {
        sequence_id: f.sequence.id,
        track_id: f.video_track,
        clip_id: f.video,
        split_at: 9.0,
    };
    let err = ClipEditHandler::dispatch(&mut exec, &f.sequence, &ctx, outside, false).unwrap_err();
    assert!(matches!(err, LibraryError::InvalidArgument(_)));

    let to_missing_track = EditIntent::MoveClip {
        sequence_id: f.sequence.id,
        track_id: f.video_track,
        clip_id: f.video,
        new_timeline_in: 1.0,
        target_track_id: Some(Uuid::new_v4()),
    };
    let err = ClipEditHandler::dispatch(&mut exec, &f.sequence, &ctx, to_missing_track, false)
        .unwrap_err();
    assert!(matches!(err, LibraryError::TrackNotFound(_)));

    f.sequence.get_track_mut(f.video_track).unwrap().locked = true;
    let err = ClipEditHandler::dispatch(&mut exec, &f.sequence, &ctx, move_video(&f, 7.0), false)
        .unwrap_err();
    assert!(matches!(err, LibraryError::TrackLocked(id) if id == f.video_track));

    assert_eq!(calls, 0);
}

#[test]
fn test_executor_error_is_propagated() {
    let f = fixture();
    let ctx = EditContext::new(f.sequence.id);
    let mut exec = |_: &EditIntent| -> Result<(), LibraryError> {
        Err(LibraryError::Executor("disk full".to_string()))
    };
    let err = ClipEditHandler::dispatch(&mut exec, &f.sequence, &ctx, move_video(&f, 7.0), false)
        .unwrap_err();
    assert!(matches!(err, LibraryError::Executor(msg) if msg == "disk full"));
}

#[test]
fn test_ripple_delete_removes_pair_and_closes_gaps() {
    init_logger();
    let f = fixture();
    let ctx = EditContext::new(f.sequence.id);
    let mut log: Vec<EditIntent> = Vec::new();
    let mut exec = |intent: &EditIntent| -> Result<(), LibraryError> {
        log.push(intent.clone());
        Ok(())
    };

    let executed = ClipEditHandler::ripple_delete_clip(
        &mut exec,
        &f.sequence,
        &ctx,
        f.video_track,
        f.video,
        false,
    )
    .unwrap();

    let kinds: Vec<&str> = executed.iter().map(|i| i.type_name()).collect();
    assert_eq!(kinds, vec!["DeleteClip", "DeleteClip", "MoveClip", "MoveClip"]);
    assert_eq!(executed[1].clip_ids(), vec![f.audio]);
    assert_eq!(
        executed[2],
        EditIntent::MoveClip {
            sequence_id: f.sequence.id,
            track_id: f.video_track,
            clip_id: f.video_next,
            new_timeline_in: 5.0,
            target_track_id: None,
        }
    );
    assert_eq!(executed[3].clip_ids(), vec![f.audio_next]);
    assert_eq!(log.len(), 4);
}

#[test]
fn test_dispatch_rejects_bad_numbers_before_executing() {
    let f = fixture();
    let ctx = EditContext::new(f.sequence.id);
    let mut calls = 0;
    let mut exec = |_: &EditIntent| -> Result<(), LibraryError> {
        calls += 1;
        Ok(())
    };

    for to in [-3.0, f64::NAN, f64::INFINITY] {
        let err = ClipEditHandler::dispatch(&mut exec, &f.sequence, &ctx, move_video(&f, to), false)
            .unwrap_err();
        assert!(matches!(err, LibraryError::InvalidArgument(_)), "move to {}", to);
    }

    // in point past the clip's 0..4 source range
    let trim = EditIntent::TrimClip {
        sequence_id: f.sequence.id,
        track_id: f.video_track,
        clip_id: f.video,
        new_source_in: Some(10.0),
        new_source_out: None,
        new_timeline_in: Some(15.0),
    };
    let err = ClipEditHandler::dispatch(&mut exec, &f.sequence, &ctx, trim, false).unwrap_err();
    assert!(matches!(err, LibraryError::InvalidArgument(_)));

    let slip = EditIntent::SlipEdit {
        sequence_id: f.sequence.id,
        track_id: f.video_track,
        clip_id: f.video,
        new_source_in: 3.0,
        new_source_out: 2.0,
    };
    let err = ClipEditHandler::dispatch(&mut exec, &f.sequence, &ctx, slip, false).unwrap_err();
    assert!(matches!(err, LibraryError::InvalidArgument(_)));

    let roll = EditIntent::RollEdit {
        sequence_id: f.sequence.id,
        track_id: f.video_track,
        outgoing_clip_id: f.video,
        incoming_clip_id: f.video_next,
        outgoing_source_out: 3.0,
        incoming_source_in: -1.0,
        incoming_timeline_in: 8.0,
    };
    let err = ClipEditHandler::dispatch(&mut exec, &f.sequence, &ctx, roll, false).unwrap_err();
    assert!(matches!(err, LibraryError::InvalidArgument(_)));

    assert_eq!(calls, 0);
}

#[test]
fn test_invalid_linked_trim_aborts_whole_edit() {
    let mut f = fixture();
    // audio keeps only the last two seconds of the asset
    f.sequence.get_clip_mut(f.audio).unwrap().range.source_in_sec = 2.0;
    let ctx = EditContext::new(f.sequence.id);
    let mut calls = 0;
    let mut exec = |_: &EditIntent| -> Result<(), LibraryError> {
        calls += 1;
        Ok(())
    };

    // fine for the video (0..1), mirrored as audio 2..1
    let trim = EditIntent::TrimClip {
        sequence_id: f.sequence.id,
        track_id: f.video_track,
        clip_id: f.video,
        new_source_in: None,
        new_source_out: Some(1.0),
        new_timeline_in: None,
    };
    assert!(ClipEditHandler::validate(&f.sequence, &trim).is_ok());
    let err = ClipEditHandler::dispatch(&mut exec, &f.sequence, &ctx, trim, false).unwrap_err();
    assert!(matches!(err, LibraryError::InvalidArgument(_)));
    assert_eq!(calls, 0);
}

#[test]
fn test_failure_after_primary_reports_applied_intents() {
    init_logger();
    let f = fixture();
    let ctx = EditContext::new(f.sequence.id);
    let mut calls = 0;
    let mut exec = |_: &EditIntent| -> Result<(), LibraryError> {
        calls += 1;
        if calls == 2 {
            return Err(LibraryError::Executor("disk full".to_string()));
        }
        Ok(())
    };

    let err = ClipEditHandler::dispatch(&mut exec, &f.sequence, &ctx, move_video(&f, 7.0), false)
        .unwrap_err();
    match err {
        LibraryError::PartiallyApplied { executed, source } => {
            assert_eq!(executed, vec![move_video(&f, 7.0)]);
            assert!(matches!(*source, LibraryError::Executor(ref msg) if msg == "disk full"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_ripple_delete_failure_keeps_deletes_in_report() {
    let f = fixture();
    let ctx = EditContext::new(f.sequence.id);
    let mut exec = |intent: &EditIntent| -> Result<(), LibraryError> {
        match intent {
            EditIntent::MoveClip { .. } => Err(LibraryError::Executor("locked file".to_string())),
            _ => Ok(()),
        }
    };

    let err = ClipEditHandler::ripple_delete_clip(
        &mut exec,
        &f.sequence,
        &ctx,
        f.video_track,
        f.video,
        false,
    )
    .unwrap_err();
    let LibraryError::PartiallyApplied { executed, .. } = err else {
        panic!("expected a partial application");
    };
    let kinds: Vec<&str> = executed.iter().map(|i| i.type_name()).collect();
    assert_eq!(kinds, vec!["DeleteClip", "DeleteClip"]);
}
