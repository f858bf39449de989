use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::{ADJACENCY_TOLERANCE_SEC, clip_end_time};
use crate::config::EditSettings;
use crate::model::{Clip, TimeSec};

/// Junction where an outgoing clip hands over to an incoming clip.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EditPoint {
    pub outgoing: Clip,
    pub incoming: Clip,
    pub track_id: Uuid,
    pub edit_time: TimeSec,
    /// Total length of the outgoing clip's source media.
    pub outgoing_source_duration: TimeSec,
    /// Total length of the incoming clip's source media.
    pub incoming_source_duration: TimeSec,
}

fn sorted_by_position(clips: &[Clip]) -> Vec<&Clip> {
    let mut sorted: Vec<&Clip> = clips.iter().collect();
    sorted.sort_by(|a, b| a.place.timeline_in_sec.total_cmp(&b.place.timeline_in_sec));
    sorted
}

/// Every pair of touching clips on a track, in timeline order.
pub fn edit_points<F>(clips: &[Clip], track_id: Uuid, source_duration: F) -> Vec<EditPoint>
where
    F: Fn(&Clip) -> TimeSec,
{
    let sorted = sorted_by_position(clips);
    sorted
        .windows(2)
        .filter_map(|pair| {
            let (outgoing, incoming) = (pair[0], pair[1]);
            let outgoing_end = clip_end_time(outgoing);
            let incoming_start = incoming.place.timeline_in_sec;
            if (incoming_start - outgoing_end).abs() > ADJACENCY_TOLERANCE_SEC {
                return None;
            }
            Some(EditPoint {
                outgoing: outgoing.clone(),
                incoming: incoming.clone(),
                track_id,
                edit_time: outgoing_end,
                outgoing_source_duration: source_duration(outgoing),
                incoming_source_duration: source_duration(incoming),
            })
        })
        .collect()
}

/// First edit point (in timeline order) within `threshold` of `target_time`.
///
/// This is a first-match search: a later junction that is closer to the
/// target is not considered once an earlier one qualifies.
pub fn find_edit_point<F>(
    clips: &[Clip],
    track_id: Uuid,
    target_time: TimeSec,
    threshold: TimeSec,
    source_duration: F,
) -> Option<EditPoint>
where
    F: Fn(&Clip) -> TimeSec,
{
    edit_points(clips, track_id, source_duration)
        .into_iter()
        .find(|ep| (ep.edit_time - target_time).abs() <= threshold)
}

/// [`find_edit_point`] using the configured hit threshold.
pub fn edit_point_at<F>(
    clips: &[Clip],
    track_id: Uuid,
    target_time: TimeSec,
    settings: &EditSettings,
    source_duration: F,
) -> Option<EditPoint>
where
    F: Fn(&Clip) -> TimeSec,
{
    find_edit_point(
        clips,
        track_id,
        target_time,
        settings.edit_point_threshold_sec,
        source_duration,
    )
}
