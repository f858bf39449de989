use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TimeSec;
use super::clip::Clip;
use super::track::Track;
use crate::edit::time::clip_end_time;

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: Uuid,
    pub time_sec: TimeSec,
    #[serde(default)]
    pub label: String,
}

impl Marker {
    pub fn new(time_sec: TimeSec, label: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            time_sec,
            label: label.to_string(),
        }
    }
}

/// Tracks sharing one timeline coordinate space.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Sequence {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl Sequence {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            tracks: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn get_track(&self, track_id: Uuid) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    pub fn get_track_mut(&mut self, track_id: Uuid) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == track_id)
    }

    /// Finds a clip and the track holding it.
    pub fn find_clip(&self, clip_id: Uuid) -> Option<(&Track, &Clip)> {
        self.tracks
            .iter()
            .find_map(|t| t.get_clip(clip_id).map(|c| (t, c)))
    }

    pub fn get_clip_mut(&mut self, clip_id: Uuid) -> Option<&mut Clip> {
        self.tracks
            .iter_mut()
            .find_map(|t| t.clips.iter_mut().find(|c| c.id == clip_id))
    }

    /// End time of the last clip on any track.
    pub fn duration(&self) -> TimeSec {
        self.tracks
            .iter()
            .flat_map(|t| t.clips.iter())
            .map(clip_end_time)
            .fold(0.0, f64::max)
    }
}
