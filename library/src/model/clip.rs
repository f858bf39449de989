use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TimeSec;

/// Portion of the source media used by a clip.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClipRange {
    pub source_in_sec: TimeSec,
    pub source_out_sec: TimeSec,
}

impl ClipRange {
    pub fn new(source_in_sec: TimeSec, source_out_sec: TimeSec) -> Self {
        Self {
            source_in_sec,
            source_out_sec,
        }
    }

    /// Length of the range in source seconds.
    pub fn span(&self) -> TimeSec {
        self.source_out_sec - self.source_in_sec
    }
}

/// Position of a clip on the timeline.
///
/// `duration_sec` is what the store last wrote and can be stale; geometry code
/// derives the duration from the range and speed instead.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClipPlace {
    pub timeline_in_sec: TimeSec,
    pub duration_sec: TimeSec,
}

impl ClipPlace {
    pub fn new(timeline_in_sec: TimeSec, duration_sec: TimeSec) -> Self {
        Self {
            timeline_in_sec,
            duration_sec,
        }
    }
}

fn default_speed() -> f64 {
    1.0
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: Uuid,
    pub asset_id: Uuid,
    #[serde(default)]
    pub range: ClipRange,
    #[serde(default)]
    pub place: ClipPlace,
    #[serde(default = "default_speed")]
    pub speed: f64,
}

impl Clip {
    pub fn new(asset_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset_id,
            range: ClipRange::default(),
            place: ClipPlace::default(),
            speed: 1.0,
        }
    }

    /// Sets the source range and refreshes the stored duration.
    pub fn with_source_range(mut self, source_in_sec: TimeSec, source_out_sec: TimeSec) -> Self {
        self.range = ClipRange::new(source_in_sec, source_out_sec);
        self.place.duration_sec = crate::edit::time::clip_duration(&self);
        self
    }

    pub fn place_at(mut self, timeline_in_sec: TimeSec) -> Self {
        self.place.timeline_in_sec = timeline_in_sec;
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self.place.duration_sec = crate::edit::time::clip_duration(&self);
        self
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_stored_duration_in_sync() {
        let clip = Clip::new(Uuid::new_v4())
            .with_source_range(2.0, 12.0)
            .with_speed(2.0)
            .place_at(4.0);

        assert_eq!(clip.range.span(), 10.0);
        assert_eq!(clip.place.duration_sec, 5.0);
        assert_eq!(clip.place.timeline_in_sec, 4.0);
    }

    #[test]
    fn test_missing_speed_deserializes_as_normal_speed() {
        let json = format!(
            r#"{{"id":"{}","assetId":"{}","range":{{"sourceInSec":0.0,"sourceOutSec":3.0}}}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let clip: Clip = serde_json::from_str(&json).unwrap();
        assert_eq!(clip.speed, 1.0);
        assert_eq!(clip.place, ClipPlace::default());
    }

    #[test]
    fn test_wire_fields_are_camel_case() {
        let id = Uuid::new_v4();
        let clip = Clip::new(Uuid::new_v4())
            .with_id(id)
            .with_source_range(1.0, 3.0)
            .place_at(2.0);

        let json = serde_json::to_value(&clip).unwrap();
        assert_eq!(json["id"], id.to_string());
        assert_eq!(json["range"]["sourceInSec"], 1.0);
        assert_eq!(json["place"]["timelineInSec"], 2.0);
        assert_eq!(json["place"]["durationSec"], 2.0);
        assert!(json.get("asset_id").is_none());
    }
}
