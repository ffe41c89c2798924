use serde::{Deserialize, Serialize};

use crate::{LANE_COUNT, UNASSIGNED_LANE};

/// The kind of a note event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    /// Struck with a drum stick for score.
    #[default]
    Hit,
    /// Must be avoided; touching it with the body breaks combo.
    Obstacle,
}

/// A single timed note in the beatmap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Hit time in seconds from the start of the song
    pub time: f64,
    /// Drum lane (0-3), or -1 while unassigned
    #[serde(rename = "drum")]
    pub lane: i32,
    /// Note kind
    #[serde(rename = "type")]
    pub kind: NoteKind,
}

impl NoteEvent {
    pub fn hit(time: f64, lane: i32) -> Self {
        Self {
            time,
            lane,
            kind: NoteKind::Hit,
        }
    }

    pub fn obstacle(time: f64, lane: i32) -> Self {
        Self {
            time,
            lane,
            kind: NoteKind::Obstacle,
        }
    }

    /// A hit note whose lane is still to be decided by a lane policy.
    pub fn unassigned(time: f64) -> Self {
        Self::hit(time, UNASSIGNED_LANE)
    }

    pub fn is_hit(&self) -> bool {
        self.kind == NoteKind::Hit
    }

    pub fn is_obstacle(&self) -> bool {
        self.kind == NoteKind::Obstacle
    }

    pub fn is_assigned(&self) -> bool {
        self.lane_index().is_some()
    }

    /// Lane as an index into per-lane tables, `None` if unassigned or out of range.
    pub fn lane_index(&self) -> Option<usize> {
        usize::try_from(self.lane).ok().filter(|&l| l < LANE_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lane_index_rejects_sentinel_and_overflow() {
        assert_eq!(NoteEvent::hit(0.0, 0).lane_index(), Some(0));
        assert_eq!(NoteEvent::hit(0.0, 3).lane_index(), Some(3));
        assert_eq!(NoteEvent::hit(0.0, 4).lane_index(), None);
        assert_eq!(NoteEvent::unassigned(0.0).lane_index(), None);
        assert!(!NoteEvent::unassigned(1.0).is_assigned());
    }

    #[test]
    fn serde_field_names() {
        let json = serde_json::to_string(&NoteEvent::obstacle(1.5, 2)).unwrap();
        assert_eq!(json, r#"{"time":1.5,"drum":2,"type":"obstacle"}"#);

        let note: NoteEvent = serde_json::from_str(r#"{"time":0.25,"drum":-1,"type":"hit"}"#).unwrap();
        assert_eq!(note, NoteEvent::unassigned(0.25));
    }
}
