use serde::{Deserialize, Serialize};

use crate::error::BeatMapError;
use crate::note::{NoteEvent, NoteKind};
use crate::LANE_COUNT;

/// Song metadata plus the time-ordered list of note events.
///
/// Built once by a generator or loaded from JSON, then read-only for the
/// duration of a play session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatMap {
    pub bpm: f64,
    pub song_name: String,
    pub difficulty: i32,
    pub notes: Vec<NoteEvent>,
}

impl Default for BeatMap {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            song_name: String::new(),
            difficulty: 0,
            notes: Vec::new(),
        }
    }
}

impl BeatMap {
    pub fn new(song_name: impl Into<String>, bpm: f64, difficulty: i32) -> Self {
        Self {
            bpm,
            song_name: song_name.into(),
            difficulty,
            notes: Vec::new(),
        }
    }

    pub fn with_notes(mut self, notes: Vec<NoteEvent>) -> Self {
        self.notes = notes;
        self
    }

    /// Duration of one beat in seconds.
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Index of the beat that `time` falls in (negative before the song starts).
    pub fn beat_index_at(&self, time: f64) -> i64 {
        (time / self.seconds_per_beat()).floor() as i64
    }

    pub fn hit_count(&self) -> usize {
        self.notes.iter().filter(|n| n.kind == NoteKind::Hit).count()
    }

    pub fn obstacle_count(&self) -> usize {
        self.notes
            .iter()
            .filter(|n| n.kind == NoteKind::Obstacle)
            .count()
    }

    pub fn first_note_time(&self) -> Option<f64> {
        self.notes.first().map(|n| n.time)
    }

    pub fn last_note_time(&self) -> Option<f64> {
        self.notes.last().map(|n| n.time)
    }

    /// Estimated song length: the last note time plus one beat.
    pub fn duration_hint(&self) -> f64 {
        self.last_note_time()
            .map_or(0.0, |t| t + self.seconds_per_beat())
    }

    /// Number of assigned notes per lane.
    pub fn lane_histogram(&self) -> [usize; LANE_COUNT] {
        let mut counts = [0; LANE_COUNT];
        for lane in self.notes.iter().filter_map(NoteEvent::lane_index) {
            counts[lane] += 1;
        }
        counts
    }

    pub fn is_sorted(&self) -> bool {
        self.notes.windows(2).all(|w| w[0].time <= w[1].time)
    }

    /// Stable sort by time; notes with equal times keep their relative order.
    pub fn sort_notes(&mut self) {
        self.notes.sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    /// Check every load-time invariant. The first violation found is returned.
    pub fn validate(&self) -> Result<(), BeatMapError> {
        if !(self.bpm.is_finite() && self.bpm > 0.0) {
            return Err(BeatMapError::InvalidBpm(self.bpm));
        }
        if self.notes.is_empty() {
            return Err(BeatMapError::Empty);
        }

        let mut prev = f64::NEG_INFINITY;
        for (index, note) in self.notes.iter().enumerate() {
            if !(note.time.is_finite() && note.time >= 0.0) {
                return Err(BeatMapError::InvalidTime {
                    index,
                    time: note.time,
                });
            }
            if note.time < prev {
                return Err(BeatMapError::Unsorted {
                    index,
                    time: note.time,
                });
            }
            if note.lane_index().is_none() {
                return Err(BeatMapError::InvalidLane {
                    index,
                    lane: note.lane,
                    lane_count: LANE_COUNT,
                });
            }
            prev = note.time;
        }
        Ok(())
    }
}
