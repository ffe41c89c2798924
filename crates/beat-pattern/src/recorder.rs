// Manual note recording: notes tapped in while the song plays back.

use beat_model::{BeatMap, NoteEvent, NoteKind};

/// Maximum distance in seconds for [`NoteRecorder::remove_nearest`].
pub const REMOVE_TOLERANCE: f64 = 0.5;

/// Collects notes added at song positions during manual playback.
///
/// Notes are kept sorted by time at every step; a note added at the same
/// time as existing ones goes after them.
#[derive(Debug, Clone, Default)]
pub struct NoteRecorder {
    notes: Vec<NoteEvent>,
    /// Insertion sequence number of each entry in `notes`
    seqs: Vec<u64>,
    next_seq: u64,
    /// Sequence numbers of recorded notes, most recent last (for undo)
    history: Vec<u64>,
}

impl NoteRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing map's notes, e.g. to touch up a generated chart.
    pub fn from_beatmap(map: &BeatMap) -> Self {
        let mut recorder = Self::new();
        for note in &map.notes {
            recorder.insert_sorted(*note);
        }
        recorder
    }

    pub fn notes(&self) -> &[NoteEvent] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    fn insert_sorted(&mut self, note: NoteEvent) -> (usize, u64) {
        let pos = self.notes.partition_point(|n| n.time <= note.time);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.notes.insert(pos, note);
        self.seqs.insert(pos, seq);
        (pos, seq)
    }

    fn remove_at(&mut self, pos: usize) -> NoteEvent {
        self.seqs.remove(pos);
        self.notes.remove(pos)
    }

    /// Record a note at `song_position` (read from the song clock by the caller).
    /// Negative or non-finite positions are ignored.
    pub fn record(&mut self, song_position: f64, lane: i32, kind: NoteKind) -> Option<usize> {
        if !(song_position.is_finite() && song_position >= 0.0) {
            log::debug!("ignoring note recorded at {song_position}");
            return None;
        }
        let (pos, seq) = self.insert_sorted(NoteEvent {
            time: song_position,
            lane,
            kind,
        });
        self.history.push(seq);
        Some(pos)
    }

    /// Undo the most recently recorded note.
    pub fn remove_last(&mut self) -> Option<NoteEvent> {
        while let Some(seq) = self.history.pop() {
            // The note may already be gone through `remove_nearest`.
            if let Some(pos) = self.seqs.iter().position(|&s| s == seq) {
                return Some(self.remove_at(pos));
            }
        }
        None
    }

    /// Remove the note closest to `time`, if one lies within [`REMOVE_TOLERANCE`].
    pub fn remove_nearest(&mut self, time: f64) -> Option<NoteEvent> {
        let (pos, distance) = self
            .notes
            .iter()
            .enumerate()
            .map(|(i, n)| (i, (n.time - time).abs()))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        if distance > REMOVE_TOLERANCE {
            return None;
        }
        Some(self.remove_at(pos))
    }

    pub fn clear(&mut self) {
        self.notes.clear();
        self.seqs.clear();
        self.history.clear();
    }

    /// Build the final beatmap from the recorded notes.
    pub fn finish(&self, song_name: impl Into<String>, bpm: f64, difficulty: i32) -> BeatMap {
        BeatMap::new(song_name, bpm, difficulty).with_notes(self.notes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(recorder: &NoteRecorder) -> Vec<f64> {
        recorder.notes().iter().map(|n| n.time).collect()
    }

    #[test]
    fn out_of_order_records_stay_sorted() {
        let mut recorder = NoteRecorder::new();
        recorder.record(2.0, 0, NoteKind::Hit);
        recorder.record(1.0, 1, NoteKind::Hit);
        recorder.record(3.0, 2, NoteKind::Obstacle);
        recorder.record(1.5, 3, NoteKind::Hit);
        assert_eq!(times(&recorder), vec![1.0, 1.5, 2.0, 3.0]);
    }

    #[test]
    fn equal_times_keep_recording_order() {
        let mut recorder = NoteRecorder::new();
        recorder.record(1.0, 0, NoteKind::Hit);
        recorder.record(1.0, 3, NoteKind::Hit);
        let lanes: Vec<i32> = recorder.notes().iter().map(|n| n.lane).collect();
        assert_eq!(lanes, vec![0, 3]);
    }

    #[test]
    fn remove_last_undoes_latest_recording() {
        let mut recorder = NoteRecorder::new();
        recorder.record(5.0, 0, NoteKind::Hit);
        recorder.record(1.0, 1, NoteKind::Hit);
        let removed = recorder.remove_last().unwrap();
        assert_eq!(removed.time, 1.0);
        assert_eq!(times(&recorder), vec![5.0]);
        recorder.remove_last();
        assert!(recorder.is_empty());
        assert_eq!(recorder.remove_last(), None);
    }

    #[test]
    fn remove_last_skips_notes_already_removed() {
        let mut recorder = NoteRecorder::new();
        recorder.record(1.0, 0, NoteKind::Hit);
        recorder.record(2.0, 0, NoteKind::Hit);
        recorder.remove_nearest(2.1);
        assert_eq!(recorder.remove_last().map(|n| n.time), Some(1.0));
    }

    #[test]
    fn remove_last_leaves_loaded_notes_alone() {
        let map = BeatMap::new("loaded", 120.0, 1).with_notes(vec![NoteEvent::hit(2.0, 3)]);
        let mut recorder = NoteRecorder::from_beatmap(&map);
        recorder.record(2.0, 1, NoteKind::Hit);
        assert_eq!(recorder.remove_nearest(2.0).map(|n| n.lane), Some(3));

        // the recorded note is the one undone, not the loaded one
        assert_eq!(recorder.remove_last().map(|n| n.lane), Some(1));
        assert!(recorder.is_empty());

        let mut recorder = NoteRecorder::from_beatmap(&map);
        recorder.record(2.0, 1, NoteKind::Hit);
        recorder.remove_nearest(2.0);
        recorder.remove_nearest(2.0);
        assert_eq!(recorder.remove_last(), None);
        assert!(recorder.is_empty());
    }

    #[test]
    fn remove_nearest_within_tolerance() {
        let mut recorder = NoteRecorder::new();
        recorder.record(1.0, 0, NoteKind::Hit);
        recorder.record(2.0, 1, NoteKind::Hit);
        assert_eq!(recorder.remove_nearest(1.8).map(|n| n.lane), Some(1));
        assert_eq!(recorder.remove_nearest(1.6), None);
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn negative_position_is_ignored() {
        let mut recorder = NoteRecorder::new();
        assert_eq!(recorder.record(-0.1, 0, NoteKind::Hit), None);
        assert!(recorder.is_empty());
    }

    #[test]
    fn finish_builds_map() {
        let mut recorder = NoteRecorder::new();
        recorder.record(0.5, 2, NoteKind::Hit);
        let map = recorder.finish("take one", 100.0, 2);
        assert_eq!(map.song_name, "take one");
        assert_eq!(map.notes, vec![NoteEvent::hit(0.5, 2)]);
        assert_eq!(map.validate(), Ok(()));
    }
}
