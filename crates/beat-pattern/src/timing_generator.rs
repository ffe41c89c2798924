// Constant-interval note timing generator.

use beat_model::{BeatMap, NoteEvent};
use serde::{Deserialize, Serialize};

use crate::error::GenerateError;

/// The audio clip a beatmap is generated for. Only its length matters here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongClip {
    pub name: String,
    /// Clip length in seconds
    pub length: f64,
}

impl SongClip {
    pub fn new(name: impl Into<String>, length: f64) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }
}

/// Emits unassigned hit notes at a fixed interval derived from bpm and density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct TimingGenerator {
    pub bpm: f64,
    /// Notes per beat (1 = quarter notes, 2 = eighths, ...)
    pub notes_per_beat: f64,
    /// Silence before the first note, in seconds
    pub start_delay: f64,
    /// Silence kept free of notes at the end of the clip, in seconds
    pub end_offset: f64,
    pub difficulty: i32,
}

impl Default for TimingGenerator {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            notes_per_beat: 1.0,
            start_delay: 3.0,
            end_offset: 2.0,
            difficulty: 1,
        }
    }
}

impl TimingGenerator {
    pub fn new(bpm: f64, notes_per_beat: f64) -> Self {
        Self {
            bpm,
            notes_per_beat,
            ..Default::default()
        }
    }

    pub fn with_start_delay(mut self, seconds: f64) -> Self {
        self.start_delay = seconds;
        self
    }

    pub fn with_end_offset(mut self, seconds: f64) -> Self {
        self.end_offset = seconds;
        self
    }

    pub fn with_difficulty(mut self, difficulty: i32) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Seconds between consecutive notes: `(60 / bpm) / notes_per_beat`.
    pub fn note_interval(&self) -> f64 {
        (60.0 / self.bpm) / self.notes_per_beat
    }

    fn check_parameters(&self) -> Result<(), GenerateError> {
        let positive = [("bpm", self.bpm), ("notes_per_beat", self.notes_per_beat)];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GenerateError::InvalidParameter { name, value });
            }
        }
        let non_negative = [
            ("start_delay", self.start_delay),
            ("end_offset", self.end_offset),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(GenerateError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    /// Generate a beatmap for `clip`. Nothing is produced when the clip is
    /// missing or a parameter is out of range.
    pub fn generate(&self, clip: Option<&SongClip>) -> Result<BeatMap, GenerateError> {
        let clip = clip.ok_or(GenerateError::MissingAudio)?;
        self.check_parameters()?;
        if !(clip.length.is_finite() && clip.length > 0.0) {
            return Err(GenerateError::InvalidParameter {
                name: "song_length",
                value: clip.length,
            });
        }

        let interval = self.note_interval();
        let end = clip.length - self.end_offset;
        let notes: Vec<NoteEvent> = (0u64..)
            .map(|i| self.start_delay + i as f64 * interval)
            .take_while(|&t| t < end)
            .map(NoteEvent::unassigned)
            .collect();

        log::info!(
            "generated {} notes for '{}' (interval {:.4}s, {:.2}s..{:.2}s)",
            notes.len(),
            clip.name,
            interval,
            self.start_delay,
            end
        );

        Ok(BeatMap::new(clip.name.clone(), self.bpm, self.difficulty).with_notes(notes))
    }
}
