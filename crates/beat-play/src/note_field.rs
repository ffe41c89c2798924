use std::collections::HashMap;

use beat_model::NoteKind;
use beat_rule::Judgment;
use log::trace;

use crate::config::PlayConfig;
use crate::live_note::{LiveNote, NoteId, NoteResolution, NoteState};

/// Handle of a tracked striking implement (stick, controller, body collider).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImplementId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImplementKind {
    /// Judged against hit notes.
    DrumStick,
    /// Collides with obstacles.
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    UnknownImplement,
    WrongImplement,
    TooSlow,
    NotHittable,
    TooYoung,
    NoteNotFound,
    NoNoteInRange,
}

/// Result of a strike or collision report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeOutcome {
    Judged(NoteResolution),
    Ignored(IgnoreReason),
}

impl StrikeOutcome {
    pub fn judgment(&self) -> Option<Judgment> {
        match self {
            Self::Judged(resolution) => resolution.judgment,
            Self::Ignored(_) => None,
        }
    }
}

/// All live notes of a run plus the registered striking implements.
#[derive(Debug, Default)]
pub struct NoteField {
    notes: Vec<LiveNote>,
    implements: HashMap<ImplementId, ImplementKind>,
}

impl NoteField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_implement(&mut self, id: ImplementId, kind: ImplementKind) {
        self.implements.insert(id, kind);
    }

    pub fn unregister_implement(&mut self, id: ImplementId) -> bool {
        self.implements.remove(&id).is_some()
    }

    pub fn spawn(&mut self, notes: impl IntoIterator<Item = LiveNote>) {
        self.notes.extend(notes);
    }

    /// Advance every unresolved note to `song_position`.
    pub fn update(&mut self, song_position: f64, config: &PlayConfig) -> Vec<NoteResolution> {
        self.notes
            .iter_mut()
            .filter_map(|note| note.update(song_position, config))
            .collect()
    }

    /// Direct collision report between an implement and a specific note, with
    /// contact at `song_position`.
    pub fn strike(
        &mut self,
        implement: ImplementId,
        speed: f32,
        note_id: NoteId,
        song_position: f64,
        config: &PlayConfig,
    ) -> StrikeOutcome {
        let Some(&kind) = self.implements.get(&implement) else {
            return ignored(IgnoreReason::UnknownImplement);
        };
        let Some(note) = self
            .notes
            .iter_mut()
            .find(|n| n.id() == note_id && !n.is_resolved())
        else {
            return ignored(IgnoreReason::NoteNotFound);
        };
        if !note.is_evaluable(song_position, config.min_life_time) {
            return ignored(IgnoreReason::TooYoung);
        }

        match (note.kind(), kind) {
            (NoteKind::Obstacle, ImplementKind::Body) => StrikeOutcome::Judged(note.collide()),
            (NoteKind::Hit, ImplementKind::DrumStick) => {
                judge_stick(note, speed, song_position, config)
            }
            _ => ignored(IgnoreReason::WrongImplement),
        }
    }

    /// Strike on a drum: the nearest unresolved hit note of that lane within
    /// the detection radius of its judge center takes the strike.
    pub fn drum_hit(
        &mut self,
        lane: usize,
        implement: ImplementId,
        speed: f32,
        song_position: f64,
        config: &PlayConfig,
    ) -> StrikeOutcome {
        match self.implements.get(&implement) {
            None => return ignored(IgnoreReason::UnknownImplement),
            Some(ImplementKind::Body) => return ignored(IgnoreReason::WrongImplement),
            Some(ImplementKind::DrumStick) => {}
        }

        let nearest = self
            .notes
            .iter_mut()
            .filter(|n| n.lane() == lane && n.kind() == NoteKind::Hit && !n.is_resolved())
            .filter(|n| n.is_evaluable(song_position, config.min_life_time))
            .map(|n| (n.distance_at(song_position, config.judge_offset), n))
            .filter(|(distance, _)| *distance <= config.detection_radius)
            .min_by(|a, b| a.0.total_cmp(&b.0));

        match nearest {
            Some((_, note)) => judge_stick(note, speed, song_position, config),
            None => ignored(IgnoreReason::NoNoteInRange),
        }
    }

    /// Remove resolved notes. Returns how many were removed.
    pub fn sweep(&mut self) -> usize {
        let before = self.notes.len();
        self.notes.retain(|n| !n.is_resolved());
        before - self.notes.len()
    }

    /// Drop every live note without judging it.
    pub fn clear(&mut self) -> usize {
        let count = self.notes.len();
        self.notes.clear();
        count
    }

    pub fn notes(&self) -> &[LiveNote] {
        &self.notes
    }

    pub fn get(&self, id: NoteId) -> Option<&LiveNote> {
        self.notes.iter().find(|n| n.id() == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

fn judge_stick(
    note: &mut LiveNote,
    speed: f32,
    song_position: f64,
    config: &PlayConfig,
) -> StrikeOutcome {
    if note.state() != NoteState::Hittable {
        return ignored(IgnoreReason::NotHittable);
    }
    if speed < config.minimum_stick_speed {
        return ignored(IgnoreReason::TooSlow);
    }
    let window = config.window(note.lane());
    StrikeOutcome::Judged(note.judge_strike(&window, config.judge_offset, song_position))
}

fn ignored(reason: IgnoreReason) -> StrikeOutcome {
    trace!("Strike ignored: {reason:?}");
    StrikeOutcome::Ignored(reason)
}
