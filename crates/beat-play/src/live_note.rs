use beat_model::{NoteEvent, NoteKind};
use beat_rule::{Judgment, JudgmentWindow};
use glam::Vec3;
use log::debug;

use crate::config::PlayConfig;
use crate::lanes::LaneAnchor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(pub u64);

/// Lifecycle of a spawned note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteState {
    /// Approaching, outside the good radius.
    Flying,
    /// Inside the good radius and open to strikes.
    Hittable,
    Hit,
    Missed,
    /// Obstacle that passed without touching the player.
    Avoided,
}

impl NoteState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Hit | Self::Missed | Self::Avoided)
    }
}

/// Terminal transition of one note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteResolution {
    pub id: NoteId,
    pub lane: usize,
    pub state: NoteState,
    /// `None` for avoided obstacles, which are not judged.
    pub judgment: Option<Judgment>,
}

/// Runtime entity of one scheduled note.
///
/// Position is derived from the song clock alone, so frame timing never
/// accumulates drift: the note reaches its target anchor exactly at its
/// beatmap time and keeps moving along the same line afterwards.
#[derive(Debug, Clone)]
pub struct LiveNote {
    id: NoteId,
    source: NoteEvent,
    lane: usize,
    state: NoteState,
    spawn_clock_time: f64,
    position: Vec3,
    target: Vec3,
    direction: Vec3,
    speed: f32,
    entered_zone: bool,
    resolved: bool,
}

impl LiveNote {
    pub fn new(
        id: NoteId,
        source: NoteEvent,
        lane: usize,
        anchor: &LaneAnchor,
        lead_time: f64,
        spawn_clock_time: f64,
    ) -> Self {
        let speed = (anchor.travel_distance() as f64 / lead_time) as f32;
        let mut note = Self {
            id,
            source,
            lane,
            state: NoteState::Flying,
            spawn_clock_time,
            position: anchor.spawn,
            target: anchor.target,
            direction: anchor.direction(),
            speed,
            entered_zone: false,
            resolved: false,
        };
        note.position = note.position_at(spawn_clock_time);
        note
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn source(&self) -> &NoteEvent {
        &self.source
    }

    pub fn lane(&self) -> usize {
        self.lane
    }

    pub fn kind(&self) -> NoteKind {
        self.source.kind
    }

    pub fn state(&self) -> NoteState {
        self.state
    }

    pub fn spawn_clock_time(&self) -> f64 {
        self.spawn_clock_time
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// World position at song time `t`.
    pub fn position_at(&self, t: f64) -> Vec3 {
        let travelled = self.speed * (t - self.source.time) as f32;
        self.target + self.direction * travelled
    }

    pub fn judge_center(&self, judge_offset: f32) -> Vec3 {
        self.target - self.direction * judge_offset
    }

    pub fn distance_to_judge(&self, judge_offset: f32) -> f32 {
        self.position.distance(self.judge_center(judge_offset))
    }

    /// Distance to the judge center at song time `t`, independent of the last
    /// update.
    pub fn distance_at(&self, t: f64, judge_offset: f32) -> f32 {
        self.position_at(t).distance(self.judge_center(judge_offset))
    }

    /// Whether the note is old enough to be evaluated at `song_position`.
    pub fn is_evaluable(&self, song_position: f64, min_life_time: f64) -> bool {
        song_position - self.spawn_clock_time >= min_life_time
    }

    /// Move the note to `song_position` and run the state machine. Returns the
    /// resolution when this update made the note terminal.
    pub fn update(&mut self, song_position: f64, config: &PlayConfig) -> Option<NoteResolution> {
        if self.resolved {
            return None;
        }
        self.position = self.position_at(song_position);

        let elapsed = song_position - self.spawn_clock_time;
        if elapsed < config.min_life_time {
            return None;
        }

        let window = config.window(self.lane);
        if elapsed > config.max_lifetime {
            return Some(self.resolve_untouched());
        }

        let center = self.judge_center(config.judge_offset);
        let inside = window.contains(self.position.distance(center));
        // Signed progress past the judge center along the travel line.
        let past = (self.position - center).dot(self.direction) > window.good_radius;

        match (self.source.kind, self.state) {
            (NoteKind::Hit, NoteState::Flying) if inside => {
                self.state = NoteState::Hittable;
                None
            }
            (NoteKind::Hit, NoteState::Hittable) if !inside => Some(self.resolve_untouched()),
            (NoteKind::Hit, NoteState::Flying) if past => Some(self.resolve_untouched()),
            (NoteKind::Obstacle, _) if inside => {
                self.entered_zone = true;
                None
            }
            (NoteKind::Obstacle, _) if self.entered_zone || past => {
                Some(self.resolve_untouched())
            }
            _ => None,
        }
    }

    /// Judge a drum strike landing at `song_position`. A note that has drifted
    /// out of the good radius since its last update is a Miss.
    pub fn judge_strike(
        &mut self,
        window: &JudgmentWindow,
        judge_offset: f32,
        song_position: f64,
    ) -> NoteResolution {
        self.position = self.position_at(song_position);
        let judgment = window.classify(self.distance_to_judge(judge_offset));
        let state = if judgment == Judgment::Miss {
            NoteState::Missed
        } else {
            NoteState::Hit
        };
        self.finish(state, Some(judgment))
    }

    /// Collision of an obstacle with the player's body.
    pub fn collide(&mut self) -> NoteResolution {
        self.finish(NoteState::Missed, Some(Judgment::Miss))
    }

    fn resolve_untouched(&mut self) -> NoteResolution {
        match self.source.kind {
            NoteKind::Hit => self.finish(NoteState::Missed, Some(Judgment::Miss)),
            NoteKind::Obstacle => self.finish(NoteState::Avoided, None),
        }
    }

    fn finish(&mut self, state: NoteState, judgment: Option<Judgment>) -> NoteResolution {
        self.state = state;
        self.resolved = true;
        debug!(
            "Note {} (lane {}, t={:.3}) resolved as {state:?}",
            self.id.0, self.lane, self.source.time
        );
        NoteResolution {
            id: self.id,
            lane: self.lane,
            state,
            judgment,
        }
    }
}
