use std::collections::HashMap;

use beat_model::NoteKind;
use beat_rule::ResultSummary;
use log::info;

use crate::clock::{ManualClock, SongClock};
use crate::live_note::{NoteId, NoteState};
use crate::note_field::{ImplementId, ImplementKind, StrikeOutcome};
use crate::session::PlaySession;

/// Headless player that strikes every hit note as it crosses the perfect
/// radius. Obstacles are always avoided.
#[derive(Debug, Clone)]
pub struct AutoPlayer {
    stick: ImplementId,
    stick_speed: f32,
    miss_every: Option<usize>,
    decided: HashMap<NoteId, bool>,
}

impl AutoPlayer {
    pub fn new(stick: ImplementId) -> Self {
        Self {
            stick,
            stick_speed: 3.0,
            miss_every: None,
            decided: HashMap::new(),
        }
    }

    /// Let every `n`-th hit note pass unplayed.
    pub fn with_miss_every(mut self, n: usize) -> Self {
        self.miss_every = (n > 0).then_some(n);
        self
    }

    pub fn attach<C: SongClock>(&self, session: &mut PlaySession<C>) {
        session.register_implement(self.stick, ImplementKind::DrumStick);
    }

    /// Strike every note currently inside its lane's perfect radius.
    pub fn play<C: SongClock>(&mut self, session: &mut PlaySession<C>) -> Vec<StrikeOutcome> {
        let config = session.config();
        let due: Vec<NoteId> = session
            .field()
            .notes()
            .iter()
            .filter(|n| n.kind() == NoteKind::Hit && n.state() == NoteState::Hittable)
            .filter(|n| {
                n.distance_to_judge(config.judge_offset) <= config.window(n.lane()).perfect_radius
            })
            .map(|n| n.id())
            .collect();

        let mut outcomes = Vec::with_capacity(due.len());
        for id in due {
            let seen = self.decided.len();
            let miss_every = self.miss_every;
            let strike = *self
                .decided
                .entry(id)
                .or_insert_with(|| miss_every.is_none_or(|n| (seen + 1) % n != 0));
            if strike {
                outcomes.push(session.strike(self.stick, self.stick_speed, id));
            }
        }
        outcomes
    }

    /// Drive a session on a manual clock at a fixed frame time until results
    /// are ready. Returns `None` if the run did not finish in time.
    pub fn run_to_end(
        &mut self,
        session: &mut PlaySession<ManualClock>,
        dt: f64,
    ) -> Option<ResultSummary> {
        let duration = session.clock().clip_duration().unwrap_or(0.0);
        let budget = duration
            + session.scheduler().required_preroll()
            + session.config().max_lifetime
            + session.config().settle_delay
            + 1.0;
        let max_steps = (budget / dt.max(1e-4)).ceil() as usize;

        for _ in 0..max_steps {
            session.clock_mut().advance(dt);
            session.tick(dt);
            if session.is_finished() {
                break;
            }
            self.play(session);
        }
        let results = session.results().cloned();
        if results.is_none() {
            info!("Autoplay stopped after {max_steps} frames without results");
        }
        results
    }
}
