use beat_model::BeatMap;
use beat_rule::{ResultSummary, RunStats, ScoreAggregator};
use log::{debug, info};

use crate::clock::SongClock;
use crate::config::PlayConfig;
use crate::error::ScheduleError;
use crate::events::{EventBus, PlayEvent};
use crate::lanes::LaneLayout;
use crate::live_note::{NoteId, NoteResolution, NoteState};
use crate::note_field::{ImplementId, ImplementKind, NoteField, StrikeOutcome};
use crate::scheduler::SpawnScheduler;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionPhase {
    /// Audio not started yet; notes spawn against a negative virtual position.
    Countdown { remaining: f64 },
    Playing,
    Finished,
}

/// One play-through of a beatmap against a song clock.
///
/// `tick` runs the scheduler, then the live notes, then the aggregator. Notes
/// spawned during a tick are first evaluated on the next one.
#[derive(Debug)]
pub struct PlaySession<C: SongClock> {
    clock: C,
    config: PlayConfig,
    clip_duration: f64,
    scheduler: SpawnScheduler,
    field: NoteField,
    aggregator: ScoreAggregator,
    events: EventBus,
    phase: SessionPhase,
    audio_started: bool,
    halt_reported: bool,
}

impl<C: SongClock> PlaySession<C> {
    /// Build a run. Out-of-range config values are repaired first, the same way
    /// `PlayConfig::read` does.
    pub fn new(
        map: &BeatMap,
        layout: &LaneLayout,
        mut config: PlayConfig,
        clock: C,
    ) -> Result<Self, ScheduleError> {
        config.validate();
        let clip_duration = clock.clip_duration().ok_or(ScheduleError::MissingClip)?;
        let scheduler = SpawnScheduler::new(map, layout, &config, Some(clip_duration))?;
        let preroll = scheduler.required_preroll();
        let aggregator = ScoreAggregator::new(config.score, config.settle_delay);

        info!(
            "Session ready: \"{}\" ({} notes, clip {:.2}s, preroll {:.2}s)",
            map.song_name,
            map.notes.len(),
            clip_duration,
            preroll
        );
        let mut events = EventBus::new();
        if preroll > 0.0 {
            events.emit(PlayEvent::CountdownStarted { seconds: preroll });
        }

        Ok(Self {
            clock,
            config,
            clip_duration,
            scheduler,
            field: NoteField::new(),
            aggregator,
            events,
            phase: SessionPhase::Countdown { remaining: preroll },
            audio_started: false,
            halt_reported: false,
        })
    }

    /// Advance the run by one frame of `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        let song_position = match self.phase {
            SessionPhase::Finished => return,
            SessionPhase::Countdown { remaining } => {
                // the countdown already belongs to the run
                self.aggregator.start();
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    self.phase = SessionPhase::Countdown { remaining };
                    -remaining
                } else {
                    self.clock.play();
                    self.song_started();
                    self.phase = SessionPhase::Playing;
                    self.clock.song_position()
                }
            }
            SessionPhase::Playing => self.clock.song_position(),
        };

        let spawned = self.scheduler.tick(song_position, self.clip_duration);
        if self.scheduler.is_halted() && !self.halt_reported {
            self.halt_reported = true;
            self.events.emit(PlayEvent::SpawningHalted {
                skipped: self.scheduler.skipped_count(),
            });
        }

        let resolutions = self.field.update(song_position, &self.config);
        for resolution in resolutions {
            self.apply(resolution);
        }
        for note in &spawned {
            self.events.emit(PlayEvent::NoteSpawned {
                id: note.id(),
                lane: note.lane(),
            });
        }
        self.field.spawn(spawned);
        self.field.sweep();

        if matches!(self.phase, SessionPhase::Countdown { .. }) {
            return;
        }
        let is_playing = self.clock.is_playing();
        if let Some(summary) = self
            .aggregator
            .update(dt, is_playing, self.scheduler.all_dequeued())
        {
            self.finish(summary);
        }
    }

    /// Song-start signal from the audio side. Only the first call counts.
    pub fn song_started(&mut self) {
        if self.audio_started {
            return;
        }
        self.audio_started = true;
        self.aggregator.start();
        self.events.emit(PlayEvent::SongStarted);
    }

    /// Current song position; negative while the countdown runs.
    pub fn song_position(&self) -> f64 {
        match self.phase {
            SessionPhase::Countdown { remaining } => -remaining,
            _ => self.clock.song_position(),
        }
    }

    /// Collision between a tracked implement and a specific note, judged at
    /// the current song position.
    pub fn strike(&mut self, implement: ImplementId, speed: f32, note_id: NoteId) -> StrikeOutcome {
        let song_position = self.song_position();
        let outcome = self
            .field
            .strike(implement, speed, note_id, song_position, &self.config);
        if let StrikeOutcome::Judged(resolution) = outcome {
            self.apply(resolution);
        }
        outcome
    }

    /// Strike on the drum of `lane`.
    pub fn drum_hit(&mut self, lane: usize, implement: ImplementId, speed: f32) -> StrikeOutcome {
        let song_position = self.song_position();
        let outcome = self
            .field
            .drum_hit(lane, implement, speed, song_position, &self.config);
        if let StrikeOutcome::Judged(resolution) = outcome {
            self.apply(resolution);
        }
        outcome
    }

    /// Stop the run early: no more spawns, audio stopped. Results follow once
    /// the settle delay has passed.
    pub fn abort(&mut self) {
        info!("Session aborted");
        self.scheduler.abort();
        self.clock.stop();
        if matches!(self.phase, SessionPhase::Countdown { .. }) {
            self.song_started();
            self.phase = SessionPhase::Playing;
        }
    }

    pub fn register_implement(&mut self, id: ImplementId, kind: ImplementKind) {
        self.field.register_implement(id, kind);
    }

    fn apply(&mut self, resolution: NoteResolution) {
        let Some(judgment) = resolution.judgment else {
            if resolution.state == NoteState::Avoided {
                self.events.emit(PlayEvent::ObstacleAvoided {
                    id: resolution.id,
                    lane: resolution.lane,
                });
            }
            return;
        };

        if let Some(update) = self.aggregator.record(judgment) {
            self.events.emit(PlayEvent::Judgment(judgment));
            if update.points > 0 {
                self.events.emit(PlayEvent::ScoreChanged(self.aggregator.stats().score));
            }
            if update.combo_changed {
                self.events.emit(PlayEvent::ComboChanged(update.combo));
            }
        }
    }

    fn finish(&mut self, summary: ResultSummary) {
        let dropped = self.field.clear();
        if dropped > 0 {
            debug!("Cleared {dropped} live notes at song end");
        }
        self.phase = SessionPhase::Finished;
        self.events.emit(PlayEvent::ResultsReady(summary));
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    pub fn stats(&self) -> &RunStats {
        self.aggregator.stats()
    }

    pub fn results(&self) -> Option<&ResultSummary> {
        self.aggregator.summary()
    }

    pub fn current_beat_index(&self) -> i64 {
        self.scheduler.current_beat_index(self.song_position())
    }

    pub fn config(&self) -> &PlayConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn scheduler(&self) -> &SpawnScheduler {
        &self.scheduler
    }

    pub fn field(&self) -> &NoteField {
        &self.field
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn poll_events(&mut self) -> Vec<PlayEvent> {
        self.events.drain()
    }
}
