use std::collections::VecDeque;

use beat_model::{BeatMap, NoteEvent};
use log::{debug, info, warn};

use crate::config::PlayConfig;
use crate::error::ScheduleError;
use crate::lanes::{LaneAnchor, LaneLayout};
use crate::live_note::{LiveNote, NoteId};

/// Releases beatmap notes as live notes `lead_time` ahead of their time,
/// driven only by the song position it is given each tick.
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    queue: VecDeque<NoteEvent>,
    anchors: Vec<LaneAnchor>,
    lead_time: f64,
    stop_spawn_margin: f64,
    seconds_per_beat: f64,
    first_note_time: f64,
    next_id: u64,
    spawned: usize,
    skipped: usize,
    halted: bool,
    aborted: bool,
}

impl SpawnScheduler {
    pub fn new(
        map: &BeatMap,
        layout: &LaneLayout,
        config: &PlayConfig,
        clip_duration: Option<f64>,
    ) -> Result<Self, ScheduleError> {
        map.validate()?;
        layout.validate()?;
        match clip_duration {
            None => return Err(ScheduleError::MissingClip),
            Some(d) if !(d.is_finite() && d > 0.0) => {
                return Err(ScheduleError::InvalidClipDuration(d));
            }
            Some(_) => {}
        }
        if !(config.lead_time.is_finite() && config.lead_time > 0.0) {
            return Err(ScheduleError::InvalidLeadTime(config.lead_time));
        }

        let mut notes = map.notes.clone();
        notes.sort_by(|a, b| a.time.total_cmp(&b.time));
        let first_note_time = notes.first().map_or(0.0, |n| n.time);

        Ok(Self {
            queue: notes.into(),
            anchors: layout.anchors.clone(),
            lead_time: config.lead_time,
            stop_spawn_margin: config.stop_spawn_margin,
            seconds_per_beat: map.seconds_per_beat(),
            first_note_time,
            next_id: 0,
            spawned: 0,
            skipped: 0,
            halted: false,
            aborted: false,
        })
    }

    /// Spawn every note that is due at `song_position`.
    ///
    /// Once the song is within the stop margin of the clip end, spawning halts
    /// for the rest of the run and the remaining notes are skipped.
    pub fn tick(&mut self, song_position: f64, clip_duration: f64) -> Vec<LiveNote> {
        let mut spawned = Vec::new();
        if self.halted || self.aborted {
            return spawned;
        }

        while let Some(due) = self.queue.front().map(|n| n.time - self.lead_time) {
            if song_position >= clip_duration - self.stop_spawn_margin {
                self.halt(song_position);
                break;
            }
            if song_position < due {
                break;
            }
            if let Some(event) = self.queue.pop_front() {
                if let Some(note) = self.spawn(event, song_position) {
                    spawned.push(note);
                }
            }
        }
        spawned
    }

    fn spawn(&mut self, event: NoteEvent, song_position: f64) -> Option<LiveNote> {
        let Some(anchor) = event.lane_index().and_then(|lane| self.anchors.get(lane).copied())
        else {
            warn!("Skipping note at {:.3}s with unusable lane {}", event.time, event.lane);
            self.skipped += 1;
            return None;
        };
        let id = NoteId(self.next_id);
        self.next_id += 1;
        self.spawned += 1;
        debug!(
            "Spawn note {} lane {} (t={:.3}) at {:.3}s",
            id.0, event.lane, event.time, song_position
        );
        Some(LiveNote::new(
            id,
            event,
            event.lane as usize,
            &anchor,
            self.lead_time,
            song_position,
        ))
    }

    fn halt(&mut self, song_position: f64) {
        self.halted = true;
        self.skipped += self.queue.len();
        info!(
            "Spawning halted at {song_position:.3}s near clip end, {} notes skipped",
            self.queue.len()
        );
        self.queue.clear();
    }

    /// Stop spawning for the rest of the run.
    pub fn abort(&mut self) {
        if self.aborted {
            return;
        }
        self.aborted = true;
        self.skipped += self.queue.len();
        info!("Spawning aborted, {} notes skipped", self.queue.len());
        self.queue.clear();
    }

    /// Countdown needed so the first note still gets its full lead time.
    pub fn required_preroll(&self) -> f64 {
        (self.lead_time - self.first_note_time).max(0.0)
    }

    pub fn all_dequeued(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn spawned_count(&self) -> usize {
        self.spawned
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn current_beat_index(&self, song_position: f64) -> i64 {
        (song_position / self.seconds_per_beat).floor() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beat_model::BeatMapError;

    fn map(times: &[f64]) -> BeatMap {
        let notes = times
            .iter()
            .enumerate()
            .map(|(i, &t)| NoteEvent::hit(t, (i % 4) as i32))
            .collect();
        BeatMap::new("sched", 120.0, 1).with_notes(notes)
    }

    fn scheduler(times: &[f64]) -> SpawnScheduler {
        SpawnScheduler::new(
            &map(times),
            &LaneLayout::default(),
            &PlayConfig::default(),
            Some(60.0),
        )
        .unwrap()
    }

    #[test]
    fn spawns_lead_time_ahead() {
        let mut s = scheduler(&[3.0, 3.5, 4.0, 10.0]);
        assert!(s.tick(0.9, 60.0).is_empty());

        let first = s.tick(1.0, 60.0);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].source().time, 3.0);
        assert_eq!(first[0].spawn_clock_time(), 1.0);

        // a late frame releases everything that became due
        let batch = s.tick(2.2, 60.0);
        let times: Vec<f64> = batch.iter().map(|n| n.source().time).collect();
        assert_eq!(times, vec![3.5, 4.0]);
        assert_eq!(s.remaining(), 1);
        assert_eq!(s.spawned_count(), 3);
    }

    #[test]
    fn ids_are_unique_and_ordered() {
        let mut s = scheduler(&[3.0, 3.0, 3.0, 4.0]);
        let notes = s.tick(5.0, 60.0);
        let ids: Vec<u64> = notes.iter().map(|n| n.id().0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert!(s.all_dequeued());
    }

    #[test]
    fn halts_near_clip_end() {
        let mut s = scheduler(&[1.0, 59.8, 59.9]);
        assert_eq!(s.tick(50.0, 60.0).len(), 1);
        assert!(s.tick(59.6, 60.0).is_empty());
        assert!(s.is_halted());
        assert_eq!(s.skipped_count(), 2);
        assert!(s.all_dequeued());
        // halted for good, even if the position moves back
        assert!(s.tick(0.0, 60.0).is_empty());
    }

    #[test]
    fn abort_is_one_way() {
        let mut s = scheduler(&[3.0, 4.0, 5.0]);
        s.tick(1.0, 60.0);
        s.abort();
        s.abort();
        assert!(s.tick(10.0, 60.0).is_empty());
        assert_eq!(s.skipped_count(), 2);
        assert!(s.is_aborted());
    }

    #[test]
    fn preroll_covers_early_first_note() {
        assert_eq!(scheduler(&[0.5, 1.0]).required_preroll(), 1.5);
        assert_eq!(scheduler(&[3.0]).required_preroll(), 0.0);

        // the countdown feeds negative positions
        let mut s = scheduler(&[0.5]);
        assert!(s.tick(-1.6, 60.0).is_empty());
        assert_eq!(s.tick(-1.5, 60.0).len(), 1);
    }

    #[test]
    fn beat_index() {
        let s = scheduler(&[1.0]);
        assert_eq!(s.current_beat_index(0.0), 0);
        assert_eq!(s.current_beat_index(1.25), 2);
        assert_eq!(s.current_beat_index(-0.1), -1);
    }

    #[test]
    fn construction_errors() {
        let layout = LaneLayout::default();
        let config = PlayConfig::default();

        let empty = BeatMap::new("empty", 120.0, 1);
        assert_eq!(
            SpawnScheduler::new(&empty, &layout, &config, Some(10.0)).unwrap_err(),
            ScheduleError::InvalidMap(BeatMapError::Empty)
        );
        assert_eq!(
            SpawnScheduler::new(&map(&[1.0]), &layout, &config, None).unwrap_err(),
            ScheduleError::MissingClip
        );
        assert_eq!(
            SpawnScheduler::new(&map(&[1.0]), &layout, &config, Some(0.0)).unwrap_err(),
            ScheduleError::InvalidClipDuration(0.0)
        );
        let instant = PlayConfig {
            lead_time: 0.0,
            ..Default::default()
        };
        assert_eq!(
            SpawnScheduler::new(&map(&[1.0]), &layout, &instant, Some(10.0)).unwrap_err(),
            ScheduleError::InvalidLeadTime(0.0)
        );
        let short = LaneLayout::new(layout.anchors[..2].to_vec());
        assert!(matches!(
            SpawnScheduler::new(&map(&[1.0]), &short, &config, Some(10.0)),
            Err(ScheduleError::MissingLanes { found: 2, .. })
        ));
    }
}
