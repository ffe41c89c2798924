// Obstacle placement: converts a share of hit notes into obstacles while
// keeping a minimum spacing between consecutive obstacles.

use beat_model::{BeatMap, NoteKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::modifier::{PatternModifier, hit_note_indices};

/// Random probes per slot before falling back to a linear scan.
pub const MAX_RANDOM_PROBES: usize = 10;

/// Outcome of one placement call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObstacleReport {
    /// Obstacle count derived from the ratio before any clamping
    pub requested: usize,
    /// Upper bound given the spacing constraint and the note span
    pub achievable: usize,
    /// Obstacles actually placed
    pub placed: usize,
}

impl ObstacleReport {
    /// How many requested obstacles could not be placed, for any reason.
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.placed)
    }

    pub fn is_complete(&self) -> bool {
        self.shortfall() == 0
    }
}

/// Turns `ratio` of the hit notes into obstacles spread evenly over the song.
#[derive(Debug, Clone)]
pub struct ObstaclePlacer {
    /// Share of hit notes to convert, in [0, 1]
    pub ratio: f64,
    /// Minimum spacing between obstacles, in beats
    pub min_interval_beats: f64,
    seed: u64,
    report: ObstacleReport,
}

impl ObstaclePlacer {
    pub fn new(ratio: f64, min_interval_beats: f64) -> Self {
        Self {
            ratio,
            min_interval_beats,
            seed: 0,
            report: ObstacleReport::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Report of the most recent `modify` call.
    pub fn report(&self) -> ObstacleReport {
        self.report
    }

    /// Place obstacles and return the report.
    pub fn place(&mut self, map: &mut BeatMap) -> ObstacleReport {
        self.report = self.place_inner(map);
        self.report
    }

    fn place_inner(&self, map: &mut BeatMap) -> ObstacleReport {
        let hits = hit_note_indices(map);
        let (Some(&first_idx), Some(&last_idx)) = (hits.first(), hits.last()) else {
            return ObstacleReport::default();
        };

        let ratio = if self.ratio.is_nan() {
            0.0
        } else {
            self.ratio.clamp(0.0, 1.0)
        };
        let requested = (hits.len() as f64 * ratio).round() as usize;
        if requested == 0 {
            return ObstacleReport::default();
        }

        let min_interval = self.min_interval_beats.max(0.0) * map.seconds_per_beat();
        let first = map.notes[first_idx].time;
        let last = map.notes[last_idx].time;
        let span = last - first;

        let achievable = if min_interval > 0.0 {
            ((span / min_interval).floor() as usize).max(1)
        } else {
            hits.len()
        }
        .min(hits.len());

        let target = requested.min(achievable);
        let slot_width = span / target as f64;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut last_placed: Option<f64> = None;
        let mut placed = 0;

        for slot in 0..target {
            let start = first + slot as f64 * slot_width;
            let end = if slot + 1 == target {
                f64::INFINITY
            } else {
                first + (slot + 1) as f64 * slot_width
            };

            let candidates: Vec<usize> = hits
                .iter()
                .copied()
                .filter(|&i| {
                    let t = map.notes[i].time;
                    t >= start && t < end
                })
                .collect();
            if candidates.is_empty() {
                continue;
            }

            let spaced = |t: f64| last_placed.map_or(true, |p| t - p >= min_interval);

            let mut chosen = None;
            for _ in 0..MAX_RANDOM_PROBES {
                let idx = candidates[rng.gen_range(0..candidates.len())];
                if spaced(map.notes[idx].time) {
                    chosen = Some(idx);
                    break;
                }
            }
            if chosen.is_none() {
                chosen = candidates
                    .iter()
                    .copied()
                    .find(|&i| spaced(map.notes[i].time));
            }

            if let Some(idx) = chosen {
                map.notes[idx].kind = NoteKind::Obstacle;
                last_placed = Some(map.notes[idx].time);
                placed += 1;
            }
        }

        let report = ObstacleReport {
            requested,
            achievable,
            placed,
        };
        if !report.is_complete() {
            log::warn!(
                "placed {} of {} requested obstacles (achievable {}, min interval {:.3}s)",
                placed,
                requested,
                achievable,
                min_interval
            );
        } else {
            log::debug!("placed {} obstacles", placed);
        }
        report
    }
}

impl PatternModifier for ObstaclePlacer {
    fn modify(&mut self, map: &mut BeatMap) {
        self.place(map);
    }

    fn pattern_name(&self) -> &'static str {
        "obstacles"
    }
}
