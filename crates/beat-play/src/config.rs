use std::path::Path;

use anyhow::{Context, Result};
use beat_model::LANE_COUNT;
use beat_rule::{JudgmentWindow, ScoreRule};
use log::warn;
use serde::{Deserialize, Serialize};

/// Timing, judgment and scoring parameters of a play run.
///
/// Times are in seconds, distances in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[serde(rename_all = "camelCase")]
pub struct PlayConfig {
    /// How long before its time a note is spawned.
    pub lead_time: f64,
    /// Spawning stops for good once the song is this close to the clip end.
    pub stop_spawn_margin: f64,
    /// Notes younger than this are not evaluated.
    pub min_life_time: f64,
    /// Notes older than this are resolved unconditionally.
    pub max_lifetime: f64,
    /// Distance of the judge center in front of the target anchor.
    pub judge_offset: f32,
    pub minimum_stick_speed: f32,
    /// Search radius for lane strikes.
    pub detection_radius: f32,
    /// Time playback has to stay stopped before results are produced.
    pub settle_delay: f64,
    pub windows: [JudgmentWindow; LANE_COUNT],
    pub score: ScoreRule,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            lead_time: 2.0,
            stop_spawn_margin: 0.5,
            min_life_time: 0.1,
            max_lifetime: 3.0,
            judge_offset: 0.0,
            minimum_stick_speed: 0.5,
            detection_radius: 1.0,
            settle_delay: 1.0,
            windows: [JudgmentWindow::default(); LANE_COUNT],
            score: ScoreRule::default(),
        }
    }
}

impl PlayConfig {
    /// Repair out-of-range values in place, logging every change.
    pub fn validate(&mut self) {
        let defaults = Self::default();

        if !(self.lead_time.is_finite() && self.lead_time > 0.0) {
            warn!("leadTime {} out of range, using {}", self.lead_time, defaults.lead_time);
            self.lead_time = defaults.lead_time;
        }
        if !(self.stop_spawn_margin.is_finite() && self.stop_spawn_margin >= 0.0) {
            warn!("stopSpawnMargin {} out of range, using 0", self.stop_spawn_margin);
            self.stop_spawn_margin = 0.0;
        }
        if !(self.max_lifetime.is_finite() && self.max_lifetime > self.lead_time) {
            let fixed = self.lead_time + 1.0;
            warn!(
                "maxLifetime {} must exceed leadTime {}, using {fixed}",
                self.max_lifetime, self.lead_time
            );
            self.max_lifetime = fixed;
        }
        if !(self.min_life_time.is_finite() && self.min_life_time >= 0.0)
            || self.min_life_time >= self.lead_time
        {
            warn!("minLifeTime {} out of range, using 0", self.min_life_time);
            self.min_life_time = 0.0;
        }
        if !(self.judge_offset.is_finite() && self.judge_offset >= 0.0) {
            warn!("judgeOffset {} out of range, using 0", self.judge_offset);
            self.judge_offset = 0.0;
        }
        if !(self.minimum_stick_speed.is_finite() && self.minimum_stick_speed >= 0.0) {
            warn!("minimumStickSpeed {} out of range, using 0", self.minimum_stick_speed);
            self.minimum_stick_speed = 0.0;
        }
        if !(self.detection_radius.is_finite() && self.detection_radius > 0.0) {
            warn!(
                "detectionRadius {} out of range, using {}",
                self.detection_radius, defaults.detection_radius
            );
            self.detection_radius = defaults.detection_radius;
        }
        if !(self.settle_delay.is_finite() && self.settle_delay >= 0.0) {
            warn!("settleDelay {} out of range, using {}", self.settle_delay, defaults.settle_delay);
            self.settle_delay = defaults.settle_delay;
        }

        for (lane, window) in self.windows.iter_mut().enumerate() {
            if let Err(e) = window.check() {
                warn!("Lane {lane} window invalid ({e}), using default");
                *window = JudgmentWindow::default();
            }
        }

        self.score.combo_step = self.score.combo_step.max(1);
        if !(self.score.combo_rate.is_finite() && self.score.combo_rate >= 0.0) {
            warn!("comboRate {} out of range, using 0", self.score.combo_rate);
            self.score.combo_rate = 0.0;
        }
    }

    pub fn window(&self, lane: usize) -> JudgmentWindow {
        self.windows.get(lane).copied().unwrap_or_default()
    }

    /// Read and validate a config from a JSON file.
    pub fn read(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read play config: {}", path.display()))?;
        let mut config: PlayConfig = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse play config: {}", path.display()))?;
        config.validate();
        Ok(config)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write play config: {}", path.display()))?;
        Ok(())
    }
}
