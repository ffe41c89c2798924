use std::path::Path;

use anyhow::{Context, Result};
use beat_model::BeatMap;
use serde::{Deserialize, Serialize};

use crate::error::GenerateError;
use crate::lane_policy::{LaneAssigner, LanePolicy};
use crate::modifier::PatternModifier;
use crate::obstacle_placer::{ObstaclePlacer, ObstacleReport};
use crate::timing_generator::{SongClip, TimingGenerator};

/// Everything needed for one procedural generation run (generator JSON file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct GenerationSettings {
    pub timing: TimingGenerator,
    /// Share of hit notes turned into obstacles (0 disables obstacles)
    pub obstacle_ratio: f64,
    /// Minimum spacing between obstacles, in beats
    pub min_obstacle_interval: f64,
    pub lane_policy: LanePolicy,
    /// Seed for every random choice; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            timing: TimingGenerator::default(),
            obstacle_ratio: 0.0,
            min_obstacle_interval: 4.0,
            lane_policy: LanePolicy::BalancedRandom,
            seed: None,
        }
    }
}

impl GenerationSettings {
    pub fn read(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read generation settings: {}", path.display()))?;
        let mut settings: GenerationSettings = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse generation settings: {}", path.display()))?;
        settings.validate();
        Ok(settings)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write generation settings: {}", path.display()))?;
        Ok(())
    }

    /// Clamp out-of-range values that have an obvious safe replacement.
    pub fn validate(&mut self) {
        if !(0.0..=1.0).contains(&self.obstacle_ratio) {
            let clamped = if self.obstacle_ratio.is_nan() {
                0.0
            } else {
                self.obstacle_ratio.clamp(0.0, 1.0)
            };
            log::warn!(
                "obstacle ratio {} out of range, using {}",
                self.obstacle_ratio,
                clamped
            );
            self.obstacle_ratio = clamped;
        }
        if !(self.min_obstacle_interval >= 0.0) {
            log::warn!(
                "negative obstacle interval {}, using 0",
                self.min_obstacle_interval
            );
            self.min_obstacle_interval = 0.0;
        }
    }

    /// Timing → obstacles → lanes. Obstacles are placed before lanes so lane
    /// policies only see the remaining hit notes.
    pub fn generate(&self, clip: Option<&SongClip>) -> Result<(BeatMap, ObstacleReport), GenerateError> {
        let mut map = self.timing.generate(clip)?;

        let mut report = ObstacleReport::default();
        if self.obstacle_ratio > 0.0 {
            let mut placer = ObstaclePlacer::new(self.obstacle_ratio, self.min_obstacle_interval)
                .with_seed(self.seed.unwrap_or_else(rand::random));
            placer.modify(&mut map);
            report = placer.report();
        }

        let mut assigner = LaneAssigner::new(self.lane_policy);
        if let Some(seed) = self.seed {
            assigner = assigner.with_seed(seed.wrapping_add(1));
        }
        assigner.modify(&mut map);

        Ok((map, report))
    }
}
