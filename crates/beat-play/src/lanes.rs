use beat_model::LANE_COUNT;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Spawn and target points of one drum lane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneAnchor {
    pub spawn: Vec3,
    pub target: Vec3,
}

impl LaneAnchor {
    pub fn new(spawn: Vec3, target: Vec3) -> Self {
        Self { spawn, target }
    }

    /// Unit vector from spawn to target.
    pub fn direction(&self) -> Vec3 {
        (self.target - self.spawn).normalize_or_zero()
    }

    pub fn travel_distance(&self) -> f32 {
        self.spawn.distance(self.target)
    }
}

/// World-space anchors for every lane, indexed by lane number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneLayout {
    pub anchors: Vec<LaneAnchor>,
}

impl Default for LaneLayout {
    /// Four drums side by side at waist height, notes approaching along -Z.
    fn default() -> Self {
        const DRUM_X: [f32; LANE_COUNT] = [-1.5, -0.5, 0.5, 1.5];
        let anchors = DRUM_X
            .iter()
            .map(|&x| LaneAnchor::new(Vec3::new(x, 1.0, 20.0), Vec3::new(x, 1.0, 0.0)))
            .collect();
        Self { anchors }
    }
}

impl LaneLayout {
    pub fn new(anchors: Vec<LaneAnchor>) -> Self {
        Self { anchors }
    }

    pub fn anchor(&self, lane: usize) -> Option<&LaneAnchor> {
        self.anchors.get(lane)
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.anchors.len() < LANE_COUNT {
            return Err(ScheduleError::MissingLanes {
                found: self.anchors.len(),
                required: LANE_COUNT,
            });
        }
        for (lane, anchor) in self.anchors.iter().enumerate() {
            if anchor.travel_distance() <= f32::EPSILON {
                return Err(ScheduleError::DegenerateLane(lane));
            }
        }
        Ok(())
    }
}
