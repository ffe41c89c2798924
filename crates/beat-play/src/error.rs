use beat_model::BeatMapError;
use thiserror::Error;

/// Load-time failures that prevent a run from starting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("invalid beatmap: {0}")]
    InvalidMap(#[from] BeatMapError),
    #[error("lane layout has {found} anchor pairs, {required} required")]
    MissingLanes { found: usize, required: usize },
    #[error("lane {0} has coincident spawn and target anchors")]
    DegenerateLane(usize),
    #[error("no song clip loaded")]
    MissingClip,
    #[error("clip duration must be positive, got {0}")]
    InvalidClipDuration(f64),
    #[error("lead time must be positive, got {0}")]
    InvalidLeadTime(f64),
}
