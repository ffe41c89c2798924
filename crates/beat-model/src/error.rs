use thiserror::Error;

/// Reasons a beatmap is refused at load time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BeatMapError {
    #[error("beatmap has no notes")]
    Empty,
    #[error("bpm must be a positive finite number, got {0}")]
    InvalidBpm(f64),
    #[error("note {index} has invalid time {time}")]
    InvalidTime { index: usize, time: f64 },
    #[error("note {index} at {time}s is earlier than the note before it")]
    Unsorted { index: usize, time: f64 },
    #[error("note {index} has lane {lane}, expected 0..{lane_count}")]
    InvalidLane {
        index: usize,
        lane: i32,
        lane_count: usize,
    },
}
