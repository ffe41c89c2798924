// Beatmap generators: constant-interval timing, obstacle placement,
// lane assignment policies, manual recording, and file output

pub mod error;
pub mod lane_policy;
pub mod modifier;
pub mod obstacle_placer;
pub mod output;
pub mod recorder;
pub mod settings;
pub mod timing_generator;

pub use error::GenerateError;
pub use lane_policy::{LaneAssigner, LanePolicy};
pub use modifier::{PatternModifier, hit_note_indices};
pub use obstacle_placer::{MAX_RANDOM_PROBES, ObstaclePlacer, ObstacleReport};
pub use output::{beatmap_file_name, unique_output_path, write_beatmap};
pub use recorder::{NoteRecorder, REMOVE_TOLERANCE};
pub use settings::GenerationSettings;
pub use timing_generator::{SongClip, TimingGenerator};
