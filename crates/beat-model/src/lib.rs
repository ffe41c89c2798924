// Beatmap data model: note events, beatmap container, JSON codec, validation

mod beatmap;
mod codec;
mod error;
mod note;

pub use beatmap::BeatMap;
pub use codec::BeatMapCodec;
pub use error::BeatMapError;
pub use note::{NoteEvent, NoteKind};

/// Number of drum lanes a note can target.
pub const LANE_COUNT: usize = 4;

/// Lane value of a note that has not been assigned to a drum yet.
pub const UNASSIGNED_LANE: i32 = -1;
