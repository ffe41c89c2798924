// Song clock, spawn scheduling, live note judgment, play session

mod autoplay;
mod clock;
mod config;
mod error;
mod events;
mod lanes;
mod live_note;
mod note_field;
mod scheduler;
mod session;

pub use autoplay::AutoPlayer;
pub use clock::{ManualClock, SongClock};
pub use config::PlayConfig;
pub use error::ScheduleError;
pub use events::{DEFAULT_QUEUE_LIMIT, EventBus, PlayEvent, SubscriptionId};
pub use lanes::{LaneAnchor, LaneLayout};
pub use live_note::{LiveNote, NoteId, NoteResolution, NoteState};
pub use note_field::{IgnoreReason, ImplementId, ImplementKind, NoteField, StrikeOutcome};
pub use scheduler::SpawnScheduler;
pub use session::{PlaySession, SessionPhase};
