/// Read access to the externally owned audio playback clock.
///
/// The play core never advances the clock itself. `play` and `stop` are the
/// only writes, issued at the end of the countdown and on abort.
pub trait SongClock {
    /// Current playback position in seconds.
    fn song_position(&self) -> f64;

    fn is_playing(&self) -> bool;

    /// Length of the loaded clip in seconds, `None` when no clip is loaded.
    fn clip_duration(&self) -> Option<f64>;

    fn play(&mut self);
    fn stop(&mut self);
}

/// Clock advanced by hand, for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    position: f64,
    duration: Option<f64>,
    playing: bool,
}

impl ManualClock {
    pub fn new(duration: f64) -> Self {
        Self {
            position: 0.0,
            duration: Some(duration),
            playing: false,
        }
    }

    /// A clock with no clip loaded.
    pub fn without_clip() -> Self {
        Self::default()
    }

    /// Advance playback by `dt` seconds. Does nothing while stopped; playback
    /// stops by itself once the end of the clip is reached.
    pub fn advance(&mut self, dt: f64) {
        if !self.playing {
            return;
        }
        self.position += dt;
        if let Some(duration) = self.duration {
            if self.position >= duration {
                self.position = duration;
                self.playing = false;
            }
        }
    }

    pub fn seek(&mut self, position: f64) {
        self.position = position.max(0.0);
    }
}

impl SongClock for ManualClock {
    fn song_position(&self) -> f64 {
        self.position
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn clip_duration(&self) -> Option<f64> {
        self.duration
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn stop(&mut self) {
        self.playing = false;
    }
}
