use std::collections::VecDeque;
use std::fmt;

use beat_rule::{Judgment, ResultSummary};
use log::debug;

use crate::live_note::NoteId;

/// Notifications emitted by a play session for presentation layers.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayEvent {
    CountdownStarted { seconds: f64 },
    SongStarted,
    NoteSpawned { id: NoteId, lane: usize },
    Judgment(Judgment),
    ObstacleAvoided { id: NoteId, lane: usize },
    ScoreChanged(u64),
    ComboChanged(u32),
    SpawningHalted { skipped: usize },
    ResultsReady(ResultSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&PlayEvent)>;

/// Default number of events kept for polling.
pub const DEFAULT_QUEUE_LIMIT: usize = 1024;

/// Run-scoped event dispatch.
///
/// Listeners are called synchronously in subscription order, then the event
/// is queued for polling. The queue keeps at most `queue_limit` events and
/// drops the oldest beyond that; a limit of 0 turns polling off. Everything is
/// dropped with the bus, so nothing outlives the run it was registered for.
pub struct EventBus {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
    queue: VecDeque<PlayEvent>,
    queue_limit: usize,
    overflowed: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_queue_limit(DEFAULT_QUEUE_LIMIT)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_queue_limit(queue_limit: usize) -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
            queue: VecDeque::new(),
            queue_limit,
            overflowed: 0,
        }
    }

    pub fn set_queue_limit(&mut self, queue_limit: usize) {
        self.queue_limit = queue_limit;
        while self.queue.len() > queue_limit {
            self.queue.pop_front();
            self.overflowed += 1;
        }
    }

    pub fn queue_limit(&self) -> usize {
        self.queue_limit
    }

    /// Events dropped from the queue because nobody polled them in time.
    pub fn overflowed(&self) -> usize {
        self.overflowed
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&PlayEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: PlayEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
        if self.queue_limit == 0 {
            return;
        }
        if self.queue.len() >= self.queue_limit {
            if self.overflowed == 0 {
                debug!("Event queue full ({} events), dropping oldest", self.queue_limit);
            }
            self.queue.pop_front();
            self.overflowed += 1;
        }
        self.queue.push_back(event);
    }

    pub fn poll(&mut self) -> Option<PlayEvent> {
        self.queue.pop_front()
    }

    pub fn drain(&mut self) -> Vec<PlayEvent> {
        self.queue.drain(..).collect()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Drop all listeners and queued events.
    pub fn clear(&mut self) {
        self.listeners.clear();
        self.queue.clear();
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("queued", &self.queue.len())
            .field("queue_limit", &self.queue_limit)
            .field("overflowed", &self.overflowed)
            .finish()
    }
}
