//! Movement lifecycle notifications.

use std::sync::{Arc, Mutex, PoisonError};

use tn_core::{MovementMode, ObserverId};

/// Callbacks raised by [`MovementExecutor`][crate::MovementExecutor] during
/// the tick that caused them.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: mode printer
///
/// ```rust,ignore
/// struct ModePrinter;
///
/// impl MovementObserver for ModePrinter {
///     fn on_movement_mode_changed(&mut self, old: MovementMode, new: MovementMode) {
///         println!("{old} -> {new}");
///     }
/// }
/// ```
pub trait MovementObserver {
    /// The active path was fully consumed.  Fires exactly once per path.
    fn on_movement_finished(&mut self) {}

    /// The executor's movement mode changed.
    fn on_movement_mode_changed(&mut self, _old: MovementMode, _new: MovementMode) {}
}

/// A [`MovementObserver`] that does nothing.
pub struct NoopObserver;

impl MovementObserver for NoopObserver {}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Ordered observer list.  Delivery follows registration order.
#[derive(Default)]
pub(crate) struct Observers {
    next:    u32,
    entries: Vec<(ObserverId, Box<dyn MovementObserver>)>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Box<dyn MovementObserver>) -> ObserverId {
        let id = ObserverId(self.next);
        self.next += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(i, _)| *i != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn finished(&mut self) {
        for (_, o) in &mut self.entries {
            o.on_movement_finished();
        }
    }

    pub(crate) fn mode_changed(&mut self, old: MovementMode, new: MovementMode) {
        for (_, o) in &mut self.entries {
            o.on_movement_mode_changed(old, new);
        }
    }
}

// ── EventLog ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementEvent {
    ModeChanged { old: MovementMode, new: MovementMode },
    Finished,
}

/// Observer that records every event.  Clones share one log, so keep a
/// clone to inspect what a registered copy saw.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<MovementEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: MovementEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }

    /// Snapshot of the recorded events, oldest first.
    pub fn events(&self) -> Vec<MovementEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn finished_count(&self) -> usize {
        self.events().iter().filter(|e| **e == MovementEvent::Finished).count()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl MovementObserver for EventLog {
    fn on_movement_finished(&mut self) {
        self.push(MovementEvent::Finished);
    }

    fn on_movement_mode_changed(&mut self, old: MovementMode, new: MovementMode) {
        self.push(MovementEvent::ModeChanged { old, new });
    }
}
