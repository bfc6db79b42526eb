//! Cancelable tasks: timers and animation-frame loops.
//!
//! Adapters hold their host handles (a browser timeout, an animation frame)
//! in a `TaskSlot`. Host handles are expected to cancel themselves on drop,
//! so replacing or clearing a slot is the cancellation.

use serde::{Deserialize, Serialize};

use crate::ids::SessionId;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// Hard deadline of a confirmed hover/click session.
    AutoStop,
    /// Stand-in for the play promise of a placeholder media element.
    SimulatedLoad,
    /// Click-toggle deadline, armed when the first click starts playback.
    ToggleWindow,
}

impl TimerKind {
    pub const ALL: [TimerKind; 3] = [
        TimerKind::AutoStop,
        TimerKind::SimulatedLoad,
        TimerKind::ToggleWindow,
    ];
}

/// Identifies one armed timer. A firing token whose session is no longer
/// current is ignored by the controllers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken {
    pub kind: TimerKind,
    pub session: SessionId,
}

/// Holds at most one live handle.
#[derive(Debug)]
pub struct TaskSlot<H> {
    handle: Option<H>,
}

impl<H> TaskSlot<H> {
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Drop (cancel) the current handle, then keep `handle`.
    pub fn arm(&mut self, handle: H) {
        self.handle.take();
        self.handle = Some(handle);
    }

    /// Returns true when a handle was dropped.
    pub fn clear(&mut self) -> bool {
        self.handle.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}

impl<H> Default for TaskSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// A small keyed set of slots, one per task kind.
#[derive(Debug)]
pub struct TaskSlots<K, H> {
    slots: Vec<(K, TaskSlot<H>)>,
}

impl<K: Copy + Eq, H> TaskSlots<K, H> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    fn slot_mut(&mut self, key: K) -> &mut TaskSlot<H> {
        let idx = match self.slots.iter().position(|(k, _)| *k == key) {
            Some(idx) => idx,
            None => {
                self.slots.push((key, TaskSlot::new()));
                self.slots.len() - 1
            }
        };
        &mut self.slots[idx].1
    }

    pub fn arm(&mut self, key: K, handle: H) {
        self.slot_mut(key).arm(handle);
    }

    pub fn clear(&mut self, key: K) -> bool {
        self.slots
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, slot)| slot.clear())
            .unwrap_or(false)
    }

    pub fn clear_all(&mut self) {
        for (_, slot) in self.slots.iter_mut() {
            slot.clear();
        }
    }

    pub fn is_armed(&self, key: K) -> bool {
        self.slots
            .iter()
            .any(|(k, slot)| *k == key && slot.is_armed())
    }

    pub fn armed_count(&self) -> usize {
        self.slots.iter().filter(|(_, s)| s.is_armed()).count()
    }
}

impl<K: Copy + Eq, H> Default for TaskSlots<K, H> {
    fn default() -> Self {
        Self::new()
    }
}
