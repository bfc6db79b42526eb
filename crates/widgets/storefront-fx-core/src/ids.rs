//! Identifiers and a simple allocator for playback sessions.

use serde::{Deserialize, Serialize};

/// One play cycle. A new id is allocated every time playback starts, so
/// anything tagged with an older id (timers, play promises) is stale.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u32);

/// Monotonic allocator for SessionId.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct IdAllocator {
    next_session: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_session(&mut self) -> SessionId {
        let id = SessionId(self.next_session);
        self.next_session = self.next_session.wrapping_add(1);
        id
    }
}
