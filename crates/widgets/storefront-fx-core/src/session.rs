//! Timed playback session shared by the reveal and banner controllers.

use serde::{Deserialize, Serialize};

use crate::error::{FxError, FxResult};
use crate::ids::{IdAllocator, SessionId};

/// What the duration clamp asks for on a playback-time update.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClampAction {
    Continue,
    /// Seek back to 0 and keep playing.
    Rewind,
    Pause,
}

/// Maximum playback position and what to do when it is reached.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DurationPolicy {
    max_seconds: f64,
    loop_on_limit: bool,
}

impl DurationPolicy {
    pub fn new(max_seconds: f64, loop_on_limit: bool) -> FxResult<Self> {
        if !(max_seconds.is_finite() && max_seconds > 0.0) {
            return Err(FxError::InvalidDuration(max_seconds));
        }
        Ok(Self {
            max_seconds,
            loop_on_limit,
        })
    }

    /// Infallible constructor for attribute-derived whole seconds; 0 is
    /// bumped to 1 so the policy never clamps at the very first frame.
    pub fn from_whole_seconds(seconds: u32, loop_on_limit: bool) -> Self {
        Self {
            max_seconds: f64::from(seconds.max(1)),
            loop_on_limit,
        }
    }

    pub fn max_seconds(&self) -> f64 {
        self.max_seconds
    }

    pub fn loop_on_limit(&self) -> bool {
        self.loop_on_limit
    }

    pub fn check(&self, current_time: f64) -> ClampAction {
        if !(current_time.is_finite() && current_time >= self.max_seconds) {
            ClampAction::Continue
        } else if self.loop_on_limit {
            ClampAction::Rewind
        } else {
            ClampAction::Pause
        }
    }

    /// True when the media's intrinsic length is longer than the clamp.
    pub fn exceeded_by(&self, intrinsic_seconds: f64) -> bool {
        intrinsic_seconds.is_finite() && intrinsic_seconds > self.max_seconds
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSession {
    pub id: SessionId,
    pub started_at_ms: f64,
    /// Set once the play request resolved (or the simulated load finished).
    pub confirmed: bool,
}

/// Owns the current session, if any, and allocates ids for new ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionTracker {
    ids: IdAllocator,
    current: Option<PlaybackSession>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session, superseding any current one.
    pub fn begin(&mut self, now_ms: f64) -> PlaybackSession {
        let session = PlaybackSession {
            id: self.ids.alloc_session(),
            started_at_ms: now_ms,
            confirmed: false,
        };
        self.current = Some(session);
        session
    }

    /// Mark `id` confirmed. False when `id` is stale or already confirmed.
    pub fn confirm(&mut self, id: SessionId) -> bool {
        match self.current.as_mut() {
            Some(s) if s.id == id && !s.confirmed => {
                s.confirmed = true;
                true
            }
            _ => false,
        }
    }

    pub fn end(&mut self) -> Option<PlaybackSession> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&PlaybackSession> {
        self.current.as_ref()
    }

    pub fn is_current(&self, id: SessionId) -> bool {
        self.current.is_some_and(|s| s.id == id)
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Next id without starting a session; used for fire-and-forget play
    /// requests that never become a tracked session.
    pub fn next_request_id(&mut self) -> SessionId {
        self.ids.alloc_session()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_rejects_non_positive() {
        assert!(DurationPolicy::new(0.0, false).is_err());
        assert!(DurationPolicy::new(-1.0, true).is_err());
        assert!(DurationPolicy::new(f64::NAN, true).is_err());
        assert!(DurationPolicy::new(0.5, true).is_ok());
        assert_eq!(DurationPolicy::from_whole_seconds(0, false).max_seconds(), 1.0);
    }

    #[test]
    fn clamp_actions() {
        let looping = DurationPolicy::from_whole_seconds(5, true);
        let once = DurationPolicy::from_whole_seconds(5, false);
        assert_eq!(looping.check(4.99), ClampAction::Continue);
        assert_eq!(looping.check(5.0), ClampAction::Rewind);
        assert_eq!(once.check(5.0), ClampAction::Pause);
        assert_eq!(once.check(f64::NAN), ClampAction::Continue);
        assert!(once.exceeded_by(12.0));
        assert!(!once.exceeded_by(f64::INFINITY));
    }

    #[test]
    fn tracker_lifecycle() {
        let mut t = SessionTracker::new();
        let a = t.begin(0.0);
        assert!(t.is_active() && !a.confirmed);
        assert!(t.confirm(a.id));
        assert_eq!(t.current().map(|s| s.confirmed), Some(true));
        assert!(!t.confirm(a.id));
        let b = t.begin(10.0);
        assert_ne!(a.id, b.id);
        assert!(!t.confirm(a.id));
        assert!(t.is_current(b.id));
        assert_eq!(t.end().map(|s| s.id), Some(b.id));
        assert!(!t.is_active());
    }
}
