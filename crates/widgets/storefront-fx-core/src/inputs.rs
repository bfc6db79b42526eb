//! Input contracts: the host events each controller reacts to.
//!
//! Adapters translate DOM events, media events, timer and frame callbacks
//! into these and feed them to the controllers one at a time.

use serde::{Deserialize, Serialize};

use crate::fx::{Point, Rect};
use crate::ids::SessionId;
use crate::outputs::FrameLoop;
use crate::task::TimerToken;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RevealEvent {
    PointerEnter,
    PointerLeave,
    PointerMove { pointer: Point, rect: Rect },
    Click,
    PlayResolved { session: SessionId },
    PlayRejected { session: SessionId, reason: String },
    TimerFired(TimerToken),
    /// The media reached its natural end.
    MediaEnded,
    /// `loadeddata`.
    MediaLoaded,
    MetadataLoaded { duration: f64 },
    TimeUpdate { current_time: f64 },
    ViewportEnter,
    ViewportExit,
    Frame { kind: FrameLoop, timestamp_ms: f64 },
    /// Programmatic start.
    Trigger,
    /// Programmatic stop.
    Reset,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BannerEvent {
    PointerEnter,
    PointerLeave,
    PointerMove { pointer: Point, rect: Rect },
    /// Media `play`, whoever started it.
    MediaPlay,
    /// Media `pause`, whoever paused it.
    MediaPause,
    TimeUpdate { current_time: f64, duration: f64 },
    MetadataLoaded { duration: f64 },
    /// `loadeddata`.
    DataLoaded { duration: f64 },
    LoadError { source: Option<String> },
    /// Carries the media's paused flag at click time.
    PlayPauseClicked { paused: bool },
    /// Carries the media's muted flag at click time.
    MuteClicked { muted: bool },
    FullscreenClicked,
    /// `ratio` is the click's horizontal position within the bar.
    ProgressClicked { ratio: f64, duration: f64 },
    PlayRejected { reason: String },
    Frame { kind: FrameLoop, timestamp_ms: f64 },
}
