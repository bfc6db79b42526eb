//! Storefront FX Core (DOM-agnostic)
//!
//! Interaction state machines for the image-reveal and video-banner widgets,
//! plus the tilt, float and distortion formulas they drive. Controllers take
//! input events and return effects; adapters own the DOM, timers and frames.

pub mod banner;
pub mod binding;
pub mod config;
pub mod error;
pub mod fx;
pub mod ids;
pub mod inputs;
pub mod markup;
pub mod outputs;
pub mod reveal;
pub mod session;
pub mod task;

// Re-exports for consumers (adapters)
pub use banner::{progress_percent, seek_target, BannerController, BannerState, ControlSet};
pub use binding::{BannerBinding, ElementQuery, RevealBinding};
pub use config::{
    AttributeSource, BannerConfig, FxSettings, MediaKind, RevealConfig, RevealFamily, TriggerMode,
};
pub use error::{FxError, FxResult};
pub use fx::{Point, Rect, Transform3d};
pub use ids::{IdAllocator, SessionId};
pub use inputs::{BannerEvent, RevealEvent};
pub use outputs::{Effect, Effects, FrameLoop, MediaSetup, StyleProp, Target};
pub use reveal::{Phase, RevealController, RevealState, StopReason};
pub use session::{ClampAction, DurationPolicy, PlaybackSession, SessionTracker};
pub use task::{TaskSlot, TaskSlots, TimerKind, TimerToken};
