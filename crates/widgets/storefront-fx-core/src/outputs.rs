//! Output contracts from the controllers.
//!
//! A transition returns a list of `Effect`s. Adapters apply them to the host
//! (DOM classes and styles, media calls, timers, animation frames) in order.

use serde::{Deserialize, Serialize};

use crate::ids::SessionId;
use crate::task::{TimerKind, TimerToken};

/// Element an effect is aimed at, resolved by the adapter's binding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Target {
    /// Element carrying the state classes (container or wrapper).
    Host,
    Media,
    ProgressFill,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StyleProp {
    Transform,
    Transition,
    BoxShadow,
    Filter,
    Width,
}

impl StyleProp {
    pub fn css_name(self) -> &'static str {
        match self {
            StyleProp::Transform => "transform",
            StyleProp::Transition => "transition",
            StyleProp::BoxShadow => "box-shadow",
            StyleProp::Filter => "filter",
            StyleProp::Width => "width",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameLoop {
    Float,
    Distortion,
}

/// Media element flags applied once at bind time; `None` leaves a flag alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSetup {
    pub autoplay: Option<bool>,
    pub looping: Option<bool>,
    pub muted: Option<bool>,
    pub plays_inline: Option<bool>,
    pub preload_metadata: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Effect {
    SetClass {
        target: Target,
        class: &'static str,
        on: bool,
    },
    SetStyle {
        target: Target,
        prop: StyleProp,
        value: String,
    },
    ClearStyle {
        target: Target,
        prop: StyleProp,
    },
    /// Put back the host's box-shadow captured at bind time.
    RestoreShadow,
    ConfigureMedia(MediaSetup),
    /// Call play(); the adapter reports back with the same session id.
    RequestPlay {
        session: SessionId,
    },
    PauseMedia,
    RewindMedia,
    Seek {
        time: f64,
    },
    SetMuted(bool),
    RequestFullscreen,
    /// Start fetching media metadata/resources.
    Preload,
    /// Replace any timer of the same kind.
    ArmTimer {
        token: TimerToken,
        delay_ms: u32,
    },
    CancelTimer {
        kind: TimerKind,
    },
    /// Replace any pending frame of the same loop.
    RequestFrame {
        kind: FrameLoop,
    },
    CancelFrame {
        kind: FrameLoop,
    },
    /// Swap the host's contents for the static error notice.
    ShowError,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Effects {
    items: Vec<Effect>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, effect: Effect) {
        self.items.push(effect);
    }

    #[inline]
    pub fn set_class(&mut self, target: Target, class: &'static str, on: bool) {
        self.push(Effect::SetClass { target, class, on });
    }

    #[inline]
    pub fn set_style(&mut self, target: Target, prop: StyleProp, value: String) {
        self.push(Effect::SetStyle {
            target,
            prop,
            value,
        });
    }

    #[inline]
    pub fn arm(&mut self, kind: TimerKind, session: SessionId, delay_ms: u32) {
        self.push(Effect::ArmTimer {
            token: TimerToken { kind, session },
            delay_ms,
        });
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Effect> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, effect: &Effect) -> bool {
        self.items.contains(effect)
    }

    /// The last armed timer of `kind` in this batch.
    pub fn armed(&self, kind: TimerKind) -> Option<(TimerToken, u32)> {
        self.items.iter().rev().find_map(|e| match e {
            Effect::ArmTimer { token, delay_ms } if token.kind == kind => Some((*token, *delay_ms)),
            _ => None,
        })
    }

    /// Final on/off value this batch writes for `class`, if any.
    pub fn class_state(&self, class: &str) -> Option<bool> {
        self.items.iter().rev().find_map(|e| match e {
            Effect::SetClass { class: c, on, .. } if *c == class => Some(*on),
            _ => None,
        })
    }

    /// Last style value this batch writes for `prop` on `target`.
    pub fn style(&self, target: Target, prop: StyleProp) -> Option<&str> {
        self.items.iter().rev().find_map(|e| match e {
            Effect::SetStyle {
                target: t,
                prop: p,
                value,
            } if *t == target && *p == prop => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn into_vec(self) -> Vec<Effect> {
        self.items
    }
}

impl IntoIterator for Effects {
    type Item = Effect;
    type IntoIter = std::vec::IntoIter<Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Effects {
    type Item = &'a Effect;
    type IntoIter = std::slice::Iter<'a, Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
