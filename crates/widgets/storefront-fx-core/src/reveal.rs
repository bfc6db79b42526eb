//! Image-reveals-to-video controller.
//!
//! State machine `Idle -> Loading -> Playing -> Idle` driven by pointer,
//! media, timer, viewport and frame events. `step` is a pure transition;
//! `RevealController` is a small owner for adapters that keep one mutable
//! state per widget.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::{MediaKind, RevealConfig, TriggerMode};
use crate::fx::{offsets, Surface};
use crate::ids::SessionId;
use crate::inputs::RevealEvent;
use crate::markup::class;
use crate::outputs::{Effect, Effects, FrameLoop, MediaSetup, StyleProp, Target};
use crate::session::{ClampAction, SessionTracker};
use crate::task::{TimerKind, TimerToken};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    /// Play requested, not yet confirmed.
    Loading,
    Playing,
}

/// Why a session ended; logged at debug level.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    AutoStop,
    ToggleWindow,
    Toggle,
    Ended,
    PointerLeave,
    Viewport,
    Rejected,
    Reset,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RevealState {
    media: MediaKind,
    hovered: bool,
    preloaded: bool,
    duration_warned: bool,
    sessions: SessionTracker,
    surface: Surface,
}

impl RevealState {
    pub fn new(cfg: &RevealConfig, media: MediaKind) -> Self {
        Self {
            media,
            hovered: false,
            preloaded: false,
            duration_warned: false,
            sessions: SessionTracker::new(),
            surface: Surface::new(cfg.tilt, cfg.float),
        }
    }

    pub fn phase(&self) -> Phase {
        match self.sessions.current() {
            None => Phase::Idle,
            Some(s) if s.confirmed => Phase::Playing,
            Some(_) => Phase::Loading,
        }
    }

    pub fn is_active(&self) -> bool {
        self.sessions.is_active()
    }

    pub fn media(&self) -> MediaKind {
        self.media
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_preloaded(&self) -> bool {
        self.preloaded
    }

    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

/// Effects applied once when the widget is bound.
pub fn bind_effects(cfg: &RevealConfig, media: MediaKind) -> Effects {
    let mut fx = Effects::new();
    if cfg.family.configures_media() && media == MediaKind::Video {
        fx.push(Effect::ConfigureMedia(MediaSetup {
            muted: Some(true),
            looping: Some(false),
            preload_metadata: true,
            ..MediaSetup::default()
        }));
    }
    fx
}

pub fn step(
    cfg: &RevealConfig,
    state: &RevealState,
    event: RevealEvent,
    now_ms: f64,
) -> (RevealState, Effects) {
    let mut next = state.clone();
    let fx = apply(cfg, &mut next, event, now_ms);
    (next, fx)
}

/// In-place form of `step`.
pub fn apply(cfg: &RevealConfig, state: &mut RevealState, event: RevealEvent, now_ms: f64) -> Effects {
    let mut fx = Effects::new();
    match event {
        RevealEvent::PointerEnter => {
            state.hovered = true;
            fx.set_class(Target::Host, class::HOVERED, true);
            if state.surface.start_float() {
                fx.push(Effect::RequestFrame {
                    kind: FrameLoop::Float,
                });
            }
            if cfg.trigger == TriggerMode::Hover {
                start(cfg, state, now_ms, &mut fx);
            }
        }
        RevealEvent::PointerLeave => {
            state.hovered = false;
            fx.set_class(Target::Host, class::HOVERED, false);
            if state.surface.stop_float() {
                fx.push(Effect::CancelFrame {
                    kind: FrameLoop::Float,
                });
            }
            state.surface.release();
            let css = state.surface.render(state.is_active());
            fx.set_style(Target::Host, StyleProp::Transform, css);
            // Once confirmed, the session runs to its deadline.
            if cfg.trigger == TriggerMode::Hover && state.phase() == Phase::Loading {
                stop(cfg, state, StopReason::PointerLeave, &mut fx);
            }
        }
        RevealEvent::PointerMove { pointer, rect } => {
            state.surface.aim(offsets(pointer, rect));
            let css = state.surface.render(state.is_active());
            fx.set_style(Target::Host, StyleProp::Transform, css);
        }
        RevealEvent::Click => {
            if cfg.trigger == TriggerMode::Click && state.is_active() {
                stop(cfg, state, StopReason::Toggle, &mut fx);
            } else {
                start(cfg, state, now_ms, &mut fx);
            }
        }
        RevealEvent::Trigger => start(cfg, state, now_ms, &mut fx),
        RevealEvent::Reset => stop(cfg, state, StopReason::Reset, &mut fx),
        RevealEvent::PlayResolved { session } => {
            if state.sessions.is_current(session) {
                confirm(cfg, state, session, &mut fx);
            } else if !state.is_active() && state.media == MediaKind::Video {
                // A late promise from a session that already ended.
                fx.push(Effect::PauseMedia);
            }
        }
        RevealEvent::PlayRejected { session, reason } => {
            if state.sessions.is_current(session) {
                warn!("Video play failed: {reason}");
                stop(cfg, state, StopReason::Rejected, &mut fx);
            }
        }
        RevealEvent::TimerFired(token) => on_timer(cfg, state, token, &mut fx),
        RevealEvent::MediaEnded => stop(cfg, state, StopReason::Ended, &mut fx),
        RevealEvent::MediaLoaded => fx.set_class(Target::Host, class::LOADING, false),
        RevealEvent::MetadataLoaded { duration } => {
            let policy = cfg.duration_policy();
            if !state.duration_warned && policy.exceeded_by(duration) {
                state.duration_warned = true;
                warn!(
                    "Video duration ({duration}s) exceeds maximum ({}s)",
                    policy.max_seconds()
                );
            }
        }
        RevealEvent::TimeUpdate { current_time } => {
            if state.media == MediaKind::Video
                && cfg.duration_policy().check(current_time) != ClampAction::Continue
            {
                fx.push(Effect::PauseMedia);
                fx.push(Effect::RewindMedia);
            }
        }
        RevealEvent::ViewportEnter => {
            if state.media == MediaKind::Video && !state.preloaded {
                state.preloaded = true;
                fx.push(Effect::Preload);
            }
        }
        RevealEvent::ViewportExit => {
            if state.is_active() {
                stop(cfg, state, StopReason::Viewport, &mut fx);
            } else {
                if state.media == MediaKind::Video {
                    fx.push(Effect::PauseMedia);
                }
                for &c in cfg.family.active_classes() {
                    fx.set_class(Target::Host, c, false);
                }
            }
        }
        RevealEvent::Frame {
            kind: FrameLoop::Float,
            timestamp_ms,
        } => {
            let active = state.is_active();
            if let Some(css) = state.surface.tick(timestamp_ms, active) {
                fx.set_style(Target::Host, StyleProp::Transform, css);
            }
            if state.surface.float_running() {
                fx.push(Effect::RequestFrame {
                    kind: FrameLoop::Float,
                });
            }
        }
        RevealEvent::Frame {
            kind: FrameLoop::Distortion,
            ..
        } => {}
    }
    fx
}

fn start(cfg: &RevealConfig, state: &mut RevealState, now_ms: f64, fx: &mut Effects) {
    if state.is_active() {
        return;
    }
    let session = state.sessions.begin(now_ms).id;
    for &c in cfg.family.active_classes() {
        fx.set_class(Target::Host, c, true);
    }
    fx.set_class(Target::Host, class::LOADING, true);
    match state.media {
        MediaKind::Video => {
            fx.push(Effect::RewindMedia);
            fx.push(Effect::RequestPlay { session });
        }
        MediaKind::Placeholder => {
            fx.arm(TimerKind::SimulatedLoad, session, cfg.simulated_load_ms);
        }
    }
    if cfg.trigger == TriggerMode::Click {
        fx.arm(TimerKind::ToggleWindow, session, cfg.toggle_window_ms());
    }
}

fn confirm(cfg: &RevealConfig, state: &mut RevealState, session: SessionId, fx: &mut Effects) {
    if !state.sessions.confirm(session) {
        return;
    }
    fx.set_class(Target::Host, class::LOADING, false);
    // Click mode is bounded by the toggle window armed at start.
    if cfg.trigger == TriggerMode::Hover {
        fx.arm(TimerKind::AutoStop, session, cfg.auto_stop_ms());
    }
}

fn on_timer(cfg: &RevealConfig, state: &mut RevealState, token: TimerToken, fx: &mut Effects) {
    if !state.sessions.is_current(token.session) {
        debug!("ignoring stale {:?} timer", token.kind);
        return;
    }
    match token.kind {
        TimerKind::SimulatedLoad => confirm(cfg, state, token.session, fx),
        TimerKind::AutoStop => stop(cfg, state, StopReason::AutoStop, fx),
        TimerKind::ToggleWindow => stop(cfg, state, StopReason::ToggleWindow, fx),
    }
}

fn stop(cfg: &RevealConfig, state: &mut RevealState, reason: StopReason, fx: &mut Effects) {
    if state.sessions.end().is_none() {
        return;
    }
    for kind in TimerKind::ALL {
        fx.push(Effect::CancelTimer { kind });
    }
    if state.media == MediaKind::Video {
        fx.push(Effect::PauseMedia);
        fx.push(Effect::RewindMedia);
    }
    for &c in cfg.family.active_classes() {
        fx.set_class(Target::Host, c, false);
    }
    fx.set_class(Target::Host, class::LOADING, false);
    if state.surface.float_running() {
        fx.set_style(Target::Host, StyleProp::Transform, state.surface.render(false));
    }
    debug!("reveal stopped: {reason:?}");
}

/// Owns one widget's config and state.
#[derive(Clone, Debug)]
pub struct RevealController {
    cfg: RevealConfig,
    state: RevealState,
}

impl RevealController {
    pub fn new(cfg: RevealConfig, media: MediaKind) -> Self {
        let state = RevealState::new(&cfg, media);
        Self { cfg, state }
    }

    pub fn bind_effects(&self) -> Effects {
        bind_effects(&self.cfg, self.state.media)
    }

    pub fn handle(&mut self, event: RevealEvent, now_ms: f64) -> Effects {
        apply(&self.cfg, &mut self.state, event, now_ms)
    }

    pub fn config(&self) -> &RevealConfig {
        &self.cfg
    }

    pub fn state(&self) -> &RevealState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RevealFamily;

    fn started(fx: &Effects) -> SessionId {
        fx.iter()
            .find_map(|e| match e {
                Effect::RequestPlay { session } => Some(*session),
                _ => None,
            })
            .expect("play requested")
    }

    #[test]
    fn hover_start_requests_play_after_rewind() {
        let cfg = RevealConfig::default();
        let state = RevealState::new(&cfg, MediaKind::Video);
        let (next, fx) = step(&cfg, &state, RevealEvent::PointerEnter, 0.0);
        assert_eq!(next.phase(), Phase::Loading);
        let effects = fx.into_vec();
        let rewind = effects.iter().position(|e| *e == Effect::RewindMedia);
        let play = effects
            .iter()
            .position(|e| matches!(e, Effect::RequestPlay { .. }));
        assert!(rewind.is_some() && rewind < play);
        assert_eq!(state.phase(), Phase::Idle, "step leaves the input untouched");
    }

    #[test]
    fn confirm_arms_auto_stop_in_hover_mode() {
        let cfg = RevealConfig::default();
        let mut ctl = RevealController::new(cfg, MediaKind::Video);
        let session = started(&ctl.handle(RevealEvent::Trigger, 0.0));
        let fx = ctl.handle(RevealEvent::PlayResolved { session }, 40.0);
        assert_eq!(ctl.phase(), Phase::Playing);
        assert_eq!(fx.class_state(class::LOADING), Some(false));
        let (token, delay) = fx.armed(TimerKind::AutoStop).expect("auto-stop");
        assert_eq!(token.session, session);
        assert_eq!(delay, 5000);
    }

    #[test]
    fn rejected_play_returns_to_idle_without_deadline() {
        let mut ctl = RevealController::new(RevealConfig::default(), MediaKind::Video);
        let session = started(&ctl.handle(RevealEvent::Trigger, 0.0));
        let fx = ctl.handle(
            RevealEvent::PlayRejected {
                session,
                reason: "NotAllowedError".into(),
            },
            10.0,
        );
        assert_eq!(ctl.phase(), Phase::Idle);
        assert_eq!(fx.armed(TimerKind::AutoStop), None);
        assert_eq!(fx.class_state(class::LOADING), Some(false));
        assert_eq!(fx.class_state(class::VIDEO_ACTIVE), Some(false));
    }

    #[test]
    fn section_family_toggles_both_active_classes() {
        let cfg = RevealConfig::with_settings(RevealFamily::Section, &Default::default());
        let mut ctl = RevealController::new(cfg, MediaKind::Video);
        let fx = ctl.handle(RevealEvent::Trigger, 0.0);
        assert_eq!(fx.class_state(class::REVEAL_ACTIVE), Some(true));
        assert_eq!(fx.class_state(class::AUTOPLAY_3D), Some(true));
        assert_eq!(fx.class_state(class::VIDEO_ACTIVE), None);
        assert!(ctl.bind_effects().is_empty());
    }

    #[test]
    fn container_video_is_prepared_at_bind() {
        let ctl = RevealController::new(RevealConfig::default(), MediaKind::Video);
        let fx = ctl.bind_effects().into_vec();
        assert_eq!(
            fx,
            vec![Effect::ConfigureMedia(MediaSetup {
                muted: Some(true),
                looping: Some(false),
                preload_metadata: true,
                ..MediaSetup::default()
            })]
        );
        let placeholder = RevealController::new(RevealConfig::default(), MediaKind::Placeholder);
        assert!(placeholder.bind_effects().is_empty());
    }

    #[test]
    fn stale_resolution_pauses_media() {
        let mut ctl = RevealController::new(RevealConfig::default(), MediaKind::Video);
        let session = started(&ctl.handle(RevealEvent::Trigger, 0.0));
        ctl.handle(RevealEvent::Reset, 5.0);
        let fx = ctl.handle(RevealEvent::PlayResolved { session }, 30.0);
        assert_eq!(fx.into_vec(), vec![Effect::PauseMedia]);
        assert_eq!(ctl.phase(), Phase::Idle);
    }

    #[test]
    fn long_metadata_warns_once() {
        let mut ctl = RevealController::new(RevealConfig::default(), MediaKind::Video);
        ctl.handle(RevealEvent::MetadataLoaded { duration: 12.0 }, 0.0);
        assert!(ctl.state().duration_warned);
        let again = ctl.handle(RevealEvent::MetadataLoaded { duration: 12.0 }, 1.0);
        assert!(again.is_empty());
    }
}
