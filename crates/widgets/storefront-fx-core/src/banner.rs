//! Video banner controller: transport controls, duration clamp, parallax,
//! idle float and playback distortion.

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::BannerConfig;
use crate::fx::{depth_shadow, fmt_num, offsets, Distortion, Surface};
use crate::inputs::BannerEvent;
use crate::markup::{banner, class};
use crate::outputs::{Effect, Effects, FrameLoop, StyleProp, Target};
use crate::session::{ClampAction, SessionTracker};

/// Which optional controls were found in the markup.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSet {
    pub play_pause: bool,
    pub mute: bool,
    pub fullscreen: bool,
    /// Both the bar and its fill are present.
    pub progress: bool,
}

impl ControlSet {
    pub const ALL: Self = Self {
        play_pause: true,
        mute: true,
        fullscreen: true,
        progress: true,
    };
}

/// Fill width in percent, or None while the duration is unknown.
pub fn progress_percent(current_time: f64, duration: f64) -> Option<f64> {
    if !(duration.is_finite() && duration > 0.0 && current_time.is_finite()) {
        return None;
    }
    Some((current_time / duration * 100.0).clamp(0.0, 100.0))
}

/// Seek position for a click at `ratio` of the bar's width.
pub fn seek_target(ratio: f64, duration: f64) -> Option<f64> {
    if !(duration.is_finite() && duration > 0.0 && ratio.is_finite()) {
        return None;
    }
    Some(ratio.clamp(0.0, 1.0) * duration)
}

#[derive(Clone, Debug, PartialEq)]
pub struct BannerState {
    controls: ControlSet,
    playing: bool,
    autoplay_3d: bool,
    errored: bool,
    duration_warned: bool,
    requests: SessionTracker,
    surface: Surface,
    distortion: Distortion,
}

impl BannerState {
    pub fn new(cfg: &BannerConfig, controls: ControlSet) -> Self {
        Self {
            controls,
            playing: false,
            autoplay_3d: false,
            errored: false,
            duration_warned: false,
            requests: SessionTracker::new(),
            surface: Surface::new(cfg.parallax, cfg.float),
            distortion: Distortion::default(),
        }
    }

    pub fn controls(&self) -> ControlSet {
        self.controls
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_errored(&self) -> bool {
        self.errored
    }

    pub fn autoplay_3d(&self) -> bool {
        self.autoplay_3d
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn distortion(&self) -> &Distortion {
        &self.distortion
    }
}

pub fn bind_effects(cfg: &BannerConfig) -> Effects {
    let mut fx = Effects::new();
    fx.push(Effect::ConfigureMedia(cfg.media_setup()));
    fx
}

pub fn step(
    cfg: &BannerConfig,
    state: &BannerState,
    event: BannerEvent,
    now_ms: f64,
) -> (BannerState, Effects) {
    let mut next = state.clone();
    let fx = apply(cfg, &mut next, event, now_ms);
    (next, fx)
}

/// In-place form of `step`. The banner has no time-based deadlines, so
/// `now_ms` is unused beyond keeping both controllers' signatures alike.
pub fn apply(cfg: &BannerConfig, state: &mut BannerState, event: BannerEvent, _now_ms: f64) -> Effects {
    let mut fx = Effects::new();
    if state.errored {
        return fx;
    }
    match event {
        BannerEvent::MediaPlay => {
            state.playing = true;
            fx.set_class(Target::Host, class::PLAYING, true);
            if cfg.autoplay {
                if !state.autoplay_3d {
                    state.autoplay_3d = true;
                    fx.set_class(Target::Host, class::AUTOPLAY_3D, true);
                }
                if state.surface.start_float() {
                    fx.push(Effect::RequestFrame {
                        kind: FrameLoop::Float,
                    });
                }
            }
            if state.distortion.start() {
                fx.push(Effect::RequestFrame {
                    kind: FrameLoop::Distortion,
                });
            }
        }
        BannerEvent::MediaPause => {
            state.playing = false;
            fx.set_class(Target::Host, class::PLAYING, false);
            if state.surface.stop_float() {
                fx.push(Effect::CancelFrame {
                    kind: FrameLoop::Float,
                });
                fx.push(Effect::ClearStyle {
                    target: Target::Host,
                    prop: StyleProp::Transform,
                });
            }
            stop_distortion(state, &mut fx);
        }
        BannerEvent::TimeUpdate {
            current_time,
            duration,
        } => {
            if state.controls.progress {
                if let Some(pct) = progress_percent(current_time, duration) {
                    fx.set_style(
                        Target::ProgressFill,
                        StyleProp::Width,
                        format!("{}%", fmt_num(pct)),
                    );
                }
            }
            match cfg.duration_policy().check(current_time) {
                ClampAction::Continue => {}
                ClampAction::Rewind => fx.push(Effect::Seek { time: 0.0 }),
                ClampAction::Pause => {
                    if state.playing {
                        fx.push(Effect::PauseMedia);
                    }
                }
            }
        }
        BannerEvent::MetadataLoaded { duration } => {
            let policy = cfg.duration_policy();
            if !state.duration_warned && policy.exceeded_by(duration) {
                state.duration_warned = true;
                warn!(
                    "Video duration ({duration}s) exceeds maximum ({}s)",
                    policy.max_seconds()
                );
            }
        }
        BannerEvent::DataLoaded { duration } => {
            info!(
                "Video loaded: {duration}s duration (max: {}s)",
                cfg.max_seconds
            );
        }
        BannerEvent::LoadError { source } => {
            state.errored = true;
            error!(
                "Video failed to load: {}",
                source.as_deref().unwrap_or("<unknown source>")
            );
            if state.surface.stop_float() {
                fx.push(Effect::CancelFrame {
                    kind: FrameLoop::Float,
                });
            }
            if state.distortion.stop() {
                fx.push(Effect::CancelFrame {
                    kind: FrameLoop::Distortion,
                });
            }
            fx.push(Effect::ShowError);
        }
        BannerEvent::PlayPauseClicked { paused } => {
            if !state.controls.play_pause {
                return fx;
            }
            if paused {
                let session = state.requests.next_request_id();
                fx.push(Effect::RequestPlay { session });
            } else {
                fx.push(Effect::PauseMedia);
            }
        }
        BannerEvent::MuteClicked { muted } => {
            if state.controls.mute {
                fx.push(Effect::SetMuted(!muted));
                fx.set_class(Target::Host, class::MUTED, !muted);
            }
        }
        BannerEvent::FullscreenClicked => {
            if state.controls.fullscreen {
                fx.push(Effect::RequestFullscreen);
            }
        }
        BannerEvent::ProgressClicked { ratio, duration } => {
            if state.controls.progress {
                if let Some(time) = seek_target(ratio, duration) {
                    fx.push(Effect::Seek { time });
                }
            }
        }
        BannerEvent::PlayRejected { reason } => warn!("Video play failed: {reason}"),
        BannerEvent::PointerEnter => {
            if !state.autoplay_3d {
                fx.set_style(
                    Target::Host,
                    StyleProp::Transition,
                    banner::HOVER_TRANSITION.to_string(),
                );
            }
        }
        BannerEvent::PointerMove { pointer, rect } => {
            let o = offsets(pointer, rect);
            state.surface.aim(o);
            fx.set_style(
                Target::Host,
                StyleProp::Transform,
                state.surface.render(state.autoplay_3d),
            );
            fx.set_style(Target::Host, StyleProp::BoxShadow, depth_shadow(o));
        }
        BannerEvent::PointerLeave => {
            state.surface.release();
            fx.set_style(
                Target::Host,
                StyleProp::Transform,
                state.surface.render(state.autoplay_3d),
            );
            fx.push(Effect::RestoreShadow);
        }
        BannerEvent::Frame {
            kind: FrameLoop::Float,
            timestamp_ms,
        } => {
            if let Some(css) = state.surface.tick(timestamp_ms, state.autoplay_3d) {
                fx.set_style(Target::Host, StyleProp::Transform, css);
            }
            if state.surface.float_running() {
                fx.push(Effect::RequestFrame {
                    kind: FrameLoop::Float,
                });
            }
        }
        BannerEvent::Frame {
            kind: FrameLoop::Distortion,
            ..
        } => {
            if !state.playing {
                stop_distortion(state, &mut fx);
            } else if let Some(filter) = state.distortion.tick() {
                fx.set_style(Target::Media, StyleProp::Filter, filter);
                fx.push(Effect::RequestFrame {
                    kind: FrameLoop::Distortion,
                });
            }
        }
    }
    fx
}

fn stop_distortion(state: &mut BannerState, fx: &mut Effects) {
    if state.distortion.stop() {
        fx.push(Effect::CancelFrame {
            kind: FrameLoop::Distortion,
        });
        fx.push(Effect::ClearStyle {
            target: Target::Media,
            prop: StyleProp::Filter,
        });
    }
}

/// Owns one banner's config and state.
#[derive(Clone, Debug)]
pub struct BannerController {
    cfg: BannerConfig,
    state: BannerState,
}

impl BannerController {
    pub fn new(cfg: BannerConfig, controls: ControlSet) -> Self {
        let state = BannerState::new(&cfg, controls);
        Self { cfg, state }
    }

    pub fn bind_effects(&self) -> Effects {
        bind_effects(&self.cfg)
    }

    pub fn handle(&mut self, event: BannerEvent, now_ms: f64) -> Effects {
        apply(&self.cfg, &mut self.state, event, now_ms)
    }

    pub fn config(&self) -> &BannerConfig {
        &self.cfg
    }

    pub fn state(&self) -> &BannerState {
        &self.state
    }
}
