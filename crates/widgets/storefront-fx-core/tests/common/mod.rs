#![allow(dead_code)]
//! Virtual-clock harness: applies controller effects to a fake host so
//! tests can assert on classes, styles, media calls, timers and frames.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use storefront_fx_core::{
    BannerConfig, BannerController, BannerEvent, ControlSet, Effect, Effects, FrameLoop, MediaKind,
    MediaSetup, RevealConfig, RevealController, RevealEvent, SessionId, StyleProp, Target,
    TimerKind, TimerToken,
};

#[derive(Debug, Default)]
pub struct MediaSim {
    pub playing: bool,
    pub current_time: f64,
    pub muted: bool,
    pub pauses: usize,
    pub rewinds: usize,
    pub seeks: Vec<f64>,
    pub preloads: usize,
    pub fullscreen_requests: usize,
    pub configured: Option<MediaSetup>,
}

/// Host-side state written by effects.
#[derive(Debug, Default)]
pub struct HostSim {
    pub now: f64,
    pub classes: BTreeSet<&'static str>,
    pub styles: BTreeMap<(Target, StyleProp), String>,
    pub media: MediaSim,
    pub shadow_restores: usize,
    pub error_shown: usize,
    /// Play requests not yet resolved or rejected.
    pub pending_play: VecDeque<SessionId>,
    timers: Vec<(TimerToken, f64)>,
    pub fired: Vec<TimerToken>,
    pub frames: BTreeSet<FrameLoopKey>,
    pub log: Vec<Effect>,
}

/// `FrameLoop` is not `Ord`; key frames by discriminant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum FrameLoopKey {
    Float,
    Distortion,
}

impl From<FrameLoop> for FrameLoopKey {
    fn from(kind: FrameLoop) -> Self {
        match kind {
            FrameLoop::Float => FrameLoopKey::Float,
            FrameLoop::Distortion => FrameLoopKey::Distortion,
        }
    }
}

impl HostSim {
    pub fn apply(&mut self, fx: &Effects) {
        for effect in fx {
            self.log.push(effect.clone());
            match effect {
                Effect::SetClass { target, class, on } => {
                    if *target == Target::Host {
                        if *on {
                            self.classes.insert(*class);
                        } else {
                            self.classes.remove(*class);
                        }
                    }
                }
                Effect::SetStyle {
                    target,
                    prop,
                    value,
                } => {
                    self.styles.insert((*target, *prop), value.clone());
                }
                Effect::ClearStyle { target, prop } => {
                    self.styles.remove(&(*target, *prop));
                }
                Effect::RestoreShadow => {
                    self.shadow_restores += 1;
                    self.styles.remove(&(Target::Host, StyleProp::BoxShadow));
                }
                Effect::ConfigureMedia(setup) => {
                    if let Some(muted) = setup.muted {
                        self.media.muted = muted;
                    }
                    self.media.configured = Some(setup.clone());
                }
                Effect::RequestPlay { session } => self.pending_play.push_back(*session),
                Effect::PauseMedia => {
                    self.media.playing = false;
                    self.media.pauses += 1;
                }
                Effect::RewindMedia => {
                    self.media.current_time = 0.0;
                    self.media.rewinds += 1;
                }
                Effect::Seek { time } => {
                    self.media.current_time = *time;
                    self.media.seeks.push(*time);
                }
                Effect::SetMuted(muted) => self.media.muted = *muted,
                Effect::RequestFullscreen => self.media.fullscreen_requests += 1,
                Effect::Preload => self.media.preloads += 1,
                Effect::ArmTimer { token, delay_ms } => {
                    self.timers.retain(|(t, _)| t.kind != token.kind);
                    self.timers.push((*token, self.now + f64::from(*delay_ms)));
                }
                Effect::CancelTimer { kind } => self.timers.retain(|(t, _)| t.kind != *kind),
                Effect::RequestFrame { kind } => {
                    self.frames.insert((*kind).into());
                }
                Effect::CancelFrame { kind } => {
                    self.frames.remove(&FrameLoopKey::from(*kind));
                }
                Effect::ShowError => self.error_shown += 1,
            }
        }
    }

    pub fn has(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn style(&self, target: Target, prop: StyleProp) -> Option<&str> {
        self.styles.get(&(target, prop)).map(String::as_str)
    }

    pub fn armed(&self, kind: TimerKind) -> Option<(TimerToken, f64)> {
        self.timers.iter().copied().find(|(t, _)| t.kind == kind)
    }

    pub fn armed_count(&self) -> usize {
        self.timers.len()
    }

    /// Earliest timer due at or before `until`, removed from the queue.
    fn next_due(&mut self, until: f64) -> Option<(TimerToken, f64)> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, (_, due))| *due <= until)
            .min_by(|a, b| a.1 .1.total_cmp(&b.1 .1))
            .map(|(i, _)| i)?;
        Some(self.timers.remove(idx))
    }

    pub fn count(&self, pred: impl Fn(&Effect) -> bool) -> usize {
        self.log.iter().filter(|e| pred(e)).count()
    }
}

pub struct RevealSim {
    pub ctl: RevealController,
    pub host: HostSim,
}

impl RevealSim {
    pub fn new(cfg: RevealConfig, media: MediaKind) -> Self {
        let ctl = RevealController::new(cfg, media);
        let mut host = HostSim::default();
        host.apply(&ctl.bind_effects());
        Self { ctl, host }
    }

    pub fn send(&mut self, event: RevealEvent) -> Effects {
        let fx = self.ctl.handle(event, self.host.now);
        self.host.apply(&fx);
        fx
    }

    /// Move the clock forward, firing due timers in order.
    pub fn advance(&mut self, ms: f64) {
        let until = self.host.now + ms;
        while let Some((token, due)) = self.host.next_due(until) {
            self.host.now = due;
            self.host.fired.push(token);
            self.send(RevealEvent::TimerFired(token));
        }
        self.host.now = until;
    }

    pub fn resolve_play(&mut self) -> Option<SessionId> {
        let session = self.host.pending_play.pop_front()?;
        self.host.media.playing = true;
        self.send(RevealEvent::PlayResolved { session });
        Some(session)
    }

    pub fn reject_play(&mut self, reason: &str) -> Option<SessionId> {
        let session = self.host.pending_play.pop_front()?;
        self.send(RevealEvent::PlayRejected {
            session,
            reason: reason.to_string(),
        });
        Some(session)
    }

    /// Deliver one animation frame if `kind` has one pending.
    pub fn frame(&mut self, kind: FrameLoop) -> bool {
        if !self.host.frames.remove(&FrameLoopKey::from(kind)) {
            return false;
        }
        self.send(RevealEvent::Frame {
            kind,
            timestamp_ms: self.host.now,
        });
        true
    }
}

/// Banner harness; play and pause requests loop back as media events,
/// the way a browser fires `play` and `pause`.
pub struct BannerSim {
    pub ctl: BannerController,
    pub host: HostSim,
}

impl BannerSim {
    pub fn new(cfg: BannerConfig, controls: ControlSet) -> Self {
        let ctl = BannerController::new(cfg, controls);
        let mut host = HostSim::default();
        host.apply(&ctl.bind_effects());
        Self { ctl, host }
    }

    pub fn send(&mut self, event: BannerEvent) -> Effects {
        let was_playing = self.host.media.playing;
        let fx = self.ctl.handle(event, self.host.now);
        self.host.apply(&fx);
        let play_requested = !self.host.pending_play.is_empty();
        self.host.pending_play.clear();
        if was_playing && !self.host.media.playing {
            self.send(BannerEvent::MediaPause);
        } else if !was_playing && play_requested {
            self.host.media.playing = true;
            self.send(BannerEvent::MediaPlay);
        }
        fx
    }

    /// Simulate the browser starting playback on its own (autoplay).
    pub fn autoplay(&mut self) {
        self.host.media.playing = true;
        self.send(BannerEvent::MediaPlay);
    }

    pub fn time_update(&mut self, current_time: f64, duration: f64) -> Effects {
        self.host.media.current_time = current_time;
        self.send(BannerEvent::TimeUpdate {
            current_time,
            duration,
        })
    }

    pub fn frame(&mut self, kind: FrameLoop) -> bool {
        if !self.host.frames.remove(&FrameLoopKey::from(kind)) {
            return false;
        }
        self.send(BannerEvent::Frame {
            kind,
            timestamp_ms: self.host.now,
        });
        true
    }

    pub fn advance(&mut self, ms: f64) {
        self.host.now += ms;
    }
}
