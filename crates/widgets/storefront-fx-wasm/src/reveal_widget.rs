//! One bound image-reveal widget: owns its controller, listeners, timers,
//! frames and viewport observer.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions};
use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::Timeout;
use storefront_fx_core::{
    Effect, Effects, FrameLoop, FxSettings, MediaKind, RevealBinding, RevealController,
    RevealEvent, RevealFamily, TaskSlots, TimerKind,
};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, MouseEvent};

use crate::dom::{self, Dom, Parts, ViewportWatch};

pub struct RevealWidget {
    root: Element,
    ctl: RefCell<RevealController>,
    parts: Parts,
    timers: RefCell<TaskSlots<TimerKind, Timeout>>,
    frames: RefCell<TaskSlots<FrameLoop, AnimationFrame>>,
    listeners: RefCell<Vec<EventListener>>,
    viewport: RefCell<Option<ViewportWatch>>,
}

impl RevealWidget {
    /// Resolve and wire one reveal root; None when a required part is missing.
    pub fn bind(root: &Element, family: RevealFamily, settings: &FxSettings) -> Option<Rc<Self>> {
        let binding = RevealBinding::resolve(&Dom(root.clone()), family)?;
        let media_kind = binding.media_kind();
        let ctl = RevealController::new(binding.config(settings), media_kind);
        let widget = Rc::new(Self {
            root: root.clone(),
            ctl: RefCell::new(ctl),
            parts: Parts {
                host: binding.host.0.clone(),
                media: binding.media.0.clone(),
                progress_fill: None,
                resting_shadow: None,
            },
            timers: RefCell::new(TaskSlots::new()),
            frames: RefCell::new(TaskSlots::new()),
            listeners: RefCell::new(Vec::new()),
            viewport: RefCell::new(None),
        });
        let bind_fx = widget.ctl.borrow().bind_effects();
        widget.run(bind_fx);
        widget.listen(family, media_kind);
        widget.watch_viewport();
        Some(widget)
    }

    pub fn trigger(self: &Rc<Self>) {
        self.dispatch(RevealEvent::Trigger);
    }

    pub fn reset(self: &Rc<Self>) {
        self.dispatch(RevealEvent::Reset);
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// True for the widget's root or its host element.
    pub fn owns(&self, el: &Element) -> bool {
        &self.root == el || &self.parts.host == el
    }

    pub fn is_active(&self) -> bool {
        self.ctl.borrow().state().is_active()
    }

    fn dispatch(self: &Rc<Self>, event: RevealEvent) {
        let fx = self.ctl.borrow_mut().handle(event, dom::now_ms());
        self.run(fx);
    }

    fn run(self: &Rc<Self>, fx: Effects) {
        for effect in fx {
            let Some(scheduled) = self.parts.apply(effect) else {
                continue;
            };
            match scheduled {
                Effect::RequestPlay { session } => {
                    let weak = Rc::downgrade(self);
                    dom::play(&self.parts.media, move |outcome| {
                        let Some(w) = weak.upgrade() else { return };
                        match outcome {
                            Ok(()) => w.dispatch(RevealEvent::PlayResolved { session }),
                            Err(reason) => {
                                w.dispatch(RevealEvent::PlayRejected { session, reason })
                            }
                        }
                    });
                }
                Effect::ArmTimer { token, delay_ms } => {
                    let weak = Rc::downgrade(self);
                    let handle = Timeout::new(delay_ms, move || {
                        if let Some(w) = weak.upgrade() {
                            w.dispatch(RevealEvent::TimerFired(token));
                        }
                    });
                    self.timers.borrow_mut().arm(token.kind, handle);
                }
                Effect::CancelTimer { kind } => {
                    self.timers.borrow_mut().clear(kind);
                }
                Effect::RequestFrame { kind } => {
                    let weak = Rc::downgrade(self);
                    let handle = request_animation_frame(move |timestamp_ms| {
                        if let Some(w) = weak.upgrade() {
                            w.dispatch(RevealEvent::Frame { kind, timestamp_ms });
                        }
                    });
                    self.frames.borrow_mut().arm(kind, handle);
                }
                Effect::CancelFrame { kind } => {
                    self.frames.borrow_mut().clear(kind);
                }
                other => log::debug!("reveal widget ignores {other:?}"),
            }
        }
    }

    /// Forward a DOM event as a controller event; `map` sees the host element.
    fn on(
        self: &Rc<Self>,
        target: &Element,
        event_type: &'static str,
        map: fn(&Event, &Element) -> Option<RevealEvent>,
    ) {
        let weak: Weak<Self> = Rc::downgrade(self);
        let listener = EventListener::new(target, event_type, move |event| {
            let Some(w) = weak.upgrade() else { return };
            if let Some(ev) = map(event, &w.parts.host) {
                w.dispatch(ev);
            }
        });
        self.listeners.borrow_mut().push(listener);
    }

    fn listen(self: &Rc<Self>, family: RevealFamily, media: MediaKind) {
        let host = self.parts.host.clone();
        self.on(&host, "mouseenter", |_, _| Some(RevealEvent::PointerEnter));
        self.on(&host, "mouseleave", |_, _| Some(RevealEvent::PointerLeave));
        self.on(&host, "mousemove", |event, host| {
            let mouse = event.dyn_ref::<MouseEvent>()?;
            Some(RevealEvent::PointerMove {
                pointer: dom::pointer_of(mouse),
                rect: dom::rect_of(host),
            })
        });

        let weak = Rc::downgrade(self);
        // Containers are often wrapped in product links.
        let options = match family {
            RevealFamily::Container => EventListenerOptions::enable_prevent_default(),
            RevealFamily::Section => EventListenerOptions::default(),
        };
        let click = EventListener::new_with_options(&host, "click", options, move |event| {
            if family == RevealFamily::Container {
                event.prevent_default();
            }
            if let Some(w) = weak.upgrade() {
                w.dispatch(RevealEvent::Click);
            }
        });
        self.listeners.borrow_mut().push(click);

        if media == MediaKind::Video {
            let media = self.parts.media.clone();
            self.on(&media, "ended", |_, _| Some(RevealEvent::MediaEnded));
            self.on(&media, "loadeddata", |_, _| Some(RevealEvent::MediaLoaded));
            self.on(&media, "loadedmetadata", |event, _| {
                let media = event.target()?.dyn_into::<Element>().ok()?;
                Some(RevealEvent::MetadataLoaded {
                    duration: dom::media_duration(&media),
                })
            });
            self.on(&media, "timeupdate", |event, _| {
                let media = event.target()?.dyn_into::<Element>().ok()?;
                Some(RevealEvent::TimeUpdate {
                    current_time: dom::media_time(&media),
                })
            });
        }
    }

    fn watch_viewport(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let watch = ViewportWatch::new(std::slice::from_ref(&self.root), move |_, visible| {
            if let Some(w) = weak.upgrade() {
                w.dispatch(if visible {
                    RevealEvent::ViewportEnter
                } else {
                    RevealEvent::ViewportExit
                });
            }
        });
        *self.viewport.borrow_mut() = watch;
    }
}
