//! One bound video banner.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::render::{request_animation_frame, AnimationFrame};
use storefront_fx_core::{
    BannerBinding, BannerController, BannerEvent, Effect, Effects, FrameLoop, FxSettings,
    TaskSlots,
};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlMediaElement, MouseEvent};

use crate::dom::{self, Dom, Parts};

pub struct BannerWidget {
    section: Element,
    ctl: RefCell<BannerController>,
    parts: Parts,
    frames: RefCell<TaskSlots<FrameLoop, AnimationFrame>>,
    listeners: RefCell<Vec<EventListener>>,
}

type EventMap = fn(&Event, &Parts) -> Option<BannerEvent>;

fn media_of(parts: &Parts) -> Option<&HtmlMediaElement> {
    parts.media.dyn_ref::<HtmlMediaElement>()
}

impl BannerWidget {
    pub fn bind(section: &Element, settings: &FxSettings) -> Option<Rc<Self>> {
        let binding = BannerBinding::resolve(&Dom(section.clone()))?;
        let ctl = BannerController::new(binding.config(settings), binding.control_set());
        let wrapper = binding.wrapper.0.clone();
        let widget = Rc::new(Self {
            section: section.clone(),
            ctl: RefCell::new(ctl),
            parts: Parts {
                resting_shadow: dom::computed_shadow(&wrapper),
                host: wrapper,
                media: binding.media.0.clone(),
                progress_fill: binding.progress.as_ref().map(|(_, fill)| fill.0.clone()),
            },
            frames: RefCell::new(TaskSlots::new()),
            listeners: RefCell::new(Vec::new()),
        });
        let bind_fx = widget.ctl.borrow().bind_effects();
        widget.run(bind_fx);
        widget.listen(&binding);
        Some(widget)
    }

    pub fn root(&self) -> &Element {
        &self.section
    }

    pub fn owns(&self, el: &Element) -> bool {
        &self.section == el || &self.parts.host == el
    }

    pub fn is_errored(&self) -> bool {
        self.ctl.borrow().state().is_errored()
    }

    fn dispatch(self: &Rc<Self>, event: BannerEvent) {
        let fx = self.ctl.borrow_mut().handle(event, dom::now_ms());
        self.run(fx);
    }

    fn run(self: &Rc<Self>, fx: Effects) {
        for effect in fx {
            let Some(scheduled) = self.parts.apply(effect) else {
                continue;
            };
            match scheduled {
                Effect::RequestPlay { .. } => {
                    let weak = Rc::downgrade(self);
                    dom::play(&self.parts.media, move |outcome| {
                        if let (Err(reason), Some(w)) = (outcome, weak.upgrade()) {
                            w.dispatch(BannerEvent::PlayRejected { reason });
                        }
                    });
                }
                Effect::RequestFrame { kind } => {
                    let weak = Rc::downgrade(self);
                    let handle = request_animation_frame(move |timestamp_ms| {
                        if let Some(w) = weak.upgrade() {
                            w.dispatch(BannerEvent::Frame { kind, timestamp_ms });
                        }
                    });
                    self.frames.borrow_mut().arm(kind, handle);
                }
                Effect::CancelFrame { kind } => {
                    self.frames.borrow_mut().clear(kind);
                }
                Effect::ShowError => {
                    // The notice replaced the wrapper's contents; nothing left to drive.
                    self.frames.borrow_mut().clear_all();
                }
                other => log::debug!("banner widget ignores {other:?}"),
            }
        }
    }

    fn on(self: &Rc<Self>, target: &Element, event_type: &'static str, map: EventMap) {
        self.on_with(target, event_type, EventListenerOptions::default(), map);
    }

    fn on_with(
        self: &Rc<Self>,
        target: &Element,
        event_type: &'static str,
        options: EventListenerOptions,
        map: EventMap,
    ) {
        let weak = Rc::downgrade(self);
        let listener = EventListener::new_with_options(target, event_type, options, move |event| {
            let Some(w) = weak.upgrade() else { return };
            if let Some(ev) = map(event, &w.parts) {
                w.dispatch(ev);
            }
        });
        self.listeners.borrow_mut().push(listener);
    }

    fn listen(self: &Rc<Self>, binding: &BannerBinding<Dom>) {
        let wrapper = self.parts.host.clone();
        self.on(&wrapper, "mouseenter", |_, _| Some(BannerEvent::PointerEnter));
        self.on(&wrapper, "mouseleave", |_, _| Some(BannerEvent::PointerLeave));
        self.on(&wrapper, "mousemove", |event, parts| {
            let mouse = event.dyn_ref::<MouseEvent>()?;
            Some(BannerEvent::PointerMove {
                pointer: dom::pointer_of(mouse),
                rect: dom::rect_of(&parts.host),
            })
        });

        let media = self.parts.media.clone();
        self.on(&media, "play", |_, _| Some(BannerEvent::MediaPlay));
        self.on(&media, "pause", |_, _| Some(BannerEvent::MediaPause));
        self.on(&media, "timeupdate", |_, parts| {
            let m = media_of(parts)?;
            Some(BannerEvent::TimeUpdate {
                current_time: m.current_time(),
                duration: m.duration(),
            })
        });
        self.on(&media, "loadedmetadata", |_, parts| {
            Some(BannerEvent::MetadataLoaded {
                duration: media_of(parts)?.duration(),
            })
        });
        self.on(&media, "loadeddata", |_, parts| {
            Some(BannerEvent::DataLoaded {
                duration: media_of(parts)?.duration(),
            })
        });
        // Capture so the last failing <source> child is seen too.
        self.on_with(
            &media,
            "error",
            EventListenerOptions::run_in_capture_phase(),
            |event, parts| {
                let target = event.target()?.dyn_into::<Element>().ok()?;
                if !dom::is_terminal_media_error(&parts.media, &target) {
                    log::debug!("media source candidate failed, trying the next one");
                    return None;
                }
                let src = media_of(parts)
                    .map(HtmlMediaElement::current_src)
                    .filter(|s| !s.is_empty());
                Some(BannerEvent::LoadError { source: src })
            },
        );

        if let Some(button) = &binding.play_pause {
            self.on(&button.0, "click", |_, parts| {
                Some(BannerEvent::PlayPauseClicked {
                    paused: media_of(parts)?.paused(),
                })
            });
        }
        if let Some(button) = &binding.mute {
            self.on(&button.0, "click", |_, parts| {
                Some(BannerEvent::MuteClicked {
                    muted: media_of(parts)?.muted(),
                })
            });
        }
        if let Some(button) = &binding.fullscreen {
            self.on(&button.0, "click", |_, _| Some(BannerEvent::FullscreenClicked));
        }
        if let Some((bar, _)) = &binding.progress {
            self.on(&bar.0, "click", |event, parts| {
                let mouse = event.dyn_ref::<MouseEvent>()?;
                let bar = event.current_target()?.dyn_into::<Element>().ok()?;
                let rect = dom::rect_of(&bar);
                Some(BannerEvent::ProgressClicked {
                    ratio: (f64::from(mouse.client_x()) - rect.left) / rect.width,
                    duration: media_of(parts)?.duration(),
                })
            });
        }
    }
}
