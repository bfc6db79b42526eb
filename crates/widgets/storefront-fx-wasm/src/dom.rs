//! `web_sys` side of the effect contract: element lookup for bindings and
//! applying DOM-only effects to a widget's parts.

use js_sys::{Array, Function, Reflect};
use storefront_fx_core::markup::{self, banner};
use storefront_fx_core::{
    AttributeSource, Effect, ElementQuery, MediaSetup, Point, Rect, StyleProp, Target,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Element, HtmlElement, HtmlMediaElement, HtmlVideoElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, MouseEvent,
};

/// Element handle the core binding resolves against.
#[derive(Clone, Debug, PartialEq)]
pub struct Dom(pub Element);

impl AttributeSource for Dom {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }
}

impl ElementQuery for Dom {
    fn query(&self, selector: &str) -> Option<Self> {
        self.0.query_selector(selector).ok().flatten().map(Dom)
    }

    fn is_video(&self) -> bool {
        self.0.dyn_ref::<HtmlVideoElement>().is_some()
    }
}

pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

pub fn pointer_of(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

pub fn rect_of(el: &Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.width(), r.height())
}

pub fn set_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

pub fn set_style(el: &Element, prop: &str, value: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property(prop, value);
    }
}

pub fn clear_style(el: &Element, prop: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().remove_property(prop);
    }
}

/// The element's computed box-shadow, captured before any effect writes one.
pub fn computed_shadow(el: &Element) -> Option<String> {
    let window = web_sys::window()?;
    let style = window.get_computed_style(el).ok().flatten()?;
    style.get_property_value(StyleProp::BoxShadow.css_name()).ok()
}

pub fn media_duration(el: &Element) -> f64 {
    el.dyn_ref::<HtmlMediaElement>()
        .map_or(f64::NAN, HtmlMediaElement::duration)
}

pub fn media_time(el: &Element) -> f64 {
    el.dyn_ref::<HtmlMediaElement>()
        .map_or(0.0, HtmlMediaElement::current_time)
}

fn configure_media(media: &HtmlMediaElement, setup: &MediaSetup) {
    if let Some(autoplay) = setup.autoplay {
        media.set_autoplay(autoplay);
    }
    if let Some(looping) = setup.looping {
        media.set_loop(looping);
    }
    if let Some(muted) = setup.muted {
        media.set_muted(muted);
    }
    if setup.preload_metadata {
        media.set_preload("metadata");
    }
    if setup.plays_inline == Some(true) {
        // `playsInline` is not exposed on every web-sys version; set both forms.
        let _ = media.set_attribute("playsinline", "");
        let _ = Reflect::set(media, &JsValue::from_str("playsInline"), &JsValue::TRUE);
    }
}

/// First of the standard or vendor-prefixed fullscreen methods the element has.
fn request_fullscreen(el: &Element) {
    for name in [
        "requestFullscreen",
        "webkitRequestFullscreen",
        "msRequestFullscreen",
    ] {
        let method = Reflect::get(el, &JsValue::from_str(name))
            .ok()
            .and_then(|v| v.dyn_into::<Function>().ok());
        if let Some(method) = method {
            if let Err(err) = method.call0(el) {
                log::warn!("fullscreen request failed: {}", describe(&err));
            }
            return;
        }
    }
}

/// Whether an `error` seen on `media` means the media cannot load at all.
///
/// `<source>` children fire `error` one by one while the browser walks the
/// candidates; only the last candidate failing is final.
pub fn is_terminal_media_error(media: &Element, target: &Element) -> bool {
    if target == media {
        return true;
    }
    let is_candidate = target.tag_name().eq_ignore_ascii_case("source")
        && target.parent_element().as_ref() == Some(media);
    if is_candidate {
        let mut next = target.next_element_sibling();
        while let Some(sibling) = next {
            if sibling.tag_name().eq_ignore_ascii_case("source") {
                return false;
            }
            next = sibling.next_element_sibling();
        }
        return true;
    }
    media
        .dyn_ref::<HtmlMediaElement>()
        .is_some_and(|m| m.network_state() == HtmlMediaElement::NETWORK_NO_SOURCE)
}

/// Short human-readable form of a JS error value.
pub fn describe(err: &JsValue) -> String {
    if let Some(s) = err.as_string() {
        return s;
    }
    let message = Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string());
    let name = Reflect::get(err, &JsValue::from_str("name"))
        .ok()
        .and_then(|m| m.as_string());
    match (name, message) {
        (Some(n), Some(m)) => format!("{n}: {m}"),
        (None, Some(m)) => m,
        (Some(n), None) => n,
        (None, None) => format!("{err:?}"),
    }
}

/// Call `play()` and report the promise's outcome on a later task.
pub fn play(media: &Element, done: impl FnOnce(Result<(), String>) + 'static) {
    let started = match media.dyn_ref::<HtmlMediaElement>() {
        Some(m) => m.play().map_err(|e| describe(&e)),
        None => Err("not a media element".to_string()),
    };
    spawn_local(async move {
        let outcome = match started {
            Ok(promise) => JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|e| describe(&e)),
            Err(e) => Err(e),
        };
        done(outcome);
    });
}

/// Elements an effect can target, plus bind-time captures.
#[derive(Debug)]
pub struct Parts {
    pub host: Element,
    pub media: Element,
    pub progress_fill: Option<Element>,
    pub resting_shadow: Option<String>,
}

impl Parts {
    fn target(&self, target: Target) -> Option<&Element> {
        match target {
            Target::Host => Some(&self.host),
            Target::Media => Some(&self.media),
            Target::ProgressFill => self.progress_fill.as_ref(),
        }
    }

    fn media_element(&self) -> Option<&HtmlMediaElement> {
        self.media.dyn_ref::<HtmlMediaElement>()
    }

    /// Apply an effect that only touches the DOM. Scheduling effects
    /// (timers, frames, play requests) are handed back to the widget.
    pub fn apply(&self, effect: Effect) -> Option<Effect> {
        match effect {
            Effect::SetClass { target, class, on } => {
                if let Some(el) = self.target(target) {
                    set_class(el, class, on);
                }
            }
            Effect::SetStyle {
                target,
                prop,
                value,
            } => {
                if let Some(el) = self.target(target) {
                    set_style(el, prop.css_name(), &value);
                }
            }
            Effect::ClearStyle { target, prop } => {
                if let Some(el) = self.target(target) {
                    clear_style(el, prop.css_name());
                }
            }
            Effect::RestoreShadow => {
                let css = StyleProp::BoxShadow.css_name();
                match &self.resting_shadow {
                    Some(shadow) => set_style(&self.host, css, shadow),
                    None => clear_style(&self.host, css),
                }
            }
            Effect::ConfigureMedia(setup) => {
                if let Some(media) = self.media_element() {
                    configure_media(media, &setup);
                }
            }
            Effect::PauseMedia => {
                if let Some(media) = self.media_element() {
                    let _ = media.pause();
                }
            }
            Effect::RewindMedia => {
                if let Some(media) = self.media_element() {
                    media.set_current_time(0.0);
                }
            }
            Effect::Seek { time } => {
                if let Some(media) = self.media_element() {
                    media.set_current_time(time);
                }
            }
            Effect::SetMuted(muted) => {
                if let Some(media) = self.media_element() {
                    media.set_muted(muted);
                }
            }
            Effect::Preload => {
                if let Some(media) = self.media_element() {
                    media.load();
                }
            }
            Effect::RequestFullscreen => request_fullscreen(&self.media),
            Effect::ShowError => self.host.set_inner_html(banner::ERROR_NOTICE_HTML),
            scheduled => return Some(scheduled),
        }
        None
    }
}

/// Intersection observer watching one element; disconnected on drop.
pub struct ViewportWatch {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array)>,
}

impl ViewportWatch {
    /// `on_change` gets the target and whether it is at least
    /// `VIEWPORT_THRESHOLD` visible.
    pub fn new(
        targets: &[Element],
        mut on_change: impl FnMut(Element, bool) + 'static,
    ) -> Option<Self> {
        let callback = Closure::<dyn FnMut(Array)>::new(move |entries: Array| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                on_change(entry.target(), entry.is_intersecting());
            }
        });
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(markup::page::VIEWPORT_THRESHOLD));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .ok()?;
        for target in targets {
            observer.observe(target);
        }
        Some(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for ViewportWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
