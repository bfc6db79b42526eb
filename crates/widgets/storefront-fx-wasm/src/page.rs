//! Page bootstrap: document classes, scroll reveals, widget discovery,
//! re-binding after theme-editor section reloads and release on unload.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use log::{debug, info};
use storefront_fx_core::markup::{self, class, page};
use storefront_fx_core::{FxSettings, RevealFamily};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use crate::banner_widget::BannerWidget;
use crate::dom::{self, ViewportWatch};
use crate::reveal_widget::RevealWidget;

#[derive(Default)]
struct Registry {
    settings: FxSettings,
    started: bool,
    reveals: Vec<Rc<RevealWidget>>,
    banners: Vec<Rc<BannerWidget>>,
    scroll_watch: Option<ViewportWatch>,
    page_listeners: Vec<EventListener>,
}

thread_local! {
    static REGISTRY: RefCell<Registry> = RefCell::new(Registry::default());
}

fn document() -> Option<Document> {
    web_sys::window()?.document()
}

/// `scope` itself when it matches, then its matching descendants.
fn matching(scope: &Element, selector: &str) -> Vec<Element> {
    let mut found = Vec::new();
    if scope.matches(selector).unwrap_or(false) {
        found.push(scope.clone());
    }
    if let Ok(list) = scope.query_selector_all(selector) {
        for i in 0..list.length() {
            if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                found.push(el);
            }
        }
    }
    found
}

fn unbound(scope: &Element, selector: &str) -> Vec<Element> {
    matching(scope, selector)
        .into_iter()
        .filter(|el| !el.has_attribute(page::BOUND_MARKER))
        .collect()
}

fn mark_bound(el: &Element) {
    let _ = el.set_attribute(page::BOUND_MARKER, "");
}

/// Drop the registry's widgets whose root satisfies `gone`. Dropping a
/// widget removes its listeners and cancels its timers, frames and observer.
fn release_where(gone: impl Fn(&Element) -> bool) -> u32 {
    let (reveals, banners) = REGISTRY.with(|r| {
        let mut r = r.borrow_mut();
        let (dropped_reveals, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut r.reveals)
            .into_iter()
            .partition(|w| gone(w.root()));
        r.reveals = kept;
        let (dropped_banners, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut r.banners)
            .into_iter()
            .partition(|w| gone(w.root()));
        r.banners = kept;
        (dropped_reveals, dropped_banners)
    });
    for root in reveals
        .iter()
        .map(|w| w.root())
        .chain(banners.iter().map(|w| w.root()))
    {
        let _ = root.remove_attribute(page::BOUND_MARKER);
    }
    let count = reveals.len() + banners.len();
    if count > 0 {
        debug!("released {count} widgets");
    }
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Release every widget rooted at or inside `scope`.
pub fn release_within(scope: &Element) -> u32 {
    release_where(|root| scope.contains(Some(root.as_ref())))
}

/// Bind every not-yet-bound widget under `scope`. Returns how many bound.
/// Widgets whose markup has left the document are released first.
pub fn bind_within(scope: &Element) -> u32 {
    release_where(|root| !root.is_connected());
    let settings = REGISTRY.with(|r| r.borrow().settings.clone());
    let mut reveals = Vec::new();
    let mut banners = Vec::new();

    for (selector, family) in [
        (markup::reveal::CONTAINER, RevealFamily::Container),
        (markup::reveal::SECTION, RevealFamily::Section),
    ] {
        for root in unbound(scope, selector) {
            if let Some(widget) = RevealWidget::bind(&root, family, &settings) {
                mark_bound(&root);
                reveals.push(widget);
            }
        }
    }
    for section in unbound(scope, markup::banner::SECTION) {
        if let Some(widget) = BannerWidget::bind(&section, &settings) {
            mark_bound(&section);
            banners.push(widget);
        }
    }

    let count = reveals.len() + banners.len();
    if count > 0 {
        debug!("bound {} reveal and {} banner widgets", reveals.len(), banners.len());
    }
    REGISTRY.with(|r| {
        let mut r = r.borrow_mut();
        r.reveals.extend(reveals);
        r.banners.extend(banners);
    });
    u32::try_from(count).unwrap_or(u32::MAX)
}

pub fn find_reveal(el: &Element) -> Option<Rc<RevealWidget>> {
    REGISTRY.with(|r| r.borrow().reveals.iter().find(|w| w.owns(el)).cloned())
}

pub fn find_banner(el: &Element) -> Option<Rc<BannerWidget>> {
    REGISTRY.with(|r| r.borrow().banners.iter().find(|w| w.owns(el)).cloned())
}

pub fn bound_count() -> u32 {
    REGISTRY.with(|r| {
        let r = r.borrow();
        u32::try_from(r.reveals.len() + r.banners.len()).unwrap_or(u32::MAX)
    })
}

/// First call wins; returns false when the page was already started.
pub fn start(settings: FxSettings) -> bool {
    let fresh = REGISTRY.with(|r| {
        let mut r = r.borrow_mut();
        if r.started {
            return false;
        }
        r.started = true;
        r.settings = settings;
        true
    });
    if !fresh {
        return false;
    }
    let Some(doc) = document() else {
        return true;
    };
    if doc.ready_state() == "loading" {
        let listener = EventListener::once(&doc, "DOMContentLoaded", |_| on_ready());
        REGISTRY.with(|r| r.borrow_mut().page_listeners.push(listener));
    } else {
        on_ready();
    }
    true
}

fn on_ready() {
    let Some(doc) = document() else { return };
    let Some(root) = doc.document_element() else {
        return;
    };
    dom::set_class(&root, class::NO_JS, false);
    dom::set_class(&root, class::JS, true);
    dom::set_style(&root, "scroll-behavior", "smooth");
    info!("Storefront FX loaded");

    let mut listeners = Vec::new();
    if doc.ready_state() == "complete" {
        mark_loaded(&doc);
    } else if let Some(window) = web_sys::window() {
        listeners.push(EventListener::once(&window, "load", |_| {
            if let Some(doc) = document() {
                mark_loaded(&doc);
            }
        }));
    }

    listeners.push(EventListener::new(&doc, page::SECTION_LOAD_EVENT, |event| {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let count = bind_within(&target);
        debug!("section reload bound {count} widgets");
    }));

    listeners.push(EventListener::new(&doc, page::SECTION_UNLOAD_EVENT, |event| {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        release_within(&target);
    }));

    let scroll_targets = matching(&root, page::ANIMATE_ON_SCROLL);
    let scroll_watch = ViewportWatch::new(&scroll_targets, |el, visible| {
        if visible {
            dom::set_class(&el, class::ANIMATED, true);
        }
    });

    REGISTRY.with(|r| {
        let mut r = r.borrow_mut();
        r.page_listeners.extend(listeners);
        r.scroll_watch = scroll_watch;
    });
    bind_within(&root);
}

fn mark_loaded(doc: &Document) {
    if let Some(body) = doc.body() {
        dom::set_class(&body, class::LOADED, true);
    }
}
