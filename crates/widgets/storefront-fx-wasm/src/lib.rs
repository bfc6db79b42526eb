//! wasm-bindgen entry points for the storefront widgets.
//!
//! `init(options)` starts the page bootstrap once; the remaining exports let
//! a theme drive widgets directly or bind markup inserted later.

mod banner_widget;
mod dom;
mod logger;
mod page;
mod reveal_widget;

use serde_wasm_bindgen as swb;
use storefront_fx_core::FxSettings;
use wasm_bindgen::prelude::*;
use web_sys::Element;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Parse optional page-wide settings. `undefined`/`null` gives the defaults.
/// Example:
///   init({ simulated_load_ms: 300, log_level: "debug" })
fn parse_settings(options: JsValue) -> Result<FxSettings, JsError> {
    if jsvalue_is_undefined_or_null(&options) {
        return Ok(FxSettings::default());
    }
    let settings: FxSettings =
        swb::from_value(options).map_err(|e| JsError::new(&format!("init options error: {e}")))?;
    settings
        .validate()
        .map_err(|e| JsError::new(&format!("init options invalid: {e}")))?;
    Ok(settings)
}

/// Start the page bootstrap. Later calls are ignored (returns false).
#[wasm_bindgen]
pub fn init(options: JsValue) -> Result<bool, JsError> {
    console_error_panic_hook::set_once();
    let settings = parse_settings(options)?;
    logger::install(settings.log_level);
    Ok(page::start(settings))
}

/// Bind any widgets under `scope` that are not bound yet. Returns the count.
#[wasm_bindgen]
pub fn bind_within(scope: &Element) -> u32 {
    page::bind_within(scope)
}

/// Unbind every widget rooted at or inside `scope`, cancelling its timers
/// and listeners. Returns the count released.
#[wasm_bindgen]
pub fn release_within(scope: &Element) -> u32 {
    page::release_within(scope)
}

/// Start playback on the reveal bound at `el` (its root or host element).
#[wasm_bindgen]
pub fn trigger_reveal(el: &Element) -> bool {
    match page::find_reveal(el) {
        Some(widget) => {
            widget.trigger();
            true
        }
        None => false,
    }
}

/// Stop the reveal bound at `el` and return it to its resting state.
#[wasm_bindgen]
pub fn reset_reveal(el: &Element) -> bool {
    match page::find_reveal(el) {
        Some(widget) => {
            widget.reset();
            true
        }
        None => false,
    }
}

#[wasm_bindgen]
pub fn is_reveal_active(el: &Element) -> bool {
    page::find_reveal(el).is_some_and(|w| w.is_active())
}

/// True once the banner at `el` hit a media load error.
#[wasm_bindgen]
pub fn is_banner_errored(el: &Element) -> bool {
    page::find_banner(el).is_some_and(|w| w.is_errored())
}

#[wasm_bindgen]
pub fn bound_widget_count() -> u32 {
    page::bound_count()
}

#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
