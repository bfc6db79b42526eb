//! Markup contract shared with the theme's templates and stylesheets.
//!
//! Selectors, attribute names, class names and defaults in this module are
//! consumed verbatim by the styling layer. Renaming any of them breaks
//! existing themes.

/// Default for every `*-duration` attribute, in whole seconds.
pub const DEFAULT_MAX_SECONDS: u32 = 5;

/// "image reveals to video" widgets. Two markup families exist: a
/// self-contained container and a section that wraps the interactive part.
pub mod reveal {
    pub const CONTAINER: &str = ".reveal-image-container";
    pub const CONTAINER_MEDIA: &str = ".reveal-video";
    pub const CONTAINER_IMAGE: &str = ".reveal-image";

    pub const SECTION: &str = ".reveal-image-section";
    pub const SECTION_WRAPPER: &str = ".reveal-image-wrapper";
    pub const SECTION_MEDIA: &str = ".reveal-video-element";

    /// `hover` (default) or `click`.
    pub const ATTR_TRIGGER: &str = "data-reveal-trigger";
    pub const ATTR_DURATION: &str = "data-video-duration";
}

pub mod banner {
    pub const SECTION: &str = ".video-banner-section";
    pub const WRAPPER: &str = ".video-banner-wrapper";
    pub const MEDIA: &str = ".video-banner-element";
    pub const CONTROLS: &str = ".video-banner-controls";

    pub const PLAY_PAUSE: &str = ".video-play-pause";
    pub const MUTE: &str = ".video-mute";
    pub const FULLSCREEN: &str = ".video-fullscreen";
    pub const PROGRESS_BAR: &str = ".video-progress-bar";
    pub const PROGRESS_FILL: &str = ".video-progress-fill";

    pub const ATTR_AUTOPLAY: &str = "data-autoplay";
    pub const ATTR_LOOP: &str = "data-loop";
    pub const ATTR_DURATION: &str = "data-duration";

    /// Replaces the wrapper's contents after a media load error.
    pub const ERROR_NOTICE_HTML: &str = "<div class=\"video-error-message\"><p>Unable to load video. Please check the video URL and try again.</p></div>";

    pub const HOVER_TRANSITION: &str = "transform 0.4s cubic-bezier(0.25, 0.46, 0.45, 0.94)";
}

/// State classes written onto widget elements.
pub mod class {
    pub const HOVERED: &str = "hovered";
    pub const VIDEO_ACTIVE: &str = "video-active";
    pub const LOADING: &str = "loading";
    pub const PLAYING: &str = "playing";
    pub const MUTED: &str = "muted";
    pub const REVEAL_ACTIVE: &str = "reveal-active";
    pub const AUTOPLAY_3D: &str = "autoplay-3d";

    pub const NO_JS: &str = "no-js";
    pub const JS: &str = "js";
    pub const LOADED: &str = "loaded";
    pub const ANIMATED: &str = "animated";
}

/// Page-wide hooks used by the bootstrap.
pub mod page {
    pub const ANIMATE_ON_SCROLL: &str = "[data-animate-on-scroll]";
    /// Set on every element a widget has been bound to.
    pub const BOUND_MARKER: &str = "data-fx-bound";
    /// Dispatched by the theme editor after a section is re-rendered.
    pub const SECTION_LOAD_EVENT: &str = "shopify:section:load";
    /// Dispatched by the theme editor before a section is removed.
    pub const SECTION_UNLOAD_EVENT: &str = "shopify:section:unload";
    /// Visible fraction at which a widget counts as in the viewport.
    pub const VIEWPORT_THRESHOLD: f64 = 0.1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_selectors_are_single_classes() {
        for sel in [
            reveal::CONTAINER,
            reveal::CONTAINER_MEDIA,
            reveal::CONTAINER_IMAGE,
            reveal::SECTION,
            reveal::SECTION_WRAPPER,
            reveal::SECTION_MEDIA,
            banner::SECTION,
            banner::WRAPPER,
            banner::MEDIA,
            banner::CONTROLS,
            banner::PLAY_PAUSE,
            banner::MUTE,
            banner::FULLSCREEN,
            banner::PROGRESS_BAR,
            banner::PROGRESS_FILL,
        ] {
            let name = sel.strip_prefix('.').unwrap_or_default();
            assert!(!name.is_empty(), "{sel}");
            assert!(!name.contains([' ', '.', '>']), "{sel}");
        }
    }
}
