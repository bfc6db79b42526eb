//! Widget configuration.
//!
//! Each widget's config comes from two places: the data attributes on its
//! markup (parsed defensively, never failing) and page-wide `FxSettings`
//! that a host may override as JSON.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};

use crate::error::{FxError, FxResult};
use crate::fx::{FloatParams, TiltParams};
use crate::markup::{self, class};
use crate::outputs::MediaSetup;
use crate::session::DurationPolicy;

/// Read-only access to string attributes of a markup element.
pub trait AttributeSource {
    fn attribute(&self, name: &str) -> Option<String>;
}

impl<S: BuildHasher> AttributeSource for HashMap<String, String, S> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl AttributeSource for BTreeMap<String, String> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Leading-integer parse: optional whitespace and sign, then digits.
/// `"7.9"` is 7, `"12px"` is 12, `"abc"` is None.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Whole seconds from an attribute; missing, unparsable, zero or negative
/// values fall back to `default`.
pub fn parse_seconds(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(parse_leading_int)
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}

/// Only the exact string `"true"` enables a flag.
pub fn parse_flag(raw: Option<&str>) -> bool {
    raw == Some("true")
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    #[default]
    Hover,
    /// Click toggles playback; a second click stops it early.
    Click,
}

impl TriggerMode {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("click") => TriggerMode::Click,
            _ => TriggerMode::Hover,
        }
    }
}

/// Which reveal markup the widget was bound from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealFamily {
    /// `.reveal-image-container` with `.reveal-video` and `.reveal-image`.
    #[default]
    Container,
    /// `.reveal-image-section` with `.reveal-image-wrapper` and `.reveal-video-element`.
    Section,
}

impl RevealFamily {
    /// Classes that mark the widget as active.
    pub fn active_classes(self) -> &'static [&'static str] {
        match self {
            RevealFamily::Container => &[class::VIDEO_ACTIVE],
            RevealFamily::Section => &[class::REVEAL_ACTIVE, class::AUTOPLAY_3D],
        }
    }

    /// Container markup ships a bare `<video>` that is prepared at bind time.
    pub fn configures_media(self) -> bool {
        matches!(self, RevealFamily::Container)
    }
}

/// Whether the reveal's media part is a real `<video>` or a demo placeholder.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Video,
    Placeholder,
}

/// Page-wide tuning applied to every widget bound by the bootstrap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxSettings {
    pub simulated_load_ms: u32,
    pub toggle_grace_ms: u32,
    pub reveal_tilt: TiltParams,
    pub reveal_float: FloatParams,
    pub banner_parallax: TiltParams,
    pub banner_float: FloatParams,
    pub log_level: log::LevelFilter,
}

impl Default for FxSettings {
    fn default() -> Self {
        Self {
            simulated_load_ms: 500,
            toggle_grace_ms: 500,
            reveal_tilt: TiltParams::reveal(),
            reveal_float: FloatParams::reveal(),
            banner_parallax: TiltParams::banner(),
            banner_float: FloatParams::banner(),
            log_level: log::LevelFilter::Info,
        }
    }
}

impl FxSettings {
    pub fn from_json_str(s: &str) -> FxResult<Self> {
        let settings: Self =
            serde_json::from_str(s).map_err(|e| FxError::ConfigJson(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> FxResult<()> {
        self.reveal_tilt.validate()?;
        self.reveal_float.validate()?;
        self.banner_parallax.validate()?;
        self.banner_float.validate()?;
        crate::error::check_range(
            "simulated_load_ms",
            f64::from(self.simulated_load_ms),
            0.0,
            10_000.0,
        )?;
        crate::error::check_range(
            "toggle_grace_ms",
            f64::from(self.toggle_grace_ms),
            0.0,
            10_000.0,
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub family: RevealFamily,
    pub trigger: TriggerMode,
    /// Also drives the auto-stop deadline (`max_seconds * 1000` ms).
    pub max_seconds: u32,
    pub simulated_load_ms: u32,
    /// Added to the auto-stop deadline in click-toggle mode.
    pub toggle_grace_ms: u32,
    pub tilt: TiltParams,
    pub float: FloatParams,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self::with_settings(RevealFamily::default(), &FxSettings::default())
    }
}

impl RevealConfig {
    pub fn with_settings(family: RevealFamily, settings: &FxSettings) -> Self {
        Self {
            family,
            trigger: TriggerMode::default(),
            max_seconds: markup::DEFAULT_MAX_SECONDS,
            simulated_load_ms: settings.simulated_load_ms,
            toggle_grace_ms: settings.toggle_grace_ms,
            tilt: settings.reveal_tilt,
            float: settings.reveal_float,
        }
    }

    /// `data-reveal-trigger` and `data-video-duration` on the widget root.
    pub fn from_attributes(
        family: RevealFamily,
        src: &dyn AttributeSource,
        settings: &FxSettings,
    ) -> Self {
        let trigger = src.attribute(markup::reveal::ATTR_TRIGGER);
        let duration = src.attribute(markup::reveal::ATTR_DURATION);
        Self {
            trigger: TriggerMode::parse(trigger.as_deref()),
            max_seconds: parse_seconds(duration.as_deref(), markup::DEFAULT_MAX_SECONDS),
            ..Self::with_settings(family, settings)
        }
    }

    pub fn auto_stop_ms(&self) -> u32 {
        self.max_seconds.saturating_mul(1000)
    }

    pub fn toggle_window_ms(&self) -> u32 {
        self.auto_stop_ms().saturating_add(self.toggle_grace_ms)
    }

    /// Reveal widgets never loop: reaching the limit pauses the media.
    pub fn duration_policy(&self) -> DurationPolicy {
        DurationPolicy::from_whole_seconds(self.max_seconds, false)
    }

    pub fn validate(&self) -> FxResult<()> {
        if self.max_seconds == 0 {
            return Err(FxError::InvalidDuration(0.0));
        }
        self.tilt.validate()?;
        self.float.validate()
    }

    pub fn from_json_str(s: &str) -> FxResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| FxError::ConfigJson(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerConfig {
    pub autoplay: bool,
    /// Rewind to 0 at the limit instead of pausing; also sets the media's loop flag.
    pub loop_on_limit: bool,
    pub max_seconds: u32,
    pub parallax: TiltParams,
    pub float: FloatParams,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self::with_settings(&FxSettings::default())
    }
}

impl BannerConfig {
    pub fn with_settings(settings: &FxSettings) -> Self {
        Self {
            autoplay: false,
            loop_on_limit: false,
            max_seconds: markup::DEFAULT_MAX_SECONDS,
            parallax: settings.banner_parallax,
            float: settings.banner_float,
        }
    }

    /// `data-autoplay`, `data-loop` and `data-duration` on the banner section.
    pub fn from_attributes(src: &dyn AttributeSource, settings: &FxSettings) -> Self {
        let autoplay = src.attribute(markup::banner::ATTR_AUTOPLAY);
        let looping = src.attribute(markup::banner::ATTR_LOOP);
        let duration = src.attribute(markup::banner::ATTR_DURATION);
        Self {
            autoplay: parse_flag(autoplay.as_deref()),
            loop_on_limit: parse_flag(looping.as_deref()),
            max_seconds: parse_seconds(duration.as_deref(), markup::DEFAULT_MAX_SECONDS),
            ..Self::with_settings(settings)
        }
    }

    pub fn duration_policy(&self) -> DurationPolicy {
        DurationPolicy::from_whole_seconds(self.max_seconds, self.loop_on_limit)
    }

    /// Media flags applied once at bind time. Autoplay needs a muted element
    /// under browser autoplay policies.
    pub fn media_setup(&self) -> MediaSetup {
        MediaSetup {
            autoplay: Some(self.autoplay),
            looping: Some(self.loop_on_limit),
            muted: self.autoplay.then_some(true),
            plays_inline: Some(true),
            preload_metadata: false,
        }
    }

    pub fn validate(&self) -> FxResult<()> {
        if self.max_seconds == 0 {
            return Err(FxError::InvalidDuration(0.0));
        }
        self.parallax.validate()?;
        self.float.validate()
    }

    pub fn from_json_str(s: &str) -> FxResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| FxError::ConfigJson(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
