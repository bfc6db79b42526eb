//! Locating a widget's parts inside its markup.
//!
//! Adapters implement `ElementQuery` over their element type. Resolution is
//! all-or-nothing for required parts: a container missing one yields `None`
//! and the adapter binds nothing for it.

use crate::banner::ControlSet;
use crate::config::{AttributeSource, BannerConfig, FxSettings, MediaKind, RevealConfig, RevealFamily};
use crate::markup;

pub trait ElementQuery: AttributeSource + Clone {
    /// First descendant matching a simple selector.
    fn query(&self, selector: &str) -> Option<Self>;
    fn is_video(&self) -> bool;
}

#[derive(Clone, Debug)]
pub struct RevealBinding<N> {
    pub family: RevealFamily,
    /// Container or section element; carries the configuration attributes.
    pub root: N,
    /// Receives pointer events and state classes.
    pub host: N,
    pub media: N,
    pub image: Option<N>,
}

impl<N: ElementQuery> RevealBinding<N> {
    pub fn resolve(root: &N, family: RevealFamily) -> Option<Self> {
        match family {
            RevealFamily::Container => {
                let media = root.query(markup::reveal::CONTAINER_MEDIA)?;
                let image = root.query(markup::reveal::CONTAINER_IMAGE)?;
                Some(Self {
                    family,
                    root: root.clone(),
                    host: root.clone(),
                    media,
                    image: Some(image),
                })
            }
            RevealFamily::Section => {
                let host = root.query(markup::reveal::SECTION_WRAPPER)?;
                let media = root.query(markup::reveal::SECTION_MEDIA)?;
                Some(Self {
                    family,
                    root: root.clone(),
                    host,
                    media,
                    image: None,
                })
            }
        }
    }

    pub fn media_kind(&self) -> MediaKind {
        if self.media.is_video() {
            MediaKind::Video
        } else {
            MediaKind::Placeholder
        }
    }

    pub fn config(&self, settings: &FxSettings) -> RevealConfig {
        RevealConfig::from_attributes(self.family, &self.root, settings)
    }
}

#[derive(Clone, Debug)]
pub struct BannerBinding<N> {
    pub root: N,
    pub wrapper: N,
    pub media: N,
    pub controls: Option<N>,
    pub play_pause: Option<N>,
    pub mute: Option<N>,
    pub fullscreen: Option<N>,
    /// Bar and fill resolve together; one without the other disables the control.
    pub progress: Option<(N, N)>,
}

impl<N: ElementQuery> BannerBinding<N> {
    pub fn resolve(root: &N) -> Option<Self> {
        let wrapper = root.query(markup::banner::WRAPPER)?;
        let media = root.query(markup::banner::MEDIA)?;
        let controls = root.query(markup::banner::CONTROLS);
        let find = |selector: &str| controls.as_ref().and_then(|c| c.query(selector));
        let progress = find(markup::banner::PROGRESS_BAR).zip(find(markup::banner::PROGRESS_FILL));
        Some(Self {
            root: root.clone(),
            play_pause: find(markup::banner::PLAY_PAUSE),
            mute: find(markup::banner::MUTE),
            fullscreen: find(markup::banner::FULLSCREEN),
            progress,
            wrapper,
            media,
            controls,
        })
    }

    pub fn control_set(&self) -> ControlSet {
        ControlSet {
            play_pause: self.play_pause.is_some(),
            mute: self.mute.is_some(),
            fullscreen: self.fullscreen.is_some(),
            progress: self.progress.is_some(),
        }
    }

    pub fn config(&self, settings: &FxSettings) -> BannerConfig {
        BannerConfig::from_attributes(&self.root, settings)
    }
}
