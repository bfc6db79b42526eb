//! Cosmetic pointer and time driven effects.
//!
//! Everything here is a pure formula over pointer geometry or elapsed time.
//! `Surface` composes the tilt and float outputs into one transform so the
//! inline style is always recomputed from base state, never appended to.

pub mod distortion;
pub mod float;
pub mod shadow;
pub mod surface;
pub mod tilt;
pub mod transform;

use serde::{Deserialize, Serialize};

pub use distortion::Distortion;
pub use float::{FloatLoop, FloatParams, Wave, WaveShape};
pub use shadow::depth_shadow;
pub use surface::Surface;
pub use tilt::{offsets, Offsets, TiltParams};
pub use transform::{Transform3d, PERSPECTIVE_PX};

/// Pointer position in client (viewport) coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box in client coordinates, as reported by getBoundingClientRect.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Format a CSS number with at most three decimals and no negative zero.
pub(crate) fn fmt_num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 || !rounded.is_finite() {
        return "0".to_string();
    }
    format!("{rounded}")
}

#[inline]
pub(crate) fn is_negligible(v: f64) -> bool {
    (v * 1000.0).round() == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_num_trims_and_rounds() {
        assert_eq!(fmt_num(8.0), "8");
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_num(0.30000000000000004), "0.3");
        assert_eq!(fmt_num(-3.33333), "-3.333");
        assert_eq!(fmt_num(f64::NAN), "0");
    }

    #[test]
    fn empty_rect() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_empty());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
        assert_eq!(Rect::new(10.0, 20.0, 100.0, 50.0).center(), Point::new(60.0, 45.0));
    }
}
