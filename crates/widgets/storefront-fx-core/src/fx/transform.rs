use serde::{Deserialize, Serialize};

use super::{fmt_num, is_negligible};

pub const PERSPECTIVE_PX: f64 = 1000.0;

/// A 3D CSS transform in decomposed form. Composition is additive on
/// translations and rotations and multiplicative on scale, which is good
/// enough for the small angles these effects produce.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform3d {
    /// 0 means no perspective term.
    pub perspective_px: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub translate_z: f64,
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub rotate_z: f64,
    pub scale: f64,
}

impl Transform3d {
    pub const IDENTITY: Self = Self {
        perspective_px: 0.0,
        translate_x: 0.0,
        translate_y: 0.0,
        translate_z: 0.0,
        rotate_x: 0.0,
        rotate_y: 0.0,
        rotate_z: 0.0,
        scale: 1.0,
    };

    /// Resting pose of a tilted surface.
    pub const NEUTRAL: Self = Self {
        perspective_px: PERSPECTIVE_PX,
        ..Self::IDENTITY
    };

    pub fn then(self, other: Transform3d) -> Self {
        Self {
            perspective_px: self.perspective_px.max(other.perspective_px),
            translate_x: self.translate_x + other.translate_x,
            translate_y: self.translate_y + other.translate_y,
            translate_z: self.translate_z + other.translate_z,
            rotate_x: self.rotate_x + other.rotate_x,
            rotate_y: self.rotate_y + other.rotate_y,
            rotate_z: self.rotate_z + other.rotate_z,
            scale: self.scale * other.scale,
        }
    }

    pub fn to_css(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(6);
        if self.perspective_px > 0.0 {
            parts.push(format!("perspective({}px)", fmt_num(self.perspective_px)));
        }
        parts.push(format!("rotateX({}deg)", fmt_num(self.rotate_x)));
        parts.push(format!("rotateY({}deg)", fmt_num(self.rotate_y)));
        if !(is_negligible(self.translate_x)
            && is_negligible(self.translate_y)
            && is_negligible(self.translate_z))
        {
            parts.push(format!(
                "translate3d({}px, {}px, {}px)",
                fmt_num(self.translate_x),
                fmt_num(self.translate_y),
                fmt_num(self.translate_z)
            ));
        }
        if !is_negligible(self.rotate_z) {
            parts.push(format!("rotateZ({}deg)", fmt_num(self.rotate_z)));
        }
        if !is_negligible(self.scale - 1.0) {
            parts.push(format!("scale({})", fmt_num(self.scale)));
        }
        parts.join(" ")
    }
}

impl Default for Transform3d {
    fn default() -> Self {
        Self::IDENTITY
    }
}
