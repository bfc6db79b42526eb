use serde::{Deserialize, Serialize};

use super::transform::{Transform3d, PERSPECTIVE_PX};
use super::{Point, Rect};
use crate::error::{check_range, FxResult};

/// Pointer offset from the center of the surface, each axis in [-1, 1].
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Offsets {
    pub dx: f64,
    pub dy: f64,
}

impl Offsets {
    pub const CENTER: Self = Self { dx: 0.0, dy: 0.0 };
}

/// Normalized pointer offsets relative to the rect's center. A degenerate
/// rect or non-finite pointer yields the center.
pub fn offsets(pointer: Point, rect: Rect) -> Offsets {
    if rect.is_empty() {
        return Offsets::CENTER;
    }
    let center = rect.center();
    let norm = |delta: f64, half: f64| {
        let v = delta / half;
        if v.is_finite() {
            v.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    };
    Offsets {
        dx: norm(pointer.x - center.x, rect.width / 2.0),
        dy: norm(pointer.y - center.y, rect.height / 2.0),
    }
}

/// Maximum rotation and optional depth push of the tilt.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TiltParams {
    pub max_deg: f64,
    /// translateZ push at a corner, scaled by the summed offsets.
    /// 0 disables the push (and the matching scale-up).
    #[serde(default)]
    pub depth_px: f64,
}

impl TiltParams {
    pub const fn reveal() -> Self {
        Self {
            max_deg: 10.0,
            depth_px: 0.0,
        }
    }

    pub const fn banner() -> Self {
        Self {
            max_deg: 8.0,
            depth_px: 10.0,
        }
    }

    pub fn transform(&self, o: Offsets) -> Transform3d {
        let translate_z = if self.depth_px > 0.0 {
            0.5 * (o.dx.abs() + o.dy.abs()) * self.depth_px
        } else {
            0.0
        };
        Transform3d {
            perspective_px: PERSPECTIVE_PX,
            rotate_x: -o.dy * self.max_deg,
            rotate_y: o.dx * self.max_deg,
            translate_z,
            scale: 1.0 + translate_z * 0.001,
            ..Transform3d::IDENTITY
        }
    }

    pub fn validate(&self) -> FxResult<()> {
        check_range("tilt.max_deg", self.max_deg, 0.0, 45.0)?;
        check_range("tilt.depth_px", self.depth_px, 0.0, 200.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: Rect = Rect::new(100.0, 100.0, 200.0, 100.0);

    #[test]
    fn center_and_corners() {
        assert_eq!(offsets(Point::new(200.0, 150.0), RECT), Offsets::CENTER);
        assert_eq!(
            offsets(Point::new(300.0, 200.0), RECT),
            Offsets { dx: 1.0, dy: 1.0 }
        );
        assert_eq!(
            offsets(Point::new(100.0, 100.0), RECT),
            Offsets { dx: -1.0, dy: -1.0 }
        );
    }

    #[test]
    fn outside_pointer_is_clamped() {
        let o = offsets(Point::new(10_000.0, -10_000.0), RECT);
        assert_eq!(o, Offsets { dx: 1.0, dy: -1.0 });
    }

    #[test]
    fn degenerate_rect_is_neutral() {
        let o = offsets(Point::new(5.0, 5.0), Rect::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(o, Offsets::CENTER);
        let t = TiltParams::reveal().transform(o);
        assert_eq!(t, Transform3d::NEUTRAL);
    }

    #[test]
    fn reveal_tilt_is_bounded() {
        let t = TiltParams::reveal().transform(Offsets { dx: 1.0, dy: -1.0 });
        assert_eq!(t.rotate_x, 10.0);
        assert_eq!(t.rotate_y, 10.0);
        assert_eq!(t.translate_z, 0.0);
        assert_eq!(t.scale, 1.0);
    }

    #[test]
    fn banner_tilt_pushes_forward() {
        let t = TiltParams::banner().transform(Offsets { dx: 0.5, dy: 0.5 });
        assert_eq!(t.rotate_x, -4.0);
        assert_eq!(t.rotate_y, 4.0);
        assert!((t.translate_z - 5.0).abs() < 1e-9);
        assert!((t.scale - 1.005).abs() < 1e-9);

        let corner = TiltParams::banner().transform(Offsets { dx: -1.0, dy: 1.0 });
        assert!((corner.translate_z - 10.0).abs() < 1e-9);
    }

    #[test]
    fn depth_push_is_symmetric_across_axes() {
        let p = TiltParams::banner();
        let horizontal = p.transform(Offsets { dx: 0.8, dy: 0.0 });
        let vertical = p.transform(Offsets { dx: 0.0, dy: -0.8 });
        assert!((horizontal.translate_z - vertical.translate_z).abs() < 1e-9);
        assert!((horizontal.translate_z - 4.0).abs() < 1e-9);
    }

    #[test]
    fn validation_rejects_wild_angles() {
        let p = TiltParams {
            max_deg: 90.0,
            depth_px: 0.0,
        };
        assert!(p.validate().is_err());
        assert!(TiltParams::banner().validate().is_ok());
    }
}
