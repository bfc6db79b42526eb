use serde::{Deserialize, Serialize};

use super::transform::Transform3d;
use crate::error::{check_range, FxResult};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveShape {
    #[default]
    Sin,
    Cos,
}

/// `amplitude * shape(elapsed_ms * rate)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    pub amplitude: f64,
    pub rate: f64,
    #[serde(default)]
    pub shape: WaveShape,
}

impl Wave {
    pub const FLAT: Self = Self {
        amplitude: 0.0,
        rate: 0.0,
        shape: WaveShape::Sin,
    };

    pub const fn sin(amplitude: f64, rate: f64) -> Self {
        Self {
            amplitude,
            rate,
            shape: WaveShape::Sin,
        }
    }

    pub const fn cos(amplitude: f64, rate: f64) -> Self {
        Self {
            amplitude,
            rate,
            shape: WaveShape::Cos,
        }
    }

    #[inline]
    pub fn at(&self, elapsed_ms: f64) -> f64 {
        if self.amplitude == 0.0 {
            return 0.0;
        }
        let phase = elapsed_ms * self.rate;
        let unit = match self.shape {
            WaveShape::Sin => phase.sin(),
            WaveShape::Cos => phase.cos(),
        };
        self.amplitude * unit
    }
}

/// Idle oscillation applied on top of the tilt while a widget is active.
/// Translations are in px, rotations in degrees, `scale` is added to 1.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatParams {
    pub x: Wave,
    pub y: Wave,
    pub rotate_x: Wave,
    pub rotate_y: Wave,
    pub rotate_z: Wave,
    pub scale: Wave,
}

impl FloatParams {
    pub const fn reveal() -> Self {
        Self {
            x: Wave::sin(2.0, 0.001),
            y: Wave::cos(1.5, 0.0015),
            rotate_x: Wave::FLAT,
            rotate_y: Wave::FLAT,
            rotate_z: Wave::sin(1.0, 0.0008),
            scale: Wave::FLAT,
        }
    }

    pub const fn banner() -> Self {
        Self {
            x: Wave::FLAT,
            y: Wave::sin(3.0, 0.0005),
            rotate_x: Wave::sin(0.5, 0.0003),
            rotate_y: Wave::cos(0.8, 0.0004),
            rotate_z: Wave::FLAT,
            scale: Wave::sin(0.01, 0.0002),
        }
    }

    pub fn sample(&self, elapsed_ms: f64) -> Transform3d {
        Transform3d {
            perspective_px: 0.0,
            translate_x: self.x.at(elapsed_ms),
            translate_y: self.y.at(elapsed_ms),
            translate_z: 0.0,
            rotate_x: self.rotate_x.at(elapsed_ms),
            rotate_y: self.rotate_y.at(elapsed_ms),
            rotate_z: self.rotate_z.at(elapsed_ms),
            scale: 1.0 + self.scale.at(elapsed_ms),
        }
    }

    pub fn validate(&self) -> FxResult<()> {
        for (name, wave) in [
            ("float.x", self.x),
            ("float.y", self.y),
            ("float.rotate_x", self.rotate_x),
            ("float.rotate_y", self.rotate_y),
            ("float.rotate_z", self.rotate_z),
        ] {
            check_range(name, wave.amplitude, -50.0, 50.0)?;
        }
        check_range("float.scale", self.scale.amplitude, -0.5, 0.5)
    }
}

/// Clock of one animation-frame loop. The origin is taken from the first
/// frame after `start`, so elapsed time always begins at 0.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FloatLoop {
    origin_ms: Option<f64>,
    running: bool,
}

impl FloatLoop {
    /// Restart the clock. Returns true when the loop was not running and a
    /// frame must be requested; a running loop keeps its single frame chain.
    pub fn start(&mut self) -> bool {
        self.origin_ms = None;
        !std::mem::replace(&mut self.running, true)
    }

    /// Returns true when a running loop was stopped.
    pub fn stop(&mut self) -> bool {
        self.origin_ms = None;
        std::mem::replace(&mut self.running, false)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Elapsed ms since the loop's first frame, or None once stopped.
    pub fn tick(&mut self, timestamp_ms: f64) -> Option<f64> {
        if !self.running {
            return None;
        }
        let origin = *self.origin_ms.get_or_insert(timestamp_ms);
        Some((timestamp_ms - origin).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_float_at_origin() {
        let t = FloatParams::reveal().sample(0.0);
        assert_eq!(t.translate_x, 0.0);
        assert_eq!(t.translate_y, 1.5);
        assert_eq!(t.rotate_z, 0.0);
        assert_eq!(t.scale, 1.0);
    }

    #[test]
    fn banner_float_stays_small() {
        let p = FloatParams::banner();
        for step in 0..200 {
            let t = p.sample(step as f64 * 97.0);
            assert!(t.translate_y.abs() <= 3.0);
            assert!(t.rotate_x.abs() <= 0.5);
            assert!(t.rotate_y.abs() <= 0.8);
            assert!((t.scale - 1.0).abs() <= 0.01);
        }
    }

    #[test]
    fn loop_origin_is_first_frame() {
        let mut l = FloatLoop::default();
        assert_eq!(l.tick(10.0), None);
        assert!(l.start());
        assert!(!l.start(), "second start must not spawn another frame chain");
        assert_eq!(l.tick(500.0), Some(0.0));
        assert_eq!(l.tick(516.0), Some(16.0));
        assert!(l.stop());
        assert!(!l.stop());
        assert_eq!(l.tick(600.0), None);
    }

    #[test]
    fn restart_resets_clock() {
        let mut l = FloatLoop::default();
        l.start();
        l.tick(100.0);
        l.start();
        assert_eq!(l.tick(900.0), Some(0.0));
    }
}
