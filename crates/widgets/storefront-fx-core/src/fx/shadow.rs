use super::fmt_num;
use super::tilt::Offsets;

/// Second shadow layer that stays put while the first one follows the pointer.
pub const RESTING_SHADOW_LAYER: &str = "0 20px 60px rgba(0, 0, 0, 0.2)";

/// Box shadow cast away from the pointer, blurrier toward the corners.
pub fn depth_shadow(o: Offsets) -> String {
    let x = o.dx * -20.0;
    let y = o.dy * -20.0;
    let blur = 40.0 + (o.dx + o.dy).abs() * 20.0;
    format!(
        "{}px {}px {}px rgba(0, 0, 0, 0.3), {}",
        fmt_num(x),
        fmt_num(y),
        fmt_num(blur),
        RESTING_SHADOW_LAYER
    )
}
