use super::fmt_num;

/// Subtle color wobble on the playing banner video, driven by a frame counter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Distortion {
    frame: u64,
    running: bool,
}

impl Distortion {
    /// Returns true when a frame must be requested.
    pub fn start(&mut self) -> bool {
        self.frame = 0;
        !std::mem::replace(&mut self.running, true)
    }

    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick(&mut self) -> Option<String> {
        if !self.running {
            return None;
        }
        self.frame += 1;
        Some(filter_for_frame(self.frame))
    }
}

pub fn filter_for_frame(frame: u64) -> String {
    let intensity = (frame as f64 * 0.02).sin() * 0.02;
    format!(
        "hue-rotate({}deg) saturate({}) brightness({})",
        fmt_num(intensity * 10.0),
        fmt_num(1.0 + intensity),
        fmt_num(1.0 + intensity * 0.1)
    )
}
