use std::time::Duration;

use crate::foundation::error::{Pixel8Error, Pixel8Result};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Argument handed to node producers and callback `render` props.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInfo {
    pub frame: FrameIndex,
}

/// Tick rate of a stage. Always finite and positive.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Fps(f64);

impl Fps {
    pub const DEFAULT: Fps = Fps(60.0);

    pub fn new(fps: f64) -> Pixel8Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(Pixel8Error::validation(format!(
                "stage fps must be finite and > 0, got {fps}"
            )));
        }
        Ok(Self(fps))
    }

    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Delay between two ticks, `1000 / fps` milliseconds.
    pub fn frame_interval(self) -> Duration {
        Duration::from_nanos((1e9 / self.0).round() as u64)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Pixel8Result<Self> {
        if width == 0 || height == 0 {
            return Err(Pixel8Error::validation(format!(
                "stage size must be >= 1x1, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn area(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

/// Identity of a presentation surface; at most one render loop writes to each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
