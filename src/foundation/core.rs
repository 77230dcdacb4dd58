use std::time::Duration;

use crate::foundation::error::{MemeError, MemeResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Absolute 0-based frame index in export timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> MemeResult<Self> {
        if den == 0 {
            return Err(MemeError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(MemeError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Whole-number FPS (`n/1`).
    pub fn whole(num: u32) -> MemeResult<Self> {
        Self::new(num, 1)
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Wall-clock delay between two frame ticks.
    pub fn frame_interval(self) -> Duration {
        Duration::from_nanos(1_000_000_000u64 * u64::from(self.den) / u64::from(self.num))
    }

    /// Number of frames needed to cover `secs`, rounding up.
    ///
    /// A tiny epsilon absorbs float noise so that e.g. `2.0 s * 25` is 50 rather than 51.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        if !secs.is_finite() || secs <= 0.0 {
            return 0;
        }
        (secs * self.as_f64() - 1e-9).ceil().max(0.0) as u64
    }
}

/// Raster dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Portrait 9:16 video frame.
    pub const PORTRAIT_1080X1920: Canvas = Canvas {
        width: 1080,
        height: 1920,
    };

    /// Create a canvas, rejecting zero-sized dimensions.
    pub fn new(width: u32, height: u32) -> MemeResult<Self> {
        if width == 0 || height == 0 {
            return Err(MemeError::validation("canvas width/height must be non-zero"));
        }
        Ok(Self { width, height })
    }

    /// Width over height.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Size as floating point.
    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Number of bytes of a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
