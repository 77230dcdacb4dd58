use crate::foundation::core::{Canvas, Point, Rect, Size};

/// Overlay placement in background raster space.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    /// Top-left corner of the scaled overlay. May lie off-canvas.
    pub position: Point,
    /// Uniform scale applied to the overlay's native size.
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Point::ORIGIN,
            scale: 1.0,
        }
    }
}

impl Transform {
    /// Scaled overlay size.
    pub fn scaled_size(&self, native: Size) -> Size {
        native * self.scale
    }

    /// Scaled overlay bounding box.
    pub fn overlay_rect(&self, native: Size) -> Rect {
        Rect::from_origin_size(self.position, self.scaled_size(native))
    }

    /// Position that centers an overlay of `native` size in `canvas` at the current scale.
    pub fn centered_position(&self, native: Size, canvas: Canvas) -> Point {
        let scaled = self.scaled_size(native);
        Point::new(
            f64::from(canvas.width) / 2.0 - scaled.width / 2.0,
            f64::from(canvas.height) / 2.0 - scaled.height / 2.0,
        )
    }
}

/// Closed interval the overlay scale must stay within.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBounds {
    /// Smallest allowed scale.
    pub min: f64,
    /// Largest allowed scale, never below `min`.
    pub max: f64,
}

impl ScaleBounds {
    /// Bounds with `max` raised to `min` if it would fall below it.
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    /// Bounds that keep the overlay's longest side within the background's shortest side.
    pub fn for_background(min: f64, background: Canvas, overlay_native: Size) -> Self {
        let min_bg = f64::from(background.width.min(background.height));
        let max_overlay = overlay_native.width.max(overlay_native.height);
        let max = if max_overlay > 0.0 {
            min_bg / max_overlay
        } else {
            min
        };
        Self::new(min, max)
    }

    /// Clamp `scale` into the bounds. Non-finite input clamps to `min`.
    pub fn clamp(&self, scale: f64) -> f64 {
        if !scale.is_finite() {
            return self.min;
        }
        scale.clamp(self.min, self.max)
    }

    /// Return `true` when `scale` lies inside the bounds.
    pub fn contains(&self, scale: f64) -> bool {
        self.min <= scale && scale <= self.max
    }
}
