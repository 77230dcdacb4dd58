use crate::foundation::core::{Canvas, Point, Rect};

/// Raw pointer input in display (client) coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerInput {
    /// Mouse or pen pointer.
    Pointer {
        /// Client-space position.
        client: Point,
    },
    /// Multi-touch input; only the first touch point is used.
    Touch {
        /// Active touch points in client space.
        touches: Vec<Point>,
    },
}

impl PointerInput {
    /// Mouse/pen input at `(x, y)`.
    pub fn pointer(x: f64, y: f64) -> Self {
        Self::Pointer {
            client: Point::new(x, y),
        }
    }

    /// Touch input with a single contact at `(x, y)`.
    pub fn touch(x: f64, y: f64) -> Self {
        Self::Touch {
            touches: vec![Point::new(x, y)],
        }
    }

    /// Client-space position of the primary contact, if any.
    pub fn client_position(&self) -> Option<Point> {
        match self {
            Self::Pointer { client } => Some(*client),
            Self::Touch { touches } => touches.first().copied(),
        }
    }
}

/// Where the canvas is displayed and what resolution it rasterizes at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasLayout {
    /// Displayed bounding box in client coordinates.
    pub display: Rect,
    /// Internal raster resolution.
    pub raster: Canvas,
}

impl CanvasLayout {
    /// Layout where display and raster coincide (no display scaling).
    pub fn identity(raster: Canvas) -> Self {
        Self {
            display: Rect::new(0.0, 0.0, f64::from(raster.width), f64::from(raster.height)),
            raster,
        }
    }
}

/// Map a pointer event into raster space, correcting for display scaling.
///
/// Returns `None` when the input has no contact point or the display box is degenerate.
pub fn to_raster_coords(input: &PointerInput, layout: &CanvasLayout) -> Option<Point> {
    let client = input.client_position()?;
    let display_w = layout.display.width();
    let display_h = layout.display.height();
    if display_w <= 0.0 || display_h <= 0.0 {
        return None;
    }

    let scale_x = f64::from(layout.raster.width) / display_w;
    let scale_y = f64::from(layout.raster.height) / display_h;
    Some(Point::new(
        (client.x - layout.display.x0) * scale_x,
        (client.y - layout.display.y0) * scale_y,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/input/coords.rs"]
mod tests;
