use crate::foundation::core::{Canvas, Size};

/// On-screen preview size derived from the raster size.
///
/// Display size only; the raster (and every coordinate the editor works in) keeps the background's
/// native resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasPresentation {
    /// Native raster size.
    pub raster: Canvas,
    /// Size the raster is displayed at.
    pub display: Size,
}

impl CanvasPresentation {
    /// Shrink `raster` to fit `max`, width first, keeping its aspect. Never enlarges.
    pub fn fit(raster: Canvas, max: Size) -> Self {
        let aspect = raster.aspect();
        let mut display = raster.size();
        if display.width > max.width {
            display = Size::new(max.width, max.width / aspect);
        }
        if display.height > max.height {
            display = Size::new(max.height * aspect, max.height);
        }
        Self { raster, display }
    }

    /// Display pixels per raster pixel.
    pub fn zoom(&self) -> f64 {
        self.display.width / f64::from(self.raster.width)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/presentation.rs"]
mod tests;
