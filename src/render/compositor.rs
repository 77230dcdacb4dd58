use crate::assets::ingest::{BackgroundImage, OverlayAsset};
use crate::config::EditorConfig;
use crate::editor::handles::HandleId;
use crate::editor::transform::Transform;
use crate::foundation::core::{Canvas, Point, Rect, Vec2};
use crate::foundation::error::MemeResult;
use crate::render::surface::Surface;

/// Colors and sizes of the editing affordances.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffordanceStyle {
    /// Straight RGBA of the selection outline and handle borders.
    pub outline_rgba: [u8; 4],
    /// Selection outline thickness in pixels.
    pub outline_width: f64,
    /// Handle square side length in pixels.
    pub handle_size: f64,
    /// Straight RGBA of the handle fill.
    pub handle_fill_rgba: [u8; 4],
}

impl Default for AffordanceStyle {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for AffordanceStyle {
    fn from(cfg: &EditorConfig) -> Self {
        Self {
            outline_rgba: cfg.outline_rgba,
            outline_width: f64::from(cfg.outline_width),
            handle_size: cfg.handle_size,
            handle_fill_rgba: cfg.handle_fill_rgba,
        }
    }
}

/// Composite the background and the overlay into `target`.
///
/// The target is cleared to transparent first. The background is stretched over the whole target
/// without preserving its aspect; the overlay keeps its native aspect at `transform.scale`. With
/// `show_handles` the selection outline and the eight resize handles are drawn on top.
pub fn composite(
    target: &mut Surface,
    background: Option<&BackgroundImage>,
    overlay: &OverlayAsset,
    transform: &Transform,
    show_handles: bool,
    style: &AffordanceStyle,
) -> MemeResult<()> {
    target.clear([0, 0, 0, 0]);

    if let Some(bg) = background {
        let full = Rect::from_origin_size(Point::ORIGIN, target.canvas().size());
        target.draw_raster(bg.raster(), full)?;
    }

    let overlay_rect = transform.overlay_rect(overlay.native_size());
    target.draw_raster(overlay.raster(), overlay_rect)?;

    if show_handles {
        draw_affordances(target, overlay_rect, style);
    }
    Ok(())
}

fn draw_affordances(target: &mut Surface, overlay_rect: Rect, style: &AffordanceStyle) {
    target.stroke_rect(overlay_rect, style.outline_width, style.outline_rgba);
    for handle in HandleId::ALL {
        let square = handle.hit_box(overlay_rect, style.handle_size);
        target.fill_rect(square, style.handle_fill_rgba);
        target.stroke_rect(square, 1.0, style.outline_rgba);
    }
}

/// Result of fitting a source frame inside a target frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LetterboxFit {
    /// Where the scaled source lands in target pixels.
    pub draw_rect: Rect,
    /// Padding on the left and top.
    pub offsets: Vec2,
    /// Uniform factor applied to the source.
    pub scale: f64,
}

/// "Contain" fit of `src` in `dst`, centered on the padded axis.
pub fn letterbox_fit(src: Canvas, dst: Canvas) -> LetterboxFit {
    let dst_w = f64::from(dst.width);
    let dst_h = f64::from(dst.height);
    let src_aspect = src.aspect();

    let (draw_w, draw_h, offsets) = if src_aspect > dst.aspect() {
        let draw_h = dst_w / src_aspect;
        (dst_w, draw_h, Vec2::new(0.0, (dst_h - draw_h) / 2.0))
    } else {
        let draw_w = dst_h * src_aspect;
        (draw_w, dst_h, Vec2::new((dst_w - draw_w) / 2.0, 0.0))
    };

    LetterboxFit {
        draw_rect: Rect::new(offsets.x, offsets.y, offsets.x + draw_w, offsets.y + draw_h),
        offsets,
        scale: draw_w / f64::from(src.width),
    }
}

/// Re-project `source` into a new `target`-sized surface padded with `pad_rgba`.
pub fn letterbox_into(
    source: &Surface,
    target: Canvas,
    pad_rgba: [u8; 4],
) -> MemeResult<(Surface, LetterboxFit)> {
    let fit = letterbox_fit(source.canvas(), target);
    let mut out = Surface::new(target);
    out.clear(pad_rgba);
    out.draw_surface(source, fit.draw_rect)?;
    Ok((out, fit))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
