//! Software raster compositing and preview redraw.

/// Premultiplied RGBA8 blending.
pub mod blend;
/// Background, overlay and affordance compositing; letterboxing.
pub mod compositor;
/// Preview display sizing.
pub mod presentation;
/// Dirty-flag redraw scheduling.
pub mod redraw;
/// Premultiplied RGBA8 render target.
pub mod surface;
