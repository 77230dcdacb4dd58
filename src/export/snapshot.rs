use crate::assets::ingest::{BackgroundImage, OverlayAsset};
use crate::editor::transform::Transform;
use crate::foundation::error::MemeResult;
use crate::render::compositor::{AffordanceStyle, composite};
use crate::render::surface::Surface;

/// Frozen copy of everything an export composites.
///
/// Rasters are shared, so taking a snapshot is cheap; later edits never reach a running export.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeSnapshot {
    /// Background at native resolution.
    pub background: BackgroundImage,
    /// Overlay graphic.
    pub overlay: OverlayAsset,
    /// Overlay placement at snapshot time.
    pub transform: Transform,
}

impl CompositeSnapshot {
    /// Composite at the background's native resolution without editing affordances.
    pub fn render_clean(&self) -> MemeResult<Surface> {
        let mut target = Surface::new(self.background.canvas());
        composite(
            &mut target,
            Some(&self.background),
            &self.overlay,
            &self.transform,
            false,
            &AffordanceStyle::default(),
        )?;
        Ok(target)
    }
}
