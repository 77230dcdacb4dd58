use crate::assets::generate::{GenerationRequest, ImageGenerator, generate_background};
use crate::assets::ingest::{BackgroundImage, OverlayAsset, ingest_background};
use crate::config::{EditorConfig, MemeframeConfig};
use crate::editor::handles::CursorHint;
use crate::editor::model::{InteractionState, TransformModel};
use crate::editor::transform::{ScaleBounds, Transform};
use crate::export::artifact::Artifact;
use crate::export::pipeline::{ExportPhase, ExportPipeline};
use crate::export::snapshot::CompositeSnapshot;
use crate::export::video::{ExportObserver, VideoExportEnv};
use crate::foundation::core::{Canvas, Point, Rect};
use crate::foundation::error::{MemeError, MemeResult};
use crate::input::coords::{CanvasLayout, PointerInput, to_raster_coords};
use crate::render::compositor::{AffordanceStyle, composite};
use crate::render::presentation::CanvasPresentation;
use crate::render::redraw::RenderLoop;
use crate::render::surface::Surface;

/// One editing session: a fixed overlay, an optional background and the export pipeline.
///
/// All state lives on the caller's thread. Every mutation marks the preview dirty; the preview is
/// redrawn at most once before the next input is handled or when it is requested.
pub struct EditorSession {
    editor_cfg: EditorConfig,
    style: AffordanceStyle,
    overlay: OverlayAsset,
    background: Option<BackgroundImage>,
    model: TransformModel,
    redraw: RenderLoop,
    pipeline: ExportPipeline,
}

impl EditorSession {
    /// Start a session for `overlay`.
    pub fn new(overlay: OverlayAsset, cfg: MemeframeConfig) -> Self {
        let model = TransformModel::new(overlay.native_size(), &cfg.editor);
        Self {
            style: AffordanceStyle::from(&cfg.editor),
            editor_cfg: cfg.editor,
            overlay,
            background: None,
            model,
            redraw: RenderLoop::new(),
            pipeline: ExportPipeline::new(cfg.export),
        }
    }

    /// Current background, if any.
    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    /// The overlay graphic.
    pub fn overlay(&self) -> &OverlayAsset {
        &self.overlay
    }

    /// Current overlay transform.
    pub fn transform(&self) -> Transform {
        self.model.transform()
    }

    /// Current pointer interaction.
    pub fn interaction(&self) -> InteractionState {
        self.model.interaction()
    }

    /// Current scale bounds.
    pub fn scale_bounds(&self) -> ScaleBounds {
        self.model.scale_bounds()
    }

    /// Export pipeline phase.
    pub fn export_phase(&self) -> ExportPhase {
        self.pipeline.phase()
    }

    /// Number of preview redraws so far.
    pub fn redraw_count(&self) -> u64 {
        self.redraw.redraw_count()
    }

    /// Decode and install an uploaded background.
    ///
    /// Non-images and images under the minimum size are rejected and leave the session unchanged.
    pub fn upload_background(&mut self, bytes: &[u8]) -> MemeResult<Canvas> {
        let bg = ingest_background(bytes, self.editor_cfg.min_background_px).inspect_err(|err| {
            tracing::warn!(%err, "background upload rejected");
        })?;
        Ok(self.install_background(bg))
    }

    /// Generate and install a background. Generated images skip the minimum size check.
    pub fn generate_background(
        &mut self,
        generator: &mut dyn ImageGenerator,
        request: &GenerationRequest,
    ) -> MemeResult<Canvas> {
        let bg = generate_background(generator, request).inspect_err(|err| {
            tracing::warn!(%err, "background generation failed");
        })?;
        Ok(self.install_background(bg))
    }

    fn install_background(&mut self, bg: BackgroundImage) -> Canvas {
        let canvas = bg.canvas();
        self.model.end();
        self.model.on_background_loaded(canvas);
        self.background = Some(bg);
        self.redraw.invalidate();
        let zoom = CanvasPresentation::fit(canvas, self.editor_cfg.preview_max).zoom();
        tracing::info!(
            width = canvas.width,
            height = canvas.height,
            zoom,
            "background installed"
        );
        canvas
    }

    /// Set the overlay scale (size slider). Returns the clamped value.
    pub fn set_overlay_scale(&mut self, value: f64) -> f64 {
        self.settle();
        let applied = self.model.set_scale(value);
        self.redraw.invalidate();
        applied
    }

    /// Pointer pressed. Returns the resulting interaction.
    pub fn pointer_down(&mut self, input: &PointerInput, layout: &CanvasLayout) -> InteractionState {
        self.settle();
        match to_raster_coords(input, layout) {
            Some(p) => self.model.pointer_down(p),
            None => self.model.interaction(),
        }
    }

    /// Pointer moved. Returns `true` when the overlay changed.
    pub fn pointer_move(&mut self, input: &PointerInput, layout: &CanvasLayout) -> bool {
        self.settle();
        let Some(p) = to_raster_coords(input, layout) else {
            return false;
        };
        let changed = self.model.pointer_move(p);
        if changed {
            self.redraw.invalidate();
        }
        changed
    }

    /// Pointer released or left the canvas.
    pub fn pointer_up(&mut self) {
        self.settle();
        self.model.end();
    }

    /// Cursor to show for a hover at `input`.
    pub fn cursor_hint(&self, input: &PointerInput, layout: &CanvasLayout) -> CursorHint {
        to_raster_coords(input, layout)
            .map(|p| self.model.cursor_at(p))
            .unwrap_or(CursorHint::Default)
    }

    /// Apply a gesture already expressed in raster space.
    pub fn apply_raster_gesture(&mut self, kind: GestureKind, p: Point) {
        let layout = match &self.background {
            Some(bg) => CanvasLayout::identity(bg.canvas()),
            None => return,
        };
        let input = PointerInput::Pointer { client: p };
        match kind {
            GestureKind::Down => {
                self.pointer_down(&input, &layout);
            }
            GestureKind::Move => {
                self.pointer_move(&input, &layout);
            }
            GestureKind::Up => self.pointer_up(),
        }
    }

    /// Preview size for the current background.
    pub fn presentation(&self) -> Option<CanvasPresentation> {
        self.background
            .as_ref()
            .map(|bg| CanvasPresentation::fit(bg.canvas(), self.editor_cfg.preview_max))
    }

    /// Layout of the preview when displayed at the top-left of the client area.
    pub fn default_layout(&self) -> Option<CanvasLayout> {
        self.presentation().map(|p| CanvasLayout {
            display: Rect::from_origin_size(Point::ORIGIN, p.display),
            raster: p.raster,
        })
    }

    /// Current preview frame with editing affordances, or `None` without a background.
    pub fn preview(&mut self) -> MemeResult<Option<&Surface>> {
        let Some(bg) = self.background.as_ref() else {
            return Ok(None);
        };
        let overlay = &self.overlay;
        let transform = self.model.transform();
        let style = self.style;
        let frame = self.redraw.flush(|| {
            let mut target = Surface::new(bg.canvas());
            composite(&mut target, Some(bg), overlay, &transform, true, &style)?;
            Ok(target)
        })?;
        Ok(Some(frame))
    }

    fn settle(&mut self) {
        if self.background.is_some()
            && self.redraw.is_dirty()
            && let Err(err) = self.preview()
        {
            tracing::warn!(%err, "preview redraw failed");
        }
    }

    /// Freeze the current composite inputs for export.
    pub fn snapshot(&self) -> MemeResult<CompositeSnapshot> {
        let background = self
            .background
            .clone()
            .ok_or_else(|| MemeError::validation("upload or generate a background first"))?;
        Ok(CompositeSnapshot {
            background,
            overlay: self.overlay.clone(),
            transform: self.model.transform(),
        })
    }

    /// Export the clean composite as `meme.png`.
    pub fn export_still(&self) -> MemeResult<Artifact> {
        self.pipeline.export_still(&self.snapshot()?)
    }

    /// Export the letterboxed composite as a video synchronized to the soundtrack.
    pub fn export_video(
        &self,
        env: VideoExportEnv<'_>,
        observer: &mut dyn ExportObserver,
    ) -> MemeResult<Artifact> {
        let snapshot = self.snapshot()?;
        self.pipeline.start_video(&snapshot, env)?.run(observer)
    }

    /// Drop the background and return the overlay to its initial transform.
    pub fn restart(&mut self) {
        self.background = None;
        self.model.reset();
        self.redraw.reset();
        tracing::info!("session restarted");
    }
}

/// Scripted pointer gesture step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    /// Pointer pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Pointer released.
    Up,
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
