use std::cell::Cell;
use std::rc::Rc;

use crate::config::ExportConfig;
use crate::export::artifact::Artifact;
use crate::export::snapshot::CompositeSnapshot;
use crate::export::video::{VideoExport, VideoExportEnv};
use crate::foundation::error::{MemeError, MemeResult};
use crate::render::compositor::letterbox_into;

/// Where the export pipeline currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportPhase {
    /// Nothing running; a new export may start.
    #[default]
    Idle,
    /// Compositing and encoding a still.
    ComposingStill,
    /// Letterboxing the composite and preparing the soundtrack.
    ComposingVideo,
    /// Frame loop running.
    Recording,
    /// Stop requested; waiting for the trailing flush and the encoder.
    Finalizing,
    /// The attempt failed; the pipeline drops back to `Idle` right after.
    Failed,
}

impl ExportPhase {
    /// Return `true` unless the pipeline is idle.
    pub fn is_active(self) -> bool {
        self != ExportPhase::Idle
    }
}

/// Shared phase cell; the running export writes it, the pipeline reads it to refuse overlap.
#[derive(Clone, Debug, Default)]
pub(crate) struct PhaseCell(Rc<Cell<ExportPhase>>);

impl PhaseCell {
    pub(crate) fn get(&self) -> ExportPhase {
        self.0.get()
    }

    pub(crate) fn set(&self, phase: ExportPhase) {
        tracing::debug!(?phase, "export phase");
        self.0.set(phase);
    }
}

/// Entry point for still and video exports. At most one export is active at a time.
#[derive(Debug)]
pub struct ExportPipeline {
    cfg: ExportConfig,
    phase: PhaseCell,
}

impl ExportPipeline {
    /// Idle pipeline using `cfg`.
    pub fn new(cfg: ExportConfig) -> Self {
        Self {
            cfg,
            phase: PhaseCell::default(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> ExportPhase {
        self.phase.get()
    }

    /// Export settings.
    pub fn config(&self) -> &ExportConfig {
        &self.cfg
    }

    fn ensure_idle(&self) -> MemeResult<()> {
        let phase = self.phase.get();
        if phase.is_active() {
            tracing::warn!(?phase, "export rejected, another export is in progress");
            return Err(MemeError::export("another export is already in progress"));
        }
        Ok(())
    }

    /// Composite `snapshot` at native resolution without affordances and encode it as PNG.
    #[tracing::instrument(skip_all, fields(w = snapshot.background.canvas().width, h = snapshot.background.canvas().height))]
    pub fn export_still(&self, snapshot: &CompositeSnapshot) -> MemeResult<Artifact> {
        self.ensure_idle()?;
        self.phase.set(ExportPhase::ComposingStill);
        let result = snapshot
            .render_clean()
            .and_then(|surface| surface.encode_png());
        self.phase.set(ExportPhase::Idle);

        match result {
            Ok(bytes) => {
                tracing::info!(len = bytes.len(), "still exported");
                Ok(Artifact {
                    file_name: self.cfg.still_file_name.clone(),
                    mime_type: "image/png".to_string(),
                    bytes,
                })
            }
            Err(err) => {
                tracing::warn!(%err, "still export failed");
                Err(err)
            }
        }
    }

    /// Letterbox `snapshot` into the output frame and prepare a video export.
    ///
    /// The returned [`VideoExport`] holds the pipeline busy until it is run or dropped.
    #[tracing::instrument(skip_all)]
    pub fn start_video<'e>(
        &self,
        snapshot: &CompositeSnapshot,
        env: VideoExportEnv<'e>,
    ) -> MemeResult<VideoExport<'e>> {
        self.ensure_idle()?;
        self.phase.set(ExportPhase::ComposingVideo);
        let frame = snapshot.render_clean().and_then(|clean| {
            letterbox_into(&clean, self.cfg.output, self.cfg.letterbox_rgba)
                .map(|(frame, _)| frame)
        });
        match frame {
            Ok(frame) => Ok(VideoExport::new(
                self.phase.clone(),
                self.cfg.clone(),
                frame,
                env,
            )),
            Err(err) => {
                self.phase.set(ExportPhase::Idle);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
