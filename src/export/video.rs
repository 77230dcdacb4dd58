use std::time::Duration;

use crate::assets::media::AudioSource;
use crate::config::ExportConfig;
use crate::encode::codec::{CapabilityQuery, negotiate};
use crate::encode::recorder::{AudioInputConfig, Recorder, RecorderConfig, RecorderState};
use crate::export::artifact::Artifact;
use crate::export::clock::Clock;
use crate::export::pipeline::{ExportPhase, PhaseCell};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{MemeError, MemeResult};
use crate::render::surface::Surface;

/// Collaborators a video export runs against.
pub struct VideoExportEnv<'e> {
    /// Soundtrack supplier.
    pub audio: &'e mut dyn AudioSource,
    /// Encoder session.
    pub recorder: &'e mut dyn Recorder,
    /// Answers which encoding profiles are available.
    pub capabilities: &'e dyn CapabilityQuery,
    /// Drives frame ticks and the trailing flush.
    pub clock: &'e mut dyn Clock,
}

/// Progress notifications emitted while a video export runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportEvent {
    /// Percentage of frames emitted, after every tick.
    Progress(u8),
    /// Terminal success.
    Finished {
        /// Artifact file name.
        file_name: String,
        /// Artifact size in bytes.
        len: usize,
    },
    /// Terminal failure with a user-facing message.
    Failed(String),
}

/// Receives [`ExportEvent`]s.
pub trait ExportObserver {
    /// Handle one event.
    fn on_event(&mut self, event: &ExportEvent);
}

impl<F> ExportObserver for F
where
    F: FnMut(&ExportEvent),
{
    fn on_event(&mut self, event: &ExportEvent) {
        self(event)
    }
}

/// What ended the frame loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Every frame was emitted.
    FramesExhausted,
    /// The soundtrack finished playing first.
    AudioEnded,
}

/// Ephemeral state of one video export.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportSession {
    /// Frames emitted so far.
    pub frame_index: u64,
    /// Frames needed to cover the soundtrack.
    pub total_frames: u64,
    /// `floor(frame_index / total_frames * 100)`.
    pub progress_percent: u8,
    /// Recorder lifecycle as last observed.
    pub recorder_state: RecorderState,
    /// Trigger that won the stop race, once stopped.
    pub stop_reason: Option<StopReason>,
}

/// Single-use latch: only the first [`Latch::fire`] returns `true`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Latch {
    fired: bool,
}

impl Latch {
    /// Fire the latch, returning `true` only the first time.
    pub fn fire(&mut self) -> bool {
        !std::mem::replace(&mut self.fired, true)
    }

    /// Return `true` once fired.
    pub fn is_fired(&self) -> bool {
        self.fired
    }
}

/// A prepared video export. Created by [`crate::ExportPipeline::start_video`].
///
/// The letterboxed frame is rendered once up front and pushed on every tick.
pub struct VideoExport<'e> {
    phase: PhaseCell,
    cfg: ExportConfig,
    frame: Surface,
    env: VideoExportEnv<'e>,
    session: ExportSession,
    start_latch: Latch,
    stop_latch: Latch,
    ran: bool,
}

impl<'e> VideoExport<'e> {
    pub(crate) fn new(
        phase: PhaseCell,
        cfg: ExportConfig,
        frame: Surface,
        env: VideoExportEnv<'e>,
    ) -> Self {
        Self {
            phase,
            cfg,
            frame,
            env,
            session: ExportSession::default(),
            start_latch: Latch::default(),
            stop_latch: Latch::default(),
            ran: false,
        }
    }

    /// Session state so far.
    pub fn session(&self) -> &ExportSession {
        &self.session
    }

    /// The letterboxed frame every tick pushes.
    pub fn frame(&self) -> &Surface {
        &self.frame
    }

    /// Run the export to completion.
    ///
    /// Emits a progress event after every tick and exactly one terminal event. Any failure aborts
    /// the recorder, resets progress to 0 and returns the pipeline to idle.
    #[tracing::instrument(skip_all)]
    pub fn run(&mut self, observer: &mut dyn ExportObserver) -> MemeResult<Artifact> {
        if self.ran {
            return Err(MemeError::export("video export already ran"));
        }
        self.ran = true;

        match self.record(observer) {
            Ok(artifact) => {
                self.session.progress_percent = 100;
                tracing::info!(
                    file = %artifact.file_name,
                    len = artifact.bytes.len(),
                    frames = self.session.frame_index,
                    "video exported"
                );
                observer.on_event(&ExportEvent::Finished {
                    file_name: artifact.file_name.clone(),
                    len: artifact.bytes.len(),
                });
                self.phase.set(ExportPhase::Idle);
                Ok(artifact)
            }
            Err(err) => {
                self.fail(observer, &err);
                Err(err)
            }
        }
    }

    fn record(&mut self, observer: &mut dyn ExportObserver) -> MemeResult<Artifact> {
        let track = self.env.audio.load()?;
        let duration = track.duration();
        let total = self.cfg.fps.secs_to_frames_ceil(track.duration_secs());
        if total == 0 {
            return Err(MemeError::export("background music has no duration"));
        }
        self.session.total_frames = total;
        tracing::info!(
            duration_secs = track.duration_secs(),
            total_frames = total,
            "video export started"
        );

        let profile = negotiate(&self.cfg.codec_preference, self.env.capabilities)?;

        let scratch = tempfile::Builder::new()
            .prefix("memeframe-")
            .tempdir()
            .map_err(|e| MemeError::export(format!("failed to create scratch directory: {e}")))?;
        let audio_path = scratch.path().join("soundtrack.f32le");
        track.write_f32le(&audio_path)?;

        self.start_recording(RecorderConfig {
            profile,
            canvas: self.cfg.output,
            fps: self.cfg.fps,
            video_bitrate: u64::from(self.cfg.video_bitrate),
            audio: Some(AudioInputConfig {
                path: audio_path,
                sample_rate: track.sample_rate,
                channels: track.channels,
            }),
            bg_rgba: self.cfg.letterbox_rgba,
        })?;

        let t0 = self.env.clock.elapsed();
        let since_start = move |clock: &dyn Clock| clock.elapsed().saturating_sub(t0);
        let interval = self.cfg.fps.frame_interval();
        let frame_secs = self.cfg.fps.frame_duration_secs();

        // Frame `i` is due at `i * interval`. Late ticks catch up; once the soundtrack has ended
        // the remaining frames go out at once.
        let mut reason = StopReason::FramesExhausted;
        let mut pushed = 0u64;
        while pushed < total {
            let now = since_start(&*self.env.clock);
            let due = if now >= duration {
                reason = StopReason::AudioEnded;
                total
            } else {
                let on_time = (now.as_secs_f64() / frame_secs + 1e-9).floor() as u64 + 1;
                on_time.clamp(pushed + 1, total)
            };
            for i in pushed..due {
                self.push_frame(i, total, observer)?;
            }
            pushed = due;

            if pushed < total {
                let deadline = u32::try_from(pushed)
                    .ok()
                    .and_then(|n| interval.checked_mul(n))
                    .unwrap_or(Duration::MAX);
                let now = since_start(&*self.env.clock);
                self.env.clock.sleep(deadline.saturating_sub(now));
            }
        }
        if reason == StopReason::AudioEnded {
            tracing::debug!(frames = total, "soundtrack ended first, caught up remaining frames");
        }

        let chunks = self.request_stop(reason)?;
        // Playback keeps going through the flush; its end is a second trigger.
        if since_start(&*self.env.clock) >= duration {
            self.request_stop(StopReason::AudioEnded)?;
        }
        drop(scratch);

        let bytes = chunks
            .ok_or_else(|| MemeError::export("recorder stopped without output"))?
            .concat();
        if bytes.is_empty() {
            return Err(MemeError::export("recorder produced no data"));
        }
        Ok(Artifact {
            file_name: format!("{}.{}", self.cfg.video_file_stem, profile.extension()),
            mime_type: profile.mime_type().to_string(),
            bytes,
        })
    }

    fn push_frame(
        &mut self,
        i: u64,
        total: u64,
        observer: &mut dyn ExportObserver,
    ) -> MemeResult<()> {
        self.env.recorder.push_frame(FrameIndex(i), &self.frame)?;
        self.session.frame_index = i + 1;
        self.session.progress_percent = ((i + 1) * 100 / total) as u8;
        observer.on_event(&ExportEvent::Progress(self.session.progress_percent));
        Ok(())
    }

    fn start_recording(&mut self, cfg: RecorderConfig) -> MemeResult<()> {
        if !self.start_latch.fire() {
            return Ok(());
        }
        self.env.recorder.start(cfg)?;
        self.session.recorder_state = self.env.recorder.state();
        self.phase.set(ExportPhase::Recording);
        Ok(())
    }

    /// The one stop entry point. Only the first trigger stops the recorder.
    fn request_stop(&mut self, reason: StopReason) -> MemeResult<Option<Vec<Vec<u8>>>> {
        if !self.stop_latch.fire() {
            tracing::debug!(?reason, "stop already requested");
            return Ok(None);
        }
        tracing::debug!(?reason, frames = self.session.frame_index, "stopping recorder");
        self.session.stop_reason = Some(reason);
        self.phase.set(ExportPhase::Finalizing);
        self.env.clock.sleep(self.cfg.trailing_flush());
        let out = self.env.recorder.stop()?;
        self.session.recorder_state = self.env.recorder.state();
        Ok(out)
    }

    fn fail(&mut self, observer: &mut dyn ExportObserver, err: &MemeError) {
        self.phase.set(ExportPhase::Failed);
        self.halt_recorder();
        self.session.progress_percent = 0;
        tracing::warn!(%err, "video export failed");
        observer.on_event(&ExportEvent::Failed(err.to_string()));
        self.phase.set(ExportPhase::Idle);
    }

    fn halt_recorder(&mut self) {
        if self.env.recorder.state() == RecorderState::Recording {
            self.env.recorder.abort();
        }
        self.session.recorder_state = self.env.recorder.state();
    }
}

impl Drop for VideoExport<'_> {
    fn drop(&mut self) {
        if self.phase.get().is_active() {
            self.halt_recorder();
            self.phase.set(ExportPhase::Idle);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/video.rs"]
mod tests;
