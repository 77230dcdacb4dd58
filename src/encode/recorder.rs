use std::path::PathBuf;

use crate::encode::codec::EncodingProfile;
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{MemeError, MemeResult};
use crate::render::surface::Surface;

/// Lifecycle of one recorder session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecorderState {
    /// Not started yet.
    #[default]
    Inactive,
    /// Accepting frames.
    Recording,
    /// Stopped or aborted; terminal.
    Stopped,
}

/// Raw PCM audio input muxed alongside the frames.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioInputConfig {
    /// Path to interleaved `f32le` PCM data.
    pub path: PathBuf,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

/// Parameters fixed when a recorder starts.
#[derive(Clone, Debug, PartialEq)]
pub struct RecorderConfig {
    /// Negotiated container and codecs.
    pub profile: EncodingProfile,
    /// Frame size.
    pub canvas: Canvas,
    /// Frame rate.
    pub fps: Fps,
    /// Target video bitrate in bits per second.
    pub video_bitrate: u64,
    /// Soundtrack, if any.
    pub audio: Option<AudioInputConfig>,
    /// Straight RGBA that translucent pixels are flattened over.
    pub bg_rgba: [u8; 4],
}

/// Encoder session fed one frame per tick.
///
/// Frames are pushed in strictly increasing [`FrameIndex`] order. The encoded stream comes back
/// from [`Recorder::stop`] as the chunks the encoder emitted, in order.
pub trait Recorder: Send {
    /// Current lifecycle state.
    fn state(&self) -> RecorderState;
    /// Begin recording. Only valid from [`RecorderState::Inactive`].
    fn start(&mut self, cfg: RecorderConfig) -> MemeResult<()>;
    /// Encode one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &Surface) -> MemeResult<()>;
    /// Finish encoding and hand back the emitted chunks.
    ///
    /// Returns `Ok(None)` when the recorder is not recording, so repeated stops are harmless.
    fn stop(&mut self) -> MemeResult<Option<Vec<Vec<u8>>>>;
    /// Halt immediately and discard any output. Safe to call in any state.
    fn abort(&mut self);
}

/// Recorder that keeps frame indices in memory, for tests and dry runs.
///
/// Emits one chunk per second of frames, each holding the little-endian indices it received.
#[derive(Debug, Default)]
pub struct InMemoryRecorder {
    state: RecorderState,
    cfg: Option<RecorderConfig>,
    frames: Vec<FrameIndex>,
    chunks: Vec<Vec<u8>>,
    pending: Vec<u8>,
    last_idx: Option<FrameIndex>,
    starts: u32,
    stops: u32,
}

impl InMemoryRecorder {
    /// Create an inactive recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured by `start`, if any.
    pub fn config(&self) -> Option<&RecorderConfig> {
        self.cfg.as_ref()
    }

    /// Frames received so far.
    pub fn frames(&self) -> &[FrameIndex] {
        &self.frames
    }

    /// Number of successful starts.
    pub fn start_count(&self) -> u32 {
        self.starts
    }

    /// Number of stops that actually stopped a recording.
    pub fn stop_count(&self) -> u32 {
        self.stops
    }
}

impl Recorder for InMemoryRecorder {
    fn state(&self) -> RecorderState {
        self.state
    }

    fn start(&mut self, cfg: RecorderConfig) -> MemeResult<()> {
        if self.state != RecorderState::Inactive {
            return Err(MemeError::export("recorder was already started"));
        }
        self.cfg = Some(cfg);
        self.state = RecorderState::Recording;
        self.starts += 1;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Surface) -> MemeResult<()> {
        let cfg = match (&self.cfg, self.state) {
            (Some(cfg), RecorderState::Recording) => cfg,
            _ => return Err(MemeError::export("recorder is not recording")),
        };
        if self.last_idx.is_some_and(|last| idx <= last) {
            return Err(MemeError::export("recorder received out-of-order frame index"));
        }
        if frame.canvas() != cfg.canvas {
            return Err(MemeError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.canvas.width, cfg.canvas.height
            )));
        }
        self.last_idx = Some(idx);
        self.frames.push(idx);
        self.pending.extend_from_slice(&idx.0.to_le_bytes());
        if self.frames.len() % cfg.fps.num.max(1) as usize == 0 {
            self.chunks.push(std::mem::take(&mut self.pending));
        }
        Ok(())
    }

    fn stop(&mut self) -> MemeResult<Option<Vec<Vec<u8>>>> {
        if self.state != RecorderState::Recording {
            return Ok(None);
        }
        self.state = RecorderState::Stopped;
        self.stops += 1;
        if !self.pending.is_empty() {
            self.chunks.push(std::mem::take(&mut self.pending));
        }
        Ok(Some(std::mem::take(&mut self.chunks)))
    }

    fn abort(&mut self) {
        self.state = RecorderState::Stopped;
        self.pending.clear();
        self.chunks.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/recorder.rs"]
mod tests;
