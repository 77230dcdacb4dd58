use std::io::{Read, Write as _};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::codec::EncodingProfile;
use crate::encode::recorder::{Recorder, RecorderConfig, RecorderState};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{MemeError, MemeResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::surface::Surface;

const READ_CHUNK: usize = 64 * 1024;

/// Recorder that spawns the system `ffmpeg`, streams raw frames to stdin and collects the muxed
/// stream from stdout.
#[derive(Default)]
pub struct FfmpegRecorder {
    state: RecorderState,
    cfg: Option<RecorderConfig>,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout_drain: Option<JoinHandle<std::io::Result<Vec<Vec<u8>>>>>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegRecorder {
    /// Create an idle recorder; `ffmpeg` is spawned on start.
    pub fn new() -> Self {
        Self::default()
    }

    fn build_command(cfg: &RecorderConfig) -> MemeResult<Command> {
        let profile = cfg.profile;
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Input: flattened opaque RGBA8 frames on stdin.
        cmd.args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.canvas.width, cfg.canvas.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
        ]);

        if let Some(audio) = cfg.audio.as_ref() {
            if audio.sample_rate == 0 || audio.channels == 0 {
                return Err(MemeError::validation(
                    "audio sample_rate and channels must be non-zero when audio is enabled",
                ));
            }
            cmd.args([
                "-f",
                "f32le",
                "-ar",
                &audio.sample_rate.to_string(),
                "-ac",
                &audio.channels.to_string(),
                "-i",
            ])
            .arg(&audio.path)
            .args(["-c:a", profile.audio_encoder(), "-shortest"]);
        } else {
            cmd.arg("-an");
        }

        cmd.args([
            "-c:v",
            profile.video_encoder(),
            "-pix_fmt",
            "yuv420p",
            "-b:v",
            &cfg.video_bitrate.to_string(),
        ]);
        match profile {
            // Plain MP4 needs a seekable output for its index; fragment it for the pipe.
            EncodingProfile::Mp4H264Aac => {
                cmd.args(["-movflags", "frag_keyframe+empty_moov+default_base_moof"]);
            }
            EncodingProfile::WebmVp9Opus | EncodingProfile::WebmVp8Vorbis => {
                cmd.args(["-deadline", "realtime"]);
            }
        }
        cmd.args(["-f", profile.muxer(), "pipe:1"]);
        Ok(cmd)
    }

    fn join_drains(&mut self) -> MemeResult<(Vec<Vec<u8>>, Vec<u8>)> {
        let chunks = match self.stdout_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| MemeError::export("ffmpeg stdout drain thread panicked"))?
                .map_err(|e| MemeError::export(format!("ffmpeg stdout read failed: {e}")))?,
            None => Vec::new(),
        };
        let stderr = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| MemeError::export("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| MemeError::export(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        Ok((chunks, stderr))
    }
}

impl Recorder for FfmpegRecorder {
    fn state(&self) -> RecorderState {
        self.state
    }

    fn start(&mut self, cfg: RecorderConfig) -> MemeResult<()> {
        if self.state != RecorderState::Inactive {
            return Err(MemeError::export("recorder was already started"));
        }
        if !cfg.canvas.width.is_multiple_of(2) || !cfg.canvas.height.is_multiple_of(2) {
            return Err(MemeError::validation(
                "recorder width/height must be even (required for yuv420p output)",
            ));
        }
        if !is_ffmpeg_on_path() {
            return Err(MemeError::export(
                "ffmpeg is required for video export, but was not found on PATH",
            ));
        }

        let mut child = Self::build_command(&cfg)?.spawn().map_err(|e| {
            MemeError::export(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| MemeError::export("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| MemeError::export("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| MemeError::export("failed to open ffmpeg stderr (unexpected)"))?;

        let stdout_drain = std::thread::spawn(move || {
            let mut chunks = Vec::new();
            let mut buf = vec![0u8; READ_CHUNK];
            loop {
                let n = stdout.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                chunks.push(buf[..n].to_vec());
            }
            Ok(chunks)
        });
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(profile = ?cfg.profile, "ffmpeg recorder started");
        self.scratch = vec![0u8; cfg.canvas.rgba8_len()];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stdout_drain = Some(stdout_drain);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.state = RecorderState::Recording;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Surface) -> MemeResult<()> {
        let cfg = match (&self.cfg, self.state) {
            (Some(cfg), RecorderState::Recording) => cfg,
            _ => return Err(MemeError::export("ffmpeg recorder is not recording")),
        };
        if self.last_idx.is_some_and(|last| idx <= last) {
            return Err(MemeError::export(
                "ffmpeg recorder received out-of-order frame index",
            ));
        }
        if frame.canvas() != cfg.canvas {
            return Err(MemeError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.canvas.width, cfg.canvas.height
            )));
        }
        self.last_idx = Some(idx);

        flatten_premul_over_bg(&mut self.scratch, &frame.data, cfg.bg_rgba)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(MemeError::export("ffmpeg recorder is already finalized"));
        };
        stdin.write_all(&self.scratch).map_err(|e| {
            MemeError::export(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn stop(&mut self) -> MemeResult<Option<Vec<Vec<u8>>>> {
        if self.state != RecorderState::Recording {
            return Ok(None);
        }
        self.state = RecorderState::Stopped;
        drop(self.stdin.take());

        let mut child = self
            .child
            .take()
            .ok_or_else(|| MemeError::export("ffmpeg recorder not started"))?;
        let status = child
            .wait()
            .map_err(|e| MemeError::export(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let (chunks, stderr_bytes) = self.join_drains()?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(MemeError::export(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        self.cfg = None;
        Ok(Some(chunks))
    }

    fn abort(&mut self) {
        self.state = RecorderState::Stopped;
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Err(err) = self.join_drains() {
            tracing::warn!(%err, "ffmpeg drain after abort failed");
        }
        self.cfg = None;
    }
}

impl Drop for FfmpegRecorder {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.abort();
        }
    }
}

/// Flatten premultiplied RGBA8 over an opaque background color.
pub(crate) fn flatten_premul_over_bg(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> MemeResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(MemeError::validation(
            "flatten_premul_over_bg expects equal-length rgba8 buffers",
        ));
    }

    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255u16 - a;
        for i in 0..3 {
            d[i] = (u16::from(s[i]) + mul_div255_u16(bg[i], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
