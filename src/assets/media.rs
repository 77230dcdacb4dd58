use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::foundation::error::{MemeError, MemeResult};

/// Sample rate audio is decoded to when nothing else is configured.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

#[derive(Clone, Debug, PartialEq)]
/// Decoded interleaved floating-point PCM. Its length is the authoritative duration.
pub struct AudioTrack {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved `f32` PCM samples.
    pub interleaved_f32: Arc<Vec<f32>>,
}

impl AudioTrack {
    /// Silent track of `duration`, mostly useful for tests and dry runs.
    pub fn silence(duration: Duration, sample_rate: u32, channels: u16) -> Self {
        let frames = (duration.as_secs_f64() * f64::from(sample_rate)).round() as usize;
        Self {
            sample_rate,
            channels,
            interleaved_f32: Arc::new(vec![0.0; frames * usize::from(channels)]),
        }
    }

    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> u64 {
        if self.channels == 0 {
            return 0;
        }
        (self.interleaved_f32.len() / usize::from(self.channels)) as u64
    }

    /// Measured duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// Measured duration.
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_secs())
    }

    /// Write the samples as raw little-endian `f32le`, the format encoders read back.
    pub fn write_f32le(&self, out_path: &Path) -> MemeResult<()> {
        let mut bytes = Vec::<u8>::with_capacity(self.interleaved_f32.len() * 4);
        for &sample in self.interleaved_f32.iter() {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        std::fs::write(out_path, bytes).map_err(|e| {
            MemeError::export(format!(
                "failed to write audio scratch file '{}': {e}",
                out_path.display()
            ))
        })
    }
}

/// Supplier of the soundtrack muxed into video exports.
pub trait AudioSource {
    /// Load and fully decode the track. Any failure aborts the export.
    fn load(&mut self) -> MemeResult<AudioTrack>;
}

/// Audio file on disk, decoded through `ffmpeg`.
#[derive(Clone, Debug)]
pub struct FileAudioSource {
    path: PathBuf,
    sample_rate: u32,
}

impl FileAudioSource {
    /// Decode `path` at `sample_rate` when loaded.
    pub fn new(path: impl Into<PathBuf>, sample_rate: u32) -> Self {
        Self {
            path: path.into(),
            sample_rate,
        }
    }

    /// Source file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AudioSource for FileAudioSource {
    fn load(&mut self) -> MemeResult<AudioTrack> {
        if !self.path.is_file() {
            return Err(MemeError::export(format!(
                "error loading background music: '{}' does not exist",
                self.path.display()
            )));
        }
        let track = decode_audio_f32_stereo(&self.path, self.sample_rate)?;
        if track.frames() == 0 {
            return Err(MemeError::export(format!(
                "error loading background music: '{}' has no audio samples",
                self.path.display()
            )));
        }
        Ok(track)
    }
}

/// Already decoded track, handed out on every load.
#[derive(Clone, Debug)]
pub struct InMemoryAudioSource(pub AudioTrack);

impl AudioSource for InMemoryAudioSource {
    fn load(&mut self) -> MemeResult<AudioTrack> {
        Ok(self.0.clone())
    }
}

#[cfg(feature = "media-ffmpeg")]
/// Decode audio from a media file to stereo interleaved `f32` PCM.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> MemeResult<AudioTrack> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| MemeError::export(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        return Err(MemeError::export(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(MemeError::export(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let pcm = out
        .stdout
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect::<Vec<_>>();

    Ok(AudioTrack {
        sample_rate,
        channels: 2,
        interleaved_f32: Arc::new(pcm),
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
/// Decode audio from a media file to stereo interleaved `f32` PCM.
///
/// Returns an error when the `media-ffmpeg` feature is disabled.
pub fn decode_audio_f32_stereo(_path: &Path, _sample_rate: u32) -> MemeResult<AudioTrack> {
    Err(MemeError::export(
        "audio decoding requires the 'media-ffmpeg' feature",
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
