//! Tunables for the editor and the export pipeline.
//!
//! Every field has a default matching the shipped behavior, so a JSON config file only needs to
//! name the values it overrides.

use std::path::Path;

use anyhow::Context as _;

use crate::encode::codec::EncodingProfile;
use crate::foundation::core::{Canvas, Fps, Size};
use crate::foundation::error::{MemeError, MemeResult};

/// Top-level configuration, loadable from JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MemeframeConfig {
    /// Interactive editor settings.
    pub editor: EditorConfig,
    /// Still and video export settings.
    pub export: ExportConfig,
}

impl MemeframeConfig {
    /// Parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> MemeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a JSON config string.
    pub fn from_json_str(text: &str) -> MemeResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| MemeError::validation(format!("config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> MemeResult<()> {
        self.editor.validate()?;
        self.export.validate()
    }
}

/// Interactive editor settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Uploaded backgrounds must be at least this many pixels on both axes.
    pub min_background_px: u32,
    /// Side length of the square resize handles, in raster pixels.
    pub handle_size: f64,
    /// Floor for the driven overlay dimension while resizing.
    pub min_overlay_px: f64,
    /// Lower bound of the overlay scale.
    pub min_scale: f64,
    /// Upper bound of the overlay scale before any background is loaded.
    pub default_max_scale: f64,
    /// Largest preview box the canvas is displayed in.
    pub preview_max: Size,
    /// Straight RGBA of the selection outline and handle borders.
    pub outline_rgba: [u8; 4],
    /// Selection outline thickness in raster pixels.
    pub outline_width: u32,
    /// Straight RGBA of the handle fill.
    pub handle_fill_rgba: [u8; 4],
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_background_px: 500,
            handle_size: 8.0,
            min_overlay_px: 20.0,
            min_scale: 0.1,
            default_max_scale: 2.0,
            preview_max: Size::new(1000.0, 1500.0),
            outline_rgba: [0x00, 0xAA, 0xFF, 0xFF],
            outline_width: 2,
            handle_fill_rgba: [0xFF, 0xFF, 0xFF, 0xFF],
        }
    }
}

impl EditorConfig {
    fn validate(&self) -> MemeResult<()> {
        if !(self.min_scale > 0.0 && self.min_scale.is_finite()) {
            return Err(MemeError::validation("editor.min_scale must be positive"));
        }
        if self.default_max_scale < self.min_scale {
            return Err(MemeError::validation(
                "editor.default_max_scale must be >= editor.min_scale",
            ));
        }
        if self.handle_size <= 0.0 || self.min_overlay_px <= 0.0 {
            return Err(MemeError::validation(
                "editor.handle_size and editor.min_overlay_px must be positive",
            ));
        }
        if self.preview_max.width <= 0.0 || self.preview_max.height <= 0.0 {
            return Err(MemeError::validation("editor.preview_max must be non-empty"));
        }
        Ok(())
    }
}

/// Still and video export settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Video frame size.
    pub output: Canvas,
    /// Video frame rate.
    pub fps: Fps,
    /// Delay between the stop trigger and the actual recorder stop.
    pub trailing_flush_ms: u64,
    /// Target video bitrate in bits per second.
    pub video_bitrate: u32,
    /// Sample rate audio is decoded to before muxing.
    pub audio_sample_rate: u32,
    /// Straight RGBA padding color around the letterboxed composite.
    pub letterbox_rgba: [u8; 4],
    /// File name of the still artifact.
    pub still_file_name: String,
    /// File stem of the video artifact; the extension comes from the negotiated container.
    pub video_file_stem: String,
    /// Encoding profiles in order of preference.
    pub codec_preference: Vec<EncodingProfile>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output: Canvas::PORTRAIT_1080X1920,
            fps: Fps { num: 25, den: 1 },
            trailing_flush_ms: 1000,
            video_bitrate: 5_000_000,
            audio_sample_rate: 48_000,
            letterbox_rgba: [0, 0, 0, 255],
            still_file_name: "meme.png".to_string(),
            video_file_stem: "meme-video".to_string(),
            codec_preference: EncodingProfile::DEFAULT_PREFERENCE.to_vec(),
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> MemeResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;
        Canvas::new(self.output.width, self.output.height)?;
        if !self.output.width.is_multiple_of(2) || !self.output.height.is_multiple_of(2) {
            return Err(MemeError::validation(
                "export.output width/height must be even (required for yuv420p output)",
            ));
        }
        if self.audio_sample_rate == 0 {
            return Err(MemeError::validation("export.audio_sample_rate must be non-zero"));
        }
        if self.codec_preference.is_empty() {
            return Err(MemeError::validation(
                "export.codec_preference must name at least one profile",
            ));
        }
        if self.still_file_name.is_empty() || self.video_file_stem.is_empty() {
            return Err(MemeError::validation("export file names must be non-empty"));
        }
        Ok(())
    }

    /// Trailing flush delay as a [`std::time::Duration`].
    pub fn trailing_flush(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.trailing_flush_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
