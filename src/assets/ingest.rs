use std::path::Path;

use anyhow::Context as _;

use crate::assets::decode::{RasterImage, decode_image};
use crate::foundation::core::{Canvas, Size};
use crate::foundation::error::{MemeError, MemeResult};

/// Immutable background raster owned by the editor session.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundImage(RasterImage);

impl BackgroundImage {
    /// Decoded pixels.
    pub fn raster(&self) -> &RasterImage {
        &self.0
    }

    /// Native resolution; the editing canvas rasterizes at exactly this size.
    pub fn canvas(&self) -> Canvas {
        self.0.canvas()
    }
}

/// The logo drawn on top of the background. Loaded once, shared read-only.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayAsset(RasterImage);

impl OverlayAsset {
    /// Decode overlay bytes. No minimum size applies.
    pub fn from_bytes(bytes: &[u8]) -> MemeResult<Self> {
        Ok(Self(decode_image(bytes)?))
    }

    /// Load and decode an overlay file.
    pub fn from_path(path: impl AsRef<Path>) -> MemeResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read overlay '{}'", path.display()))?;
        Self::from_bytes(&bytes)
    }

    /// Wrap an already decoded raster.
    pub fn from_raster(raster: RasterImage) -> Self {
        Self(raster)
    }

    /// Decoded pixels.
    pub fn raster(&self) -> &RasterImage {
        &self.0
    }

    /// Native size in pixels.
    pub fn native_size(&self) -> Size {
        self.0.size()
    }
}

/// Decode a user upload, rejecting non-images and anything under `min_px` on either axis.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn ingest_background(bytes: &[u8], min_px: u32) -> MemeResult<BackgroundImage> {
    background_from_raster(decode_image(bytes)?, min_px)
}

/// Decode an image from a trusted source (generation backend). No size check.
pub fn accept_trusted_background(bytes: &[u8]) -> MemeResult<BackgroundImage> {
    Ok(BackgroundImage(decode_image(bytes)?))
}

/// Wrap an already decoded raster as a background, applying the same size rule as uploads.
pub fn background_from_raster(raster: RasterImage, min_px: u32) -> MemeResult<BackgroundImage> {
    if raster.width < min_px || raster.height < min_px {
        return Err(MemeError::validation(format!(
            "image must be at least {min_px}x{min_px} pixels (got {}x{})",
            raster.width, raster.height
        )));
    }
    Ok(BackgroundImage(raster))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/ingest.rs"]
mod tests;
