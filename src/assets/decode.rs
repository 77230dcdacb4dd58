use std::sync::Arc;

use crate::foundation::core::{Canvas, Size};
use crate::foundation::error::{MemeError, MemeResult};
use crate::foundation::math::premul_rgba8;

#[derive(Clone, Debug, PartialEq)]
/// Decoded raster in premultiplied RGBA8 form. Cheap to clone.
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl RasterImage {
    /// Wrap premultiplied RGBA8 bytes, checking the length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> MemeResult<Self> {
        let canvas = Canvas::new(width, height)?;
        if rgba8_premul.len() != canvas.rgba8_len() {
            return Err(MemeError::validation(format!(
                "raster byte length {} does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Uniform color raster from a straight-alpha pixel.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> MemeResult<Self> {
        let px = premul_rgba8(rgba);
        let canvas = Canvas::new(width, height)?;
        Self::from_premul(width, height, px.repeat(canvas.rgba8_len() / 4))
    }

    /// Pixel dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Pixel dimensions as floating point.
    pub fn size(&self) -> Size {
        self.canvas().size()
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
///
/// Anything the `image` crate cannot recognize or decode is a validation error.
pub fn decode_image(bytes: &[u8]) -> MemeResult<RasterImage> {
    if bytes.is_empty() {
        return Err(MemeError::validation("image data is empty"));
    }
    let format = image::guess_format(bytes)
        .map_err(|_| MemeError::validation("please select an image file"))?;
    let dyn_img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| MemeError::validation(format!("failed to decode {format:?} image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    RasterImage::from_premul(width, height, rgba8_premul)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let out = premul_rgba8([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&out);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
