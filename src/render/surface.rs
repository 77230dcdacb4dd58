use std::io::Cursor;

use rayon::prelude::*;

use crate::assets::decode::RasterImage;
use crate::foundation::core::{Canvas, Rect};
use crate::foundation::error::{MemeError, MemeResult};
use crate::foundation::math::{premul_rgba8, unpremul_rgba8};
use crate::render::blend::{PremulRgba8, over, over_row};

/// Owned premultiplied RGBA8 render target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

/// Integer pixel span `[x0, x1) x [y0, y1)`, already clipped to a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PixelSpan {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Surface {
    /// Fully transparent surface.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0u8; canvas.rgba8_len()],
        }
    }

    /// Surface size.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Overwrite every pixel with a straight-alpha color.
    pub fn clear(&mut self, rgba: [u8; 4]) {
        let px = premul_rgba8(rgba);
        for d in self.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Source-over a straight-alpha color onto `rect`, snapped to whole pixels.
    pub fn fill_rect(&mut self, rect: Rect, rgba: [u8; 4]) {
        let Some(span) = self.snap(rect) else {
            return;
        };
        let px = premul_rgba8(rgba);
        let stride = (self.width as usize) * 4;
        for y in span.y0..span.y1 {
            let row = &mut self.data[(y as usize) * stride..(y as usize + 1) * stride];
            for d in row[(span.x0 as usize) * 4..(span.x1 as usize) * 4].chunks_exact_mut(4) {
                let out = over([d[0], d[1], d[2], d[3]], px);
                d.copy_from_slice(&out);
            }
        }
    }

    /// Stroke the outline of `rect` with a line of `width` pixels centered on its edges.
    pub fn stroke_rect(&mut self, rect: Rect, width: f64, rgba: [u8; 4]) {
        if width <= 0.0 {
            return;
        }
        let half = width / 2.0;
        let outer = snap_rect(rect.inflate(half, half));
        let inner = snap_rect(Rect::new(
            rect.x0 + half,
            rect.y0 + half,
            rect.x1 - half,
            rect.y1 - half,
        ));
        if inner.width() <= 0.0 || inner.height() <= 0.0 {
            self.fill_rect(outer, rgba);
            return;
        }
        self.fill_rect(Rect::new(outer.x0, outer.y0, outer.x1, inner.y0), rgba);
        self.fill_rect(Rect::new(outer.x0, inner.y1, outer.x1, outer.y1), rgba);
        self.fill_rect(Rect::new(outer.x0, inner.y0, inner.x0, inner.y1), rgba);
        self.fill_rect(Rect::new(inner.x1, inner.y0, outer.x1, inner.y1), rgba);
    }

    /// Source-over `src` stretched to fill `dest`. Parts of `dest` off the surface are clipped.
    pub fn draw_raster(&mut self, src: &RasterImage, dest: Rect) -> MemeResult<()> {
        self.draw_premul(src.width, src.height, &src.rgba8_premul, dest)
    }

    /// Source-over another surface stretched to fill `dest`.
    pub fn draw_surface(&mut self, src: &Surface, dest: Rect) -> MemeResult<()> {
        self.draw_premul(src.width, src.height, &src.data, dest)
    }

    fn draw_premul(&mut self, src_w: u32, src_h: u32, src: &[u8], dest: Rect) -> MemeResult<()> {
        let dest = snap_rect(dest);
        let dw = dest.width() as u32;
        let dh = dest.height() as u32;
        if dw == 0 || dh == 0 || src_w == 0 || src_h == 0 {
            return Ok(());
        }
        let Some(span) = self.snap(dest) else {
            return Ok(());
        };

        let scaled;
        let pixels: &[u8] = if (dw, dh) == (src_w, src_h) {
            src
        } else {
            let buf = image::ImageBuffer::<image::Rgba<u8>, &[u8]>::from_raw(src_w, src_h, src)
                .ok_or_else(|| {
                    MemeError::validation(format!(
                        "source byte length {} does not match {src_w}x{src_h}",
                        src.len()
                    ))
                })?;
            // Resampled in premultiplied space.
            scaled = image::imageops::resize(&buf, dw, dh, image::imageops::FilterType::Triangle);
            scaled.as_raw()
        };

        let dx0 = dest.x0 as i64;
        let dy0 = dest.y0 as i64;
        let src_stride = (dw as usize) * 4;
        let dst_stride = (self.width as usize) * 4;
        let col_start = (i64::from(span.x0) - dx0) as usize;
        let col_end = (i64::from(span.x1) - dx0) as usize;

        self.data
            .par_chunks_exact_mut(dst_stride)
            .enumerate()
            .skip(span.y0 as usize)
            .take((span.y1 - span.y0) as usize)
            .for_each(|(y, row)| {
                let sy = (y as i64 - dy0) as usize;
                let src_row = &pixels[sy * src_stride..(sy + 1) * src_stride];
                over_row(
                    &mut row[(span.x0 as usize) * 4..(span.x1 as usize) * 4],
                    &src_row[col_start * 4..col_end * 4],
                );
            });
        Ok(())
    }

    /// Copy out as a shareable raster.
    pub fn to_raster(&self) -> RasterImage {
        RasterImage {
            width: self.width,
            height: self.height,
            rgba8_premul: std::sync::Arc::new(self.data.clone()),
        }
    }

    /// Encode as a straight-alpha PNG.
    pub fn encode_png(&self) -> MemeResult<Vec<u8>> {
        let mut straight = self.data.clone();
        for px in straight.chunks_exact_mut(4) {
            let out = unpremul_rgba8([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&out);
        }
        let img = image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| MemeError::export("surface byte length does not match its size"))?;
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .map_err(|e| MemeError::export(format!("png encode failed: {e}")))?;
        Ok(out)
    }

    fn snap(&self, rect: Rect) -> Option<PixelSpan> {
        let r = snap_rect(rect);
        let x0 = r.x0.max(0.0).min(f64::from(self.width)) as u32;
        let x1 = r.x1.max(0.0).min(f64::from(self.width)) as u32;
        let y0 = r.y0.max(0.0).min(f64::from(self.height)) as u32;
        let y1 = r.y1.max(0.0).min(f64::from(self.height)) as u32;
        (x0 < x1 && y0 < y1).then_some(PixelSpan { x0, y0, x1, y1 })
    }
}

/// Round each edge to the nearest pixel boundary and normalize the orientation.
fn snap_rect(rect: Rect) -> Rect {
    let r = rect.abs();
    Rect::new(r.x0.round(), r.y0.round(), r.x1.round(), r.y1.round())
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
