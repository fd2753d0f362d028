use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{SigpadError, SigpadResult};

/// A premultiplied RGBA8 raster, row-major, `width * height * 4` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Inclusive pixel bounds of the painted area of a [`Bitmap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBounds {
    /// Leftmost painted column.
    pub x0: u32,
    /// Topmost painted row.
    pub y0: u32,
    /// Rightmost painted column.
    pub x1: u32,
    /// Bottom painted row.
    pub y1: u32,
}

impl Bitmap {
    /// Fully transparent bitmap.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; byte_len(width, height)],
        }
    }

    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> SigpadResult<Self> {
        if data.len() != byte_len(width, height) {
            return Err(SigpadError::validation(format!(
                "premultiplied buffer holds {} bytes, expected {} for {width}x{height}",
                data.len(),
                byte_len(width, height)
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert a straight-alpha image (as decoded by the `image` crate).
    pub fn from_rgba_image(img: &image::RgbaImage) -> Self {
        let mut data = Vec::with_capacity(byte_len(img.width(), img.height()));
        for px in img.pixels() {
            let [r, g, b, a] = px.0;
            data.extend_from_slice(&Rgba8::rgba(r, g, b, a).premultiplied());
        }
        Self {
            width: img.width(),
            height: img.height(),
            data,
        }
    }

    /// Convert to a straight-alpha image for encoding.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut out = image::RgbaImage::new(self.width, self.height);
        for (dst, src) in out.pixels_mut().zip(self.data.chunks_exact(4)) {
            dst.0 = unpremultiply([src[0], src[1], src[2], src[3]]);
        }
        out
    }

    /// Decode any image format supported by the `image` crate.
    pub fn open(path: impl AsRef<Path>) -> SigpadResult<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .with_context(|| format!("open image '{}'", path.display()))?
            .to_rgba8();
        Ok(Self::from_rgba_image(&img))
    }

    /// Encode as PNG (straight alpha).
    pub fn save_png(&self, path: impl AsRef<Path>) -> SigpadResult<()> {
        let path = path.as_ref();
        self.to_rgba_image()
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Number of pixels with non-zero alpha.
    pub fn painted_pixels(&self) -> usize {
        self.data.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    /// Bounds of all pixels with non-zero alpha.
    pub fn painted_bounds(&self) -> Option<PixelBounds> {
        let mut bounds: Option<PixelBounds> = None;
        for (i, px) in self.data.chunks_exact(4).enumerate() {
            if px[3] == 0 {
                continue;
            }
            let x = (i % self.width as usize) as u32;
            let y = (i / self.width as usize) as u32;
            bounds = Some(match bounds {
                None => PixelBounds {
                    x0: x,
                    y0: y,
                    x1: x,
                    y1: y,
                },
                Some(b) => PixelBounds {
                    x0: b.x0.min(x),
                    y0: b.y0.min(y),
                    x1: b.x1.max(x),
                    y1: b.y1.max(y),
                },
            });
        }
        bounds
    }

    /// Copy into a `width x height` bitmap with the top-left corners aligned.
    ///
    /// Growing pads with transparent pixels; shrinking crops. Pixels are never resampled.
    pub fn anchored(&self, width: u32, height: u32) -> Self {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let mut out = Self::transparent(width, height);
        let copy_w = self.width.min(width) as usize * 4;
        let rows = self.height.min(height) as usize;
        let src_stride = self.width as usize * 4;
        let dst_stride = width as usize * 4;
        for row in 0..rows {
            let src = &self.data[row * src_stride..row * src_stride + copy_w];
            out.data[row * dst_stride..row * dst_stride + copy_w].copy_from_slice(src);
        }
        out
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

fn unpremultiply(px: [u8; 4]) -> [u8; 4] {
    let a = px[3];
    if a == 0 {
        return [0, 0, 0, 0];
    }
    if a == 255 {
        return px;
    }
    let un = |c: u8| -> u8 {
        let v = (u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a);
        v.min(255) as u8
    };
    [un(px[0]), un(px[1]), un(px[2]), a]
}

#[cfg(test)]
#[path = "../../tests/unit/render/bitmap.rs"]
mod tests;
