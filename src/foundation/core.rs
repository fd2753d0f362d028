use crate::foundation::error::{SigpadError, SigpadResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Largest pixel dimension the CPU rasterizer accepts.
pub const MAX_PIXEL_DIM: u32 = u16::MAX as u32;

/// Largest backing image, in pixels (256 MiB of RGBA8 per buffer).
pub const MAX_PIXEL_COUNT: u64 = 1 << 26;

/// Logical size of the drawing surface.
///
/// Points are interpreted in this coordinate space; the committed image is `ceil(size * scale)`
/// pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawSurfaceSize")]
pub struct SurfaceSize {
    width: f64,
    height: f64,
}

#[derive(serde::Deserialize)]
struct RawSurfaceSize {
    width: f64,
    height: f64,
}

impl TryFrom<RawSurfaceSize> for SurfaceSize {
    type Error = SigpadError;

    fn try_from(raw: RawSurfaceSize) -> SigpadResult<Self> {
        Self::new(raw.width, raw.height)
    }
}

impl SurfaceSize {
    /// Create a validated size. Both dimensions must be finite and strictly positive.
    pub fn new(width: f64, height: f64) -> SigpadResult<Self> {
        if !width.is_finite() || !height.is_finite() {
            return Err(SigpadError::validation("surface size must be finite"));
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(SigpadError::validation(format!(
                "surface size must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Logical width.
    pub fn width(self) -> f64 {
        self.width
    }

    /// Logical height.
    pub fn height(self) -> f64 {
        self.height
    }

    /// Return `true` when `p` lies inside the surface, edges included.
    pub fn contains(self, p: Point) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width && p.y <= self.height
    }

    /// Backing pixel dimensions for a given pixel scale.
    pub fn pixel_dims(self, scale: f64) -> SigpadResult<(u32, u32)> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(SigpadError::validation("pixel scale must be finite and > 0"));
        }
        let w = (self.width * scale).ceil();
        let h = (self.height * scale).ceil();
        if w > f64::from(MAX_PIXEL_DIM) || h > f64::from(MAX_PIXEL_DIM) {
            return Err(SigpadError::validation(format!(
                "surface of {w}x{h} pixels exceeds the {MAX_PIXEL_DIM}px rasterizer limit"
            )));
        }
        let (w, h) = ((w as u32).max(1), (h as u32).max(1));
        if u64::from(w) * u64::from(h) > MAX_PIXEL_COUNT {
            return Err(SigpadError::validation(format!(
                "surface of {w}x{h} pixels exceeds the {MAX_PIXEL_COUNT} pixel limit"
            )));
        }
        Ok((w, h))
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha (255 = opaque).
    pub a: u8,
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Rgba8 {
    /// Opaque black, the default signature color.
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);

    /// Build a color from straight-alpha components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Premultiplied bytes, in the layout used by [`crate::Bitmap`].
    pub fn premultiplied(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }

    /// Parse `RRGGBB` or `RRGGBBAA`, with or without a leading `#`.
    pub fn from_hex(s: &str) -> SigpadResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(SigpadError::validation(format!(
                "color '{s}' must be RRGGBB or RRGGBBAA"
            )));
        }
        let channel = |i: usize| -> SigpadResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| SigpadError::validation(format!("color '{s}' is not valid hex")))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

/// Return `true` when both coordinates are finite.
pub fn is_finite_point(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
