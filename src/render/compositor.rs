use std::sync::Arc;

use crate::curve::outline::stroke_outline;
use crate::foundation::config::ModelConfig;
use crate::foundation::core::{Affine, BezPath, Rgba8, SurfaceSize};
use crate::foundation::error::{SigpadError, SigpadResult};
use crate::render::bitmap::Bitmap;
use crate::render::composite::{composite_layer, union_layer};
use crate::render::cpu::{fill_outline_over, rasterize_outline};

/// Owner of the committed image: every finalized stroke, merged into one premultiplied bitmap.
///
/// The image is held behind an [`Arc`]; mutation goes through [`Arc::make_mut`], so bitmaps
/// already handed out in snapshots are never written to.
#[derive(Clone, Debug)]
pub struct StrokeCompositor {
    stroke_width: f64,
    tolerance: f64,
    pixel_scale: f64,
    pixel_dims: Option<(u32, u32)>,
    committed: Option<Arc<Bitmap>>,
    open: Option<OpenStroke>,
}

/// Pieces already committed from a stroke that has not ended yet.
#[derive(Clone, Debug)]
struct OpenStroke {
    below: Option<Arc<Bitmap>>,
    layer: Bitmap,
}

impl StrokeCompositor {
    /// Compositor with no target size and no content.
    pub fn new(stroke_width: f64, tolerance: f64, pixel_scale: f64) -> Self {
        Self {
            stroke_width,
            tolerance,
            pixel_scale,
            pixel_dims: None,
            committed: None,
            open: None,
        }
    }

    /// Compositor using the stroke and scale options of `cfg`.
    pub fn from_config(cfg: &ModelConfig) -> Self {
        Self::new(cfg.stroke_width, cfg.curve_tolerance, cfg.pixel_scale)
    }

    /// Logical to pixel transform.
    pub fn pixel_transform(&self) -> Affine {
        Affine::scale(self.pixel_scale)
    }

    /// Pixels per logical unit.
    pub fn pixel_scale(&self) -> f64 {
        self.pixel_scale
    }

    /// Stroke width in logical units.
    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    /// Current backing size in pixels, once a surface size is known.
    pub fn pixel_dims(&self) -> Option<(u32, u32)> {
        self.pixel_dims
    }

    /// Fill outline for a centerline, in logical coordinates.
    pub fn outline(&self, centerline: &BezPath) -> BezPath {
        stroke_outline(centerline, self.stroke_width, self.tolerance)
    }

    /// Re-target to a new surface size. Existing content stays anchored at the top-left corner;
    /// it is padded or cropped, never scaled.
    pub fn resize(&mut self, size: SurfaceSize) -> SigpadResult<()> {
        let (w, h) = size.pixel_dims(self.pixel_scale)?;
        self.pixel_dims = Some((w, h));
        if let Some(img) = self.committed.as_mut()
            && (img.width() != w || img.height() != h)
        {
            *img = Arc::new(img.anchored(w, h));
        }
        if let Some(open) = self.open.as_mut() {
            open.layer = open.layer.anchored(w, h);
            if let Some(below) = open.below.as_mut() {
                *below = Arc::new(below.anchored(w, h));
            }
        }
        Ok(())
    }

    fn require_dims(&self) -> SigpadResult<(u32, u32)> {
        self.pixel_dims
            .ok_or_else(|| SigpadError::render("commit before a surface size was set"))
    }

    /// Rasterize `centerline` in `color` and merge it into the committed image.
    ///
    /// When earlier pieces of the same stroke were committed with [`Self::commit_piece`], this
    /// is the stroke's last piece and joins them. Returns `false` (and leaves the image
    /// untouched) for an empty centerline.
    pub fn commit(&mut self, centerline: &BezPath, color: Rgba8) -> SigpadResult<bool> {
        if self.open.is_some() {
            return self.commit_piece(centerline, color);
        }
        if centerline.elements().len() < 2 {
            return Ok(false);
        }
        let (w, h) = self.require_dims()?;

        let outline = self.outline(centerline);
        let transform = self.pixel_transform();
        let img = self
            .committed
            .get_or_insert_with(|| Arc::new(Bitmap::transparent(w, h)));
        fill_outline_over(Arc::make_mut(img), &outline, color, transform)?;
        Ok(true)
    }

    /// Commit part of a stroke that is still being drawn.
    ///
    /// Pieces of one stroke are merged by coverage before they are blended over the image below
    /// them, so the round caps where two pieces meet are not inked twice.
    pub fn commit_piece(&mut self, centerline: &BezPath, color: Rgba8) -> SigpadResult<bool> {
        if centerline.elements().len() < 2 {
            return Ok(false);
        }
        let (w, h) = self.require_dims()?;
        let outline = self.outline(centerline);
        let piece = rasterize_outline(&outline, color, self.pixel_transform(), w, h)?;

        let open = self.open.get_or_insert_with(|| OpenStroke {
            below: self.committed.clone(),
            layer: Bitmap::transparent(w, h),
        });
        union_layer(open.layer.data_mut(), &piece)?;

        let mut merged = match &open.below {
            Some(below) => below.as_ref().clone(),
            None => Bitmap::transparent(w, h),
        };
        composite_layer(merged.data_mut(), open.layer.data())?;
        self.committed = Some(Arc::new(merged));
        Ok(true)
    }

    /// Forget the pieces of the stroke that just ended. Its ink stays in the committed image.
    pub fn close_stroke(&mut self) {
        self.open = None;
    }

    /// Replace the committed image, e.g. with a previously saved signature.
    ///
    /// Pieces of an open stroke committed so far are replaced along with everything else.
    pub fn inject(&mut self, image: Bitmap) {
        self.open = None;
        let image = match self.pixel_dims {
            Some((w, h)) => image.anchored(w, h),
            None => image,
        };
        self.committed = Some(Arc::new(image));
    }

    /// Drop all committed content. The target size is kept.
    pub fn reset(&mut self) {
        self.committed = None;
        self.open = None;
    }

    /// Shared handle to the committed image, or `None` when nothing was committed or injected.
    pub fn committed(&self) -> Option<Arc<Bitmap>> {
        self.committed.clone()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
