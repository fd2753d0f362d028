use std::sync::Arc;

use crate::foundation::core::{Affine, BezPath, Rgba8, SurfaceSize};
use crate::render::bitmap::Bitmap;
use crate::render::cpu::fill_outline_over;

/// Vector geometry of the stroke in progress. Never rasterized by the model itself.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveCurve {
    /// Fitted cubic spans through the stroke's samples (logical coordinates).
    pub centerline: Arc<BezPath>,
    /// Closed fill outline of the centerline at the configured stroke width.
    pub outline: Arc<BezPath>,
    /// Color the renderer should fill `outline` with.
    pub color: Rgba8,
    /// Stroke width in logical units.
    pub stroke_width: f64,
}

/// Immutable snapshot of the drawing state, safe to read on any thread.
#[derive(Clone, Debug, PartialEq)]
pub struct Output {
    /// All finalized strokes; `None` until something is committed or injected.
    pub committed: Option<Arc<Bitmap>>,
    /// The open stroke, if it has at least two samples.
    pub live: Option<LiveCurve>,
    /// Surface size at the time of the snapshot.
    pub surface: Option<SurfaceSize>,
    /// Backing pixels per logical unit.
    pub pixel_scale: f64,
    /// Count of state changes applied before this snapshot was taken.
    pub revision: u64,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            committed: None,
            live: None,
            surface: None,
            pixel_scale: 1.0,
            revision: 0,
        }
    }
}

impl Output {
    /// `true` when there is neither committed content nor a live stroke.
    pub fn is_empty(&self) -> bool {
        self.committed.is_none() && self.live.is_none()
    }

    /// The whole signature: committed image with the live stroke composited on top.
    ///
    /// Returns `None` ("no signature") when [`Self::is_empty`].
    pub fn full_image(&self) -> Option<Bitmap> {
        if self.is_empty() {
            return None;
        }
        let mut image = match (&self.committed, self.surface) {
            (Some(committed), _) => committed.as_ref().clone(),
            (None, Some(surface)) => {
                let (w, h) = surface.pixel_dims(self.pixel_scale).ok()?;
                Bitmap::transparent(w, h)
            }
            (None, None) => return None,
        };
        if let Some(live) = &self.live
            && let Err(err) = fill_outline_over(
                &mut image,
                &live.outline,
                live.color,
                Affine::scale(self.pixel_scale),
            )
        {
            tracing::error!(%err, "failed to rasterize live stroke into full image");
        }
        Some(image)
    }
}
