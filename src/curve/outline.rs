use kurbo::{Cap, Join, Shape, Stroke, StrokeOpts};

use crate::foundation::core::{BezPath, Rect};

/// Expand a centerline into a closed, fillable outline with round caps and joins.
pub fn stroke_outline(centerline: &BezPath, width: f64, tolerance: f64) -> BezPath {
    let style = Stroke::new(width)
        .with_caps(Cap::Round)
        .with_join(Join::Round);
    kurbo::stroke(centerline.iter(), &style, &StrokeOpts::default(), tolerance)
}

/// Bounding box of an outline, or `None` for an empty path.
pub fn outline_bounds(outline: &BezPath) -> Option<Rect> {
    if outline.elements().is_empty() {
        return None;
    }
    Some(outline.bounding_box())
}
