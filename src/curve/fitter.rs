//! Incremental Catmull-Rom fitting of raw samples into cubic Bezier spans.
//!
//! The fitter keeps the last four accepted samples. Span `p[i] -> p[i+1]` is a cubic whose
//! control points come from the uniform Catmull-Rom tangents at its ends; it is *finalized* once
//! `p[i+2]` is known and is never recomputed afterwards. The last span is provisional: its far
//! tangent duplicates the final sample until another one arrives.

use kurbo::CubicBez;

use crate::foundation::core::{BezPath, Point, is_finite_point};

const WINDOW: usize = 4;

/// Outcome of feeding one sample to a [`CurveFitter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushOutcome {
    /// The sample extended the curve.
    Accepted,
    /// The sample equals the previous one and cannot move the curve.
    Duplicate,
    /// The sample had a non-finite coordinate.
    NonFinite,
}

/// Causal, append-only curve fitter for one open stroke.
#[derive(Clone, Debug, Default)]
pub struct CurveFitter {
    window: Vec<Point>,
    finalized: Vec<CubicBez>,
    accepted: usize,
}

impl CurveFitter {
    /// Empty fitter for a fresh stroke.
    pub fn new() -> Self {
        Self {
            window: Vec::with_capacity(WINDOW),
            finalized: Vec::new(),
            accepted: 0,
        }
    }

    /// Feed the next sample. O(1) per call.
    pub fn push(&mut self, p: Point) -> PushOutcome {
        if !is_finite_point(p) {
            return PushOutcome::NonFinite;
        }
        if self.window.last() == Some(&p) {
            return PushOutcome::Duplicate;
        }

        if self.window.len() == WINDOW {
            self.window.remove(0);
        }
        self.window.push(p);
        self.accepted += 1;

        // With n >= 3 samples, span (n-3 -> n-2) now has both neighbours.
        if self.accepted >= 3 {
            let n = self.window.len();
            let p1 = self.window[n - 3];
            let p2 = self.window[n - 2];
            let p0 = if n >= 4 { self.window[n - 4] } else { p1 };
            self.finalized.push(catmull_rom_span(p0, p1, p2, p));
        }
        PushOutcome::Accepted
    }

    /// Number of samples accepted so far.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Number of finalized spans currently held (excludes anything already taken).
    pub fn finalized_len(&self) -> usize {
        self.finalized.len()
    }

    /// The provisional last span, if at least two samples were accepted.
    pub fn tail(&self) -> Option<CubicBez> {
        let n = self.window.len();
        if n < 2 {
            return None;
        }
        let p1 = self.window[n - 2];
        let p2 = self.window[n - 1];
        let p0 = if n >= 3 { self.window[n - 3] } else { p1 };
        Some(catmull_rom_span(p0, p1, p2, p2))
    }

    /// Finalized spans followed by the provisional tail, or `None` for fewer than two samples.
    pub fn path(&self) -> Option<BezPath> {
        let tail = self.tail()?;
        Some(spans_to_path(self.finalized.iter().copied().chain([tail])))
    }

    /// Remove and return the finalized spans as a path.
    ///
    /// The remaining [`Self::path`] starts exactly where the returned path ends.
    pub fn take_finalized(&mut self) -> Option<BezPath> {
        if self.finalized.is_empty() {
            return None;
        }
        let spans = std::mem::take(&mut self.finalized);
        Some(spans_to_path(spans))
    }
}

/// Uniform Catmull-Rom span from `p1` to `p2` expressed as a cubic Bezier.
pub fn catmull_rom_span(p0: Point, p1: Point, p2: Point, p3: Point) -> CubicBez {
    let c1 = p1 + (p2 - p0) / 6.0;
    let c2 = p2 - (p3 - p1) / 6.0;
    CubicBez::new(p1, c1, c2, p2)
}

fn spans_to_path(spans: impl IntoIterator<Item = CubicBez>) -> BezPath {
    let mut path = BezPath::new();
    for (i, span) in spans.into_iter().enumerate() {
        if i == 0 {
            path.move_to(span.p0);
        }
        path.curve_to(span.p1, span.p2, span.p3);
    }
    path
}

#[cfg(test)]
#[path = "../../tests/unit/curve/fitter.rs"]
mod tests;
