//! Stroke geometry: sample fitting and outlining.

/// Incremental Catmull-Rom curve fitter.
pub mod fitter;
/// Centerline to fill-outline expansion.
pub mod outline;
