//! Sigpad is a freehand signature drawing model.
//!
//! Pointer samples go in; a smooth, antialiased signature comes out. The model fits samples into
//! cubic Bezier spans as they arrive, keeps the stroke in progress as vector geometry, and
//! rasterizes finished strokes into one persistent premultiplied bitmap.
//!
//! # Pipeline overview
//!
//! 1. **Enqueue**: [`SignatureModel`] calls return immediately after queueing a command
//! 2. **Fit**: the worker extends a [`CurveFitter`] with each accepted sample
//! 3. **Commit**: on stroke end the [`StrokeCompositor`] fills the stroke outline (vello_cpu)
//!    and composites it over the committed image
//! 4. **Deliver**: [`Output`] snapshots reach callers on a [`CallbackExecutor`] of their choice
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single writer**: only the worker thread mutates drawing state; snapshots are immutable
//!   copy-on-write values.
//! - **Nothing is fatal**: invalid samples and sizes are logged and ignored at the worker.
//! - **Premultiplied RGBA8** end-to-end.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod curve;
pub mod render;
pub mod session;

pub use curve::fitter::{CurveFitter, PushOutcome, catmull_rom_span};
pub use curve::outline::{outline_bounds, stroke_outline};
pub use foundation::config::ModelConfig;
pub use foundation::core::{
    Affine, BezPath, MAX_PIXEL_COUNT, MAX_PIXEL_DIM, Point, Rect, Rgba8, SurfaceSize, Vec2, is_finite_point,
};
pub use foundation::error::{SigpadError, SigpadResult};
pub use render::bitmap::{Bitmap, PixelBounds};
pub use render::composite::{PremulRgba8, blend_over, composite_layer};
pub use render::compositor::StrokeCompositor;
pub use session::executor::{
    CallbackExecutor, CallbackPump, ChannelExecutor, Job, WorkerExecutor, callback_channel,
};
pub use session::model::SignatureModel;
pub use session::output::{LiveCurve, Output};
pub use session::queue::ObserverId;
