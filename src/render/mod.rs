//! Rasterization and the committed-image compositor (CPU, premultiplied RGBA8).

/// Premultiplied RGBA8 bitmap and conversions.
pub mod bitmap;
/// Source-over merge of stroke layers.
pub mod composite;
/// Committed-image owner.
pub mod compositor;
/// vello_cpu fill rasterizer.
pub mod cpu;
