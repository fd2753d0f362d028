//! Async coordination: the command queue, its single worker, and the public façade.

/// Callback execution contexts for snapshot delivery.
pub mod executor;
pub(crate) mod model;
/// Immutable snapshots handed to renderers.
pub mod output;
pub(crate) mod queue;
pub(crate) mod worker;
