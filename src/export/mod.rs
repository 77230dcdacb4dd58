//! Still and video export.
//!
//! Exports work on a [`snapshot::CompositeSnapshot`] so editing can continue while they run.

/// Downloadable results.
pub mod artifact;
/// Time sources for the frame loop.
pub mod clock;
/// Export phase tracking and entry points.
pub mod pipeline;
/// Frozen composite inputs.
pub mod snapshot;
/// Audio-synchronized video export.
pub mod video;
