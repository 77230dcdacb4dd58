//! Overlay transform engine: hit-testing, dragging and aspect-locked resizing.

/// Resize handles and hit-testing.
pub mod handles;
/// Interaction state machine over the overlay transform.
pub mod model;
/// Overlay transform and scale bounds.
pub mod transform;
