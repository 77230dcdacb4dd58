//! Pointer input normalization.

/// Display-to-raster coordinate mapping.
pub mod coords;
