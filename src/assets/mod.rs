//! Decoded rasters, background ingestion, generation and soundtrack loading.

/// Image decoding into premultiplied rasters.
pub mod decode;
/// Background generation through a pluggable backend.
pub mod generate;
/// Background and overlay ingestion.
pub mod ingest;
/// Soundtrack decoding.
pub mod media;
