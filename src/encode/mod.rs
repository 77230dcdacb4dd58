//! Codec negotiation and recorder backends.

/// Encoding profiles and capability negotiation.
pub mod codec;
/// `ffmpeg`-backed recorder.
pub mod ffmpeg;
/// Recorder contract and in-memory recorder.
pub mod recorder;
