//! memeframe places a logo overlay on a background image and exports the result.
//!
//! The public API is session-oriented:
//!
//! - Create an [`EditorSession`] around an [`OverlayAsset`]
//! - Upload or generate a background, then drag, resize and scale the overlay with pointer input
//! - Export a PNG still, or a portrait video synchronized to a soundtrack through a [`Recorder`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Decoded rasters, ingestion, generation and soundtrack loading.
pub mod assets;
/// Tunables for the editor and the export pipeline.
pub mod config;
/// Overlay transform engine.
pub mod editor;
/// Codec negotiation and recorder backends.
pub mod encode;
/// Still and video export.
pub mod export;
/// Pointer input mapping.
pub mod input;
/// Software compositing and preview redraw.
pub mod render;
/// The editing control surface.
pub mod session;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{MemeError, MemeResult};

pub use crate::assets::decode::RasterImage;
pub use crate::assets::generate::{GenerationRequest, ImageGenerator};
pub use crate::assets::ingest::{BackgroundImage, OverlayAsset};
pub use crate::assets::media::{AudioSource, AudioTrack, FileAudioSource, InMemoryAudioSource};
pub use crate::config::{EditorConfig, ExportConfig, MemeframeConfig};
pub use crate::editor::handles::{CursorHint, HandleId};
pub use crate::editor::model::{InteractionState, TransformModel};
pub use crate::editor::transform::{ScaleBounds, Transform};
pub use crate::encode::codec::{
    CapabilityQuery, EncodingProfile, FfmpegCapabilities, StaticCapabilities,
};
pub use crate::encode::ffmpeg::FfmpegRecorder;
pub use crate::encode::recorder::{InMemoryRecorder, Recorder, RecorderState};
pub use crate::export::artifact::Artifact;
pub use crate::export::clock::{Clock, SystemClock, VirtualClock};
pub use crate::export::pipeline::{ExportPhase, ExportPipeline};
pub use crate::export::video::{ExportEvent, ExportObserver, ExportSession, VideoExportEnv};
pub use crate::input::coords::{CanvasLayout, PointerInput};
pub use crate::render::surface::Surface;
pub use crate::session::{EditorSession, GestureKind};
