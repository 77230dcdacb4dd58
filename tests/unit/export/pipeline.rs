use std::time::Duration;

use super::*;
use crate::assets::decode::RasterImage;
use crate::assets::ingest::{OverlayAsset, background_from_raster};
use crate::assets::media::{AudioTrack, InMemoryAudioSource};
use crate::editor::transform::Transform;
use crate::encode::codec::{EncodingProfile, StaticCapabilities};
use crate::encode::recorder::InMemoryRecorder;
use crate::export::clock::VirtualClock;
use crate::foundation::core::Point;

fn snapshot() -> CompositeSnapshot {
    CompositeSnapshot {
        background: background_from_raster(
            RasterImage::solid(600, 500, [10, 200, 10, 255]).unwrap(),
            500,
        )
        .unwrap(),
        overlay: OverlayAsset::from_raster(RasterImage::solid(20, 20, [0, 0, 255, 255]).unwrap()),
        transform: Transform {
            position: Point::new(100.0, 100.0),
            scale: 2.0,
        },
    }
}

#[test]
fn still_is_png_at_native_resolution_without_handles() {
    let pipeline = ExportPipeline::new(ExportConfig::default());
    let artifact = pipeline.export_still(&snapshot()).unwrap();
    assert_eq!(artifact.file_name, "meme.png");
    assert_eq!(artifact.mime_type, "image/png");

    let img = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (600, 500));
    assert_eq!(img.get_pixel(120, 120).0, [0, 0, 255, 255]);
    // No outline around the overlay box.
    assert_eq!(img.get_pixel(140, 120).0, [10, 200, 10, 255]);
    assert_eq!(img.get_pixel(99, 120).0, [10, 200, 10, 255]);
    assert_eq!(pipeline.phase(), ExportPhase::Idle);
}

#[test]
fn still_export_is_repeatable() {
    let pipeline = ExportPipeline::new(ExportConfig::default());
    let a = pipeline.export_still(&snapshot()).unwrap();
    let b = pipeline.export_still(&snapshot()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn second_export_while_one_is_active_is_rejected() {
    let cfg = ExportConfig {
        output: crate::foundation::core::Canvas::new(54, 96).unwrap(),
        ..ExportConfig::default()
    };
    let pipeline = ExportPipeline::new(cfg);
    let mut audio = InMemoryAudioSource(AudioTrack::silence(Duration::from_secs(1), 8_000, 1));
    let mut recorder = InMemoryRecorder::new();
    let caps = StaticCapabilities(EncodingProfile::DEFAULT_PREFERENCE.to_vec());
    let mut clock = VirtualClock::new();

    let pending = pipeline
        .start_video(
            &snapshot(),
            VideoExportEnv {
                audio: &mut audio,
                recorder: &mut recorder,
                capabilities: &caps,
                clock: &mut clock,
            },
        )
        .unwrap();
    assert!(pipeline.phase().is_active());
    assert!(pipeline.export_still(&snapshot()).unwrap_err().is_export());

    drop(pending);
    assert_eq!(pipeline.phase(), ExportPhase::Idle);
    assert!(pipeline.export_still(&snapshot()).is_ok());
}
