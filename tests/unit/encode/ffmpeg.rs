use super::*;
use crate::foundation::core::{Canvas, Fps};

#[test]
fn flatten_alpha_0_returns_bg() {
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &[0, 0, 0, 0], [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_alpha_255_is_identity() {
    let src = [1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src.to_vec());
}

#[test]
fn flatten_half_red_over_black() {
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &[128, 0, 0, 128], [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

#[test]
fn odd_dimensions_are_rejected_before_spawning() {
    let mut rec = FfmpegRecorder::new();
    let err = rec
        .start(RecorderConfig {
            profile: EncodingProfile::Mp4H264Aac,
            canvas: Canvas::new(11, 10).unwrap(),
            fps: Fps::whole(25).unwrap(),
            video_bitrate: 5_000_000,
            audio: None,
            bg_rgba: [0, 0, 0, 255],
        })
        .unwrap_err();
    assert!(matches!(err, MemeError::Validation(_)));
    assert_eq!(rec.state(), RecorderState::Inactive);
}

#[test]
fn stop_without_start_is_noop() {
    let mut rec = FfmpegRecorder::new();
    assert!(rec.stop().unwrap().is_none());
}
