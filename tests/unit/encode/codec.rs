use super::*;

const ENCODERS: &str = "\
Encoders:
 V..... = Video
 A..... = Audio
 ------
 V....D libx264              libx264 H.264 / AVC / MPEG-4 AVC (codec h264)
 V....D libvpx               libvpx VP8 (codec vp8)
 V....D libvpx-vp9           libvpx VP9 (codec vp9)
 A....D aac                  AAC (Advanced Audio Coding)
 A....D libopus              libopus Opus (codec opus)
 A....D libvorbis            libvorbis (codec vorbis)
";

const MUXERS: &str = "\
File formats:
 D. = Demuxing supported
 .E = Muxing supported
 --
  E mp4             MP4 (MPEG-4 Part 14)
  E webm            WebM
 DE matroska,webm   Matroska / WebM
";

#[test]
fn parses_encoder_and_muxer_names() {
    let caps = FfmpegCapabilities::from_listings(ENCODERS, MUXERS);
    assert!(caps.has_encoder("libx264"));
    assert!(caps.has_encoder("libvorbis"));
    assert!(!caps.has_encoder("Video"));
    assert!(caps.has_muxer("mp4"));
    assert!(caps.has_muxer("matroska"));
    assert!(caps.has_muxer("webm"));
    assert!(!caps.has_muxer("Demuxing"));
}

#[test]
fn full_ffmpeg_prefers_mp4() {
    let caps = FfmpegCapabilities::from_listings(ENCODERS, MUXERS);
    assert_eq!(
        negotiate(&EncodingProfile::DEFAULT_PREFERENCE, &caps).unwrap(),
        EncodingProfile::Mp4H264Aac
    );
}

#[test]
fn missing_h264_falls_back_to_webm() {
    let encoders = ENCODERS.replace("libx264", "libfoo");
    let caps = FfmpegCapabilities::from_listings(&encoders, MUXERS);
    let profile = negotiate(&EncodingProfile::DEFAULT_PREFERENCE, &caps).unwrap();
    assert_eq!(profile, EncodingProfile::WebmVp9Opus);
    assert_eq!(profile.extension(), "webm");
}

#[test]
fn baseline_is_last_resort() {
    let caps = StaticCapabilities(vec![EncodingProfile::WebmVp8Vorbis]);
    assert_eq!(
        negotiate(&EncodingProfile::DEFAULT_PREFERENCE, &caps).unwrap(),
        EncodingProfile::WebmVp8Vorbis
    );
}

#[test]
fn exhausted_chain_is_export_error() {
    let err = negotiate(
        &EncodingProfile::DEFAULT_PREFERENCE,
        &StaticCapabilities::default(),
    )
    .unwrap_err();
    assert!(err.is_export());
}

#[test]
fn profiles_serialize_snake_case() {
    assert_eq!(
        serde_json::to_string(&EncodingProfile::WebmVp9Opus).unwrap(),
        "\"webm_vp9_opus\""
    );
}
