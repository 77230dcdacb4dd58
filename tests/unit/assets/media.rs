use super::*;

#[test]
fn duration_is_measured_from_samples() {
    let track = AudioTrack::silence(Duration::from_secs(2), 48_000, 2);
    assert_eq!(track.frames(), 96_000);
    assert!((track.duration_secs() - 2.0).abs() < 1e-12);
}

#[test]
fn odd_trailing_sample_is_ignored() {
    let track = AudioTrack {
        sample_rate: 4,
        channels: 2,
        interleaved_f32: Arc::new(vec![0.0; 9]),
    };
    assert_eq!(track.frames(), 4);
    assert_eq!(track.duration(), Duration::from_secs(1));
}

#[test]
fn write_f32le_round_trips_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.f32le");
    let track = AudioTrack {
        sample_rate: 8,
        channels: 1,
        interleaved_f32: Arc::new(vec![0.5, -1.0]),
    };
    track.write_f32le(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 8);
    assert_eq!(f32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), -1.0);
}

#[test]
fn missing_file_is_export_error() {
    let mut src = FileAudioSource::new("/definitely/not/here.mp3", 48_000);
    assert!(matches!(src.load(), Err(MemeError::Export(_))));
}
