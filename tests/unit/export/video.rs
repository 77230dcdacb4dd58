use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::*;
use crate::assets::decode::RasterImage;
use crate::assets::ingest::{OverlayAsset, background_from_raster};
use crate::assets::media::{AudioTrack, InMemoryAudioSource};
use crate::editor::transform::Transform;
use crate::encode::codec::{EncodingProfile, StaticCapabilities};
use crate::encode::recorder::InMemoryRecorder;
use crate::export::clock::{Clock, VirtualClock};
use crate::export::pipeline::ExportPipeline;
use crate::export::snapshot::CompositeSnapshot;
use crate::foundation::core::{Canvas, Point};

fn small_cfg() -> ExportConfig {
    ExportConfig {
        output: Canvas::new(108, 192).unwrap(),
        ..ExportConfig::default()
    }
}

fn snapshot() -> CompositeSnapshot {
    CompositeSnapshot {
        background: background_from_raster(
            RasterImage::solid(50, 50, [200, 10, 10, 255]).unwrap(),
            0,
        )
        .unwrap(),
        overlay: OverlayAsset::from_raster(RasterImage::solid(10, 10, [0, 0, 255, 255]).unwrap()),
        transform: Transform {
            position: Point::new(20.0, 20.0),
            scale: 1.0,
        },
    }
}

fn two_seconds() -> InMemoryAudioSource {
    InMemoryAudioSource(AudioTrack::silence(Duration::from_secs(2), 48_000, 2))
}

fn all_profiles() -> StaticCapabilities {
    StaticCapabilities(EncodingProfile::DEFAULT_PREFERENCE.to_vec())
}

struct FailingAudio;

impl AudioSource for FailingAudio {
    fn load(&mut self) -> MemeResult<crate::assets::media::AudioTrack> {
        Err(MemeError::export("error loading background music: not found"))
    }
}

/// Accepts `fail_at` frames, then errors.
struct FlakyRecorder {
    inner: InMemoryRecorder,
    fail_at: u64,
    aborted: bool,
}

impl Recorder for FlakyRecorder {
    fn state(&self) -> RecorderState {
        self.inner.state()
    }

    fn start(&mut self, cfg: RecorderConfig) -> MemeResult<()> {
        self.inner.start(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Surface) -> MemeResult<()> {
        if idx.0 >= self.fail_at {
            return Err(MemeError::export("encoder crashed"));
        }
        self.inner.push_frame(idx, frame)
    }

    fn stop(&mut self) -> MemeResult<Option<Vec<Vec<u8>>>> {
        self.inner.stop()
    }

    fn abort(&mut self) {
        self.aborted = true;
        self.inner.abort();
    }
}

#[test]
fn two_second_track_yields_fifty_frames_and_one_stop() {
    let pipeline = ExportPipeline::new(small_cfg());
    let mut audio = two_seconds();
    let mut recorder = InMemoryRecorder::new();
    let caps = all_profiles();
    let mut clock = VirtualClock::new();
    let mut events = Vec::new();

    let mut export = pipeline
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
    assert_eq!(pipeline.phase(), ExportPhase::ComposingVideo);
    let artifact = export
        .run(&mut |e: &ExportEvent| events.push(e.clone()))
        .unwrap();

    let session = export.session().clone();
    assert_eq!(session.total_frames, 50);
    assert_eq!(session.frame_index, 50);
    assert_eq!(session.progress_percent, 100);
    assert_eq!(session.stop_reason, Some(StopReason::FramesExhausted));
    assert_eq!(session.recorder_state, RecorderState::Stopped);
    drop(export);

    assert_eq!(pipeline.phase(), ExportPhase::Idle);
    assert_eq!(artifact.file_name, "meme-video.mp4");
    assert_eq!(artifact.mime_type, "video/mp4");
    assert!(!artifact.bytes.is_empty());

    assert_eq!(recorder.frames().len(), 50);
    assert_eq!(recorder.start_count(), 1);
    assert_eq!(recorder.stop_count(), 1);
    let cfg = recorder.config().unwrap();
    assert_eq!(cfg.video_bitrate, 5_000_000);
    assert_eq!(cfg.audio.as_ref().unwrap().channels, 2);

    // 49 frame gaps of 40 ms, then the 1 s trailing flush.
    assert_eq!(clock.elapsed(), Duration::from_millis(49 * 40 + 1000));

    let progress: Vec<u8> = events
        .iter()
        .filter_map(|e| match e {
            ExportEvent::Progress(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(progress.len(), 50);
    assert_eq!(progress[0], 2);
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(
        events.last(),
        Some(&ExportEvent::Finished {
            file_name: "meme-video.mp4".to_string(),
            len: artifact.bytes.len(),
        })
    );
}

#[test]
fn audio_ending_first_still_covers_the_soundtrack() {
    let pipeline = ExportPipeline::new(small_cfg());
    let mut audio = two_seconds();
    let mut recorder = InMemoryRecorder::new();
    let caps = all_profiles();
    let mut clock = VirtualClock::with_drift(Duration::from_millis(100));
    let mut progress = Vec::new();

    let mut export = pipeline
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
    export
        .run(&mut |e: &ExportEvent| {
            if let ExportEvent::Progress(p) = e {
                progress.push(*p);
            }
        })
        .unwrap();
    assert_eq!(export.session().stop_reason, Some(StopReason::AudioEnded));
    assert_eq!(export.session().frame_index, 50);
    drop(export);

    let indices: Vec<u64> = recorder.frames().iter().map(|f| f.0).collect();
    assert_eq!(indices, (0..50).collect::<Vec<_>>());
    assert_eq!(recorder.stop_count(), 1);
    assert_eq!(progress.len(), 50);
    assert_eq!(progress.last(), Some(&100));
}

#[test]
fn small_drift_does_not_shorten_the_video() {
    let pipeline = ExportPipeline::new(small_cfg());
    let mut audio = two_seconds();
    let mut recorder = InMemoryRecorder::new();
    let caps = all_profiles();
    let mut clock = VirtualClock::with_drift(Duration::from_millis(20));

    let mut export = pipeline
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
    export.run(&mut |_: &ExportEvent| {}).unwrap();
    // Sleeps target absolute deadlines, so drift does not accumulate across ticks.
    assert_eq!(export.session().stop_reason, Some(StopReason::FramesExhausted));
    drop(export);

    assert_eq!(recorder.frames().len(), 50);
    assert_eq!(recorder.stop_count(), 1);
}

/// Clock shared with a recorder so that encoding work advances time.
#[derive(Clone, Debug, Default)]
struct SharedClock(Arc<Mutex<Duration>>);

impl SharedClock {
    fn advance(&self, dur: Duration) {
        *self.0.lock().unwrap() += dur;
    }
}

impl Clock for SharedClock {
    fn elapsed(&self) -> Duration {
        *self.0.lock().unwrap()
    }

    fn sleep(&mut self, dur: Duration) {
        self.advance(dur);
    }
}

/// Recorder whose every frame costs `cost` on the shared clock.
struct SlowRecorder {
    inner: InMemoryRecorder,
    clock: SharedClock,
    cost: Duration,
}

impl Recorder for SlowRecorder {
    fn state(&self) -> RecorderState {
        self.inner.state()
    }

    fn start(&mut self, cfg: RecorderConfig) -> MemeResult<()> {
        self.inner.start(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Surface) -> MemeResult<()> {
        self.clock.advance(self.cost);
        self.inner.push_frame(idx, frame)
    }

    fn stop(&mut self) -> MemeResult<Option<Vec<Vec<u8>>>> {
        self.inner.stop()
    }

    fn abort(&mut self) {
        self.inner.abort();
    }
}

fn run_with_encode_cost(cost_ms: u64) -> (ExportSession, SlowRecorder, SharedClock) {
    let pipeline = ExportPipeline::new(small_cfg());
    let mut audio = two_seconds();
    let mut clock = SharedClock::default();
    let mut recorder = SlowRecorder {
        inner: InMemoryRecorder::new(),
        clock: clock.clone(),
        cost: Duration::from_millis(cost_ms),
    };
    let caps = all_profiles();

    let mut export = pipeline
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
    export.run(&mut |_: &ExportEvent| {}).unwrap();
    let session = export.session().clone();
    drop(export);
    (session, recorder, clock)
}

#[test]
fn encode_time_is_absorbed_by_the_tick_deadline() {
    let (session, recorder, clock) = run_with_encode_cost(30);
    assert_eq!(session.total_frames, 50);
    assert_eq!(session.stop_reason, Some(StopReason::FramesExhausted));
    assert_eq!(recorder.inner.frames().len(), 50);
    // Last frame due at 1960 ms, costs 30 ms, then the 1 s flush.
    assert_eq!(clock.elapsed(), Duration::from_millis(1960 + 30 + 1000));
}

#[test]
fn encoder_slower_than_real_time_still_emits_every_frame() {
    let (session, recorder, _) = run_with_encode_cost(60);
    assert_eq!(session.stop_reason, Some(StopReason::AudioEnded));
    let indices: Vec<u64> = recorder.inner.frames().iter().map(|f| f.0).collect();
    assert_eq!(indices, (0..session.total_frames).collect::<Vec<_>>());
    assert_eq!(recorder.inner.stop_count(), 1);
}

#[test]
fn letterboxed_frame_is_padded_black() {
    let pipeline = ExportPipeline::new(small_cfg());
    let mut audio = two_seconds();
    let mut recorder = InMemoryRecorder::new();
    let caps = all_profiles();
    let mut clock = VirtualClock::new();
    let export = pipeline
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
    let frame = export.frame();
    assert_eq!((frame.width, frame.height), (108, 192));
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(5, 96), Some([200, 10, 10, 255]));
}

#[test]
fn audio_failure_aborts_and_resets() {
    let pipeline = ExportPipeline::new(small_cfg());
    let mut audio = FailingAudio;
    let mut recorder = InMemoryRecorder::new();
    let caps = all_profiles();
    let mut clock = VirtualClock::new();
    let mut events = Vec::new();

    let mut export = pipeline
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
    let err = export
        .run(&mut |e: &ExportEvent| events.push(e.clone()))
        .unwrap_err();
    assert!(err.is_export());
    assert_eq!(export.session().progress_percent, 0);
    drop(export);

    assert_eq!(pipeline.phase(), ExportPhase::Idle);
    assert_eq!(recorder.start_count(), 0);
    assert!(matches!(events.last(), Some(ExportEvent::Failed(msg)) if msg.contains("background music")));
}

#[test]
fn encoder_failure_halts_recorder() {
    let pipeline = ExportPipeline::new(small_cfg());
    let mut audio = two_seconds();
    let mut recorder = FlakyRecorder {
        inner: InMemoryRecorder::new(),
        fail_at: 10,
        aborted: false,
    };
    let caps = all_profiles();
    let mut clock = VirtualClock::new();
    let mut events = Vec::new();

    let mut export = pipeline
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
    assert!(export.run(&mut |e: &ExportEvent| events.push(e.clone())).is_err());
    assert_eq!(export.session().progress_percent, 0);
    assert_eq!(export.session().recorder_state, RecorderState::Stopped);
    drop(export);

    assert!(recorder.aborted);
    assert_eq!(recorder.inner.stop_count(), 0);
    assert_eq!(pipeline.phase(), ExportPhase::Idle);
    assert!(matches!(events.last(), Some(ExportEvent::Failed(_))));
}

#[test]
fn exhausted_negotiation_never_starts_recorder() {
    let pipeline = ExportPipeline::new(small_cfg());
    let mut audio = two_seconds();
    let mut recorder = InMemoryRecorder::new();
    let caps = StaticCapabilities::default();
    let mut clock = VirtualClock::new();

    let mut export = pipeline
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
    assert!(export.run(&mut |_: &ExportEvent| {}).unwrap_err().is_export());
    drop(export);
    assert_eq!(recorder.start_count(), 0);
}

#[test]
fn webm_fallback_sets_extension() {
    let pipeline = ExportPipeline::new(small_cfg());
    let mut audio = two_seconds();
    let mut recorder = InMemoryRecorder::new();
    let caps = StaticCapabilities(vec![EncodingProfile::WebmVp8Vorbis]);
    let mut clock = VirtualClock::new();

    let mut export = pipeline
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
    let artifact = export.run(&mut |_: &ExportEvent| {}).unwrap();
    assert_eq!(artifact.file_name, "meme-video.webm");
    assert!(artifact.mime_type.starts_with("video/webm"));
}

#[test]
fn silent_zero_length_track_is_rejected() {
    let pipeline = ExportPipeline::new(small_cfg());
    let mut audio = InMemoryAudioSource(AudioTrack::silence(Duration::ZERO, 48_000, 2));
    let mut recorder = InMemoryRecorder::new();
    let caps = all_profiles();
    let mut clock = VirtualClock::new();

    let mut export = pipeline
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
    assert!(export.run(&mut |_: &ExportEvent| {}).is_err());
}

#[test]
fn run_twice_is_rejected() {
    let pipeline = ExportPipeline::new(small_cfg());
    let mut audio = two_seconds();
    let mut recorder = InMemoryRecorder::new();
    let caps = all_profiles();
    let mut clock = VirtualClock::new();

    let mut export = pipeline
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
    export.run(&mut |_: &ExportEvent| {}).unwrap();
    assert!(export.run(&mut |_: &ExportEvent| {}).is_err());
}

#[test]
fn latch_fires_once() {
    let mut latch = Latch::default();
    assert!(!latch.is_fired());
    assert!(latch.fire());
    assert!(!latch.fire());
    assert!(latch.is_fired());
}
