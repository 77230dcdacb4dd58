use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use memeframe::{
    Clock, EditorSession, ExportEvent, FfmpegCapabilities, FfmpegRecorder, FileAudioSource,
    GestureKind, MemeframeConfig, OverlayAsset, Point, SystemClock, VideoExportEnv, VirtualClock,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "memeframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export the composite as a PNG at the background's resolution.
    Still(StillArgs),
    /// Export a 1080x1920 video synchronized to a soundtrack (requires `ffmpeg` on PATH).
    Video(VideoArgs),
}

#[derive(Args, Debug)]
struct EditArgs {
    /// Background image (at least 500x500).
    #[arg(long)]
    background: PathBuf,

    /// Overlay (logo) image.
    #[arg(long)]
    logo: PathBuf,

    /// Overlay left edge in background pixels.
    #[arg(long, requires = "y")]
    x: Option<f64>,

    /// Overlay top edge in background pixels.
    #[arg(long, requires = "x")]
    y: Option<f64>,

    /// Overlay scale, clamped to the allowed range.
    #[arg(long)]
    scale: Option<f64>,

    /// JSON array of `{ "kind": "down"|"move"|"up", "x": .., "y": .. }` steps in background pixels.
    #[arg(long)]
    gestures: Option<PathBuf>,

    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct StillArgs {
    #[command(flatten)]
    edit: EditArgs,
}

#[derive(Args, Debug)]
struct VideoArgs {
    #[command(flatten)]
    edit: EditArgs,

    /// Soundtrack; the video lasts as long as it does.
    #[arg(long)]
    audio: PathBuf,

    /// Pace frames in real time instead of as fast as possible.
    #[arg(long, default_value_t = false)]
    realtime: bool,
}

#[derive(serde::Deserialize, Debug)]
struct GestureStep {
    kind: GestureKind,
    x: f64,
    y: f64,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Still(args) => cmd_still(args),
        Command::Video(args) => cmd_video(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<MemeframeConfig> {
    match path {
        Some(path) => Ok(MemeframeConfig::from_path(path)?),
        None => Ok(MemeframeConfig::default()),
    }
}

fn prepare_session(args: &EditArgs, cfg: MemeframeConfig) -> anyhow::Result<EditorSession> {
    let overlay = OverlayAsset::from_path(&args.logo)?;
    let mut session = EditorSession::new(overlay, cfg);

    let bytes = std::fs::read(&args.background)
        .with_context(|| format!("read background '{}'", args.background.display()))?;
    session.upload_background(&bytes)?;

    if let Some(scale) = args.scale {
        let applied = session.set_overlay_scale(scale);
        if applied != scale {
            tracing::warn!(requested = scale, applied, "scale clamped");
        }
    }

    if let (Some(x), Some(y)) = (args.x, args.y) {
        // Drag from the overlay center so placement goes through the same path as live input.
        let rect = session
            .transform()
            .overlay_rect(session.overlay().native_size());
        let from = rect.center();
        let to = from + (Point::new(x, y) - rect.origin());
        session.apply_raster_gesture(GestureKind::Down, from);
        session.apply_raster_gesture(GestureKind::Move, to);
        session.apply_raster_gesture(GestureKind::Up, to);
    }

    if let Some(path) = args.gestures.as_ref() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read gestures '{}'", path.display()))?;
        let steps: Vec<GestureStep> = serde_json::from_str(&text)
            .with_context(|| format!("parse gestures '{}'", path.display()))?;
        for step in steps {
            session.apply_raster_gesture(step.kind, Point::new(step.x, step.y));
        }
    }

    tracing::info!(transform = ?session.transform(), "overlay placed");
    Ok(session)
}

fn cmd_still(args: StillArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.edit.config.as_deref())?;
    let session = prepare_session(&args.edit, cfg)?;
    let artifact = session.export_still()?;
    let path = artifact.write_into(&args.edit.out)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_video(args: VideoArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.edit.config.as_deref())?;
    let sample_rate = cfg.export.audio_sample_rate;
    let session = prepare_session(&args.edit, cfg)?;

    let mut audio = FileAudioSource::new(&args.audio, sample_rate);
    let mut recorder = FfmpegRecorder::new();
    let caps = FfmpegCapabilities::probe();
    let mut system_clock = SystemClock::new();
    let mut virtual_clock = VirtualClock::new();
    let clock: &mut dyn Clock = if args.realtime {
        &mut system_clock
    } else {
        &mut virtual_clock
    };

    let mut last_reported = None;
    let mut observer = |event: &ExportEvent| match event {
        ExportEvent::Progress(p) if p / 10 != last_reported.unwrap_or(u8::MAX) / 10 => {
            last_reported = Some(*p);
            tracing::info!(progress = p, "encoding");
        }
        ExportEvent::Progress(_) => {}
        ExportEvent::Finished { file_name, len } => {
            tracing::info!(%file_name, len, "encoding finished");
        }
        ExportEvent::Failed(msg) => tracing::error!(%msg, "encoding failed"),
    };

    let artifact = session.export_video(
        VideoExportEnv {
            audio: &mut audio,
            recorder: &mut recorder,
            capabilities: &caps,
            clock,
        },
        &mut observer,
    )?;
    let path = artifact.write_into(&args.edit.out)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
