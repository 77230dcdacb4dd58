use std::collections::BTreeSet;

use crate::foundation::error::{MemeError, MemeResult};

/// Container and codec pair a video export can be recorded with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingProfile {
    /// MP4 with H.264 video and AAC audio.
    Mp4H264Aac,
    /// WebM with VP9 video and Opus audio.
    WebmVp9Opus,
    /// WebM with VP8 video and Vorbis audio; the baseline every WebM writer supports.
    WebmVp8Vorbis,
}

impl EncodingProfile {
    /// Preference order used unless configured otherwise.
    pub const DEFAULT_PREFERENCE: [EncodingProfile; 3] = [
        EncodingProfile::Mp4H264Aac,
        EncodingProfile::WebmVp9Opus,
        EncodingProfile::WebmVp8Vorbis,
    ];

    /// File extension of the produced artifact.
    pub fn extension(self) -> &'static str {
        match self {
            EncodingProfile::Mp4H264Aac => "mp4",
            EncodingProfile::WebmVp9Opus | EncodingProfile::WebmVp8Vorbis => "webm",
        }
    }

    /// MIME type of the produced artifact.
    pub fn mime_type(self) -> &'static str {
        match self {
            EncodingProfile::Mp4H264Aac => "video/mp4",
            EncodingProfile::WebmVp9Opus => "video/webm; codecs=vp9,opus",
            EncodingProfile::WebmVp8Vorbis => "video/webm; codecs=vp8,vorbis",
        }
    }

    /// `ffmpeg` muxer name.
    pub fn muxer(self) -> &'static str {
        match self {
            EncodingProfile::Mp4H264Aac => "mp4",
            EncodingProfile::WebmVp9Opus | EncodingProfile::WebmVp8Vorbis => "webm",
        }
    }

    /// `ffmpeg` video encoder name.
    pub fn video_encoder(self) -> &'static str {
        match self {
            EncodingProfile::Mp4H264Aac => "libx264",
            EncodingProfile::WebmVp9Opus => "libvpx-vp9",
            EncodingProfile::WebmVp8Vorbis => "libvpx",
        }
    }

    /// `ffmpeg` audio encoder name.
    pub fn audio_encoder(self) -> &'static str {
        match self {
            EncodingProfile::Mp4H264Aac => "aac",
            EncodingProfile::WebmVp9Opus => "libopus",
            EncodingProfile::WebmVp8Vorbis => "libvorbis",
        }
    }
}

/// Answers whether an encoding profile can be produced right now.
pub trait CapabilityQuery {
    /// Return `true` when `profile` is supported.
    fn supports(&self, profile: EncodingProfile) -> bool;
}

/// Pick the first profile in `preference` that `caps` supports.
///
/// Running out of candidates is fatal for the export attempt.
pub fn negotiate(
    preference: &[EncodingProfile],
    caps: &dyn CapabilityQuery,
) -> MemeResult<EncodingProfile> {
    for &profile in preference {
        if caps.supports(profile) {
            tracing::debug!(?profile, "encoding profile negotiated");
            return Ok(profile);
        }
        tracing::debug!(?profile, "encoding profile unsupported, falling back");
    }
    Err(MemeError::export(
        "no supported video container/codec combination is available",
    ))
}

/// Fixed capability answer, for tests and for forcing a profile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticCapabilities(pub Vec<EncodingProfile>);

impl CapabilityQuery for StaticCapabilities {
    fn supports(&self, profile: EncodingProfile) -> bool {
        self.0.contains(&profile)
    }
}

/// Encoders and muxers reported by the system `ffmpeg`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FfmpegCapabilities {
    encoders: BTreeSet<String>,
    muxers: BTreeSet<String>,
}

impl FfmpegCapabilities {
    /// Probe `ffmpeg -encoders` and `ffmpeg -muxers`.
    ///
    /// A missing `ffmpeg` yields an empty capability set, so negotiation fails cleanly later.
    pub fn probe() -> Self {
        let encoders = run_listing("-encoders")
            .map(|text| parse_encoder_listing(&text))
            .unwrap_or_default();
        let muxers = run_listing("-muxers")
            .map(|text| parse_muxer_listing(&text))
            .unwrap_or_default();
        tracing::debug!(
            encoders = encoders.len(),
            muxers = muxers.len(),
            "probed ffmpeg capabilities"
        );
        Self { encoders, muxers }
    }

    /// Build from raw `-encoders` / `-muxers` listings.
    pub fn from_listings(encoders: &str, muxers: &str) -> Self {
        Self {
            encoders: parse_encoder_listing(encoders),
            muxers: parse_muxer_listing(muxers),
        }
    }

    /// Return `true` when the named encoder is available.
    pub fn has_encoder(&self, name: &str) -> bool {
        self.encoders.contains(name)
    }

    /// Return `true` when the named muxer is available.
    pub fn has_muxer(&self, name: &str) -> bool {
        self.muxers.contains(name)
    }
}

impl CapabilityQuery for FfmpegCapabilities {
    fn supports(&self, profile: EncodingProfile) -> bool {
        self.has_muxer(profile.muxer())
            && self.has_encoder(profile.video_encoder())
            && self.has_encoder(profile.audio_encoder())
    }
}

fn run_listing(flag: &str) -> Option<String> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-hide_banner", flag])
        .stdin(std::process::Stdio::null())
        .output()
        .ok()?;
    out.status
        .success()
        .then(|| String::from_utf8_lossy(&out.stdout).into_owned())
}

/// Encoder lines look like ` V....D libx264   H.264 ...`; the legend above ` ------` is skipped.
fn parse_encoder_listing(text: &str) -> BTreeSet<String> {
    listing_body(text)
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let flags = cols.next()?;
            if flags.len() != 6 {
                return None;
            }
            cols.next().map(str::to_string)
        })
        .collect()
}

/// Muxer lines look like ` E mp4   MP4 (MPEG-4 Part 14)` or ` DE matroska,webm ...`.
fn parse_muxer_listing(text: &str) -> BTreeSet<String> {
    listing_body(text)
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let flags = cols.next()?;
            if !flags.contains('E') || !flags.chars().all(|c| matches!(c, 'D' | 'E' | 'd')) {
                return None;
            }
            cols.next()
        })
        .flat_map(|names| names.split(',').map(str::to_string).collect::<Vec<_>>())
        .collect()
}

fn listing_body(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .skip_while(|line| !line.trim_start().starts_with("--"))
        .skip(1)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/codec.rs"]
mod tests;
