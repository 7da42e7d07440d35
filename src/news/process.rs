//! Subprocess-backed media collaborators: ffmpeg for stylizing and encoding,
//! espeak for narration.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::effects::{Narrator, SlideStylizer, VideoEncoder};
use super::{SlidePlan, OUTPUT_FPS, SLIDE_DURATION_SECS, SLIDE_HEIGHT, SLIDE_WIDTH};
use crate::error::{Error, Result};

/// Speech rate matching the portal's newsreader voice.
pub const SPEECH_RATE_WPM: u32 = 165;

async fn run(command: &str, args: &[String]) -> Result<()> {
    debug!(command, ?args, "spawning");
    let output = Command::new(command)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::CommandMissing { command: command.into() }
            } else {
                Error::Io(e)
            }
        })?;
    if !output.status.success() {
        return Err(Error::CommandFailed {
            command: command.into(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

// drawtext treats \ ' : % as metacharacters.
fn escape_drawtext(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '\'' | ':' | '%' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

fn rgb_hex(rgb: [u8; 3]) -> String {
    format!("0x{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

/// Scales the still to the canvas and burns the bottom banner in with
/// drawbox/drawtext filters.
pub struct FfmpegStylizer;

#[async_trait]
impl SlideStylizer for FfmpegStylizer {
    async fn stylize(&self, plan: &SlidePlan, out: &Path) -> Result<()> {
        let banner = &plan.banner;
        let top = SLIDE_HEIGHT - banner.height;
        let filter = format!(
            "scale={w}:{h},\
             drawbox=x=0:y={top}:w={w}:h={bh}:color={bar}:t=fill,\
             drawbox=x=0:y={top}:w={strip_w}:h={bh}:color={strip}:t=fill,\
             drawtext=text='{label}':x=24:y={top}+22:fontsize=42:fontcolor=white,\
             drawtext=text='{headline}':x=330:y={top}+18:fontsize=44:fontcolor=white",
            w = SLIDE_WIDTH,
            h = SLIDE_HEIGHT,
            top = top,
            bh = banner.height,
            bar = rgb_hex(banner.bar_rgb),
            strip_w = banner.strip_width,
            strip = rgb_hex(banner.strip_rgb),
            label = escape_drawtext(banner.label),
            headline = escape_drawtext(&plan.headline),
        );
        let args = vec![
            "-y".into(),
            "-i".into(),
            plan.source.display().to_string(),
            "-vf".into(),
            filter,
            "-q:v".into(),
            "2".into(),
            out.display().to_string(),
        ];
        run("ffmpeg", &args).await
    }
}

/// espeak-based narration.
pub struct EspeakNarrator {
    pub rate_wpm: u32,
}

impl Default for EspeakNarrator {
    fn default() -> Self {
        Self { rate_wpm: SPEECH_RATE_WPM }
    }
}

#[async_trait]
impl Narrator for EspeakNarrator {
    async fn synthesize(&self, text: &str, out_wav: &Path) -> Result<()> {
        let args = vec![
            "-s".into(),
            self.rate_wpm.to_string(),
            "-w".into(),
            out_wav.display().to_string(),
            text.to_string(),
        ];
        run("espeak", &args).await
    }
}

/// Concat-demuxer ffmpeg encode: each slide held for a fixed duration,
/// libx264 video, optional aac narration trimmed to the shorter stream.
pub struct FfmpegEncoder {
    pub fps: u32,
    pub secs_per_slide: f64,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self { fps: OUTPUT_FPS, secs_per_slide: SLIDE_DURATION_SECS }
    }
}

impl FfmpegEncoder {
    fn concat_manifest(&self, slides: &[PathBuf]) -> String {
        let mut manifest = String::new();
        for slide in slides {
            manifest.push_str(&format!("file '{}'\n", slide.display()));
            manifest.push_str(&format!("duration {}\n", self.secs_per_slide));
        }
        // The concat demuxer drops the last duration unless the final entry
        // is repeated.
        if let Some(last) = slides.last() {
            manifest.push_str(&format!("file '{}'\n", last.display()));
        }
        manifest
    }
}

#[async_trait]
impl VideoEncoder for FfmpegEncoder {
    async fn encode(&self, slides: &[PathBuf], narration: Option<&Path>, out_mp4: &Path) -> Result<()> {
        let manifest_path = out_mp4.with_extension("slides.txt");
        tokio::fs::write(&manifest_path, self.concat_manifest(slides)).await?;

        let mut args: Vec<String> = vec![
            "-y".into(),
            "-f".into(),
            "concat".into(),
            "-safe".into(),
            "0".into(),
            "-i".into(),
            manifest_path.display().to_string(),
        ];
        if let Some(wav) = narration {
            args.extend(["-i".into(), wav.display().to_string()]);
        }
        args.extend([
            "-c:v".into(),
            "libx264".into(),
            "-r".into(),
            self.fps.to_string(),
            "-pix_fmt".into(),
            "yuv420p".into(),
        ]);
        if narration.is_some() {
            args.extend(["-c:a".into(), "aac".into(), "-shortest".into()]);
        }
        args.push(out_mp4.display().to_string());

        let result = run("ffmpeg", &args).await;
        let _ = tokio::fs::remove_file(&manifest_path).await;
        result
    }
}
