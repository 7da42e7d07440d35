//! News bulletin assembly: uploaded stills + synthesized narration → MP4.
//!
//! A sequential pipeline: store uploads, burn the banner into each still,
//! synthesize the narration track, encode, clean up temp audio. The media
//! work itself happens behind the [`effects`] trait seams.

pub mod effects;
pub mod process;

pub use effects::{Narrator, SlideStylizer, VideoEncoder};

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Output canvas, landscape 720p.
pub const SLIDE_WIDTH: u32 = 1280;
pub const SLIDE_HEIGHT: u32 = 720;
/// Seconds each slide stays on screen.
pub const SLIDE_DURATION_SECS: f64 = 3.0;
pub const OUTPUT_FPS: u32 = 30;
/// Uploads beyond this are ignored.
pub const MAX_SLIDES: usize = 5;
pub const DEFAULT_HEADLINE: &str = "Breaking: Today's top story";
pub const OUTPUT_FILE: &str = "news_video.mp4";

const TMP_AUDIO_DIR: &str = "_tmp_audio";
const NARRATION_FILE: &str = "narration.wav";

/// Geometry and colors of the banner burned into the bottom of every slide.
#[derive(Debug, Clone)]
pub struct Banner {
    pub height: u32,
    pub strip_width: u32,
    pub bar_rgb: [u8; 3],
    pub strip_rgb: [u8; 3],
    pub label: &'static str,
}

impl Default for Banner {
    fn default() -> Self {
        Self {
            height: SLIDE_HEIGHT * 16 / 100,
            strip_width: 300,
            bar_rgb: [18, 19, 24],
            strip_rgb: [231, 76, 60],
            label: "BREAKING",
        }
    }
}

/// One slide to be framed: source still + the headline to overlay.
#[derive(Debug, Clone)]
pub struct SlidePlan {
    pub source: PathBuf,
    pub headline: String,
    pub banner: Banner,
}

impl SlidePlan {
    pub fn new(source: impl Into<PathBuf>, headline: impl Into<String>) -> Self {
        Self { source: source.into(), headline: headline.into(), banner: Banner::default() }
    }
}

/// The anchor script read over the bulletin.
pub fn narration_script(headline: &str, item_count: usize) -> String {
    format!(
        "Good evening. Here are the top highlights. {}. This report contains {} items.",
        headline, item_count
    )
}

/// Store an upload under a content-addressed name (blake3 of the bytes, with
/// the original extension when it is sane). Rejects nameless uploads.
pub fn store_upload(dir: &Path, original_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    if original_name.trim().is_empty() {
        return Err(Error::Upload("missing filename".into()));
    }
    let digest = blake3::hash(bytes).to_hex();
    let stem = &digest.as_str()[..16];
    let name = match sanitized_extension(original_name) {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem.to_string(),
    };
    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

fn sanitized_extension(name: &str) -> Option<String> {
    let ext = name.rsplit_once('.')?.1;
    if ext.is_empty() || ext.len() > 5 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// A finished bulletin.
#[derive(Debug, Clone)]
pub struct Bulletin {
    pub video_path: PathBuf,
    pub slide_count: usize,
    pub narrated: bool,
}

/// Owns the media collaborators and runs the pipeline.
pub struct NewsRoom {
    stylizer: Box<dyn SlideStylizer>,
    narrator: Box<dyn Narrator>,
    encoder: Box<dyn VideoEncoder>,
}

impl NewsRoom {
    pub fn new(
        stylizer: Box<dyn SlideStylizer>,
        narrator: Box<dyn Narrator>,
        encoder: Box<dyn VideoEncoder>,
    ) -> Self {
        Self { stylizer, narrator, encoder }
    }

    /// Subprocess-backed collaborators (ffmpeg + espeak).
    pub fn studio() -> Self {
        Self::new(
            Box::new(process::FfmpegStylizer),
            Box::new(process::EspeakNarrator::default()),
            Box::new(process::FfmpegEncoder::default()),
        )
    }

    /// Assemble the bulletin. At most [`MAX_SLIDES`] images are used; the
    /// temp narration audio is removed whether or not encoding succeeds.
    pub async fn build_video(
        &self,
        images: &[PathBuf],
        out_dir: &Path,
        headline: &str,
        narration: Option<&str>,
    ) -> Result<Bulletin> {
        if images.is_empty() {
            return Err(Error::NoMedia);
        }
        tokio::fs::create_dir_all(out_dir).await?;
        let tmp_dir = out_dir.join(TMP_AUDIO_DIR);
        tokio::fs::create_dir_all(&tmp_dir).await?;

        let mut slides = Vec::new();
        for source in images.iter().take(MAX_SLIDES) {
            let framed = source.with_extension("framed.jpg");
            let plan = SlidePlan::new(source.clone(), headline);
            self.stylizer.stylize(&plan, &framed).await?;
            slides.push(framed);
        }

        let out_mp4 = out_dir.join(OUTPUT_FILE);
        let result = self.narrate_and_encode(&slides, narration, &tmp_dir, &out_mp4).await;

        // Temp audio must not outlive the build, success or not.
        if let Err(e) = tokio::fs::remove_dir_all(&tmp_dir).await {
            warn!(error = %e, "failed to remove temp audio dir");
        }
        result?;

        info!(video = %out_mp4.display(), slides = slides.len(), "bulletin assembled");
        Ok(Bulletin { video_path: out_mp4, slide_count: slides.len(), narrated: narration.is_some() })
    }

    async fn narrate_and_encode(
        &self,
        slides: &[PathBuf],
        narration: Option<&str>,
        tmp_dir: &Path,
        out_mp4: &Path,
    ) -> Result<()> {
        let wav = match narration {
            Some(text) => {
                let wav = tmp_dir.join(NARRATION_FILE);
                self.narrator.synthesize(text, &wav).await?;
                Some(wav)
            }
            None => None,
        };
        self.encoder.encode(slides, wav.as_deref(), out_mp4).await
    }
}
