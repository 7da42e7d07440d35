//! Media side effects behind trait seams.
//!
//! Stylization, speech synthesis, and encoding are external collaborators
//! with well-known contracts; the pipeline only sees these traits.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::SlidePlan;
use crate::error::Result;

/// Burns the news banner and headline into a source still.
#[async_trait]
pub trait SlideStylizer: Send + Sync {
    async fn stylize(&self, plan: &SlidePlan, out: &Path) -> Result<()>;
}

/// Renders narration text to a WAV file.
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn synthesize(&self, text: &str, out_wav: &Path) -> Result<()>;
}

/// Stitches framed slides (plus optional narration) into an MP4.
#[async_trait]
pub trait VideoEncoder: Send + Sync {
    async fn encode(&self, slides: &[PathBuf], narration: Option<&Path>, out_mp4: &Path) -> Result<()>;
}
