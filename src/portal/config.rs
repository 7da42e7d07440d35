//! Portal configuration - constructed by higher layers.

use std::path::PathBuf;

use crate::news::MAX_SLIDES;

/// Fallback signing secret, mirrored by the CLI when nothing is configured.
/// Fine for local demos, never for a deployment.
pub const DEV_SECRET: &str = "dev-secret";

const DEFAULT_SESSION_TTL_SECS: i64 = 12 * 3600;

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub app: String,
    pub secret_key: String,
    pub session_ttl_secs: i64,
    pub data_dir: Option<PathBuf>,
    pub max_uploads: usize,
}

impl PortalConfig {
    pub fn new(app: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            secret_key: DEV_SECRET.into(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            data_dir: None,
            max_uploads: MAX_SLIDES,
        }
    }

    pub fn with_secret_key(mut self, key: impl Into<String>) -> Self { self.secret_key = key.into(); self }
    pub fn with_session_ttl(mut self, secs: i64) -> Self { self.session_ttl_secs = secs; self }
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self { self.data_dir = Some(dir.into()); self }
    pub fn with_max_uploads(mut self, max: usize) -> Self { self.max_uploads = max; self }

    /// Root for uploads and rendered outputs.
    pub fn root_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(&self.app)
        })
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.root_dir().join("uploads")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root_dir().join("outputs")
    }
}
