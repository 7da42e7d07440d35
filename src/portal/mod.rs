//! Portal - the session-gated application surface wrapping the pattern
//! generator and the newsroom.

mod config;

pub use config::{PortalConfig, DEV_SECRET};

use chrono::{FixedOffset, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;

use crate::auth::{SessionAuth, UserProfile};
use crate::error::{Error, Result};
use crate::news::{self, Bulletin, NewsRoom};
use crate::pattern;

/// What the pattern endpoint renders.
#[derive(Debug, Clone, Serialize)]
pub struct PatternPage {
    pub lines: Vec<String>,
    pub block: String,
    pub count: usize,
    pub rendered_at: String,
}

/// Application object: sessions, pattern rendering, bulletin generation.
pub struct Portal {
    auth: SessionAuth,
    newsroom: NewsRoom,
    /// Digests of logged-out tokens, each with the instant the token itself
    /// would have expired — after that, verification rejects it anyway.
    revoked: Mutex<HashMap<String, i64>>,
    config: PortalConfig,
}

impl Portal {
    /// Portal with subprocess-backed media collaborators.
    pub fn from_config(config: PortalConfig) -> Self {
        Self::with_newsroom(config, NewsRoom::studio())
    }

    pub fn with_newsroom(config: PortalConfig, newsroom: NewsRoom) -> Self {
        let auth = SessionAuth::new(&config.secret_key, config.session_ttl_secs);
        Self { auth, newsroom, revoked: Mutex::new(HashMap::new()), config }
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Mint a session for a verified profile.
    pub fn login(&self, user: UserProfile) -> Result<String> {
        let token = self.auth.issue(user)?;
        info!(app = %self.config.app, "session issued");
        Ok(token)
    }

    /// Resolve a presented token, honoring logouts.
    pub fn authenticate(&self, token: &str) -> Result<UserProfile> {
        if self.revoked_set().contains_key(&token_digest(token)) {
            return Err(Error::TokenRevoked);
        }
        self.auth.verify(token)
    }

    /// Revoke a token. Stateless tokens cannot be un-issued, so the portal
    /// remembers a digest of everything logged out — but only until the token
    /// would have expired on its own; stale digests are pruned on the way in.
    pub fn logout(&self, token: &str) {
        let now = Utc::now().timestamp();
        let mut revoked = self.revoked_set();
        revoked.retain(|_, deadline| *deadline > now);
        // A token presented now expires at most ttl seconds from now.
        revoked.insert(token_digest(token), now + self.config.session_ttl_secs.max(0));
    }

    /// Render the diamond page for an untrusted `lines` value.
    pub fn render_pattern(&self, raw_lines: Option<&str>) -> PatternPage {
        let n = pattern::requested_lines(raw_lines);
        let lines = pattern::build_diamond(n);
        PatternPage {
            block: lines.join("\n"),
            count: lines.len(),
            lines,
            rendered_at: ist_now_string(),
        }
    }

    /// Persist one uploaded still into the portal's upload dir.
    pub fn store_upload(&self, original_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        news::store_upload(&self.config.upload_dir(), original_name, bytes)
    }

    /// Assemble a bulletin from stored uploads. Uses at most
    /// `config.max_uploads` images and the default headline when none given.
    pub async fn generate_bulletin(
        &self,
        uploads: &[PathBuf],
        headline: Option<&str>,
    ) -> Result<Bulletin> {
        let headline = match headline.map(str::trim) {
            Some(h) if !h.is_empty() => h,
            _ => news::DEFAULT_HEADLINE,
        };
        let kept = &uploads[..uploads.len().min(self.config.max_uploads)];
        if kept.is_empty() {
            return Err(Error::NoMedia);
        }
        let narration = news::narration_script(headline, kept.len());
        self.newsroom
            .build_video(kept, &self.config.output_dir(), headline, Some(&narration))
            .await
    }

    fn revoked_set(&self) -> std::sync::MutexGuard<'_, HashMap<String, i64>> {
        self.revoked.lock().unwrap_or_else(|p| p.into_inner())
    }
}

fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Wall-clock banner in Indian Standard Time, the original portal's locale.
/// IST is a fixed +05:30 offset, no DST.
pub fn ist_now_string() -> String {
    let ist = FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("IST offset is in range");
    Utc::now().with_timezone(&ist).format("%a, %d %b %Y, %I:%M:%S %p IST").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portal() -> Portal {
        Portal::from_config(PortalConfig::new("newsdesk-test").with_secret_key("unit-secret"))
    }

    #[test]
    fn pattern_page_defaults_to_one_line() {
        let page = portal().render_pattern(None);
        assert_eq!(page.lines, vec!["F"]);
        assert_eq!(page.block, "F");
        assert_eq!(page.count, 1);
        assert!(page.rendered_at.ends_with("IST"));
    }

    #[test]
    fn pattern_page_clamps_oversized_requests() {
        let page = portal().render_pattern(Some("9999"));
        // 100 rounds up to 101 rows.
        assert_eq!(page.count, 101);
        assert_eq!(page.block.lines().count(), 101);
    }

    #[test]
    fn logout_revokes_a_live_token() {
        let portal = portal();
        let token = portal.login(UserProfile::named("Ada")).unwrap();
        assert!(portal.authenticate(&token).is_ok());
        portal.logout(&token);
        assert!(matches!(portal.authenticate(&token), Err(Error::TokenRevoked)));
    }

    #[test]
    fn revoked_digests_are_pruned_once_expired() {
        let portal = Portal::from_config(
            PortalConfig::new("newsdesk-test").with_secret_key("unit-secret").with_session_ttl(-1),
        );
        let first = portal.login(UserProfile::named("Ada")).unwrap();
        let second = portal.login(UserProfile::named("Grace")).unwrap();

        portal.logout(&first);
        assert_eq!(portal.revoked_set().len(), 1);

        // With a non-positive ttl the first digest is already past its
        // deadline when the second logout prunes.
        portal.logout(&second);
        let revoked = portal.revoked_set();
        assert_eq!(revoked.len(), 1);
        assert!(revoked.contains_key(&token_digest(&second)));
    }

    #[test]
    fn ist_banner_has_expected_shape() {
        let banner = ist_now_string();
        assert!(banner.ends_with("IST"));
        assert!(banner.contains(','));
    }
}
