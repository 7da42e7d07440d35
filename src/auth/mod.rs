//! HMAC-signed session tokens.
//!
//! The OAuth handshake happens outside the portal; whatever sits in front
//! hands us a verified profile and we mint a signed, expiring token for it.

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// The profile fields the portal session carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
}

impl UserProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Default::default() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    user: UserProfile,
    issued_at: i64,
    expires_at: i64,
}

/// Issues and verifies stateless session tokens: `b64url(claims).b64url(mac)`.
#[derive(Clone)]
pub struct SessionAuth {
    key: Vec<u8>,
    ttl_secs: i64,
}

impl SessionAuth {
    pub fn new(secret: impl AsRef<[u8]>, ttl_secs: i64) -> Self {
        Self { key: secret.as_ref().to_vec(), ttl_secs }
    }

    /// Random 32-byte signing secret, hex-encoded for env/config storage.
    pub fn generate_secret() -> String {
        use rand::RngCore;
        let mut buf = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut buf);
        hex::encode(buf)
    }

    /// Mint a token for a verified profile.
    pub fn issue(&self, user: UserProfile) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims { user, issued_at: now, expires_at: now + self.ttl_secs };
        let payload = serde_json::to_vec(&claims)?;
        let mac = self.sign(&payload);
        Ok(format!("{}.{}", encode_b64url(&payload), encode_b64url(&mac)))
    }

    /// Verify signature and expiry, returning the embedded profile.
    pub fn verify(&self, token: &str) -> Result<UserProfile> {
        let (payload_b64, mac_b64) = token.split_once('.').ok_or(Error::TokenMalformed)?;
        let payload = decode_b64url(payload_b64)?;
        let mac = decode_b64url(mac_b64)?;

        let mut verifier = HmacSha256::new_from_slice(&self.key).map_err(|_| Error::TokenSignature)?;
        verifier.update(&payload);
        verifier.verify_slice(&mac).map_err(|_| Error::TokenSignature)?;

        let claims: SessionClaims =
            serde_json::from_slice(&payload).map_err(|_| Error::TokenMalformed)?;
        if claims.expires_at <= Utc::now().timestamp() {
            return Err(Error::TokenExpired);
        }
        Ok(claims.user)
    }

    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("hmac accepts any key length");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

fn encode_b64url(data: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(data)
}

fn decode_b64url(value: &str) -> Result<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|_| Error::TokenMalformed)
}
