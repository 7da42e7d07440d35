//! Session lifecycle through the portal: login, gating, logout, expiry.

use newsdesk::auth::UserProfile;
use newsdesk::error::Error;
use newsdesk::portal::{Portal, PortalConfig};

fn profile() -> UserProfile {
    UserProfile {
        name: Some("Ada Lovelace".into()),
        email: Some("ada@example.com".into()),
        picture: Some("https://example.com/ada.png".into()),
    }
}

/// Test: a minted session resolves back to the same profile
#[test]
fn login_then_authenticate() {
    let portal = Portal::from_config(PortalConfig::new("nd-test").with_secret_key("secret-a"));
    let token = portal.login(profile()).expect("login");
    let user = portal.authenticate(&token).expect("authenticate");
    assert_eq!(user, profile());
}

/// Test: tokens from a portal with a different secret are rejected
#[test]
fn foreign_tokens_are_rejected() {
    let a = Portal::from_config(PortalConfig::new("nd-test").with_secret_key("secret-a"));
    let b = Portal::from_config(PortalConfig::new("nd-test").with_secret_key("secret-b"));
    let token = a.login(profile()).expect("login");
    assert!(matches!(b.authenticate(&token), Err(Error::TokenSignature)));
}

/// Test: logout revokes the token, other sessions stay live
#[test]
fn logout_is_per_token() {
    let portal = Portal::from_config(PortalConfig::new("nd-test").with_secret_key("secret-a"));
    let first = portal.login(profile()).expect("login");
    let second = portal.login(UserProfile::named("Grace")).expect("login");

    portal.logout(&first);
    assert!(matches!(portal.authenticate(&first), Err(Error::TokenRevoked)));
    assert!(portal.authenticate(&second).is_ok());
}

/// Test: an expired session no longer authenticates
#[test]
fn expired_sessions_are_rejected() {
    let portal = Portal::from_config(
        PortalConfig::new("nd-test").with_secret_key("secret-a").with_session_ttl(-1),
    );
    let token = portal.login(profile()).expect("login");
    assert!(matches!(portal.authenticate(&token), Err(Error::TokenExpired)));
}

/// Test: junk tokens fail closed
#[test]
fn junk_tokens_fail_closed() {
    let portal = Portal::from_config(PortalConfig::new("nd-test").with_secret_key("secret-a"));
    assert!(portal.authenticate("").is_err());
    assert!(portal.authenticate("not-a-token").is_err());
    assert!(portal.authenticate("aGVsbG8.d29ybGQ").is_err());
}
