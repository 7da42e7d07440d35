//! HTTP contract for the gated routes: no session, no service.
//!
//! Runs the real router on a loopback listener and speaks raw HTTP/1.1,
//! which keeps the whole axum stack (extractors included) in the loop.

use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use newsdesk::auth::UserProfile;
use newsdesk::{create_router, Portal, PortalConfig};

async fn spawn_portal() -> (SocketAddr, Arc<Portal>) {
    let dir = TempDir::new().unwrap();
    let config = PortalConfig::new("nd-routes")
        .with_secret_key("route-secret")
        .with_data_dir(dir.path());
    let portal = Arc::new(Portal::from_config(config));
    let router = create_router(portal.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _dir = dir; // keep upload/output dirs alive for the server
        axum::serve(listener, router).await.unwrap();
    });
    (addr, portal)
}

async fn request(addr: SocketAddr, raw: String) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

fn post_pattern(body: &str, bearer: Option<&str>) -> String {
    let auth = bearer.map(|t| format!("Authorization: Bearer {}\r\n", t)).unwrap_or_default();
    format!(
        "POST /pattern HTTP/1.1\r\nHost: localhost\r\n{}Content-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        auth,
        body.len(),
        body
    )
}

fn status_line(response: &str) -> &str {
    response.lines().next().unwrap_or("")
}

/// Test: /pattern without a bearer token is 401
#[tokio::test]
async fn pattern_without_session_is_unauthorized() {
    let (addr, _portal) = spawn_portal().await;
    let response = request(addr, post_pattern("{}", None)).await;
    assert!(status_line(&response).contains("401"), "got: {}", status_line(&response));
}

/// Test: /pattern with a garbage token is 401
#[tokio::test]
async fn pattern_with_invalid_token_is_unauthorized() {
    let (addr, _portal) = spawn_portal().await;
    let response = request(addr, post_pattern("{}", Some("not-a-real-token"))).await;
    assert!(status_line(&response).contains("401"), "got: {}", status_line(&response));
}

/// Test: a minted session unlocks /pattern and the diamond comes back
#[tokio::test]
async fn pattern_with_session_renders() {
    let (addr, portal) = spawn_portal().await;
    let token = portal.login(UserProfile::named("Ada")).unwrap();

    let response = request(addr, post_pattern(r#"{"lines": 3}"#, Some(&token))).await;
    assert!(status_line(&response).contains("200"), "got: {}", status_line(&response));
    assert!(response.contains("ORM"), "middle row missing from body");
}

/// Test: a logged-out token is rejected at the HTTP layer too
#[tokio::test]
async fn pattern_after_logout_is_unauthorized() {
    let (addr, portal) = spawn_portal().await;
    let token = portal.login(UserProfile::named("Ada")).unwrap();
    portal.logout(&token);

    let response = request(addr, post_pattern("{}", Some(&token))).await;
    assert!(status_line(&response).contains("401"), "got: {}", status_line(&response));
}

/// Test: /generate without a bearer token is 401 before any upload work
#[tokio::test]
async fn generate_without_session_is_unauthorized() {
    let (addr, _portal) = spawn_portal().await;
    let raw = "POST /generate HTTP/1.1\r\nHost: localhost\r\nContent-Type: multipart/form-data; boundary=xyz\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        .to_string();
    let response = request(addr, raw).await;
    assert!(status_line(&response).contains("401"), "got: {}", status_line(&response));
}
