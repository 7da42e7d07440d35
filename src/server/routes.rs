//! HTTP routes for the portal

use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::UserProfile;
use crate::error::Error;
use crate::portal::{ist_now_string, PatternPage, Portal};

#[derive(Clone)]
pub struct PortalState {
    pub portal: Arc<Portal>,
    pub app_name: String,
}

impl PortalState {
    pub fn new(portal: Arc<Portal>, app_name: impl Into<String>) -> Self {
        Self { portal, app_name: app_name.into() }
    }
}

pub fn create_router(portal: Arc<Portal>) -> Router {
    create_router_with_name(portal, "newsdesk")
}

pub fn create_router_with_name(portal: Arc<Portal>, app_name: &str) -> Router {
    let outputs = portal.config().output_dir();
    Router::new()
        .route("/health", get(health))
        .route("/session", get(session_status))
        .route("/session/login", post(login))
        .route("/session/logout", post(logout))
        .route("/pattern", post(render_pattern))
        .route("/generate", post(generate))
        .nest_service("/outputs", ServeDir::new(outputs))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(PortalState::new(portal, app_name))
}

async fn health(State(s): State<PortalState>) -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok", "service": s.app_name}))
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::AUTHORIZATION)?.to_str().ok()?.strip_prefix("Bearer ")
}

fn require_user(s: &PortalState, headers: &HeaderMap) -> Result<UserProfile, (StatusCode, String)> {
    let token = bearer(headers)
        .ok_or_else(|| (StatusCode::UNAUTHORIZED, "missing bearer token".to_string()))?;
    s.portal
        .authenticate(token)
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))
}

fn bad_request(e: impl ToString) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// The OAuth exchange happens in front of the portal; this endpoint accepts
/// the verified profile and mints the session token.
async fn login(
    State(s): State<PortalState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, String)> {
    let user = UserProfile { name: req.name, email: req.email, picture: req.picture };
    let token = s
        .portal
        .login(user.clone())
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(LoginResponse { token, user }))
}

#[derive(Serialize)]
struct SessionStatusResponse {
    authenticated: bool,
    user: Option<UserProfile>,
    ist_time: String,
}

async fn session_status(State(s): State<PortalState>, headers: HeaderMap) -> impl IntoResponse {
    let user = bearer(&headers).and_then(|t| s.portal.authenticate(t).ok());
    Json(SessionStatusResponse {
        authenticated: user.is_some(),
        user,
        ist_time: ist_now_string(),
    })
}

#[derive(Serialize)]
struct LogoutResponse {
    success: bool,
}

async fn logout(
    State(s): State<PortalState>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, (StatusCode, String)> {
    let token = bearer(&headers)
        .ok_or_else(|| (StatusCode::UNAUTHORIZED, "missing bearer token".to_string()))?;
    s.portal.logout(token);
    Ok(Json(LogoutResponse { success: true }))
}

#[derive(Deserialize, Default)]
pub struct PatternRequest {
    /// Accepts a JSON number or string; anything else falls back to 1.
    #[serde(default)]
    pub lines: Option<Value>,
}

#[derive(Serialize)]
pub struct PatternResponse {
    pub user: UserProfile,
    pub pattern: PatternPage,
}

async fn render_pattern(
    State(s): State<PortalState>,
    headers: HeaderMap,
    Json(req): Json<PatternRequest>,
) -> Result<Json<PatternResponse>, (StatusCode, String)> {
    let user = require_user(&s, &headers)?;
    let raw = req.lines.as_ref().and_then(lines_field);
    let pattern = s.portal.render_pattern(raw.as_deref());
    Ok(Json(PatternResponse { user, pattern }))
}

fn lines_field(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

#[derive(Serialize)]
pub struct GenerateResponse {
    pub video_url: String,
    pub slides: usize,
    pub narrated: bool,
}

async fn generate(
    State(s): State<PortalState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<GenerateResponse>, (StatusCode, String)> {
    let _user = require_user(&s, &headers)?;

    let mut saved = Vec::new();
    let mut headline: Option<String> = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("headline") => headline = Some(field.text().await.map_err(bad_request)?),
            Some("media") => {
                let Some(file_name) = field.file_name().map(str::to_string) else { continue };
                if file_name.is_empty() || saved.len() >= s.portal.config().max_uploads {
                    continue;
                }
                let bytes = field.bytes().await.map_err(bad_request)?;
                let path = s
                    .portal
                    .store_upload(&file_name, &bytes)
                    .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
                saved.push(path);
            }
            _ => {}
        }
    }

    let bulletin = s
        .portal
        .generate_bulletin(&saved, headline.as_deref())
        .await
        .map_err(|e| match e {
            Error::NoMedia | Error::Upload(_) => (StatusCode::BAD_REQUEST, e.to_string()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        })?;

    let file = bulletin.video_path.file_name().unwrap_or_default().to_string_lossy().to_string();
    Ok(Json(GenerateResponse {
        video_url: format!("/outputs/{}", file),
        slides: bulletin.slide_count,
        narrated: bulletin.narrated,
    }))
}
