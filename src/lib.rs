//! Newsdesk: session-gated demo portal. Two features behind one login:
//! a diamond pattern printer and a news bulletin video generator.
//!
//! # Architecture
//!
//! ```text
//! Portal (entry point)
//!   │
//!   ├── SessionAuth (HMAC-signed tokens + revocation set)
//!   │
//!   ├── pattern (pure diamond generator over the fixed alphabet)
//!   │
//!   └── NewsRoom (bulletin pipeline)
//!         ├── SlideStylizer ─┐
//!         ├── Narrator       ├─ trait seams, ffmpeg/espeak in production
//!         └── VideoEncoder  ─┘
//! ```
//!
//! The HTTP layer (`server`) is a thin axum surface over `Portal`; the CLI
//! (`src/bin/main.rs`) drives the same object.

pub mod auth;
pub mod error;
pub mod logging;
pub mod news;
pub mod pattern;
pub mod portal;
pub mod server;

pub use auth::{SessionAuth, UserProfile};
pub use error::{Error, Result};
pub use news::{Bulletin, NewsRoom};
pub use pattern::{as_block, build_diamond, requested_lines, ALPHABET};
pub use portal::{Portal, PortalConfig};
pub use server::{create_router, create_router_with_name};
