//! Newsdesk CLI
//!
//!   newsdesk pattern <n> [--json]   Print the diamond for n lines
//!   newsdesk serve [--port N]       Run the HTTP portal
//!   newsdesk secret                 Generate a session signing secret
//!
//! Configuration comes from flags, then the environment (a local .env file
//! is loaded first): NEWSDESK_PORT, NEWSDESK_SECRET, NEWSDESK_DATA_DIR,
//! NEWSDESK_SESSION_TTL, NEWSDESK_LOG_JSON, RUST_LOG.

use anyhow::{anyhow, Context, Result};
use newsdesk::logging::init_logging;
use newsdesk::portal::DEV_SECRET;
use newsdesk::{pattern, Portal, PortalConfig, SessionAuth};
use serde_json::json;
use std::env;
use std::sync::Arc;
use tracing::{info, warn};

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);

    if opts.help {
        print_usage();
        return;
    }

    if opts.version {
        println!("newsdesk 0.1.0");
        return;
    }

    let result = match opts.command.as_deref() {
        Some("pattern") => cmd_pattern(&opts),
        Some("serve") => cmd_serve(&opts),
        Some("secret") => cmd_secret(),
        Some(cmd) => Err(anyhow!("Unknown command: {}", cmd)),
        None => {
            print_usage();
            return;
        }
    };

    if let Err(e) = result {
        eprintln!("{}", serde_json::to_string(&json!({"error": format!("{:#}", e)})).unwrap());
        std::process::exit(1);
    }
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    value: Option<String>,
    // Serve options
    port: Option<u16>,
    secret: Option<String>,
    data_dir: Option<String>,
    session_ttl: Option<i64>,
    // Output options
    json: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        // Load .env file if present
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let value = value.trim().trim_matches('"');
                    if !value.is_empty() && env::var(key.trim()).is_err() {
                        env::set_var(key.trim(), value);
                    }
                }
            }
        }

        let mut opts = ParsedArgs::default();
        let mut positional = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            match arg.as_str() {
                "--help" | "-h" => opts.help = true,
                "--version" | "-V" => opts.version = true,
                "--json" => opts.json = true,
                "--port" | "-p" => {
                    if i + 1 < args.len() {
                        opts.port = args[i + 1].parse().ok();
                        i += 1;
                    }
                }
                "--secret" => {
                    if i + 1 < args.len() {
                        opts.secret = Some(args[i + 1].clone());
                        i += 1;
                    }
                }
                "--data-dir" | "-d" => {
                    if i + 1 < args.len() {
                        opts.data_dir = Some(args[i + 1].clone());
                        i += 1;
                    }
                }
                _ if !arg.starts_with('-') => positional.push(arg.clone()),
                _ => {} // Ignore unknown flags
            }
            i += 1;
        }

        if !positional.is_empty() {
            opts.command = Some(positional.remove(0));
        }
        if !positional.is_empty() {
            opts.value = Some(positional.remove(0));
        }

        // Environment fallbacks (lower priority than CLI args)
        if opts.port.is_none() {
            opts.port = env::var("NEWSDESK_PORT").ok().and_then(|s| s.parse().ok());
        }
        if opts.secret.is_none() {
            opts.secret = env::var("NEWSDESK_SECRET").ok().filter(|s| !s.is_empty());
        }
        if opts.data_dir.is_none() {
            opts.data_dir = env::var("NEWSDESK_DATA_DIR").ok().filter(|s| !s.is_empty());
        }
        if opts.session_ttl.is_none() {
            opts.session_ttl = env::var("NEWSDESK_SESSION_TTL").ok().and_then(|s| s.parse().ok());
        }

        opts
    }
}

fn print_usage() {
    println!(
        r#"newsdesk - pattern printer + news bulletin portal

USAGE:
    newsdesk <command> [value] [options]

COMMANDS:
    pattern <n>             Print the diamond for n lines (clamped to 1..100)
    serve                   Start the HTTP portal
    secret                  Generate a session signing secret

PATTERN OPTIONS:
    --json                  Output rows as a JSON array

SERVER OPTIONS:
    --port, -p <port>       Server port (default: 8080, env: NEWSDESK_PORT)
    --secret <key>          Session signing secret (env: NEWSDESK_SECRET)
    --data-dir, -d <path>   Uploads/outputs root (env: NEWSDESK_DATA_DIR)

ENDPOINTS (serve):
    GET  /health            Health check
    GET  /session           Session status for the presented token
    POST /session/login     Mint a session for a verified profile
    POST /session/logout    Revoke the presented token
    POST /pattern           Render the diamond ({{"lines": 7}})
    POST /generate          Multipart media + headline -> bulletin MP4
    GET  /outputs/<file>    Finished videos

EXAMPLES:
    newsdesk pattern 7
    newsdesk pattern 4 --json
    NEWSDESK_SECRET=$(newsdesk secret) newsdesk serve -p 8080
"#
    );
}

fn cmd_pattern(opts: &ParsedArgs) -> Result<()> {
    let n = pattern::requested_lines(opts.value.as_deref());
    if opts.json {
        let rows = pattern::build_diamond(n);
        println!("{}", serde_json::to_string(&rows)?);
    } else {
        println!("{}", pattern::as_block(n));
    }
    Ok(())
}

fn cmd_secret() -> Result<()> {
    println!("{}", SessionAuth::generate_secret());
    Ok(())
}

fn cmd_serve(opts: &ParsedArgs) -> Result<()> {
    let port = opts.port.unwrap_or(8080);

    let mut config = PortalConfig::new("newsdesk");
    match opts.secret.as_deref() {
        Some(secret) => config = config.with_secret_key(secret),
        None => warn!("NEWSDESK_SECRET not set, using the dev secret ({})", DEV_SECRET),
    }
    if let Some(dir) = opts.data_dir.as_deref() {
        config = config.with_data_dir(dir);
    }
    if let Some(ttl) = opts.session_ttl {
        config = config.with_session_ttl(ttl);
    }

    let portal = Arc::new(Portal::from_config(config));
    let router = newsdesk::create_router(portal);

    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(async {
        let addr = format!("0.0.0.0:{}", port);
        info!("Newsdesk portal listening on http://{}", addr);
        info!("  GET  /health            - Health check");
        info!("  GET  /session           - Session status");
        info!("  POST /session/login     - Mint a session");
        info!("  POST /pattern           - Render the diamond");
        info!("  POST /generate          - Assemble a bulletin");

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        tokio::select! {
            result = axum::serve(listener, router) => {
                result.context("server error")?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received, stopping server...");
            }
        }
        Ok::<(), anyhow::Error>(())
    })
}
