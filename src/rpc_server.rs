//! Tab sidebar RPC server: newline-delimited JSON over stdin/stdout.
//!
//! Request:  {"type":"MOVE_TAB","tabId":3,"targetIndex":0}
//! Response: {"success":true} or {"success":false,"error":"..."}
//! Host change notifications follow the response as {"event":"tabMoved",...} lines.
//!
//! The host is an in-memory browser seeded from the JSON fixture named by
//! `TAB_SIDEBAR_FIXTURE`. Logs go to stderr, filtered by `RUST_LOG`.

use std::io::{self, Write};
use std::path::Path;

use log::{error, info, warn};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};

use tabsidebar::app::App;
use tabsidebar::host::{HostFixture, MemoryHost};
use tabsidebar::rpc_handler::handle_line;
use tabsidebar::services::settings_engine::SettingsEngine;

/// Environment variable naming the host fixture file.
const FIXTURE_ENV_VAR: &str = "TAB_SIDEBAR_FIXTURE";

/// Writes one NDJSON line. A failed write means the client is gone.
fn emit(out: &mut impl Write, value: &Value) -> io::Result<()> {
    writeln!(out, "{}", value)?;
    out.flush()
}

fn load_fixture(path: &Path) -> Result<HostFixture, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read fixture {}: {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Forwards queued host events to the coordinator and the client.
fn drain_events(app: &mut App<MemoryHost>, out: &mut impl Write) -> io::Result<()> {
    for event in app.host.take_events() {
        app.handle_event(&event);
        match serde_json::to_value(&event) {
            Ok(value) => emit(out, &value)?,
            Err(e) => warn!("Failed to encode host event: {}", e),
        }
    }
    Ok(())
}

async fn serve(mut app: App<MemoryHost>) -> io::Result<()> {
    let mut out = io::stdout();
    drain_events(&mut app, &mut out)?;
    emit(&mut out, &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(&mut app, &line).await;
        emit(&mut out, &response)?;
        drain_events(&mut app, &mut out)?;
    }
    info!("stdin closed, shutting down");
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let host = match std::env::var(FIXTURE_ENV_VAR) {
        Ok(path) if !path.is_empty() => match load_fixture(Path::new(&path)) {
            Ok(fixture) => MemoryHost::from_fixture(fixture),
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        _ => MemoryHost::new(),
    };

    let app = match App::new(host, SettingsEngine::new(None)) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize tab sidebar: {}", e);
            std::process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(serve(app)) {
        error!("RPC stream failed: {}", e);
        std::process::exit(1);
    }
}
