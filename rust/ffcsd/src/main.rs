mod catalog;
mod config;
mod db;
mod ipc;
mod logging;
mod registration;
mod roles;
mod session;
mod window;

use std::io::{self, BufRead, Write};

fn main() {
    let cfg = match config::Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ffcsd: {e:#}");
            std::process::exit(2);
        }
    };
    if let Err(e) = logging::init_logging(&cfg.log) {
        eprintln!("ffcsd: {e:#}");
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ffcsd starting");

    let mut state = ipc::AppState::default();
    if let Some(ws) = cfg.workspace.as_deref() {
        // A bad configured workspace is not fatal; the portal can still select one.
        if let Err(e) = ipc::select_workspace(&mut state, ws) {
            tracing::error!(workspace = %ws.to_string_lossy(), error = %e, "configured workspace unavailable");
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<ipc::Request>(&line) {
            Ok(req) => ipc::handle_request(&mut state, req),
            Err(e) => {
                // Can't reply with an id we failed to read.
                tracing::warn!(error = %e, "unparseable request line");
                ipc::bad_json(e.to_string())
            }
        };

        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }

    tracing::info!(open_sessions = state.sessions.len(), "ffcsd shutting down");
}
