use crate::ipc::error::ok;
use crate::ipc::helpers::{db_err, require_db, session_for, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::roles::Operation;
use crate::window;

fn window_get(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    session_for(state, params, Operation::FilterCatalog)?;
    let conn = require_db(state)?;
    let w = window::load(conn).map_err(|e| db_err("db_query_failed", e))?;
    serde_json::to_value(w).map_err(|e| HandlerErr::new("internal", e.to_string()))
}

fn window_set(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let session = session_for(state, params, Operation::ManageWindow)?;
    let Some(open) = params.get("open").and_then(|v| v.as_bool()) else {
        return Err(HandlerErr::new("bad_params", "missing open"));
    };
    let conn = require_db(state)?;
    let w = window::store(conn, open, &session.user_id).map_err(|e| db_err("db_update_failed", e))?;
    tracing::info!(session_id = %session.id, open, "registration window changed");
    serde_json::to_value(w).map_err(|e| HandlerErr::new("internal", e.to_string()))
}

fn handle_window_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    match window_get(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_window_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    match window_set(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "window.get" => Some(handle_window_get(state, req)),
        "window.set" => Some(handle_window_set(state, req)),
        _ => None,
    }
}
