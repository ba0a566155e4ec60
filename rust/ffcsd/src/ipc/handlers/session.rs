use crate::catalog::Catalog;
use crate::db;
use crate::ipc::error::ok;
use crate::ipc::helpers::{db_err, get_required_str, require_db, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::registration::CREDIT_CAP;
use crate::roles::Role;
use crate::session::RegistrationSession;
use serde_json::json;

fn session_open(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let user_id = get_required_str(params, "userId")?;
    if user_id.trim().is_empty() {
        return Err(HandlerErr::new("bad_params", "userId must not be empty"));
    }
    let role: Role = get_required_str(params, "role")?
        .parse()
        .map_err(|e: String| HandlerErr::new("bad_params", e))?;

    let conn = require_db(state)?;
    let courses = db::load_courses(conn).map_err(|e| db_err("db_query_failed", e))?;
    let catalog = Catalog::new(courses)
        .map_err(|e| HandlerErr::new("bad_catalog", e.to_string()))?;

    if catalog.is_empty() {
        tracing::warn!(user_id = %user_id, "opening session against an empty catalog");
    }

    let session = state
        .sessions
        .open(RegistrationSession::new(user_id, role, catalog));
    tracing::info!(
        session_id = %session.id,
        user_id = %session.user_id,
        role = %session.role,
        courses = session.catalog.len(),
        "session opened"
    );

    Ok(json!({
        "sessionId": session.id,
        "userId": session.user_id,
        "role": session.role,
        "capabilities": session.role.capabilities(),
        "openedAt": session.opened_at.to_rfc3339(),
        "catalogFingerprint": session.catalog.fingerprint(),
        "courseCount": session.catalog.len(),
        "creditCap": CREDIT_CAP,
    }))
}

fn session_close(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(params, "sessionId")?;
    let closed = state.sessions.close(&id);
    if closed {
        tracing::info!(session_id = %id, "session closed");
    }
    Ok(json!({ "closed": closed }))
}

fn handle_session_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    match session_open(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_session_close(state: &mut AppState, req: &Request) -> serde_json::Value {
    match session_close(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "session.open" => Some(handle_session_open(state, req)),
        "session.close" => Some(handle_session_close(state, req)),
        _ => None,
    }
}
