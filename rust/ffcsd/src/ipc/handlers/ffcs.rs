use crate::ipc::error::ok;
use crate::ipc::helpers::{
    get_required_str, require_open_window, selection_json, session_for, session_for_mut, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::roles::Operation;
use chrono::Utc;
use serde_json::json;

fn ffcs_selection(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let session = session_for(state, params, Operation::ViewSelection)?;
    Ok(selection_json(&session.selection))
}

fn ffcs_add(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let AppState { db, sessions, .. } = state;
    let session = session_for_mut(sessions, params, Operation::AddCourse)?;
    require_open_window(db.as_ref())?;
    let code = get_required_str(params, "code")?;

    let Some(course) = session.catalog.find(&code).cloned() else {
        return Err(HandlerErr::new("not_found", format!("course {} is not offered", code)));
    };

    match session.selection.add(&course) {
        Ok(total) => {
            tracing::info!(session_id = %session.id, code = %code, total_credits = total, "course added");
            Ok(selection_json(&session.selection))
        }
        Err(e) => {
            tracing::info!(session_id = %session.id, code = %code, reason = e.code(), "course rejected");
            Err(e.into())
        }
    }
}

fn ffcs_remove(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let AppState { db, sessions, .. } = state;
    let session = session_for_mut(sessions, params, Operation::RemoveCourse)?;
    require_open_window(db.as_ref())?;
    let code = get_required_str(params, "code")?;

    let total = session.selection.remove(&code);
    tracing::info!(session_id = %session.id, code = %code, total_credits = total, "course removed");
    Ok(selection_json(&session.selection))
}

fn ffcs_submit(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let session = session_for(state, params, Operation::SubmitRegistration)?;
    require_open_window(state.db.as_ref())?;

    // The selection stays as-is after a submit; the portal decides whether to reset it.
    let submission = session.selection.submit().map_err(|e| {
        tracing::info!(session_id = %session.id, reason = e.code(), "submission rejected");
        HandlerErr::from(e)
    })?;
    tracing::info!(
        session_id = %session.id,
        user_id = %session.user_id,
        courses = submission.codes.len(),
        total_credits = submission.total_credits,
        "registration submitted"
    );
    Ok(json!({
        "codes": submission.codes,
        "totalCredits": submission.total_credits,
        "submittedAt": Utc::now().to_rfc3339(),
    }))
}

fn handle_ffcs_selection(state: &mut AppState, req: &Request) -> serde_json::Value {
    match ffcs_selection(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_ffcs_add(state: &mut AppState, req: &Request) -> serde_json::Value {
    match ffcs_add(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_ffcs_remove(state: &mut AppState, req: &Request) -> serde_json::Value {
    match ffcs_remove(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_ffcs_submit(state: &mut AppState, req: &Request) -> serde_json::Value {
    match ffcs_submit(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "ffcs.selection" => Some(handle_ffcs_selection(state, req)),
        "ffcs.add" => Some(handle_ffcs_add(state, req)),
        "ffcs.remove" => Some(handle_ffcs_remove(state, req)),
        "ffcs.submit" => Some(handle_ffcs_submit(state, req)),
        _ => None,
    }
}
