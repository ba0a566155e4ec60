use crate::ipc::error::err;
use crate::ipc::types::AppState;
use crate::registration::{Course, RegistrationError, Selection, CREDIT_CAP};
use crate::roles::Operation;
use crate::session::{RegistrationSession, SessionStore};
use crate::window;
use rusqlite::Connection;
use serde_json::json;

pub(crate) struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<RegistrationError> for HandlerErr {
    fn from(e: RegistrationError) -> Self {
        let details = match &e {
            RegistrationError::DuplicateCourse { code } => json!({ "code": code }),
            RegistrationError::CreditLimitExceeded {
                code,
                credits,
                total,
                cap,
            } => json!({
                "code": code,
                "credits": credits,
                "totalCredits": total,
                "creditCap": cap,
            }),
            RegistrationError::SlotClash {
                code,
                slot,
                clashes_with,
            } => json!({
                "code": code,
                "slot": slot,
                "clashesWith": clashes_with,
            }),
            RegistrationError::EmptySelection => json!({ "totalCredits": 0 }),
        };
        HandlerErr::new(e.code(), e.to_string()).with_details(details)
    }
}

pub(crate) fn db_err(code: &'static str, e: anyhow::Error) -> HandlerErr {
    HandlerErr::new(code, format!("{e:#}"))
}

pub(crate) fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::new("bad_params", format!("missing {}", key)))
}

/// Absent or null keys are `None`; any other non-string value is `bad_params`.
pub(crate) fn get_optional_str<'a>(
    params: &'a serde_json::Value,
    key: &str,
) -> Result<Option<&'a str>, HandlerErr> {
    match params.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(HandlerErr::new("bad_params", format!("{} must be a string", key))),
    }
}

pub(crate) fn require_db(state: &AppState) -> Result<&Connection, HandlerErr> {
    state
        .db
        .as_ref()
        .ok_or_else(|| HandlerErr::new("no_workspace", "select a workspace first"))
}

fn check_allowed(session: &RegistrationSession, op: Operation) -> Result<(), HandlerErr> {
    if session.role.allows(op) {
        return Ok(());
    }
    tracing::warn!(
        session_id = %session.id,
        role = %session.role,
        operation = ?op,
        "operation refused for role"
    );
    Err(HandlerErr::new(
        "forbidden",
        format!("{} sessions may not perform {:?}", session.role, op),
    ))
}

/// Looks up `params.sessionId` and checks the role may perform `op`.
pub(crate) fn session_for<'a>(
    state: &'a AppState,
    params: &serde_json::Value,
    op: Operation,
) -> Result<&'a RegistrationSession, HandlerErr> {
    let id = get_required_str(params, "sessionId")?;
    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| HandlerErr::new("unknown_session", format!("no open session {}", id)))?;
    check_allowed(session, op)?;
    Ok(session)
}

/// Mutable form of [`session_for`]. Takes the store alone so callers can still
/// reach the workspace connection while holding the session.
pub(crate) fn session_for_mut<'a>(
    sessions: &'a mut SessionStore,
    params: &serde_json::Value,
    op: Operation,
) -> Result<&'a mut RegistrationSession, HandlerErr> {
    let id = get_required_str(params, "sessionId")?;
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| HandlerErr::new("unknown_session", format!("no open session {}", id)))?;
    check_allowed(session, op)?;
    Ok(session)
}

/// Refuses selection changes and submissions while the window is closed.
pub(crate) fn require_open_window(db: Option<&Connection>) -> Result<(), HandlerErr> {
    let conn = db.ok_or_else(|| HandlerErr::new("no_workspace", "select a workspace first"))?;
    let w = window::load(conn).map_err(|e| db_err("db_query_failed", e))?;
    if w.open {
        return Ok(());
    }
    Err(HandlerErr::new("registration_closed", "the FFCS registration window is closed")
        .with_details(json!({ "changedAt": w.changed_at })))
}

pub(crate) fn course_json(c: &Course) -> serde_json::Value {
    json!({
        "code": c.code,
        "name": c.name,
        "credits": c.credits,
        "faculty": c.faculty,
        "slot": c.slot,
        "venue": c.venue,
        "enrolled": c.enrolled,
        "capacity": c.capacity,
        "seatsLeft": c.seats_left(),
        "category": c.category.as_str(),
    })
}

pub(crate) fn selection_json(sel: &Selection) -> serde_json::Value {
    json!({
        "courses": sel.courses().iter().map(course_json).collect::<Vec<_>>(),
        "courseCount": sel.len(),
        "totalCredits": sel.total_credits(),
        "remainingCredits": sel.remaining_credits(),
        "creditCap": CREDIT_CAP,
    })
}
