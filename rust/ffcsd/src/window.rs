use crate::db;
use chrono::Utc;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

const WINDOW_KEY: &str = "ffcs.window";

/// Whether students may currently change or submit registrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationWindow {
    pub open: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<String>,
}

impl Default for RegistrationWindow {
    fn default() -> Self {
        Self {
            open: true,
            changed_at: None,
            changed_by: None,
        }
    }
}

pub fn load(conn: &Connection) -> anyhow::Result<RegistrationWindow> {
    match db::settings_get_json(conn, WINDOW_KEY)? {
        Some(v) => Ok(serde_json::from_value(v)?),
        None => Ok(RegistrationWindow::default()),
    }
}

pub fn store(conn: &Connection, open: bool, changed_by: &str) -> anyhow::Result<RegistrationWindow> {
    let window = RegistrationWindow {
        open,
        changed_at: Some(Utc::now().to_rfc3339()),
        changed_by: Some(changed_by.to_string()),
    };
    db::settings_set_json(conn, WINDOW_KEY, &serde_json::to_value(&window)?)?;
    Ok(window)
}
