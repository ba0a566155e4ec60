use crate::catalog::Catalog;
use crate::registration::Selection;
use crate::roles::Role;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// One user's registration view. Owns its selection; the catalog is the
/// snapshot that was current when the session opened.
#[derive(Debug)]
pub struct RegistrationSession {
    pub id: String,
    pub user_id: String,
    pub role: Role,
    pub opened_at: DateTime<Utc>,
    pub catalog: Catalog,
    pub selection: Selection,
}

impl RegistrationSession {
    pub fn new(user_id: impl Into<String>, role: Role, catalog: Catalog) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            role,
            opened_at: Utc::now(),
            catalog,
            selection: Selection::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, RegistrationSession>,
}

impl SessionStore {
    pub fn open(&mut self, session: RegistrationSession) -> &RegistrationSession {
        let id = session.id.clone();
        self.sessions.entry(id).or_insert(session)
    }

    pub fn get(&self, id: &str) -> Option<&RegistrationSession> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut RegistrationSession> {
        self.sessions.get_mut(id)
    }

    /// Discards the session and its selection.
    pub fn close(&mut self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
