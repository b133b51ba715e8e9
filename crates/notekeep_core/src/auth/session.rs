//! Session bindings between a browsing context and a logged-in username.
//!
//! # Responsibility
//! - Expose the three-call accessor contract (`current_username`, `login`,
//!   `logout`) the guard and services depend on.
//! - Keep bindings of different browsing contexts isolated.
//!
//! # Invariants
//! - `login` overwrites any prior binding.
//! - `logout` on an anonymous session is a no-op.
//! - `SessionStore` hands out copies; mutating one copy never leaks into
//!   another session id until it is explicitly saved.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Opaque identity of one browsing context (cookie value, connection id...).
pub type SessionId = Uuid;

/// Accessor contract for the caller's authentication state.
pub trait SessionContext {
    /// Username bound to this session, `None` when anonymous.
    fn current_username(&self) -> Option<&str>;
    /// Binds the session to `username`, replacing any previous binding.
    fn login(&mut self, username: &str);
    /// Clears the binding.
    fn logout(&mut self);
}

/// Request-scoped session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    logged_in_username: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session already bound to `username`.
    pub fn as_user(username: impl Into<String>) -> Self {
        Self {
            logged_in_username: Some(username.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.logged_in_username.is_some()
    }
}

impl SessionContext for Session {
    fn current_username(&self) -> Option<&str> {
        self.logged_in_username.as_deref()
    }

    fn login(&mut self, username: &str) {
        self.logged_in_username = Some(username.to_string());
    }

    fn logout(&mut self) {
        self.logged_in_username = None;
    }
}

/// In-process session persistence keyed by `SessionId`.
///
/// Transport layers load a `Session` at the start of a request, pass it
/// through the core, and save it back at the end.
///
/// Entries are never expired here; the transport owns eviction and must call
/// `discard` when a browsing context ends or times out.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh anonymous session. It stays until `discard`.
    pub fn create(&self) -> SessionId {
        let id = Uuid::new_v4();
        self.lock().insert(id, Session::anonymous());
        id
    }

    /// Returns a copy of the session for `id`; unknown ids are anonymous.
    pub fn load(&self, id: SessionId) -> Session {
        self.lock().get(&id).cloned().unwrap_or_default()
    }

    pub fn save(&self, id: SessionId, session: &Session) {
        self.lock().insert(id, session.clone());
    }

    /// Forgets `id` entirely. Later loads see an anonymous session.
    pub fn discard(&self, id: SessionId) {
        self.lock().remove(&id);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, Session>> {
        // The map holds plain values, so a panicked writer cannot leave it
        // half-updated.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
