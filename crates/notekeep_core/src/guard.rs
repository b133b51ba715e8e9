//! Ownership authorization guard.
//!
//! # Responsibility
//! - Decide whether the caller may touch a resource owned by `target_owner`.
//! - Carry the redirect target and user-facing message for each denial.
//!
//! # Invariants
//! - Checks run in a fixed order: anonymous first, then owner mismatch.
//! - A forbidden caller is sent to their own landing page, never the target's.
//! - `authorize` only reads the session; it has no other inputs or effects.
//! - Every owner-scoped operation goes through `authorize`, profile view
//!   included.

use crate::auth::session::SessionContext;
use log::debug;
use serde::Serialize;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const UNAUTHENTICATED_MESSAGE: &str = "not authorized, please log in";
pub const FORBIDDEN_MESSAGE: &str = "not authorized to access another user's resource";

/// Landing page of `username`.
pub fn user_landing_path(username: &str) -> String {
    format!("/users/{username}")
}

/// Outcome of an ownership check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Deny(Denial),
}

/// Why access was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Denial {
    /// No user is logged in.
    Unauthenticated,
    /// `caller` is logged in but does not own the resource.
    Forbidden { caller: String },
}

impl Denial {
    /// Where the transport should send the caller.
    pub fn redirect(&self) -> String {
        match self {
            Self::Unauthenticated => LOGIN_PATH.to_string(),
            Self::Forbidden { caller } => user_landing_path(caller),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Unauthenticated => UNAUTHENTICATED_MESSAGE,
            Self::Forbidden { .. } => FORBIDDEN_MESSAGE,
        }
    }
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// `Ok(())` on allow, the denial otherwise.
    pub fn into_result(self) -> Result<(), Denial> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(denial) => Err(denial),
        }
    }
}

/// Decides whether `session` may access a resource owned by `target_owner`.
pub fn authorize<S>(session: &S, target_owner: &str) -> Decision
where
    S: SessionContext + ?Sized,
{
    let decision = match session.current_username() {
        None => Decision::Deny(Denial::Unauthenticated),
        Some(caller) if caller != target_owner => Decision::Deny(Denial::Forbidden {
            caller: caller.to_string(),
        }),
        Some(_) => Decision::Allow,
    };

    match &decision {
        Decision::Allow => debug!("event=authorize module=guard status=allow"),
        Decision::Deny(Denial::Unauthenticated) => {
            debug!("event=authorize module=guard status=deny reason=unauthenticated")
        }
        Decision::Deny(Denial::Forbidden { .. }) => {
            debug!("event=authorize module=guard status=deny reason=forbidden")
        }
    }
    decision
}
