//! Core of the NoteKeep multi-user notes service.
//! Owns session-based authorization and note ownership rules; transports
//! (web, CLI) call into it and render the outcomes.

pub mod auth;
pub mod db;
pub mod guard;
pub mod logging;
pub mod model;
pub mod repo;
pub mod response;
pub mod service;

pub use auth::digest::{Argon2Digest, DigestError, HashCost, PasswordDigest};
pub use auth::session::{Session, SessionContext, SessionId, SessionStore};
pub use guard::{authorize, user_landing_path, Decision, Denial};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::note::{Note, NoteDraft, NoteId, NoteValidationError};
pub use model::user::{Registration, User, UserValidationError};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult, UniqueField};
pub use response::Response;
pub use service::auth_service::{
    AuthService, LoginError, RegisterError, INVALID_CREDENTIALS_MESSAGE,
};
pub use service::error::AccessError;
pub use service::note_service::NoteService;
pub use service::profile_service::{Profile, ProfileService};

/// Minimal health-check API for transport wiring.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
