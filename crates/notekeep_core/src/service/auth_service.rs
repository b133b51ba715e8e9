//! Registration and credential verification.
//!
//! # Responsibility
//! - Register users with a hashed password.
//! - Verify credentials and bind/unbind sessions.
//!
//! # Invariants
//! - The plaintext password is never stored, logged, or returned.
//! - "Unknown user" and "wrong password" are indistinguishable to callers:
//!   same result, same message, comparable cost.
//! - The session is only written after the store answered successfully.

use crate::auth::digest::{DigestError, PasswordDigest};
use crate::auth::session::SessionContext;
use crate::model::user::{Registration, User, UserValidationError};
use crate::repo::user_repo::UserRepository;
use crate::repo::{RepoError, RepoResult, UniqueField};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The only message shown for a failed login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username/password.";

#[derive(Debug)]
pub enum RegisterError {
    Invalid(UserValidationError),
    /// Username or email already taken.
    DuplicateKey(UniqueField),
    Digest(DigestError),
    Store(RepoError),
}

impl Display for RegisterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::DuplicateKey(field) => write!(f, "{} is already taken", field.as_str()),
            Self::Digest(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RegisterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::DuplicateKey(_) => None,
            Self::Digest(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<RepoError> for RegisterError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateKey(field) => Self::DuplicateKey(field),
            RepoError::RejectedValue(message) => {
                Self::Invalid(UserValidationError::InvalidCharacters(rejected_field(&message)))
            }
            other => Self::Store(other),
        }
    }
}

/// Picks the registration field named by a schema `CHECK` failure message.
fn rejected_field(message: &str) -> &'static str {
    ["username", "email", "first_name", "last_name"]
        .into_iter()
        .find(|field| message.contains(*field))
        .unwrap_or("username")
}

#[derive(Debug)]
pub enum LoginError {
    /// Unknown username or wrong password; deliberately not told apart.
    InvalidCredentials,
    Store(RepoError),
}

impl Display for LoginError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "{INVALID_CREDENTIALS_MESSAGE}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LoginError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidCredentials => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<RepoError> for LoginError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

/// Authenticator over a user repository and a digest capability.
pub struct AuthService<R: UserRepository, D: PasswordDigest> {
    users: R,
    digest: D,
}

impl<R: UserRepository, D: PasswordDigest> AuthService<R, D> {
    pub fn new(users: R, digest: D) -> Self {
        Self { users, digest }
    }

    /// Registers a new user and returns the stored record.
    ///
    /// Does not log the new user in; callers decide whether to follow up
    /// with `login`.
    pub fn register(&self, registration: &Registration) -> Result<User, RegisterError> {
        registration.validate().map_err(RegisterError::Invalid)?;

        let password_digest = self
            .digest
            .hash(&registration.password)
            .map_err(RegisterError::Digest)?;
        let user = User::new(
            registration.username.as_str(),
            password_digest,
            registration.email.as_str(),
            registration.first_name.as_str(),
            registration.last_name.as_str(),
        );

        match self.users.insert_user(&user) {
            Ok(()) => {
                info!("event=register module=auth status=ok");
                Ok(user)
            }
            Err(err) => {
                let err = RegisterError::from(err);
                match &err {
                    RegisterError::DuplicateKey(field) => info!(
                        "event=register module=auth status=rejected reason=duplicate_{}",
                        field.as_str()
                    ),
                    other => warn!("event=register module=auth status=error error={other}"),
                }
                Err(err)
            }
        }
    }

    /// Returns the user when `password` matches the stored digest.
    ///
    /// `Ok(None)` covers both an unknown username and a wrong password.
    pub fn authenticate(&self, username: &str, password: &str) -> RepoResult<Option<User>> {
        let Some(user) = self.users.get_user(username)? else {
            // Burn a comparable amount of work so response timing does not
            // reveal which usernames exist.
            let _ = self.digest.hash(password);
            return Ok(None);
        };

        if self.digest.verify(password, user.password_digest()) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Authenticates and, on success, binds `session` to the user.
    pub fn login<S>(
        &self,
        session: &mut S,
        username: &str,
        password: &str,
    ) -> Result<User, LoginError>
    where
        S: SessionContext + ?Sized,
    {
        match self.authenticate(username, password) {
            Ok(Some(user)) => {
                session.login(&user.username);
                info!("event=login module=auth status=ok");
                Ok(user)
            }
            Ok(None) => {
                info!("event=login module=auth status=rejected reason=invalid_credentials");
                Err(LoginError::InvalidCredentials)
            }
            Err(err) => {
                warn!("event=login module=auth status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Clears the session binding. Safe to call on an anonymous session.
    pub fn logout<S>(&self, session: &mut S)
    where
        S: SessionContext + ?Sized,
    {
        let was_bound = session.current_username().is_some();
        session.logout();
        info!("event=logout module=auth status=ok was_bound={was_bound}");
    }
}
