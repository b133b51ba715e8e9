//! User domain model and registration input validation.
//!
//! # Invariants
//! - `username` is 1..=20 chars and never changes after registration.
//! - `email` is 1..=50 chars and shaped like `local@domain.tld`.
//! - `first_name`/`last_name` are 1..=30 chars.
//! - No stored field contains NUL.
//! - The password digest never leaves the crate in serialized or `Debug` form.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub const USERNAME_MAX_CHARS: usize = 20;
pub const EMAIL_MAX_CHARS: usize = 50;
pub const NAME_MAX_CHARS: usize = 30;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Persisted user account.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub(crate) password_digest: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    /// Builds a user record around an already computed digest.
    pub fn new(
        username: impl Into<String>,
        password_digest: impl Into<String>,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password_digest: password_digest.into(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub(crate) fn password_digest(&self) -> &str {
        &self.password_digest
    }
}

impl Debug for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password_digest", &"<redacted>")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Registration form input. Holds the plaintext password only until hashing.
#[derive(Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl Registration {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Checks field shapes before anything is hashed or stored.
    ///
    /// Fields are checked in form order and the first failure wins.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        check_length("username", &self.username, USERNAME_MAX_CHARS)?;
        if self.password.is_empty() {
            return Err(UserValidationError::Empty("password"));
        }
        check_length("email", &self.email, EMAIL_MAX_CHARS)?;
        if !EMAIL_RE.is_match(&self.email) {
            return Err(UserValidationError::InvalidEmail);
        }
        check_length("first_name", &self.first_name, NAME_MAX_CHARS)?;
        check_length("last_name", &self.last_name, NAME_MAX_CHARS)?;
        Ok(())
    }
}

impl Debug for Registration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Field-level registration failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    Empty(&'static str),
    TooLong { field: &'static str, max: usize },
    InvalidEmail,
    /// Field holds characters the store cannot keep, such as NUL.
    InvalidCharacters(&'static str),
}

impl UserValidationError {
    /// Form field the failure should be attached to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty(field)
            | Self::TooLong { field, .. }
            | Self::InvalidCharacters(field) => *field,
            Self::InvalidEmail => "email",
        }
    }
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(field) => write!(f, "{field} must not be empty"),
            Self::TooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
            Self::InvalidEmail => write!(f, "email is not a valid address"),
            Self::InvalidCharacters(field) => {
                write!(f, "{field} contains characters that cannot be stored")
            }
        }
    }
}

impl Error for UserValidationError {}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), UserValidationError> {
    if value.trim().is_empty() {
        return Err(UserValidationError::Empty(field));
    }
    if value.chars().count() > max {
        return Err(UserValidationError::TooLong { field, max });
    }
    if value.contains('\0') {
        return Err(UserValidationError::InvalidCharacters(field));
    }
    Ok(())
}
