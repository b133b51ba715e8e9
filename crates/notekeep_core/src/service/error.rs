//! Errors shared by the owner-scoped services.

use crate::guard::Denial;
use crate::model::note::{NoteId, NoteValidationError};
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of an owner-scoped operation.
#[derive(Debug)]
pub enum AccessError {
    /// The guard refused the caller.
    Denied(Denial),
    NoteNotFound(NoteId),
    UserNotFound(String),
    InvalidNote(NoteValidationError),
    /// Store failure; the operation had no effect.
    Store(RepoError),
}

impl AccessError {
    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Self::Denied(denial) => Some(denial),
            _ => None,
        }
    }
}

impl Display for AccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Denied(denial) => write!(f, "{}", denial.message()),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::UserNotFound(username) => write!(f, "user not found: {username}"),
            Self::InvalidNote(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AccessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidNote(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<Denial> for AccessError {
    fn from(value: Denial) -> Self {
        Self::Denied(value)
    }
}

impl From<NoteValidationError> for AccessError {
    fn from(value: NoteValidationError) -> Self {
        Self::InvalidNote(value)
    }
}

impl From<RepoError> for AccessError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NoteNotFound(id) => Self::NoteNotFound(id),
            RepoError::UnknownOwner(owner) => Self::UserNotFound(owner),
            // The title is the only checked note column.
            RepoError::RejectedValue(_) => Self::InvalidNote(NoteValidationError::InvalidTitle),
            other => Self::Store(other),
        }
    }
}
