//! Note domain model.
//!
//! # Invariants
//! - `id` is assigned by storage and never reused after deletion.
//! - `owner` is set once at creation; updates touch `title`/`content` only.
//! - `title` is 1..=100 chars without NUL; `content` is unbounded.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned note identifier.
pub type NoteId = i64;

pub const TITLE_MAX_CHARS: usize = 100;

/// Persisted note owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub owner: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds, bumped on every update.
    pub updated_at: i64,
}

/// Note body as submitted by the owner, before an id exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.title.trim().is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }
        // SQLite measures TEXT length up to the first NUL only.
        if self.title.contains('\0') {
            return Err(NoteValidationError::InvalidTitle);
        }
        let chars = self.title.chars().count();
        if chars > TITLE_MAX_CHARS {
            return Err(NoteValidationError::TitleTooLong { chars });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    TitleTooLong { chars: usize },
    /// Title holds characters the store cannot keep, such as NUL.
    InvalidTitle,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { chars } => write!(
                f,
                "title must be at most {TITLE_MAX_CHARS} characters, got {chars}"
            ),
            Self::InvalidTitle => write!(f, "title contains characters that cannot be stored"),
        }
    }
}

impl Error for NoteValidationError {}

#[cfg(test)]
mod tests {
    use super::{NoteDraft, NoteValidationError};

    #[test]
    fn title_of_exactly_one_hundred_chars_is_accepted() {
        NoteDraft::new("t".repeat(100), "")
            .validate()
            .expect("100 chars is the limit");
    }

    #[test]
    fn title_over_limit_reports_length() {
        let err = NoteDraft::new("t".repeat(101), "body").validate().unwrap_err();
        assert_eq!(err, NoteValidationError::TitleTooLong { chars: 101 });
    }

    #[test]
    fn whitespace_title_is_empty() {
        let err = NoteDraft::new("   ", "body").validate().unwrap_err();
        assert_eq!(err, NoteValidationError::EmptyTitle);
    }

    #[test]
    fn nul_anywhere_in_title_is_rejected() {
        for title in ["\0title", "ti\0tle", "title\0"] {
            let err = NoteDraft::new(title, "body").validate().unwrap_err();
            assert_eq!(err, NoteValidationError::InvalidTitle);
        }
    }
}
