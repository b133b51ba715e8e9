//! Credential store: repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the narrow CRUD contracts the services depend on.
//! - Keep SQL and constraint-code details inside the persistence boundary.
//!
//! # Invariants
//! - Uniqueness is enforced by the schema and surfaced as `DuplicateKey`,
//!   never by a read-then-write check.
//! - Every write is a single statement, so readers never see partial state.

use crate::db::DbError;
use crate::model::note::NoteId;
use rusqlite::{ffi, Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod note_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Unique column that rejected an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl UniqueField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
        }
    }
}

/// Repository error for user/note persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    DuplicateKey(UniqueField),
    NoteNotFound(NoteId),
    /// Foreign key rejected a note whose owner is not a registered user.
    UnknownOwner(String),
    /// A schema `CHECK` refused a value that passed model validation.
    RejectedValue(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateKey(field) => write!(f, "duplicate {}", field.as_str()),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::UnknownOwner(owner) => write!(f, "note owner does not exist: {owner}"),
            Self::RejectedValue(message) => write!(f, "value rejected by schema: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match constraint_violation(&value) {
            Some((ffi::SQLITE_CONSTRAINT_CHECK, message)) => {
                Self::RejectedValue(message.to_string())
            }
            _ => Self::Db(DbError::Engine(value)),
        }
    }
}

/// Returns the SQLite extended constraint code when `err` is a constraint
/// violation, together with the engine message naming the column.
pub(crate) fn constraint_violation(err: &rusqlite::Error) -> Option<(i32, &str)> {
    match err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            Some((failure.extended_code, message.as_deref().unwrap_or("")))
        }
        _ => None,
    }
}

/// Verifies that `table` exists with every column in `columns`.
pub(crate) fn ensure_table(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::MissingRequiredTable(table));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    for &column in columns {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }
    Ok(())
}
