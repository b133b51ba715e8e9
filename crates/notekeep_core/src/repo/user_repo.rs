//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - `insert_user` is one `INSERT`; the `PRIMARY KEY`/`UNIQUE` constraints
//!   decide races between concurrent registrations.
//! - Email uniqueness is case-insensitive (`COLLATE NOCASE`).

use crate::model::user::User;
use crate::repo::{constraint_violation, ensure_table, RepoError, RepoResult, UniqueField};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};

const USER_COLUMNS: &[&str] = &[
    "username",
    "password_digest",
    "email",
    "first_name",
    "last_name",
];

/// Persistence contract for user accounts.
pub trait UserRepository {
    /// Loads one user by exact username.
    fn get_user(&self, username: &str) -> RepoResult<Option<User>>;
    /// Inserts a new user, failing with `DuplicateKey` on a taken username or email.
    fn insert_user(&self, user: &User) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(conn, "users", USER_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn get_user(&self, username: &str) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT username, password_digest, email, first_name, last_name
                 FROM users
                 WHERE username = ?1;",
                [username],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn insert_user(&self, user: &User) -> RepoResult<()> {
        let result = self.conn.execute(
            "INSERT INTO users (username, password_digest, email, first_name, last_name)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                user.username.as_str(),
                user.password_digest(),
                user.email.as_str(),
                user.first_name.as_str(),
                user.last_name.as_str(),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(err) => Err(map_insert_error(err)),
        }
    }
}

fn map_insert_error(err: rusqlite::Error) -> RepoError {
    match constraint_violation(&err) {
        Some((ffi::SQLITE_CONSTRAINT_PRIMARYKEY, _)) => {
            RepoError::DuplicateKey(UniqueField::Username)
        }
        Some((ffi::SQLITE_CONSTRAINT_UNIQUE, message)) => {
            if message.contains("users.email") {
                RepoError::DuplicateKey(UniqueField::Email)
            } else {
                RepoError::DuplicateKey(UniqueField::Username)
            }
        }
        _ => err.into(),
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        username: row.get("username")?,
        password_digest: row.get("password_digest")?,
        email: row.get("email")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
    })
}
