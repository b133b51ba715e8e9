//! Note repository contract and SQLite implementation.
//!
//! # Invariants
//! - `update_note` never writes the `owner` column.
//! - `delete_note` is a hard delete; ids are `AUTOINCREMENT` and never reused,
//!   so a deleted id stays `NoteNotFound` forever.
//! - Owner listings are ordered by ascending id (creation order).

use crate::model::note::{Note, NoteDraft, NoteId};
use crate::repo::{constraint_violation, ensure_table, RepoError, RepoResult};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};

const NOTE_COLUMNS: &[&str] = &["id", "title", "content", "owner", "created_at", "updated_at"];

/// Persistence contract for notes.
pub trait NoteRepository {
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Inserts a note for `owner` and returns it with its assigned id.
    fn insert_note(&self, owner: &str, draft: &NoteDraft) -> RepoResult<Note>;
    /// Replaces title and content in place.
    fn update_note(&self, id: NoteId, draft: &NoteDraft) -> RepoResult<()>;
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
    fn list_notes_by_owner(&self, owner: &str) -> RepoResult<Vec<Note>>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(conn, "notes", NOTE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let note = self
            .conn
            .query_row(
                "SELECT id, title, content, owner, created_at, updated_at
                 FROM notes
                 WHERE id = ?1;",
                [id],
                parse_note_row,
            )
            .optional()?;
        Ok(note)
    }

    fn insert_note(&self, owner: &str, draft: &NoteDraft) -> RepoResult<Note> {
        let result = self.conn.query_row(
            "INSERT INTO notes (title, content, owner)
             VALUES (?1, ?2, ?3)
             RETURNING id, title, content, owner, created_at, updated_at;",
            params![draft.title.as_str(), draft.content.as_str(), owner],
            parse_note_row,
        );

        result.map_err(|err| match constraint_violation(&err) {
            Some((ffi::SQLITE_CONSTRAINT_FOREIGNKEY, _)) => {
                RepoError::UnknownOwner(owner.to_string())
            }
            _ => err.into(),
        })
    }

    fn update_note(&self, id: NoteId, draft: &NoteDraft) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = ?2,
                content = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![id, draft.title.as_str(), draft.content.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::NoteNotFound(id));
        }
        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NoteNotFound(id));
        }
        Ok(())
    }

    fn list_notes_by_owner(&self, owner: &str) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, content, owner, created_at, updated_at
             FROM notes
             WHERE owner = ?1
             ORDER BY id ASC;",
        )?;
        let notes = stmt
            .query_map([owner], parse_note_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notes)
    }
}

fn parse_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        owner: row.get("owner")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
