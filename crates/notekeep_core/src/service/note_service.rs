//! Owner-scoped note use-cases.
//!
//! # Responsibility
//! - Resolve the owner of the note being touched.
//! - Run the ownership guard before any note is returned or mutated.
//!
//! # Invariants
//! - Order per call: resolve owner, authorize, validate, persist.
//! - A note's `owner` is chosen at creation and never rewritten.
//! - Deleting or updating a missing id is `NoteNotFound`, never a silent no-op.

use crate::auth::session::SessionContext;
use crate::guard::authorize;
use crate::model::note::{Note, NoteDraft, NoteId};
use crate::repo::note_repo::NoteRepository;
use crate::repo::user_repo::UserRepository;
use crate::service::error::AccessError;
use log::info;

/// Note service over user and note repositories.
pub struct NoteService<U: UserRepository, N: NoteRepository> {
    users: U,
    notes: N,
}

impl<U: UserRepository, N: NoteRepository> NoteService<U, N> {
    pub fn new(users: U, notes: N) -> Self {
        Self { users, notes }
    }

    /// Creates a note owned by `target_owner`.
    pub fn add_note<S>(
        &self,
        session: &S,
        target_owner: &str,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Note, AccessError>
    where
        S: SessionContext + ?Sized,
    {
        authorize(session, target_owner).into_result()?;
        if self.users.get_user(target_owner)?.is_none() {
            return Err(AccessError::UserNotFound(target_owner.to_string()));
        }

        let draft = NoteDraft::new(title, content);
        draft.validate()?;
        let note = self.notes.insert_note(target_owner, &draft)?;
        info!("event=note_add module=notes status=ok note_id={}", note.id);
        Ok(note)
    }

    /// Returns one note to its owner.
    pub fn get_note<S>(&self, session: &S, note_id: NoteId) -> Result<Note, AccessError>
    where
        S: SessionContext + ?Sized,
    {
        let note = self.resolve(note_id)?;
        authorize(session, &note.owner).into_result()?;
        Ok(note)
    }

    /// Replaces title and content of a note owned by the caller.
    pub fn update_note<S>(
        &self,
        session: &S,
        note_id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Note, AccessError>
    where
        S: SessionContext + ?Sized,
    {
        let existing = self.resolve(note_id)?;
        authorize(session, &existing.owner).into_result()?;

        let draft = NoteDraft::new(title, content);
        draft.validate()?;
        self.notes.update_note(note_id, &draft)?;
        info!("event=note_update module=notes status=ok note_id={note_id}");

        // Read back for the refreshed `updated_at`; a concurrent delete
        // between the update and this read surfaces as `NoteNotFound`.
        self.resolve(note_id)
    }

    /// Permanently removes a note owned by the caller.
    pub fn delete_note<S>(&self, session: &S, note_id: NoteId) -> Result<(), AccessError>
    where
        S: SessionContext + ?Sized,
    {
        let existing = self.resolve(note_id)?;
        authorize(session, &existing.owner).into_result()?;

        self.notes.delete_note(note_id)?;
        info!("event=note_delete module=notes status=ok note_id={note_id}");
        Ok(())
    }

    /// Lists `owner`'s notes in creation order.
    pub fn list_notes<S>(&self, session: &S, owner: &str) -> Result<Vec<Note>, AccessError>
    where
        S: SessionContext + ?Sized,
    {
        authorize(session, owner).into_result()?;
        Ok(self.notes.list_notes_by_owner(owner)?)
    }

    fn resolve(&self, note_id: NoteId) -> Result<Note, AccessError> {
        self.notes
            .get_note(note_id)?
            .ok_or(AccessError::NoteNotFound(note_id))
    }
}
