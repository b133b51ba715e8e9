//! Profile page use-case: a user's details plus their notes.

use crate::auth::session::SessionContext;
use crate::guard::authorize;
use crate::model::note::Note;
use crate::model::user::User;
use crate::repo::note_repo::NoteRepository;
use crate::repo::user_repo::UserRepository;
use crate::service::error::AccessError;
use serde::Serialize;

/// What the profile page shows. `user` serializes without its digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub user: User,
    pub notes: Vec<Note>,
}

pub struct ProfileService<U: UserRepository, N: NoteRepository> {
    users: U,
    notes: N,
}

impl<U: UserRepository, N: NoteRepository> ProfileService<U, N> {
    pub fn new(users: U, notes: N) -> Self {
        Self { users, notes }
    }

    /// Shows `username`'s profile to that same user.
    ///
    /// Authorization runs before the existence check, so anonymous or foreign
    /// callers learn nothing about which usernames exist.
    pub fn view_profile<S>(&self, session: &S, username: &str) -> Result<Profile, AccessError>
    where
        S: SessionContext + ?Sized,
    {
        authorize(session, username).into_result()?;
        let user = self
            .users
            .get_user(username)?
            .ok_or_else(|| AccessError::UserNotFound(username.to_string()))?;
        let notes = self.notes.list_notes_by_owner(username)?;
        Ok(Profile { user, notes })
    }
}
