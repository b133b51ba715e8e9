//! Domain records for users and their notes.
//!
//! # Invariants
//! - A user is identified by an immutable `username`.
//! - Every note carries exactly one `owner` username, fixed at creation.
//! - Validation lives on the model so every write path shares it.

pub mod note;
pub mod user;
