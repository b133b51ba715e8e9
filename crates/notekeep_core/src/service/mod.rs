//! Use-case services: registration/login and owner-scoped note access.
//!
//! # Responsibility
//! - Orchestrate guard decisions and repository calls per use-case.
//! - Keep transport layers decoupled from storage and hashing details.
//!
//! # Invariants
//! - Owner-scoped reads and writes consult `guard::authorize` before the store
//!   is mutated or note data is returned.
//! - A failed call leaves the caller's session exactly as it was.

pub mod auth_service;
pub mod error;
pub mod note_service;
pub mod profile_service;
