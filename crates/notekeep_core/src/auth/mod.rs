//! Authentication primitives: password digests and session bindings.
//!
//! # Responsibility
//! - Hide the password hashing scheme behind `PasswordDigest`.
//! - Define the narrow session accessor contract used by the guard.
//!
//! # Invariants
//! - Plaintext passwords never outlive the call that hashes or verifies them.
//! - A session holds at most one logged-in username.

pub mod digest;
pub mod session;
