//! Transport-facing mapping of core outcomes to responses.
//!
//! # Responsibility
//! - Turn denials and service errors into redirect/flash, not-found, or
//!   field-error responses that a web layer can render directly.
//! - Name the landing routes the core redirects to.
//!
//! # Invariants
//! - Denials always map to a redirect, never to an error page.
//! - A failed login maps to one response regardless of why it failed.
//! - Store failures never echo internal error text to the user.

use crate::guard::{user_landing_path, Denial, REGISTER_PATH};
use crate::service::auth_service::{LoginError, RegisterError, INVALID_CREDENTIALS_MESSAGE};
use crate::service::error::AccessError;
use serde::Serialize;

const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable, please retry.";

/// Flash message category, mirroring the usual alert styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Info,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Protocol-neutral response produced by the transport mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    Redirect {
        location: String,
        flash: Option<Flash>,
    },
    NotFound,
    /// Re-render the form with `message` attached to `field`.
    FieldError {
        field: &'static str,
        message: String,
    },
    Unavailable {
        message: &'static str,
    },
}

impl Response {
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            location: location.into(),
            flash: None,
        }
    }

    fn redirect_with(location: impl Into<String>, flash: Flash) -> Self {
        Self::Redirect {
            location: location.into(),
            flash: Some(flash),
        }
    }
}

/// The site root only sends visitors to registration.
pub fn home() -> Response {
    Response::redirect(REGISTER_PATH)
}

/// After registration or login the user lands on their own page.
pub fn signed_in(username: &str) -> Response {
    Response::redirect_with(
        user_landing_path(username),
        Flash::new(FlashLevel::Success, format!("Welcome, {username}!")),
    )
}

pub fn signed_out() -> Response {
    Response::redirect_with("/", Flash::new(FlashLevel::Info, "You have been logged out."))
}

/// Where to go after deleting a note: back to the owner's page.
pub fn note_deleted(owner: &str) -> Response {
    Response::redirect_with(
        user_landing_path(owner),
        Flash::new(FlashLevel::Info, "Note deleted."),
    )
}

pub fn from_denial(denial: &Denial) -> Response {
    Response::redirect_with(
        denial.redirect(),
        Flash::new(FlashLevel::Danger, denial.message()),
    )
}

pub fn from_access_error(err: &AccessError) -> Response {
    match err {
        AccessError::Denied(denial) => from_denial(denial),
        AccessError::NoteNotFound(_) | AccessError::UserNotFound(_) => Response::NotFound,
        AccessError::InvalidNote(invalid) => Response::FieldError {
            field: "title",
            message: invalid.to_string(),
        },
        AccessError::Store(_) => Response::Unavailable {
            message: UNAVAILABLE_MESSAGE,
        },
    }
}

pub fn from_register_error(err: &RegisterError) -> Response {
    match err {
        RegisterError::Invalid(invalid) => Response::FieldError {
            field: invalid.field(),
            message: invalid.to_string(),
        },
        RegisterError::DuplicateKey(field) => Response::FieldError {
            field: field.as_str(),
            message: format!("This {} is already taken.", field.as_str()),
        },
        RegisterError::Digest(_) | RegisterError::Store(_) => Response::Unavailable {
            message: UNAVAILABLE_MESSAGE,
        },
    }
}

pub fn from_login_error(err: &LoginError) -> Response {
    match err {
        LoginError::InvalidCredentials => Response::FieldError {
            field: "username",
            message: INVALID_CREDENTIALS_MESSAGE.to_string(),
        },
        LoginError::Store(_) => Response::Unavailable {
            message: UNAVAILABLE_MESSAGE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{
        from_access_error, from_denial, from_login_error, home, note_deleted, signed_in,
        signed_out, FlashLevel, Response,
    };
    use crate::guard::Denial;
    use crate::model::note::NoteValidationError;
    use crate::service::auth_service::LoginError;
    use crate::service::error::AccessError;

    #[test]
    fn forbidden_redirects_to_callers_page_with_flash() {
        let response = from_denial(&Denial::Forbidden {
            caller: "bob".to_string(),
        });
        match response {
            Response::Redirect { location, flash } => {
                assert_eq!(location, "/users/bob");
                assert!(flash.is_some());
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn missing_note_is_not_found() {
        assert_eq!(
            from_access_error(&AccessError::NoteNotFound(7)),
            Response::NotFound
        );
    }

    #[test]
    fn invalid_title_is_reported_on_title_field() {
        let response = from_access_error(&AccessError::InvalidNote(
            NoteValidationError::EmptyTitle,
        ));
        assert!(matches!(response, Response::FieldError { field: "title", .. }));
    }

    #[test]
    fn invalid_credentials_serialize_to_single_message() {
        let value = serde_json::to_value(from_login_error(&LoginError::InvalidCredentials)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "kind": "field_error",
                "field": "username",
                "message": "Invalid username/password."
            })
        );
    }

    #[test]
    fn home_sends_visitors_to_register() {
        assert_eq!(home(), Response::redirect("/register"));
    }

    #[test]
    fn session_transitions_land_on_expected_pages() {
        match signed_in("alice") {
            Response::Redirect {
                location,
                flash: Some(flash),
            } => {
                assert_eq!(location, "/users/alice");
                assert_eq!(flash.level, FlashLevel::Success);
            }
            other => panic!("unexpected response: {other:?}"),
        }
        assert!(matches!(
            signed_out(),
            Response::Redirect { ref location, .. } if location == "/"
        ));
        assert!(matches!(
            note_deleted("alice"),
            Response::Redirect { ref location, .. } if location == "/users/alice"
        ));
    }
}
