//! Failures of console actions and the notices shown for them.
//!
//! Three kinds of failure reach the user: the request never got a response,
//! a local form schema rejected the input, or the server answered with a
//! non-2xx status and (usually) a `{message}` body. Each is caught where the
//! action was triggered and turned into one toast [`Notice`]. Nothing is
//! retried and nothing is fatal.

use crate::validation::ValidationErrors;
use crate::ClinicError;
use serde::{Deserialize, Serialize};

/// Severity of a toast notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A toast notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Why a console action failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    /// No response object at all.
    #[error("network error: {0}")]
    Network(String),
    /// Rejected by a local form schema before anything was sent.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    /// HTTP 401; the session is no longer valid.
    #[error("unauthorised")]
    Unauthorized,
    /// The entity asked for does not exist. Shown, then the page renders empty.
    #[error("not found: {0}")]
    NotFound(String),
    /// Any other non-2xx answer.
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl Failure {
    /// Classifies an HTTP response. Returns `None` for 2xx statuses.
    ///
    /// The server's `message` is kept verbatim; when the body has none, a
    /// generic message naming the status is used instead.
    pub fn from_response(status: u16, body: &str) -> Option<Self> {
        if (200..300).contains(&status) {
            return None;
        }
        if status == 401 {
            return Some(Failure::Unauthorized);
        }

        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status {status}"));

        if status == 404 {
            return Some(Failure::NotFound(message));
        }
        Some(Failure::Server { status, message })
    }

    /// A soft not-found for a fetch-by-id that came back empty.
    pub fn missing(entity: &str) -> Self {
        Failure::NotFound(format!("{entity} not found"))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Failure::Unauthorized)
    }

    /// The toast shown for this failure.
    pub fn notice(&self) -> Notice {
        match self {
            Failure::Network(_) => {
                Notice::error("Unable to reach the server. Please check your connection.")
            }
            Failure::Validation(errors) => Notice::warning(errors.to_string()),
            Failure::Unauthorized => Notice::warning("Your session has expired. Please sign in again."),
            Failure::NotFound(message) => Notice::warning(message.clone()),
            Failure::Server { message, .. } => Notice::error(message.clone()),
        }
    }
}

impl From<ValidationErrors> for Failure {
    fn from(errors: ValidationErrors) -> Self {
        Failure::Validation(errors)
    }
}

/// Local errors surface to the user the same way as server failures.
impl From<&ClinicError> for Notice {
    fn from(err: &ClinicError) -> Self {
        match err {
            ClinicError::Validation(errors) => Notice::warning(errors.to_string()),
            ClinicError::MissingFields(_) => Notice::warning(err.to_string()),
            other => Notice::error(other.to_string()),
        }
    }
}
