//! User-facing presentation of errors.

use derive_more::Display;
use tracerr::Traced;

/// Severity of a [`Notification`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Severity {
    /// Nothing went wrong, the user is merely informed.
    #[display("info")]
    Info,

    /// The action did not happen, but the situation is recoverable by the
    /// user.
    #[display("warning")]
    Warning,

    /// The action failed.
    #[display("error")]
    Error,
}

/// User-facing notification rendered by the console.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[display("{severity}: {message}")]
pub struct Notification {
    /// [`Severity`] of this [`Notification`].
    pub severity: Severity,

    /// Message shown to the user.
    pub message: String,
}

impl Notification {
    /// Creates a new [`Notification`] about locally rejected input.
    ///
    /// Validation failures never reach the wire, so they are always
    /// recoverable.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Maps the provided API error onto a [`Notification`].
    ///
    /// Business errors surface the platform's message verbatim, network
    /// and decoding failures a technical one, and an expired session a
    /// prompt to log in again. The error's trace goes to the log, never
    /// to the user.
    #[must_use]
    pub fn of_api_error(err: &Traced<client::Error>) -> Self {
        use client::{transport, Error as E};

        tracing::debug!("API error: {err}\n{}", err.trace());

        match err.as_ref() {
            E::Transport(transport::Error::SessionExpired)
            | E::Unauthenticated => Self {
                severity: Severity::Warning,
                message: "Session expired, please log in again.".to_owned(),
            },
            E::Transport(transport::Error::Network(e)) => Self {
                severity: Severity::Error,
                message: format!("Cannot reach the platform: {e}"),
            },
            E::Business { message, .. } => Self {
                severity: Severity::Error,
                message: message.clone(),
            },
            E::Decode(e) => Self {
                severity: Severity::Error,
                message: format!("Unexpected response from the platform: {e}"),
            },
            E::UnknownRole(role) => Self {
                severity: Severity::Error,
                message: format!("Unsupported role `{role}`."),
            },
        }
    }
}
