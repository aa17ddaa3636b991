//! Authentication endpoints.

use secrecy::{ExposeSecret as _, SecretBox};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::{Email, SecretCode};

use super::{Ack, Endpoint};

/// `POST auth/login` authenticating a user by email and secret code.
///
/// Deliberately not a [`Query`](super::Query) nor a
/// [`Mutation`](super::Mutation): the login flow bypasses the cache and
/// fills the session store instead.
#[derive(Debug)]
pub struct LogIn {
    /// [`Email`] the user logs in with.
    pub email: Email,

    /// [`SecretCode`] of the user.
    pub secret_code: SecretBox<SecretCode>,
}

impl Endpoint for LogIn {
    type Output = LogInData;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::POST
    }

    fn path(&self) -> String {
        "auth/login".into()
    }

    fn body(&self) -> Option<Value> {
        Some(json!({
            "email": AsRef::<str>::as_ref(&self.email),
            "secret_code": self.secret_code.expose_secret().to_string(),
        }))
    }
}

/// Payload of a successful [`LogIn`] response.
#[derive(Clone, Debug, Deserialize)]
pub struct LogInData {
    /// Authenticated user.
    pub user: LogInUser,

    /// Issued access token.
    pub access_token: String,

    /// Issued refresh token.
    pub refresh_token: String,
}

/// User descriptor of a [`LogInData`] payload.
#[derive(Clone, Debug, Deserialize)]
pub struct LogInUser {
    /// ID of the user.
    pub id: String,

    /// Name of the role the platform assigned to the user.
    pub role_name: String,
}

/// `POST auth/email_verification` requesting a verification message.
#[derive(Clone, Debug)]
pub struct EmailVerification {
    /// [`Email`] to verify.
    pub email: Email,
}

impl Endpoint for EmailVerification {
    type Output = Ack;

    fn method(&self) -> reqwest::Method {
        reqwest::Method::POST
    }

    fn path(&self) -> String {
        "auth/email_verification".into()
    }

    fn body(&self) -> Option<Value> {
        Some(json!({"email": AsRef::<str>::as_ref(&self.email)}))
    }
}
