//! Client contains the session, transport and caching logic of the console.

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod cache;
pub mod domain;
pub mod endpoint;
pub mod guard;
pub mod session;
pub mod storage;
pub mod transport;

use std::{sync::Arc, time::Duration};

use common::Role;
use derive_more::{Display, Error as StdError, From};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use tracerr::Traced;

use crate::{
    cache::Cache,
    domain::Email,
    endpoint::{auth, Endpoint as _, Mutation, Query, Tag},
    session::{Session, SessionStore},
    transport::{Call, Reply, Transport},
};

pub use crate::guard::{Guard, Outcome};

/// Message shown to the user when the platform reports an error without
/// a human-readable explanation.
pub const GENERIC_ERROR_MESSAGE: &str =
    "Something went wrong, please try again.";

/// [`Api`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the platform API.
    pub base_url: String,

    /// Timeout of a single HTTP request.
    pub timeout: Duration,
}

/// Facade over the platform API.
///
/// Queries go through the tag-invalidated [`Cache`], mutations invalidate
/// the tags they declare, and every call is performed by the transport `T`
/// (the authenticated request layer).
#[derive(Clone, Debug)]
pub struct Api<T> {
    /// Transport performing the wire calls.
    transport: T,

    /// [`SessionStore`] of this [`Api`].
    session: Arc<SessionStore>,

    /// [`Cache`] of query results.
    cache: Arc<Cache<Tag>>,
}

impl<T> Api<T>
where
    T: Transport<Call, Ok = Reply, Err = Traced<transport::Error>>,
{
    /// Creates a new [`Api`] with the provided parameters.
    pub fn new(
        transport: T,
        session: Arc<SessionStore>,
        cache: Arc<Cache<Tag>>,
    ) -> Self {
        Self {
            transport,
            session,
            cache,
        }
    }

    /// Returns the [`SessionStore`] of this [`Api`].
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Returns the [`Cache`] of this [`Api`].
    #[must_use]
    pub fn cache(&self) -> &Cache<Tag> {
        &self.cache
    }

    /// Executes the provided [`Query`], serving it from the [`Cache`]
    /// whenever a fresh result for the same key is available.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the call fails or its response cannot be
    /// decoded.
    pub async fn query<Q: Query>(
        &self,
        query: &Q,
    ) -> Result<Q::Output, Traced<Error>> {
        let call = query.call();
        let key = cache::Key::of(&call);

        let value = self
            .cache
            .fetch(key, Q::TAGS, async {
                let reply = self
                    .transport
                    .execute(call)
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> Error))?;
                accept(reply)
            })
            .await?;

        decode(value)
    }

    /// Executes the provided [`Mutation`] and, once it succeeds,
    /// invalidates the [`Cache`] tags it declares.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the call fails or its response cannot be
    /// decoded.
    pub async fn mutate<M: Mutation>(
        &self,
        mutation: &M,
    ) -> Result<M::Output, Traced<Error>> {
        let reply = self
            .transport
            .execute(mutation.call())
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;
        let value = accept(reply)?;

        self.cache.invalidate(M::INVALIDATES);

        decode(value)
    }

    /// Logs the user in with the provided credentials, atomically filling
    /// the [`SessionStore`] on success.
    ///
    /// Returns the [`Role`] the platform assigned to the session.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the credentials are rejected, the call
    /// fails, or the platform reports an unknown role.
    pub async fn log_in(
        &self,
        credentials: auth::LogIn,
    ) -> Result<Role, Traced<Error>> {
        let login_id = credentials.email.clone();

        let reply = self
            .transport
            .execute(credentials.call())
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;
        let data: auth::LogInData = decode(accept(reply)?)?;

        let scope = data.user.role_name.parse::<Role>().map_err(|_| {
            tracerr::new!(Error::UnknownRole(data.user.role_name.clone()))
        })?;

        self.session.set_credentials(Session {
            user_id: data.user.id.into(),
            login_id: String::from(login_id).into(),
            access_token: data.access_token.into(),
            refresh_token: data.refresh_token.into(),
            scope,
        });

        Ok(scope)
    }

    /// Requests an email verification message for the provided address.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the call fails.
    pub async fn request_email_verification(
        &self,
        email: Email,
    ) -> Result<(), Traced<Error>> {
        let reply = self
            .transport
            .execute(auth::EmailVerification { email }.call())
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;

        accept(reply).map(drop)
    }

    /// Logs the user out: clears the session, wipes its persisted record
    /// and drops every cached query result.
    ///
    /// Idempotent.
    pub fn log_out(&self) {
        self.session.log_out();
        self.cache.clear();
    }
}

/// Error of an [`Api`] operation.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Authenticated request layer failure.
    #[display("transport failed: {_0}")]
    Transport(transport::Error),

    /// The call stayed unauthenticated after the refresh flow, or was
    /// rejected while no session existed.
    #[display("request was not authenticated")]
    Unauthenticated,

    /// Error reported by the platform with a user-readable message.
    #[display("platform rejected the request ({status}): {message}")]
    #[from(ignore)]
    Business {
        /// HTTP status code of the rejection.
        #[error(not(source))]
        status: u16,

        /// Message supplied by the platform, or
        /// [`GENERIC_ERROR_MESSAGE`].
        message: String,
    },

    /// Response body is malformed.
    #[display("cannot decode response: {_0}")]
    Decode(serde_json::Error),

    /// Login response carries a role this console does not know.
    #[display("unknown `Role`: {_0}")]
    #[from(ignore)]
    UnknownRole(#[error(not(source))] String),
}

impl Error {
    /// Indicates whether this [`Error`] means the session has expired and
    /// the user has been logged out.
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::Transport(transport::Error::SessionExpired))
    }
}

/// Response body, either wrapped into the platform's `{status, data}`
/// envelope or bare.
#[derive(Deserialize)]
#[serde(untagged)]
enum Body<T> {
    /// Enveloped response body.
    Enveloped {
        /// Payload of the envelope.
        data: T,
    },

    /// Bare response body.
    Bare(T),
}

/// Maps the provided [`Reply`] onto the error taxonomy: 2xx passes
/// through, 401 means unauthenticated, anything else is a business error
/// carrying the platform's message (or the generic fallback).
fn accept(reply: Reply) -> Result<Value, Traced<Error>> {
    if reply.status.is_success() {
        return Ok(reply.body);
    }

    if reply.status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(tracerr::new!(Error::Unauthenticated));
    }

    let message = reply
        .body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(GENERIC_ERROR_MESSAGE)
        .to_owned();
    Err(tracerr::new!(Error::Business {
        status: reply.status.as_u16(),
        message,
    }))
}

/// Decodes the provided JSON [`Value`], unwrapping the platform's
/// response envelope when present.
fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Traced<Error>> {
    serde_json::from_value::<Body<T>>(value)
        .map(|body| match body {
            Body::Enveloped { data } | Body::Bare(data) => data,
        })
        .map_err(tracerr::from_and_wrap!(=> Error))
}

#[cfg(test)]
mod spec {
    use std::sync::Arc;

    use secrecy::SecretBox;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use common::Role;

    use crate::{
        cache::Cache,
        domain::{Client, Email, SecretCode},
        endpoint::{auth::LogIn, client},
        session::SessionStore,
        storage::MemoryStorage,
        transport::HttpTransport,
    };

    use super::{decode, Api, Config, Error};

    async fn api(server: &MockServer) -> Api<HttpTransport> {
        let session =
            Arc::new(SessionStore::new(Box::<MemoryStorage>::default()));
        session.set_credentials(crate::session::Session {
            user_id: "u-1".to_owned().into(),
            login_id: "admin@example.com".to_owned().into(),
            access_token: "A1".to_owned().into(),
            refresh_token: "R1".to_owned().into(),
            scope: Role::Admin,
        });
        let cache = Arc::new(Cache::new(crate::cache::Config::default()));
        let transport = HttpTransport::new(
            &Config {
                base_url: server.uri(),
                timeout: std::time::Duration::from_secs(5),
            },
            Arc::clone(&session),
            Arc::clone(&cache),
        )
        .unwrap();

        Api::new(transport, session, cache)
    }

    fn client_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Jane Doe",
            "email": "jane@example.com",
            "status": "ENABLED",
            "created_at": "2024-05-17T10:30:00Z",
        })
    }

    #[tokio::test]
    async fn mutation_invalidates_matching_queries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/client/get_all_clients"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [client_json("c-1")],
                "totalCount": 1,
            })))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/client/enable_disable_client/c-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "success"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = api(&server).await;
        let listing = client::GetAllClients::default();

        let _ = api.query(&listing).await.unwrap();
        let _ = api.query(&listing).await.unwrap();

        let _ = api
            .mutate(&client::EnableDisableClient {
                id: "c-1".to_owned().into(),
                status: crate::domain::AccountStatus::Disabled,
            })
            .await
            .unwrap();

        let page = api.query(&listing).await.unwrap();
        assert_eq!(page.total_count, 1);
        server.verify().await;
    }

    #[tokio::test]
    async fn business_error_carries_platform_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/client/create_client"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "Email already in use",
            })))
            .mount(&server)
            .await;

        let api = api(&server).await;
        let err = api
            .mutate(&client::CreateClient {
                name: "Jane Doe".parse().unwrap(),
                email: "jane@example.com".parse().unwrap(),
                phone: None,
            })
            .await
            .unwrap_err();

        match err.as_ref() {
            Error::Business { status, message } => {
                assert_eq!(*status, 422);
                assert_eq!(message, "Email already in use");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn business_error_falls_back_to_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/client/create_client"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let api = api(&server).await;
        let err = api
            .mutate(&client::CreateClient {
                name: "Jane Doe".parse().unwrap(),
                email: "jane@example.com".parse().unwrap(),
                phone: None,
            })
            .await
            .unwrap_err();

        match err.as_ref() {
            Error::Business { message, .. } => {
                assert_eq!(message, super::GENERIC_ERROR_MESSAGE);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn login_fills_the_session_atomically() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {
                    "user": {"id": "u-9", "role_name": "Staff"},
                    "access_token": "A9",
                    "refresh_token": "R9",
                },
            })))
            .mount(&server)
            .await;

        let api = api(&server).await;
        api.log_out();

        let scope = api
            .log_in(LogIn {
                email: Email::new("staff@example.com").unwrap(),
                secret_code: SecretBox::new(Box::new(
                    SecretCode::new("s3cret").unwrap(),
                )),
            })
            .await
            .unwrap();

        assert_eq!(scope, Role::Staff);
        let session = api.session().snapshot().unwrap();
        assert_eq!(session.user_id, "u-9".to_owned().into());
        assert_eq!(session.login_id, "staff@example.com".to_owned().into());
        assert_eq!(session.access_token, "A9".to_owned().into());
        assert_eq!(session.refresh_token, "R9".to_owned().into());
        assert_eq!(session.scope, Role::Staff);
    }

    #[tokio::test]
    async fn login_rejects_unknown_roles() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "user": {"id": "u-9", "role_name": "Superuser"},
                    "access_token": "A9",
                    "refresh_token": "R9",
                },
            })))
            .mount(&server)
            .await;

        let api = api(&server).await;
        api.log_out();

        let err = api
            .log_in(LogIn {
                email: Email::new("staff@example.com").unwrap(),
                secret_code: SecretBox::new(Box::new(
                    SecretCode::new("s3cret").unwrap(),
                )),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), Error::UnknownRole(_)));
        assert!(!api.session().is_authenticated());
    }

    #[tokio::test]
    async fn email_verification_passes_the_address_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/email_verification"))
            .and(wiremock::matchers::body_json(json!({
                "email": "new@example.com",
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "success"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = api(&server).await;
        api.request_email_verification(
            Email::new("new@example.com").unwrap(),
        )
        .await
        .unwrap();

        server.verify().await;
    }

    #[tokio::test]
    async fn log_out_drops_cached_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/client/get_all_clients"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [],
                "totalCount": 0,
            })))
            .expect(2)
            .mount(&server)
            .await;

        let api = api(&server).await;
        let listing = client::GetAllClients::default();

        let _ = api.query(&listing).await.unwrap();
        api.log_out();
        api.session().set_credentials(crate::session::Session {
            user_id: "u-1".to_owned().into(),
            login_id: "admin@example.com".to_owned().into(),
            access_token: "A1".to_owned().into(),
            refresh_token: "R1".to_owned().into(),
            scope: Role::Admin,
        });
        let _ = api.query(&listing).await.unwrap();

        server.verify().await;
    }

    #[test]
    fn decode_accepts_enveloped_and_bare_bodies() {
        let enveloped: Client =
            decode(json!({"status": "success", "data": client_json("c-1")}))
                .unwrap();
        let bare: Client = decode(client_json("c-1")).unwrap();

        assert_eq!(enveloped, bare);
        assert_eq!(enveloped.id, "c-1".to_owned().into());
    }
}
