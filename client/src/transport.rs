//! Authenticated request layer.
//!
//! [`HttpTransport`] attaches the current access token to every outgoing
//! [`Call`] and owns the refresh flow: a `401` response triggers exactly
//! one token refresh followed by exactly one retry of the original call,
//! and a failed refresh logs the user out.

use std::sync::Arc;

use derive_more::{Display, Error as StdError, From};
use serde_json::Value;
use tracerr::Traced;

use crate::{
    cache::Cache,
    endpoint::Tag,
    session::{AccessToken, SessionStore},
    Config,
};

#[doc(inline)]
pub use common::Handler as Transport;

/// Path of the token refresh endpoint.
const REFRESH_PATH: &str = "refresh";

/// Single wire call to the platform API.
#[derive(Clone, Debug)]
pub struct Call {
    /// HTTP method of this [`Call`].
    pub method: reqwest::Method,

    /// Path of this [`Call`], relative to the API base URL.
    pub path: String,

    /// JSON body of this [`Call`], if any.
    pub body: Option<Value>,
}

/// Reply to a [`Call`].
///
/// Carries any HTTP status: mapping non-2xx replies onto the error
/// taxonomy is up to the caller.
#[derive(Clone, Debug)]
pub struct Reply {
    /// HTTP status of this [`Reply`].
    pub status: reqwest::StatusCode,

    /// JSON body of this [`Reply`], or [`Value::Null`] if there is none.
    pub body: Value,
}

/// Error of performing a [`Call`].
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Failed to reach the platform API.
    #[display("network failure: {_0}")]
    Network(reqwest::Error),

    /// Session has expired and could not be refreshed.
    ///
    /// The user has already been logged out by the time this surfaces.
    #[display("session has expired")]
    SessionExpired,
}

/// [`Transport`] performing [`Call`]s over HTTP.
#[derive(Debug)]
pub struct HttpTransport {
    /// HTTP client performing the requests.
    http: reqwest::Client,

    /// Base URL of the platform API, without a trailing slash.
    base_url: String,

    /// [`SessionStore`] providing and receiving tokens.
    session: Arc<SessionStore>,

    /// [`Cache`] dropped whenever the refresh flow logs the user out.
    cache: Arc<Cache<Tag>>,

    /// Gate coalescing concurrent refresh attempts into a single one.
    refresh_gate: tokio::sync::Mutex<()>,
}

impl HttpTransport {
    /// Creates a new [`HttpTransport`] out of the provided [`Config`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the HTTP client cannot be built.
    pub fn new(
        config: &Config,
        session: Arc<SessionStore>,
        cache: Arc<Cache<Tag>>,
    ) -> Result<Self, Traced<Error>> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            session,
            cache,
            refresh_gate: tokio::sync::Mutex::new(()),
        })
    }

    /// Performs the provided [`Call`] once, attaching the provided
    /// [`AccessToken`] (if any) as a bearer credential.
    async fn send(
        &self,
        call: &Call,
        token: Option<&AccessToken>,
    ) -> Result<Reply, Traced<Error>> {
        let url = format!("{}/{}", self.base_url, call.path);

        let mut req = self.http.request(call.method.clone(), url);
        if let Some(token) = token {
            req = req.bearer_auth(AsRef::<str>::as_ref(token));
        }
        if let Some(body) = &call.body {
            req = req.json(body);
        }

        let resp = req
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        let status = resp.status();
        let body = resp.json::<Value>().await.unwrap_or(Value::Null);

        Ok(Reply { status, body })
    }

    /// Obtains a fresh [`AccessToken`], coalescing with any refresh
    /// already in flight.
    ///
    /// `stale` is the token the `401`ed attempt was sent with: when the
    /// current token differs from it, another caller has refreshed
    /// already and the current one is reused as is.
    ///
    /// Returns [`None`] when no refresh token exists: the `401` is then
    /// final and any leftover session state is wiped. A failed refresh,
    /// whether rejected or unreachable, wipes the session and the cache
    /// too.
    async fn refresh(
        &self,
        stale: Option<&AccessToken>,
    ) -> Result<Option<AccessToken>, Traced<Error>> {
        let _refreshing = self.refresh_gate.lock().await;

        let current = self.session.access_token();
        if current.is_some() && current.as_ref() != stale {
            return Ok(current);
        }

        let Some(refresh_token) = self.session.refresh_token() else {
            self.session.log_out();
            self.cache.clear();
            return Ok(None);
        };

        tracing::debug!("access token rejected, refreshing");
        let reply = match self
            .send(
                &Call {
                    method: reqwest::Method::POST,
                    path: REFRESH_PATH.to_owned(),
                    body: Some(serde_json::json!({
                        "refresh_token": AsRef::<str>::as_ref(&refresh_token),
                    })),
                },
                None,
            )
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("cannot reach refresh endpoint: {e}");
                self.session.log_out();
                self.cache.clear();
                return Err(tracerr::new!(Error::SessionExpired));
            }
        };

        let token = reply
            .status
            .is_success()
            .then(|| reply.body.get("access_token"))
            .flatten()
            .and_then(Value::as_str)
            .map(|raw| AccessToken::from(raw.to_owned()));

        let Some(token) = token else {
            tracing::warn!("token refresh failed, logging out");
            self.session.log_out();
            self.cache.clear();
            return Err(tracerr::new!(Error::SessionExpired));
        };

        self.session.set_access_token(token.clone());
        Ok(Some(token))
    }
}

impl Transport<Call> for HttpTransport {
    type Ok = Reply;
    type Err = Traced<Error>;

    /// Performs the provided [`Call`].
    ///
    /// A `401` reply triggers the refresh flow and a single retry of the
    /// [`Call`]; whatever the retry returns is final. A `401` received
    /// while no session exists is returned as is.
    async fn execute(&self, call: Call) -> Result<Self::Ok, Self::Err> {
        let token = self.session.access_token();

        let reply = self.send(&call, token.as_ref()).await?;
        if reply.status != reqwest::StatusCode::UNAUTHORIZED {
            return Ok(reply);
        }

        let Some(fresh) = self.refresh(token.as_ref()).await? else {
            return Ok(reply);
        };

        self.send(&call, Some(&fresh)).await
    }
}

#[cfg(test)]
mod spec {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use common::Role;

    use crate::{
        cache::{self, Cache},
        session::{Session, SessionStore},
        storage::MemoryStorage,
        Config,
    };

    use super::{Call, Error, HttpTransport, Transport as _};

    fn session_store(access: &str) -> Arc<SessionStore> {
        let store = SessionStore::new(Box::<MemoryStorage>::default());
        store.set_credentials(Session {
            user_id: "u-1".to_owned().into(),
            login_id: "admin@example.com".to_owned().into(),
            access_token: access.to_owned().into(),
            refresh_token: "R1".to_owned().into(),
            scope: Role::Admin,
        });
        Arc::new(store)
    }

    fn transport(
        server: &MockServer,
        session: Arc<SessionStore>,
    ) -> HttpTransport {
        HttpTransport::new(
            &Config {
                base_url: server.uri(),
                timeout: std::time::Duration::from_secs(5),
            },
            session,
            Arc::new(Cache::new(cache::Config::default())),
        )
        .unwrap()
    }

    fn call(p: &str) -> Call {
        Call {
            method: reqwest::Method::POST,
            path: p.to_owned(),
            body: Some(json!({"page": 1})),
        }
    }

    #[tokio::test]
    async fn attaches_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/client/get_all_clients"))
            .and(header("Authorization", "Bearer A1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport(&server, session_store("A1"));
        let reply = transport
            .execute(call("client/get_all_clients"))
            .await
            .unwrap();

        assert_eq!(reply.status.as_u16(), 200);
        assert_eq!(reply.body, json!({"ok": true}));
        server.verify().await;
    }

    #[tokio::test]
    async fn refreshes_once_and_retries_once_on_401() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/client/get_all_clients"))
            .and(header("Authorization", "Bearer A1"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/refresh"))
            .and(body_partial_json(json!({"refresh_token": "R1"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "A2"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/client/get_all_clients"))
            .and(header("Authorization", "Bearer A2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let session = session_store("A1");
        let transport = transport(&server, Arc::clone(&session));
        let reply = transport
            .execute(call("client/get_all_clients"))
            .await
            .unwrap();

        assert_eq!(reply.status.as_u16(), 200);
        assert_eq!(
            session.access_token().map(|t| String::from(t)),
            Some("A2".to_owned()),
        );
        server.verify().await;
    }

    #[tokio::test]
    async fn failed_refresh_logs_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/client/get_all_clients"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/refresh"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let session = session_store("A1");
        let transport = transport(&server, Arc::clone(&session));
        let err = transport
            .execute(call("client/get_all_clients"))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), Error::SessionExpired));
        assert!(!session.is_authenticated());
        server.verify().await;
    }

    #[tokio::test]
    async fn unreachable_refresh_logs_out_too() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/client/get_all_clients"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/refresh"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "A2"}))
                    .set_delay(std::time::Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let session = session_store("A1");
        let transport = HttpTransport::new(
            &Config {
                base_url: server.uri(),
                timeout: std::time::Duration::from_millis(100),
            },
            Arc::clone(&session),
            Arc::new(Cache::new(cache::Config::default())),
        )
        .unwrap();
        let err = transport
            .execute(call("client/get_all_clients"))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), Error::SessionExpired));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn retried_401_is_returned_as_is() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/client/get_all_clients"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/refresh"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "A2"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport(&server, session_store("A1"));
        let reply = transport
            .execute(call("client/get_all_clients"))
            .await
            .unwrap();

        assert_eq!(reply.status.as_u16(), 401);
        server.verify().await;
    }

    #[tokio::test]
    async fn unauthenticated_401_skips_the_refresh_flow() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/refresh"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let session = Arc::new(SessionStore::new(
            Box::<MemoryStorage>::default(),
        ));
        let transport = transport(&server, session);
        let reply = transport.execute(call("auth/login")).await.unwrap();

        assert_eq!(reply.status.as_u16(), 401);
        server.verify().await;
    }

    #[tokio::test]
    async fn concurrent_401s_share_a_single_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/refresh"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "A2"}))
                    .set_delay(std::time::Duration::from_millis(30)),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(header("Authorization", "Bearer A1"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(header("Authorization", "Bearer A2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": true})),
            )
            .mount(&server)
            .await;

        let transport = Arc::new(transport(&server, session_store("A1")));

        let tasks = ["client/get_all_clients", "coach/get_all_coaches"]
            .map(|p| {
                let transport = Arc::clone(&transport);
                let call = call(p);
                tokio::spawn(async move { transport.execute(call).await })
            });
        for task in tasks {
            let reply = task.await.unwrap().unwrap();
            assert_eq!(reply.status.as_u16(), 200);
        }

        server.verify().await;
    }
}
