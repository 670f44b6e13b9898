//! HTTP request core for the planhaus API.
//!
//! Every call goes through [`ApiClient`], which attaches the session token,
//! normalizes failures and runs the 401 recovery protocol.

mod auth;
mod body;
mod response;

use std::sync::Arc;

use planhaus_core::auth::{bearer_header, login_redirect_path, SessionId};
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::notify::{Navigator, Notification, Notifier, StaticNavigator, TracingNotifier};
use crate::session::{MemorySessionStore, SessionStore};

pub use auth::{DEMO_LOGIN_PATH, LOGOUT_PATH, PASSWORD_LOGIN_PATH};
pub use body::{FilePart, RequestBody};
pub use response::{decode, error_message, parse_body};

/// What to do when the server rejects the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthRecovery {
    /// Sign in as the demo user and retry the request once.
    #[default]
    DemoLogin,
    /// Treat every rejected session as expired.
    Disabled,
}

/// HTTP client for the planhaus API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    client: reqwest::Client,
    base_url: String,
    sessions: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    recovery: AuthRecovery,
    /// Held while a rejected session is being replaced.
    recovering: Mutex<()>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("recovery", &self.inner.recovery)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    base_url: String,
    sessions: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    recovery: AuthRecovery,
}

impl ApiClientBuilder {
    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.sessions = store;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn recovery(mut self, recovery: AuthRecovery) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        // Server-set cookies flow along with the bearer token.
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(ApiClient {
            inner: Arc::new(Inner {
                client,
                base_url: self.base_url.trim_end_matches('/').to_string(),
                sessions: self.sessions,
                notifier: self.notifier,
                navigator: self.navigator,
                recovery: self.recovery,
                recovering: Mutex::new(()),
            }),
        })
    }
}

impl ApiClient {
    /// Starts a client for `base_url` with an in-memory session, log
    /// notifications and demo recovery.
    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: base_url.into(),
            sessions: Arc::new(MemorySessionStore::new()),
            notifier: Arc::new(TracingNotifier),
            navigator: Arc::new(StaticNavigator::default()),
            recovery: AuthRecovery::default(),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn session_store(&self) -> &Arc<dyn SessionStore> {
        &self.inner.sessions
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.inner.notifier
    }

    /// True while a rejected session is being replaced.
    pub fn is_recovering(&self) -> bool {
        self.inner.recovering.try_lock().is_err()
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    /// Sends a request and decodes its JSON body into `T`.
    ///
    /// Fails with [`ClientError::Cancelled`] as soon as `cancel` fires; the
    /// network call is dropped with it.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        cancel: Option<&CancellationToken>,
    ) -> Result<T> {
        let value = with_cancel(cancel, self.execute(method, path, body, true)).await?;
        decode(value)
    }

    /// Sends a request whose response body, if any, is not needed.
    pub async fn send_empty(&self, method: Method, path: &str, body: RequestBody) -> Result<()> {
        self.execute(method, path, body, false).await.map(|_| ())
    }

    /// GET shorthand.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, RequestBody::Empty, None)
            .await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        expect_body: bool,
    ) -> Result<Value> {
        let token = self.inner.sessions.load().await?.map(|s| s.session_id);
        let response = self.send(&method, path, &body, token.as_ref()).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return self
                .recover(&method, path, &body, token, expect_body)
                .await;
        }
        self.finish(response, expect_body).await
    }

    async fn send(
        &self,
        method: &Method,
        path: &str,
        body: &RequestBody,
        token: Option<&SessionId>,
    ) -> Result<Response> {
        let mut request = self.inner.client.request(method.clone(), self.url(path));
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, bearer_header(token));
        }
        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(value),
            RequestBody::Multipart(file) => request.multipart(file.to_form()?),
        };
        debug!(%method, path, "Sending request");
        Ok(request.send().await?)
    }

    /// Turns a non-401 response into a value or an error.
    async fn finish(&self, response: Response, expect_body: bool) -> Result<Value> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = error_message(status, &text);
            if status.is_client_error() {
                self.inner
                    .notifier
                    .notify(Notification::error("Error", message.clone()));
            }
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        if expect_body {
            parse_body(&text)
        } else {
            Ok(Value::Null)
        }
    }

    /// The 401 recovery protocol.
    ///
    /// Recoveries run one at a time. A call that waited on another call's
    /// recovery finds a different token in the store and retries with it
    /// instead of logging in again. Otherwise the session is cleared, the
    /// demo login is attempted once, and the original request is retried
    /// once with the new token. Anything short of success expires the
    /// session and sends the user to the login view.
    async fn recover(
        &self,
        method: &Method,
        path: &str,
        body: &RequestBody,
        rejected: Option<SessionId>,
        expect_body: bool,
    ) -> Result<Value> {
        let _guard = self.inner.recovering.lock().await;

        if let Some(current) = self.inner.sessions.load().await? {
            if Some(&current.session_id) != rejected.as_ref() {
                debug!(path, "Session replaced while waiting, retrying");
                let response = self.send(method, path, body, Some(&current.session_id)).await?;
                if response.status() != StatusCode::UNAUTHORIZED {
                    return self.finish(response, expect_body).await;
                }
            }
        }

        warn!(path, "Session rejected, clearing it");
        self.inner.sessions.clear().await?;

        if self.inner.recovery == AuthRecovery::DemoLogin {
            match self.fetch_demo_session().await {
                Ok(session) => {
                    self.inner.sessions.save(&session).await?;
                    match self.send(method, path, body, Some(&session.session_id)).await {
                        Ok(response) if response.status().is_success() => {
                            return self.finish(response, expect_body).await;
                        }
                        Ok(response) => {
                            warn!(path, status = %response.status(), "Retry after demo login failed");
                            if response.status() == StatusCode::UNAUTHORIZED {
                                self.inner.sessions.clear().await?;
                            }
                        }
                        Err(e) => warn!(path, error = %e, "Retry after demo login failed"),
                    }
                }
                Err(e) => warn!(error = %e, "Demo login failed"),
            }
        }

        self.expire_session();
        Err(ClientError::SessionExpired)
    }

    fn expire_session(&self) {
        self.inner.notifier.notify(Notification::error(
            "Session expired",
            "Please log in again.",
        ));
        let target = login_redirect_path(&self.inner.navigator.current_location());
        self.inner.navigator.redirect(&target);
    }
}

/// Races `fut` against the cancellation token.
pub(crate) async fn with_cancel<T>(
    cancel: Option<&CancellationToken>,
    fut: impl std::future::Future<Output = Result<T>>,
) -> Result<T> {
    match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(ClientError::Cancelled),
                res = fut => res,
            }
        }
        None => fut.await,
    }
}
