//! Session endpoints.

use planhaus_core::auth::{Credentials, Session, SessionUser};
use planhaus_core::cache::SESSION_USER_ROOT;
use reqwest::Method;
use tracing::{info, warn};

use super::{decode, error_message, parse_body, ApiClient, RequestBody};
use crate::error::{ClientError, Result};

pub const DEMO_LOGIN_PATH: &str = "/api/auth/demo-login";
pub const PASSWORD_LOGIN_PATH: &str = "/api/auth/login";
pub const LOGOUT_PATH: &str = "/api/auth/logout";

impl ApiClient {
    /// POSTs the demo login without touching the stored session.
    ///
    /// Runs outside the recovery protocol: a rejected demo login is a plain
    /// failure, never a reason to log in again.
    pub(super) async fn fetch_demo_session(&self) -> Result<Session> {
        let response = self
            .send(&Method::POST, DEMO_LOGIN_PATH, &RequestBody::Empty, None)
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(status, &text),
            });
        }
        decode(parse_body(&text)?)
    }

    /// Signs in as the demo user and stores the new session.
    pub async fn demo_login(&self) -> Result<Session> {
        let session = self.fetch_demo_session().await?;
        self.session_store().save(&session).await?;
        info!(user = %session.user.id_string(), "Signed in as demo user");
        Ok(session)
    }

    /// Signs in with credentials and stores the new session.
    ///
    /// Wrong credentials come back as an API error, not as an expired
    /// session.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        if credentials.username.trim().is_empty() {
            return Err(ClientError::Validation {
                field: "username",
                message: "Username is required".to_string(),
            });
        }
        if credentials.password.is_empty() {
            return Err(ClientError::Validation {
                field: "password",
                message: "Password is required".to_string(),
            });
        }
        let body = RequestBody::json(credentials)?;
        let response = self.send(&Method::POST, PASSWORD_LOGIN_PATH, &body, None).await?;
        let session: Session = decode(self.finish(response, true).await?)?;
        self.session_store().save(&session).await?;
        info!(user = %session.user.id_string(), "Signed in");
        Ok(session)
    }

    /// Ends the session on the server, then forgets it locally.
    ///
    /// The local session is cleared even when the server call fails.
    pub async fn logout(&self) -> Result<()> {
        let token = self.session_store().load().await?.map(|s| s.session_id);
        if token.is_some() {
            let result = self
                .send(&Method::POST, LOGOUT_PATH, &RequestBody::Empty, token.as_ref())
                .await;
            if let Err(e) = result {
                warn!(error = %e, "Server logout failed");
            }
        }
        self.session_store().clear().await?;
        info!("Signed out");
        Ok(())
    }

    /// Fetches the signed-in user.
    pub async fn current_user(&self) -> Result<SessionUser> {
        self.get(SESSION_USER_ROOT).await
    }
}
