//! Session lifecycle, kept in step with the query cache.

use std::sync::Arc;

use planhaus_core::auth::{Credentials, Session, SessionUser};
use planhaus_core::cache::session_user_key;
use tracing::info;

use super::{Planner, QueryResult};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct AuthResource {
    planner: Planner,
}

impl AuthResource {
    pub(super) fn new(planner: Planner) -> Self {
        Self { planner }
    }

    /// The signed-in user, through the cache.
    pub async fn user(&self) -> Result<Arc<SessionUser>> {
        self.planner.read(session_user_key()).await
    }

    pub fn snapshot(&self) -> QueryResult<SessionUser> {
        self.planner.snapshot(&session_user_key())
    }

    /// Signs in and seeds the cached user, dropping data cached for
    /// whoever was signed in before.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let session = self.planner.api().login(credentials).await?;
        self.start(&session);
        Ok(session)
    }

    /// Signs in as the demo user.
    pub async fn demo_login(&self) -> Result<Session> {
        let session = self.planner.api().demo_login().await?;
        self.start(&session);
        Ok(session)
    }

    /// Signs out on the server and forgets all local state.
    pub async fn logout(&self) -> Result<()> {
        self.planner.api().logout().await?;
        self.planner.cache().clear();
        Ok(())
    }

    /// Forgets the stored session and every cached query without talking
    /// to the server.
    pub async fn clear_local_state(&self) -> Result<()> {
        self.planner.api().session_store().clear().await?;
        self.planner.cache().clear();
        info!("Cleared local session and cache");
        Ok(())
    }

    fn start(&self, session: &Session) {
        let cache = self.planner.cache();
        cache.clear();
        cache.set_query_data(session_user_key(), session.user.clone());
    }
}
