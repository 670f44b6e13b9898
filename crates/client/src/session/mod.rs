//! Durable session storage.
//!
//! A session is a token plus its user. The two are always written and
//! removed together, so a store never yields half a session.

mod file;
mod memory;

use async_trait::async_trait;
use planhaus_core::auth::Session;

use crate::error::Result;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

/// Persistent home of the current session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the stored session, if a complete one exists.
    async fn load(&self) -> Result<Option<Session>>;

    /// Replaces the stored session.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Removes the session. Removing a missing session is not an error.
    async fn clear(&self) -> Result<()>;
}
