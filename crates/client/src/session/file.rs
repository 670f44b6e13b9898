use std::path::{Path, PathBuf};

use async_trait::async_trait;
use planhaus_core::auth::Session;
use serde_json::Value;
use tracing::{debug, warn};

use super::SessionStore;
use crate::error::{ClientError, Result};

const SESSION_ID_KEY: &str = "sessionId";
const USER_KEY: &str = "user";

/// Session store backed by a JSON file holding `sessionId` and `user`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn remove_file(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Session(e.to_string())),
        }
    }
}

/// Reads a session out of the stored document. Anything short of both keys
/// with usable values is no session at all.
fn parse_stored(doc: &Value) -> Option<Session> {
    let session_id = doc.get(SESSION_ID_KEY)?.as_str()?;
    if session_id.is_empty() {
        return None;
    }
    let user = doc.get(USER_KEY).filter(|u| u.is_object())?;
    let user = serde_json::from_value(user.clone()).ok()?;
    Some(Session::new(session_id, user))
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ClientError::Session(e.to_string())),
        };

        let session = serde_json::from_slice::<Value>(&raw)
            .ok()
            .and_then(|doc| parse_stored(&doc));

        if session.is_none() {
            warn!(path = %self.path.display(), "Discarding incomplete session file");
            self.remove_file().await?;
        }
        Ok(session)
    }

    async fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ClientError::Session(e.to_string()))?;
        }
        let body = serde_json::to_vec_pretty(session)?;

        // Write to a sibling file, then rename over the original.
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| ClientError::Session(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| ClientError::Session(e.to_string()))?;

        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.remove_file().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planhaus_core::auth::SessionUser;

    fn temp_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("state").join("session.json")
    }

    #[tokio::test]
    async fn test_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(temp_path(&dir));
        assert_eq!(store.load().await.unwrap(), None);

        let session = Session::new("tok-1", SessionUser::new("u1"));
        store.save(&session).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(session));

        let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
        let doc: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["sessionId"], "tok-1");
        assert_eq!(doc["user"]["id"], "u1");

        store.clear().await.unwrap();
        assert!(!store.path().exists());
        // Clearing twice is fine.
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_half_session_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir);
        tokio::fs::create_dir_all(path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&path, r#"{"sessionId": "orphan"}"#)
            .await
            .unwrap();

        let store = FileSessionStore::new(&path);
        assert_eq!(store.load().await.unwrap(), None);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir);
        tokio::fs::create_dir_all(path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&path, "not json").await.unwrap();

        let store = FileSessionStore::new(&path);
        assert_eq!(store.load().await.unwrap(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_parse_stored_requires_both_keys() {
        let doc = serde_json::json!({"user": {"id": 1}});
        assert_eq!(parse_stored(&doc), None);
        let doc = serde_json::json!({"sessionId": "", "user": {"id": 1}});
        assert_eq!(parse_stored(&doc), None);
        let doc = serde_json::json!({"sessionId": "a", "user": null});
        assert_eq!(parse_stored(&doc), None);
        let doc = serde_json::json!({"sessionId": "a", "user": {"id": 1}});
        assert!(parse_stored(&doc).is_some());
    }
}
