use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque bearer token issued by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The signed-in user as the server describes it.
///
/// Only `id` and `hasCompletedIntake` are relied on; everything else the
/// server sends is preserved in `extra` so it round-trips through storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Value,
    #[serde(default)]
    pub has_completed_intake: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionUser {
    pub fn new(id: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            has_completed_intake: false,
            extra: Map::new(),
        }
    }

    /// The user id rendered as text, whether the server sent a number or a
    /// string.
    pub fn id_string(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// A display name if the server provided one.
    pub fn display_name(&self) -> Option<&str> {
        ["name", "username", "email"]
            .iter()
            .find_map(|k| self.extra.get(*k).and_then(Value::as_str))
    }
}

/// A session token together with its user. Both are stored and cleared
/// together; one without the other is never a valid session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: SessionId,
    pub user: SessionUser,
}

impl Session {
    pub fn new(session_id: impl Into<String>, user: SessionUser) -> Self {
        Self {
            session_id: SessionId::new(session_id),
            user,
        }
    }
}

/// Username/password credentials for the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_wire_format() {
        let json = r#"{
            "sessionId": "abc123",
            "user": { "id": 7, "hasCompletedIntake": true, "email": "demo@planhaus.app" }
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.session_id.as_str(), "abc123");
        assert!(session.user.has_completed_intake);
        assert_eq!(session.user.id_string(), "7");
        assert_eq!(session.user.display_name(), Some("demo@planhaus.app"));

        let back = serde_json::to_value(&session).unwrap();
        assert_eq!(back["sessionId"], "abc123");
        assert_eq!(back["user"]["email"], "demo@planhaus.app");
    }

    #[test]
    fn test_missing_intake_flag_defaults_false() {
        let user: SessionUser = serde_json::from_str(r#"{"id": "u1"}"#).unwrap();
        assert!(!user.has_completed_intake);
        assert_eq!(user.id_string(), "u1");
    }
}
