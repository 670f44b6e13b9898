//! Turning raw responses into values or errors.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, Result};

/// Picks the message to show for a failed response.
///
/// Preference order: the JSON body's `message`, then its `error`, then the
/// raw body when it is not JSON, then the status reason phrase.
///
/// ```
/// use planhaus_client::http::error_message;
/// use reqwest::StatusCode;
///
/// assert_eq!(
///     error_message(StatusCode::BAD_REQUEST, r#"{"message":"Name is required"}"#),
///     "Name is required"
/// );
/// assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
/// ```
pub fn error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            let from_json = ["message", "error"].iter().find_map(|k| {
                map.get(*k)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            });
            if let Some(message) = from_json {
                return message.to_string();
            }
        }
        Ok(_) => {}
        Err(_) if !body.is_empty() => return body.to_string(),
        Err(_) => {}
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
}

/// Parses a successful response body and rejects empty ones.
///
/// A `null` or missing body is an invalid response, distinct from a
/// legitimately empty collection (`[]`).
pub fn parse_body(body: &str) -> Result<Value> {
    let body = body.trim();
    if body.is_empty() {
        return Err(ClientError::InvalidResponse("empty response".to_string()));
    }
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ClientError::InvalidResponse(format!("malformed JSON: {}", e)))?;
    if value.is_null() {
        return Err(ClientError::InvalidResponse("empty response".to_string()));
    }
    Ok(value)
}

/// Converts a shape-checked value into the caller's expected type.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| ClientError::InvalidResponse(format!("unexpected shape: {}", e)))
}
