//! Request handlers.

use std::io;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::core::cache::SecretCache;
use crate::core::domain::SecretId;
use crate::core::types::Armored;
use crate::error::{Error, Result, ValidationError};

/// Successful response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub response: Armored,
}

/// Body of `POST /secret`.
#[derive(Debug, Default, Deserialize)]
pub struct SecretRequest {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub username: String,
}

impl SecretRequest {
    /// Check required fields, path first.
    pub fn into_id(self) -> Result<SecretId> {
        if self.path.is_empty() {
            return Err(ValidationError::MissingField("path").into());
        }
        if self.username.is_empty() {
            return Err(ValidationError::MissingField("username").into());
        }
        Ok(SecretId::new(self.path, self.username))
    }
}

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub state: String,
    pub secrets: usize,
    pub built_at: Option<DateTime<Utc>>,
}

/// `POST /secrets`: the encrypted index.
pub(super) async fn list(
    State(cache): State<Arc<SecretCache>>,
    body: Bytes,
) -> std::result::Result<Json<Envelope>, ApiError> {
    parse_body::<serde_json::Map<String, serde_json::Value>>(&body)?;

    let index = blocking(move || cache.list()).await?;
    Ok(Json(Envelope { response: index }))
}

/// `POST /secret`: one armored secret.
pub(super) async fn show(
    State(cache): State<Arc<SecretCache>>,
    body: Bytes,
) -> std::result::Result<Json<Envelope>, ApiError> {
    let id = parse_body::<SecretRequest>(&body)?.into_id()?;

    let secret = blocking(move || cache.lookup(&id)).await?;
    Ok(Json(Envelope { response: secret }))
}

/// `GET /health`: cache state, never loads.
pub(super) async fn health(State(cache): State<Arc<SecretCache>>) -> Json<Health> {
    let status = cache.status();
    Json(Health {
        status: "ok".to_string(),
        state: status.state.as_str().to_string(),
        secrets: status.secrets.unwrap_or(0),
        built_at: status.built_at,
    })
}

/// Decode a JSON body. An empty body reads as `{}`.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|e| ValidationError::Body(e.to_string()).into())
}

/// Run a cache call on the blocking pool; a rebuild may wait on gpg.
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Io(io::Error::other(e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_empty_object() {
        let request: SecretRequest = parse_body(b"").unwrap();
        assert!(request.path.is_empty());
        assert!(parse_body::<serde_json::Map<String, serde_json::Value>>(b" \n").is_ok());
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = parse_body::<SecretRequest>(b"{not json").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("unable to read request body: "));
    }

    #[test]
    fn test_path_checked_before_username() {
        let err = SecretRequest::default().into_id().unwrap_err();
        assert_eq!(err.to_string(), "no path found in request body");

        let request = SecretRequest {
            path: "example.com".to_string(),
            username: String::new(),
        };
        assert_eq!(
            request.into_id().unwrap_err().to_string(),
            "no username found in request body"
        );
    }
}
