//! Request body extraction.
//!
//! [`axum::Json`] folds every failure into its own rejection. The users API
//! answers every body that cannot be bound (absent, malformed or of the
//! wrong shape) with 400 and leaves 422 to field validation, so bodies go
//! through [`Payload`] instead.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{HeaderMap, header},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ServerError;

/// JSON request body.
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(content_type) = unsupported_content_type(req.headers()) {
            tracing::warn!("rejected body with content type {content_type}");
            return Err(ServerError::UnsupportedMediaType(format!(
                "unsupported content type: {content_type}"
            )));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| ServerError::Generic(err.to_string()))?;

        decode(&bytes).map(Payload)
    }
}

/// Returns the offending content type when the request declares a non JSON
/// body. A missing header is accepted.
fn unsupported_content_type(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::CONTENT_TYPE)?;
    let Ok(content_type) = value.to_str() else {
        return Some("<invalid>".to_string());
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let is_json = essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"));

    (!is_json).then(|| content_type.to_string())
}

pub(crate) fn decode<T>(bytes: &[u8]) -> Result<T, ServerError>
where
    T: DeserializeOwned,
{
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ServerError::Generic("request body is required".to_string()));
    }

    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| ServerError::Generic(format!("malformed JSON body: {err}")))?;
    if value.is_null() {
        return Err(ServerError::Generic("request body is required".to_string()));
    }

    serde_json::from_value(value)
        .map_err(|err| ServerError::Generic(format!("request body does not match: {err}")))
}
