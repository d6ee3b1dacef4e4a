//! Response handling: map error statuses to typed failures, decode bodies as JSON with a text fallback.

use crate::error::ClientError;
use reqwest::StatusCode;
use serde_json::Value;

/// Decoded body of a successful response.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Json(Value),
    /// Body that is not valid JSON, returned verbatim.
    Text(String),
}

impl Payload {
    pub fn from_body(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(v) => Payload::Json(v),
            Err(_) => Payload::Text(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(v) => Some(v),
            Payload::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Json(_) => None,
            Payload::Text(s) => Some(s),
        }
    }

    /// JSON body, or a decode error when the server answered with plain text.
    pub fn into_json(self) -> Result<Value, ClientError> {
        match self {
            Payload::Json(v) => Ok(v),
            Payload::Text(s) => Err(ClientError::Decode(format!("expected JSON body, got '{}'", s))),
        }
    }

    /// JSON body, with a text body folded into `Value::String`.
    pub fn into_value(self) -> Value {
        match self {
            Payload::Json(v) => v,
            Payload::Text(s) => Value::String(s),
        }
    }
}

/// Classify a response. 400, 401, 404 and 5xx become errors carrying the body; anything else is decoded.
pub fn classify(status: StatusCode, body: String) -> Result<Payload, ClientError> {
    match status.as_u16() {
        400 => Err(ClientError::Malformed(body)),
        401 => Err(ClientError::Unauthorized(body)),
        404 => Err(ClientError::NotFound(body)),
        s if s >= 500 => Err(ClientError::Internal(body)),
        s => {
            if status.is_client_error() {
                tracing::warn!(status = s, "unclassified client error status, decoding body");
            }
            Ok(Payload::from_body(body))
        }
    }
}

/// Pull the integer `count` field out of a count response.
pub fn extract_count(payload: Payload) -> Result<u64, ClientError> {
    let value = payload.into_json()?;
    value
        .get("count")
        .and_then(Value::as_u64)
        .ok_or_else(|| ClientError::Decode(format!("response has no integer 'count' field: {}", value)))
}
