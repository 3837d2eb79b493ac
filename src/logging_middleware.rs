// src/logging_middleware.rs
//! Debug-level logging of JSON request and response bodies, with
//! credentials and tokens masked before they reach the log.

use axum::body::to_bytes;
use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use tracing::{debug, enabled, Level};

const REDACTED: &str = "[REDACTED]";
const SENSITIVE_KEYS: &[&str] = &["password", "accessToken", "refreshToken", "otp"];

/// Replaces sensitive values anywhere in a JSON document
pub fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if SENSITIVE_KEYS.contains(&key.as_str()) {
                    *child = Value::String(REDACTED.to_string());
                } else {
                    redact(child);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

/// Renders a body for the log; non-JSON bodies are summarised by size
fn loggable(bytes: &Bytes) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(mut json) => {
            redact(&mut json);
            Some(json.to_string())
        }
        Err(_) => Some(format!("<{} bytes>", bytes.len())),
    }
}

pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    if !enabled!(Level::DEBUG) {
        return Ok(next.run(request).await);
    }

    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if let Some(body) = loggable(&bytes) {
        debug!(method = %parts.method, uri = %parts.uri, request_body = %body, "Request");
    }

    let response = next.run(Request::from_parts(parts, Body::from(bytes))).await;

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if let Some(body) = loggable(&bytes) {
        debug!(status = %parts.status, response_body = %body, "Response");
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_nested_secrets() {
        let mut body = serde_json::json!({
            "email": "ada@example.com",
            "password": "hunter2",
            "data": { "accessToken": "a", "refreshToken": "r" },
            "items": [{ "otp": "1234" }]
        });
        redact(&mut body);

        assert_eq!(body["email"], "ada@example.com");
        assert_eq!(body["password"], REDACTED);
        assert_eq!(body["data"]["accessToken"], REDACTED);
        assert_eq!(body["data"]["refreshToken"], REDACTED);
        assert_eq!(body["items"][0]["otp"], REDACTED);
    }

    #[test]
    fn test_non_json_bodies_are_summarised() {
        assert_eq!(loggable(&Bytes::from_static(b"plain")), Some("<5 bytes>".to_string()));
        assert_eq!(loggable(&Bytes::new()), None);
    }
}
