//! Blocking HTTP plumbing shared by the Google API clients.

use deck_core::{Error, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("deck-gslides/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client used for every remote call.
///
/// No timeout is configured beyond the client defaults.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::HttpError(format!("Failed to build HTTP client: {}", e)))
}

/// Send a request, turning non-success statuses into `Error::ApiError`.
pub(crate) fn send(request: RequestBuilder) -> Result<Response> {
    let response = request
        .send()
        .map_err(|e| Error::HttpError(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(Error::ApiError {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Decode a JSON response body.
pub(crate) fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json()
        .map_err(|e| Error::SerializationError(format!("Unexpected response body: {}", e)))
}

/// Pull a readable message out of a Google error body.
///
/// API errors look like `{"error": {"message": ...}}`, OAuth errors like
/// `{"error": "invalid_grant", "error_description": ...}`. Anything else is
/// returned as-is.
pub(crate) fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    match value.get("error") {
        Some(serde_json::Value::Object(error)) => error
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| body.trim().to_string()),
        Some(serde_json::Value::String(code)) => {
            match value.get("error_description").and_then(|d| d.as_str()) {
                Some(description) => format!("{}: {}", code, description),
                None => code.clone(),
            }
        }
        _ => body.trim().to_string(),
    }
}
