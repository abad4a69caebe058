//! Error types
//!
//! `FishjamError` covers everything that can go wrong talking to the server.
//! `ProvisionError` is what the provisioning workflow reports to its caller.

use reqwest::StatusCode;
use thiserror::Error;

use crate::provision::{ProvisionStage, ProvisionStep};
use crate::types::ErrorResp;

/// Maximum response body size accepted from the server (16 MB).
pub const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

/// Longest server error detail kept in an error message.
const MAX_ERROR_DETAIL: usize = 512;

/// Error type for the Fishjam HTTP client.
#[derive(Debug, Error)]
pub enum FishjamError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP error {status} for {url}: {detail}")]
    Http {
        status: StatusCode,
        url: String,
        detail: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Response too large ({size} bytes, max {MAX_RESPONSE_SIZE})")]
    ResponseTooLarge { size: u64 },
}

/// Errors reported by the provisioning workflow.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Required input missing or invalid; raised before any request is sent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The server could not be reached or refused a request.
    #[error(
        "Error when attempting to communicate with Fishjam while {step} (reached: {reached}{room}): {source}",
        room = room_suffix(.room_id)
    )]
    ServerCommunication {
        step: ProvisionStep,
        reached: ProvisionStage,
        room_id: Option<String>,
        source: FishjamError,
    },
}

impl ProvisionError {
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Step that failed, if a request was attempted
    #[must_use]
    pub const fn failed_step(&self) -> Option<ProvisionStep> {
        match self {
            Self::Configuration(_) => None,
            Self::ServerCommunication { step, .. } => Some(*step),
        }
    }

    /// Id of the room left behind on the server, if one was created
    #[must_use]
    pub fn room_id(&self) -> Option<&str> {
        match self {
            Self::Configuration(_) => None,
            Self::ServerCommunication { room_id, .. } => room_id.as_deref(),
        }
    }
}

/// `, room: <id>` when a room was left on the server
fn room_suffix(room_id: &Option<String>) -> String {
    room_id
        .as_deref()
        .map(|id| format!(", room: {id}"))
        .unwrap_or_default()
}

/// Read a response body with size limit and deserialize as JSON.
///
/// Checks `Content-Length` hint first (if available), then enforces the
/// limit on the actual body bytes before deserializing.
pub async fn json_with_limit<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, FishjamError> {
    if let Some(cl) = response.content_length() {
        if cl as usize > MAX_RESPONSE_SIZE {
            return Err(FishjamError::ResponseTooLarge { size: cl });
        }
    }
    let bytes = response.bytes().await?;
    if bytes.len() > MAX_RESPONSE_SIZE {
        return Err(FishjamError::ResponseTooLarge { size: bytes.len() as u64 });
    }
    serde_json::from_slice(&bytes).map_err(Into::into)
}

/// Check HTTP response status before processing body.
///
/// Non-2xx responses are turned into errors carrying the server's
/// `errors` detail when it sent one.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, FishjamError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let url = resp.url().to_string();
    let detail = match resp.bytes().await {
        Ok(body) => error_detail(status, &body),
        Err(_) => status.to_string(),
    };

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FishjamError::Unauthorized(detail),
        StatusCode::NOT_FOUND => FishjamError::NotFound(detail),
        _ => FishjamError::Http { status, url, detail },
    })
}

/// Extract a human-readable message from an error response body.
fn error_detail(status: StatusCode, body: &[u8]) -> String {
    let detail = match serde_json::from_slice::<ErrorResp>(body) {
        Ok(ErrorResp { errors: serde_json::Value::String(message) }) => message,
        Ok(ErrorResp { errors }) => errors.to_string(),
        Err(_) => String::from_utf8_lossy(body).trim().to_string(),
    };

    if detail.is_empty() {
        return status.to_string();
    }
    if detail.len() > MAX_ERROR_DETAIL {
        let mut end = MAX_ERROR_DETAIL;
        while !detail.is_char_boundary(end) {
            end -= 1;
        }
        return format!("{}...", &detail[..end]);
    }
    detail
}

impl From<reqwest::Error> for FishjamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FishjamError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for FishjamError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

impl From<url::ParseError> for FishjamError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidConfig(format!("invalid server URL: {err}"))
    }
}
