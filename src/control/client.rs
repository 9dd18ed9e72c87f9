//! HTTP client for communicating with the motor service.

use super::{ControlConfig, MotorRequest};
use reqwest::blocking::Client;
use serde_json::Value;

/// Error type for failed motor service requests.
///
/// The form only distinguishes success from failure; the variants exist for
/// logging and the activity table.
#[derive(Debug)]
pub enum RequestError {
    /// The client could not be built or the request never got a response.
    Network(String),
    /// The service answered with a non-2xx status.
    Status(u16, String),
    /// The status body was not JSON.
    Decode(String),
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::Network(msg) => write!(f, "Network error: {}", msg),
            RequestError::Status(code, body) if body.is_empty() => write!(f, "HTTP {}", code),
            RequestError::Status(code, body) => write!(f, "HTTP {}: {}", code, body),
            RequestError::Decode(msg) => write!(f, "Invalid response body: {}", msg),
        }
    }
}

impl std::error::Error for RequestError {}

/// Successful answer to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A movement or quickstop was accepted; carries the service's message if it sent one.
    Accepted { message: Option<String> },
    /// Status string reported by `/motor_status`.
    Status(String),
}

/// Client for sending requests to the motor service.
#[derive(Clone)]
pub struct MotorClient {
    client: Client,
    config: ControlConfig,
}

impl MotorClient {
    /// Create a new MotorClient with the given configuration.
    ///
    /// No timeout is applied unless `request-timeout-ms` is configured.
    pub fn new(config: ControlConfig) -> Result<Self, RequestError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| RequestError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Execute a single request. Never retries.
    pub fn send(&self, request: &MotorRequest) -> Result<Reply, RequestError> {
        let url = self.config.endpoint_url(request.path());
        log::debug!("Sending {} to {}", request.describe(), url);

        let builder = self.client.request(request.method(), &url);
        let builder = match request {
            MotorRequest::Move { payload, .. } => builder.json(payload),
            MotorRequest::QuickStop | MotorRequest::PollStatus => builder,
        };

        let response = builder.send().map_err(|e| RequestError::Network(e.to_string()))?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        if !status.is_success() {
            return Err(RequestError::Status(status.as_u16(), body));
        }

        match request {
            MotorRequest::PollStatus => parse_status_body(&body).map(Reply::Status),
            MotorRequest::Move { .. } | MotorRequest::QuickStop => {
                let message = reply_message(&body);
                if let Some(message) = &message {
                    log::info!("{} accepted: {}", request.describe(), message);
                }
                Ok(Reply::Accepted { message })
            }
        }
    }
}

/// Extract the `status` field of a `/motor_status` body.
///
/// The value is taken as-is: strings verbatim, other JSON values in their
/// textual form, and a missing or null field as an empty string.
fn parse_status_body(body: &str) -> Result<String, RequestError> {
    let value: Value = serde_json::from_str(body).map_err(|e| RequestError::Decode(e.to_string()))?;
    Ok(match value.get("status") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    })
}

/// Message carried by an action reply, if the body is JSON with a `status` string.
fn reply_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("status")?.as_str().map(str::to_string)
}
