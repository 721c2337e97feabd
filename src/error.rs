//! Error types for the daily specials client

use std::collections::BTreeMap;
use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    /// No response was received (connection refused, DNS, timeout, ...)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A 401 that survived the one-shot refresh
    #[error("Unauthorized: {body}")]
    Unauthorized { body: String },

    /// Refreshing the access token failed and the session was torn down
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// 4xx with a structured body, typically rejected form fields
    #[error("Validation failed with status {status}: {errors}")]
    Validation {
        status: StatusCode,
        errors: ValidationErrors,
    },

    /// Any other non-success status below 500
    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("Server error {status}: {body}")]
    Server { status: StatusCode, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Classify a non-success response.
    ///
    /// 401 maps to [`ClientError::Unauthorized`], 5xx to [`ClientError::Server`].
    /// Other 4xx statuses become [`ClientError::Validation`] when the body is a
    /// JSON object and [`ClientError::Http`] otherwise.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            return ClientError::Unauthorized { body };
        }
        if status.is_server_error() {
            return ClientError::Server { status, body };
        }
        if status.is_client_error() {
            if let Some(errors) = ValidationErrors::parse(&body) {
                return ClientError::Validation { status, errors };
            }
        }
        ClientError::Http { status, body }
    }

    /// HTTP status carried by this error, if a response was received
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            ClientError::Validation { status, .. }
            | ClientError::Http { status, .. }
            | ClientError::Server { status, .. } => Some(*status),
            ClientError::Network(e) => e.status(),
            _ => None,
        }
    }

    /// True for failures that end the session: the caller must log in again.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthorized { .. } | ClientError::SessionExpired(_)
        )
    }
}

/// Field-level errors returned by the backend.
///
/// The backend answers rejected input with a JSON object whose values are
/// either a message or a list of messages, keyed by field name. Non-field
/// messages arrive under `detail`, `message` or `non_field_errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

const SUMMARY_KEYS: [&str; 3] = ["detail", "message", "non_field_errors"];

impl ValidationErrors {
    /// Parse a response body. Returns `None` unless the body is a JSON object.
    pub fn parse(body: &str) -> Option<Self> {
        let Value::Object(map) = serde_json::from_str::<Value>(body).ok()? else {
            return None;
        };

        let fields = map
            .into_iter()
            .map(|(field, value)| (field, flatten_messages(value)))
            .collect();
        Some(Self { fields })
    }

    /// Messages for a single field
    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// The general message, if the backend sent one
    pub fn detail(&self) -> Option<&str> {
        SUMMARY_KEYS
            .iter()
            .find_map(|key| self.fields.get(*key).and_then(|m| m.first()))
            .map(String::as_str)
    }
}

fn flatten_messages(value: Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s],
        Value::Array(items) => items.into_iter().flat_map(flatten_messages).collect(),
        Value::Null => Vec::new(),
        Value::Object(_) => vec![value.to_string()],
        other => vec![other.to_string()],
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(detail) = self.detail() {
            return f.write_str(detail);
        }
        let mut first = true;
        for (field, messages) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}
