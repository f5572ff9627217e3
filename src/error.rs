use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every way a call against the API can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced a usable response (connect, DNS, TLS, timeout, body read).
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a non-2xx status.
    #[error("HTTP error: {0}")]
    HttpStatus(ApiError),

    /// The server answered 2xx but the body carries an `errorCode`.
    #[error("API error: {0}")]
    Api(ApiError),

    /// The body was not JSON, or not shaped the way the resource expects.
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The client could not be constructed from the given configuration.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl Error {
    /// Server supplied error details, for both HTTP status and embedded API errors.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::HttpStatus(err) | Error::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Returns true if the call ran into the configured timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport(err) if err.is_timeout())
    }

    pub(crate) fn decode(msg: impl fmt::Display) -> Self {
        Error::Decode(<serde_json::Error as serde::de::Error>::custom(msg))
    }
}

/// Error code as sent by the server. The API uses both numeric and textual codes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Number(i64),
    Text(String),
}

impl ErrorCode {
    /// Reads a code of any JSON shape. Codes that are neither integers nor strings are kept as
    /// their JSON text.
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(code) => ErrorCode::Number(code),
                None => ErrorCode::Text(n.to_string()),
            },
            Value::String(code) => ErrorCode::Text(code.clone()),
            other => ErrorCode::Text(other.to_string()),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Number(code) => write!(f, "{code}"),
            ErrorCode::Text(code) => f.write_str(code),
        }
    }
}

impl PartialEq<&str> for ErrorCode {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, ErrorCode::Text(code) if code == *other)
    }
}

impl PartialEq<i64> for ErrorCode {
    fn eq(&self, other: &i64) -> bool {
        matches!(self, ErrorCode::Number(code) if code == other)
    }
}

/// Error details reported by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiError {
    pub code: Option<ErrorCode>,
    pub message: String,

    /// Set when the error came with a non-2xx response.
    pub http_status: Option<u16>,

    /// Per-field validation messages, when the server sends them.
    pub errors: Option<Value>,
}

/// The error-bearing part of a response body.
#[derive(Debug, Default)]
pub(crate) struct ErrorEnvelope {
    pub error_code: Option<ErrorCode>,
    pub error_message: Option<String>,
    pub errors: Option<Value>,
}

impl ErrorEnvelope {
    /// Reads the error fields of a decoded body, ignoring everything else.
    ///
    /// A non-null `errorCode` always marks the body as an error, whatever shape its fields have.
    pub fn of(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return ErrorEnvelope::default();
        };

        let field = |name: &str| obj.get(name).filter(|value| !value.is_null());

        ErrorEnvelope {
            error_code: field("errorCode").map(ErrorCode::from_value),
            error_message: field("errorMessage")
                .or_else(|| field("message"))
                .map(stringify),
            errors: field("errors").cloned(),
        }
    }

    pub fn into_api_error(
        self,
        http_status: Option<u16>,
        fallback: impl FnOnce() -> String,
    ) -> ApiError {
        let message = match (self.error_message, &self.error_code) {
            (Some(message), _) => message,
            (None, Some(code)) if http_status.is_none() => format!("error code {code}"),
            (None, _) => fallback(),
        };

        ApiError {
            code: self.error_code,
            message,
            http_status,
            errors: self.errors,
        }
    }
}

impl ApiError {
    /// Maps a non-2xx response to an error, reading code and message from the body when it is
    /// JSON and falling back to the status line otherwise.
    pub(crate) fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let status_line = || match status.canonical_reason() {
            Some(reason) => format!("{} {reason}", status.as_u16()),
            None => status.as_u16().to_string(),
        };

        match serde_json::from_slice::<Value>(body) {
            Ok(raw) => ErrorEnvelope::of(&raw).into_api_error(Some(status.as_u16()), status_line),
            Err(_) => ApiError {
                code: None,
                message: status_line(),
                http_status: Some(status.as_u16()),
                errors: None,
            },
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{code}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ApiError {}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// A failure below the HTTP layer.
///
/// Wraps the underlying client error without exposing its type.
#[derive(Debug)]
pub struct TransportError {
    kind: TransportErrorKind,
    source: Box<dyn std::error::Error + Send + Sync>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransportErrorKind {
    Timeout,
    Connect,
    Other,
}

impl TransportError {
    /// Returns true if the request timed out.
    pub fn is_timeout(&self) -> bool {
        self.kind == TransportErrorKind::Timeout
    }

    /// Returns true if no connection could be established.
    pub fn is_connect(&self) -> bool {
        self.kind == TransportErrorKind::Connect
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else {
            TransportErrorKind::Other
        };

        TransportError {
            kind,
            source: Box::new(err),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.into())
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TransportErrorKind::Timeout => write!(f, "request timed out: {}", self.source),
            TransportErrorKind::Connect => write!(f, "connection failed: {}", self.source),
            TransportErrorKind::Other => write!(f, "{}", self.source),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}
