//! Error types for the Bitunix exchange integration.
//!
//! One taxonomy for every failure shape the transport can produce: no
//! response at all (`Network`/`Timeout`), a response with a non-success
//! HTTP status (`Http`), or a well-formed envelope carrying a business
//! rejection (`Api`). Business codes are resolved against a known table
//! when possible.

use thiserror::Error;

/// Errors that can occur when interacting with Bitunix.
#[derive(Debug, Error)]
pub enum BitunixError {
    /// Request signing failed (clock unavailable).
    #[error("signing error: {0}")]
    Signing(String),

    /// Connectivity failure; no response was obtained.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout; no response was obtained.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// A response was obtained with a non-success HTTP status.
    #[error("HTTP error: status {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },

    /// Business-level rejection inside a 2xx envelope.
    #[error("API error: code {code} - {message}")]
    Api {
        /// Bitunix business code.
        code: i64,
        /// Resolved description, or the unknown-code form.
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A required field was absent from an otherwise valid payload.
    #[error("missing field `{field}` in {context}")]
    MissingField {
        /// The absent wire field.
        field: &'static str,
        /// Which payload it was expected in.
        context: &'static str,
    },
}

impl BitunixError {
    /// Creates an API error, resolving the business code against the known
    /// error table. Unknown codes are surfaced as
    /// `unknown code N, message M`.
    pub fn api(code: i64, message: impl Into<String>) -> Self {
        let message = match known_error_description(code) {
            Some(description) => description.to_string(),
            None => format!("unknown code {code}, message {}", message.into()),
        };
        Self::Api { code, message }
    }

    /// Creates an HTTP status error.
    #[must_use]
    pub const fn http(status: u16) -> Self {
        Self::Http { status }
    }

    /// Creates a missing-field error.
    #[must_use]
    pub const fn missing_field(field: &'static str, context: &'static str) -> Self {
        Self::MissingField { field, context }
    }

    /// Returns true if retrying the same call later could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Http { status } => *status >= 500,
            // Rate-limit business codes clear on their own.
            Self::Api { code, .. } => matches!(code, 10005 | 10006),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for BitunixError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else if err.is_decode() {
            Self::Serialization(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BitunixError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for Bitunix operations.
pub type Result<T> = std::result::Result<T, BitunixError>;

/// Resolves a Bitunix business code against the documented error table.
#[must_use]
pub fn known_error_description(code: i64) -> Option<&'static str> {
    Some(match code {
        10001 => "network error",
        10002 => "parameter error",
        10003 => "api-key is empty",
        10004 => "ip is not in the whitelist",
        10005 => "too many requests, forbidden temporarily",
        10006 => "request too frequently",
        10007 => "signature error",
        10008 => "value error in request",
        20001 => "market does not exist",
        20002 => "position limit exceeded",
        20003 => "insufficient balance",
        20004 => "insufficient trader",
        20005 => "invalid leverage",
        20006 => "futures trading is prohibited for this account",
        20007 => "order not found",
        20008 => "order quantity too small",
        20010 => "duplicate client id",
        20011 => "maximum position size exceeded",
        30001 => "failed to place the order",
        _ => return None,
    })
}
