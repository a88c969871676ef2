use thiserror::Error;

/// Top-level error type for the `bandly-api` crate.
///
/// Mirrors the backend's failure taxonomy: transport failures with no
/// response, structured non-2xx envelopes, malformed bodies, and
/// client-side validation that never reaches the network.
/// `bandly-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Structured error from the backend (non-2xx, or `success: false`).
    #[error("Server error (HTTP {status}): {message}")]
    Server {
        status: u16,
        code: String,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Response body could not be parsed as the documented envelope.
    #[error("Malformed response: {message}")]
    Parse { message: String, body: String },

    /// Client-side constraint failure. Never issued a network call.
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Notification stream failed to connect or read.
    #[error("Stream error: {0}")]
    Stream(String),
}

impl Error {
    /// Canonical short code for this error, matching the backend's
    /// error-code vocabulary where one exists.
    pub fn code(&self) -> &str {
        match self {
            Self::Network(_) => "NETWORK",
            Self::Server { code, .. } => code,
            Self::Parse { .. } => "PARSE",
            Self::Validation { .. } => "VALIDATION",
            Self::InvalidUrl(_) => "URL",
            Self::Stream(_) => "STREAM",
        }
    }

    /// Returns `true` if the backend rejected our credential.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Server { status: 401 | 403, .. })
    }

    /// Returns `true` if this is a "not found" response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Server { status: 404, .. })
    }

    /// Message suitable for direct display.
    ///
    /// Server-provided messages are passed through verbatim; transport
    /// and parse failures collapse to a generic line so raw reqwest or
    /// serde noise never reaches the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message, .. } => message.clone(),
            Self::Validation { field, reason } => format!("invalid {field}: {reason}"),
            Self::Network(_) => "could not reach the server, check your connection".to_owned(),
            Self::Parse { .. } => "the server returned an unexpected response".to_owned(),
            Self::InvalidUrl(_) | Self::Stream(_) => self.to_string(),
        }
    }
}
