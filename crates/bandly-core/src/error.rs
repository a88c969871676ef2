// ── Core error types ──
//
// User-facing errors from bandly-core. These are NOT transport-specific --
// consumers never see HTTP status codes or serde parse failures directly.
// The `From<bandly_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the backend: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Operation rejected by the backend: {message}")]
    Rejected { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// Backend error code (e.g. "EMAIL_TAKEN").
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Streaming ────────────────────────────────────────────────────
    #[error("Notification stream error: {0}")]
    Stream(String),

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<bandly_api::Error> for CoreError {
    fn from(err: bandly_api::Error) -> Self {
        match err {
            bandly_api::Error::Network(e) => CoreError::ConnectionFailed {
                reason: e.to_string(),
            },
            bandly_api::Error::Server {
                status: 401 | 403,
                message,
                ..
            } => CoreError::AuthenticationFailed { message },
            bandly_api::Error::Server {
                status: 404,
                message,
                ..
            } => CoreError::NotFound {
                entity: "resource".into(),
                identifier: message,
            },
            bandly_api::Error::Server {
                status,
                code,
                message,
                ..
            } => CoreError::Api {
                message,
                code: Some(code),
                status: Some(status),
            },
            bandly_api::Error::Parse { message, body: _ } => {
                CoreError::Internal(format!("malformed backend response: {message}"))
            }
            bandly_api::Error::Validation { field, reason } => CoreError::ValidationFailed {
                message: format!("{field}: {reason}"),
            },
            bandly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            bandly_api::Error::Stream(message) => CoreError::Stream(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_authentication_failed() {
        let api = bandly_api::Error::Server {
            status: 401,
            code: "UNAUTHORIZED".into(),
            message: "token expired".into(),
            details: None,
        };
        let core: CoreError = api.into();
        assert!(matches!(core, CoreError::AuthenticationFailed { .. }));
    }

    #[test]
    fn parse_failures_stay_internal() {
        let api = bandly_api::Error::Parse {
            message: "expected value".into(),
            body: "<html>".into(),
        };
        let core: CoreError = api.into();
        assert!(matches!(core, CoreError::Internal(_)));
    }
}
